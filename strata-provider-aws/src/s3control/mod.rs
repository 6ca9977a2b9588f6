//! S3 Control - account-level S3 resources
//!
//! Registration manifest only: the types are listed so the host can resolve
//! them, but no lifecycle handlers are provided yet.

use crate::service_package::{ResourceTags, ServicePackage, ServicePackageResource};

pub struct S3ControlPackage;

const SDK_RESOURCES: &[ServicePackageResource] = &[
    ServicePackageResource::new("s3.access_point"),
    ServicePackageResource::new("s3.account_public_access_block"),
    ServicePackageResource::new("s3control.access_point_policy"),
    ServicePackageResource::new("s3control.bucket")
        .with_name("Bucket")
        .with_tags(ResourceTags {
            identifier_attribute: None,
        }),
    ServicePackageResource::new("s3control.bucket_lifecycle_configuration"),
    ServicePackageResource::new("s3control.bucket_policy"),
    ServicePackageResource::new("s3control.multi_region_access_point"),
    ServicePackageResource::new("s3control.multi_region_access_point_policy"),
    ServicePackageResource::new("s3control.object_lambda_access_point"),
    ServicePackageResource::new("s3control.object_lambda_access_point_policy"),
    ServicePackageResource::new("s3control.storage_lens_configuration")
        .with_name("Storage Lens Configuration")
        .with_tags(ResourceTags {
            identifier_attribute: None,
        }),
];

const SDK_DATA_SOURCES: &[ServicePackageResource] = &[
    ServicePackageResource::new("s3.account_public_access_block"),
    ServicePackageResource::new("s3control.multi_region_access_point"),
];

impl ServicePackage for S3ControlPackage {
    fn name(&self) -> &'static str {
        "s3control"
    }

    fn sdk_resources(&self) -> Vec<ServicePackageResource> {
        SDK_RESOURCES.to_vec()
    }

    fn sdk_data_sources(&self) -> Vec<ServicePackageResource> {
        SDK_DATA_SOURCES.to_vec()
    }

    fn framework_resources(&self) -> Vec<ServicePackageResource> {
        vec![
            ServicePackageResource::new("s3control.access_grants_instance")
                .with_name("Access Grants Instance")
                .with_tags(ResourceTags {
                    identifier_attribute: Some("id"),
                }),
        ]
    }
}

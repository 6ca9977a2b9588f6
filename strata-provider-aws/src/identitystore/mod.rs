//! IAM Identity Center identity store

pub mod api;
pub mod sdk;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

use crate::service_package::{ServicePackage, ServicePackageResource};

pub struct IdentityStorePackage;

impl ServicePackage for IdentityStorePackage {
    fn name(&self) -> &'static str {
        "identitystore"
    }

    fn sdk_resources(&self) -> Vec<ServicePackageResource> {
        vec![ServicePackageResource::new(user::RESOURCE_TYPE).with_name("User")]
    }
}

//! Service packages - per-service registration manifests
//!
//! Each AWS service package lists the resource and data source types it
//! registers and knows how its API client is configured.

use crate::config::ProviderConfig;
use crate::identitystore::IdentityStorePackage;
use crate::s3control::S3ControlPackage;

/// Tag handling declared by a registered type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceTags {
    /// Attribute holding the identifier tags are attached to.
    /// `None` means the type's remote identifier.
    pub identifier_attribute: Option<&'static str>,
}

/// A resource or data source type registered by a service package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePackageResource {
    pub type_name: &'static str,
    /// Human readable name
    pub name: Option<&'static str>,
    pub tags: Option<ResourceTags>,
}

impl ServicePackageResource {
    pub const fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            name: None,
            tags: None,
        }
    }

    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub const fn with_tags(mut self, tags: ResourceTags) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Settings an API client of one service package is built with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceClientConfig {
    pub region: String,
    /// Endpoint override; the SDK default when unset
    pub endpoint: Option<String>,
}

pub trait ServicePackage: Send + Sync {
    /// Service package name, used as the key for endpoint overrides
    fn name(&self) -> &'static str;

    fn sdk_resources(&self) -> Vec<ServicePackageResource> {
        Vec::new()
    }

    fn sdk_data_sources(&self) -> Vec<ServicePackageResource> {
        Vec::new()
    }

    fn framework_resources(&self) -> Vec<ServicePackageResource> {
        Vec::new()
    }

    fn framework_data_sources(&self) -> Vec<ServicePackageResource> {
        Vec::new()
    }

    /// Resolve client settings for this package from provider configuration
    fn client_config(&self, config: &ProviderConfig) -> ServiceClientConfig {
        ServiceClientConfig {
            region: config.region.clone(),
            endpoint: config.endpoint(self.name()).map(str::to_string),
        }
    }

    /// All resource types, SDK-style first
    fn resources(&self) -> Vec<ServicePackageResource> {
        let mut resources = self.sdk_resources();
        resources.extend(self.framework_resources());
        resources
    }

    /// All data source types, SDK-style first
    fn data_sources(&self) -> Vec<ServicePackageResource> {
        let mut data_sources = self.sdk_data_sources();
        data_sources.extend(self.framework_data_sources());
        data_sources
    }
}

/// Every service package this provider ships
pub fn service_packages() -> Vec<Box<dyn ServicePackage>> {
    vec![Box::new(IdentityStorePackage), Box::new(S3ControlPackage)]
}

/// Find the package registering a resource type
pub fn find_resource(type_name: &str) -> Option<(&'static str, ServicePackageResource)> {
    service_packages().iter().find_map(|package| {
        package
            .resources()
            .into_iter()
            .find(|r| r.type_name == type_name)
            .map(|r| (package.name(), r))
    })
}

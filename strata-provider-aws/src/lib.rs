//! Strata AWS Provider
//!
//! AWS Provider implementation

pub mod config;
pub mod identitystore;
pub mod resources;
pub mod s3control;
pub mod service_package;

use std::sync::Arc;

use strata_core::provider::{
    Action, BoxFuture, Provider, ProviderError, ProviderResult, ResourceType,
};
use strata_core::resource::{Resource, ResourceId, State};

use config::ProviderConfig;
use identitystore::IdentityStorePackage;
use identitystore::api::IdentityStoreApi;
use identitystore::sdk::SdkIdentityStore;
use identitystore::user;
use service_package::{ServicePackage, find_resource};

/// AWS Provider
pub struct AwsProvider {
    identitystore: Arc<dyn IdentityStoreApi>,
    region: String,
}

impl AwsProvider {
    /// Create a new AWS Provider
    pub async fn new(config: &ProviderConfig) -> Self {
        let sdk_config = config.load_sdk_config().await;
        let identitystore = SdkIdentityStore::new(
            &sdk_config,
            &IdentityStorePackage.client_config(config),
        );

        Self {
            identitystore: Arc::new(identitystore),
            region: config.region.clone(),
        }
    }

    /// Create with specific clients (for testing)
    pub fn with_clients(identitystore: Arc<dyn IdentityStoreApi>, region: String) -> Self {
        Self {
            identitystore,
            region,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Error for a type this provider cannot manage
    fn unsupported(id: &ResourceId, action: Action) -> ProviderError {
        let message = match find_resource(&id.resource_type) {
            Some((package, _)) => format!(
                "no handler for resource type {} (service package {})",
                id.resource_type, package
            ),
            None => format!("Unknown resource type: {}", id.resource_type),
        };
        ProviderError::new(message)
            .with_action(action)
            .for_resource(id.clone())
    }
}

impl Provider for AwsProvider {
    fn name(&self) -> &'static str {
        "aws"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        resources::resource_types()
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.map(str::to_string);
        Box::pin(async move {
            match id.resource_type.as_str() {
                user::RESOURCE_TYPE => match identifier {
                    Some(identifier) => {
                        user::read_user(self.identitystore.as_ref(), &id, &identifier, false).await
                    }
                    None => Ok(State::not_found(id)),
                },
                _ => Err(Self::unsupported(&id, Action::Reading)),
            }
        })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move {
            match resource.id.resource_type.as_str() {
                user::RESOURCE_TYPE => {
                    user::create_user(self.identitystore.as_ref(), &resource).await
                }
                _ => Err(Self::unsupported(&resource.id, Action::Creating)),
            }
        })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move {
            match id.resource_type.as_str() {
                user::RESOURCE_TYPE => {
                    user::update_user(self.identitystore.as_ref(), &id, &identifier, &from, &to)
                        .await
                }
                _ => Err(Self::unsupported(&id, Action::Updating)),
            }
        })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move {
            match id.resource_type.as_str() {
                user::RESOURCE_TYPE => {
                    user::delete_user(self.identitystore.as_ref(), &id, &identifier).await
                }
                _ => Err(Self::unsupported(&id, Action::Deleting)),
            }
        })
    }
}

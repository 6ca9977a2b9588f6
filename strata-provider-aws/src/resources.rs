//! Resource type definitions
//!
//! One `ResourceType` per type registered by a service package. Types
//! without handlers get an empty schema.

use strata_core::provider::ResourceType;
use strata_core::schema::ResourceSchema;

use crate::identitystore::user;
use crate::service_package::service_packages;

pub struct RegisteredType {
    type_name: &'static str,
}

impl ResourceType for RegisteredType {
    fn name(&self) -> &'static str {
        self.type_name
    }

    fn schema(&self) -> ResourceSchema {
        match self.type_name {
            user::RESOURCE_TYPE => user::user_schema(),
            other => ResourceSchema::new(other),
        }
    }
}

/// Returns all resource types supported by this provider
pub fn resource_types() -> Vec<Box<dyn ResourceType>> {
    service_packages()
        .iter()
        .flat_map(|package| package.resources())
        .map(|r| Box::new(RegisteredType { type_name: r.type_name }) as Box<dyn ResourceType>)
        .collect()
}

/// Whether this provider implements lifecycle handlers for a type
pub fn has_handlers(type_name: &str) -> bool {
    type_name == user::RESOURCE_TYPE
}

//! Strata Core
//!
//! Contracts shared between the host that drives resource lifecycles and the
//! providers that translate them into cloud API calls.

pub mod provider;
pub mod resource;
pub mod schema;

//! Composite identifier of an Identity Store user: `<identity-store-id>/<user-id>`

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a resource id in the form: identity-store-id/user-id, got {0:?}")]
pub struct InvalidUserKey(pub String);

/// Store id and user id of a user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserKey {
    pub identity_store_id: String,
    pub user_id: String,
}

impl UserKey {
    pub fn new(identity_store_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            identity_store_id: identity_store_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.identity_store_id, self.user_id)
    }
}

impl FromStr for UserKey {
    type Err = InvalidUserKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [store, user] if !store.is_empty() && !user.is_empty() => Ok(Self::new(*store, *user)),
            _ => Err(InvalidUserKey(s.to_string())),
        }
    }
}

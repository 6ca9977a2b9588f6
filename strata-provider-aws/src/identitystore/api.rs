//! Identity Store API boundary
//!
//! Request and response shapes of the Identity Store user operations, and the
//! trait the user resource talks to. `SdkIdentityStore` implements it on top
//! of the AWS SDK; tests use an in-memory fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured name of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honorific_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honorific_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
}

/// Postal address
///
/// Serializes to the field map the update API expects for the `addresses`
/// attribute: absent fields are left out, `primary` is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub primary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
}

/// Email address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    #[serde(default)]
    pub primary: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Phone number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    #[serde(default)]
    pub primary: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub phone_number_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Identifier issued for the user by an external identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalId {
    pub id: Option<String>,
    pub issuer: Option<String>,
}

/// A user as returned by DescribeUser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub identity_store_id: String,
    pub user_id: String,
    pub user_name: Option<String>,
    pub display_name: Option<String>,
    pub name: Option<Name>,
    pub nick_name: Option<String>,
    pub profile_url: Option<String>,
    pub title: Option<String>,
    pub user_type: Option<String>,
    pub preferred_language: Option<String>,
    pub locale: Option<String>,
    pub timezone: Option<String>,
    pub addresses: Vec<Address>,
    pub emails: Vec<Email>,
    pub phone_numbers: Vec<PhoneNumber>,
    pub external_ids: Vec<ExternalId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserInput {
    pub identity_store_id: String,
    pub user_name: String,
    pub display_name: String,
    pub name: Option<Name>,
    pub nick_name: Option<String>,
    pub profile_url: Option<String>,
    pub title: Option<String>,
    pub user_type: Option<String>,
    pub preferred_language: Option<String>,
    pub locale: Option<String>,
    pub timezone: Option<String>,
    pub addresses: Vec<Address>,
    pub emails: Vec<Email>,
    pub phone_numbers: Vec<PhoneNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserOutput {
    pub identity_store_id: String,
    /// Missing when the service returned an empty response
    pub user_id: Option<String>,
}

/// Sets or unsets one addressable attribute of a user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeOperation {
    /// Remote attribute path, e.g. `nickName` or `name.givenName`
    pub attribute_path: String,
    /// New value; `None` unsets the attribute
    pub attribute_value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    pub identity_store_id: String,
    pub user_id: String,
    pub operations: Vec<AttributeOperation>,
}

/// Errors returned by the Identity Store API boundary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("empty result: {0}")]
    EmptyResult(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Service(String),
}

impl ApiError {
    /// Whether the remote object is known not to exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_) | ApiError::EmptyResult(_))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Identity Store user operations
#[async_trait]
pub trait IdentityStoreApi: Send + Sync {
    async fn create_user(&self, input: CreateUserInput) -> ApiResult<CreateUserOutput>;

    /// Fetch a user; fails with `ApiError::NotFound` when it does not exist
    async fn describe_user(&self, identity_store_id: &str, user_id: &str) -> ApiResult<User>;

    /// Apply all operations of the request as one batch
    async fn update_user(&self, input: UpdateUserInput) -> ApiResult<()>;

    async fn delete_user(&self, identity_store_id: &str, user_id: &str) -> ApiResult<()>;
}

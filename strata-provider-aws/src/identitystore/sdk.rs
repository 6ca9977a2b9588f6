//! Identity Store API backed by the AWS SDK

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_identitystore::Client as IdentityStoreClient;
use aws_sdk_identitystore::config::Region;
use aws_sdk_identitystore::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_identitystore::types;
use aws_smithy_types::{Document, Number};

use crate::service_package::ServiceClientConfig;

use super::api::{
    Address, ApiError, ApiResult, AttributeOperation, CreateUserInput, CreateUserOutput, Email,
    ExternalId, IdentityStoreApi, Name, PhoneNumber, UpdateUserInput, User,
};

/// Identity Store client talking to AWS
pub struct SdkIdentityStore {
    client: IdentityStoreClient,
}

impl SdkIdentityStore {
    /// Create a client from shared SDK configuration and the package's
    /// client settings
    pub fn new(sdk_config: &SdkConfig, client_config: &ServiceClientConfig) -> Self {
        let mut builder = aws_sdk_identitystore::config::Builder::from(sdk_config)
            .region(Region::new(client_config.region.clone()));
        if let Some(ref url) = client_config.endpoint {
            builder = builder.endpoint_url(url);
        }
        Self {
            client: IdentityStoreClient::from_conf(builder.build()),
        }
    }

    /// Create with a specific client (for testing)
    pub fn with_client(client: IdentityStoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityStoreApi for SdkIdentityStore {
    async fn create_user(&self, input: CreateUserInput) -> ApiResult<CreateUserOutput> {
        let out = self
            .client
            .create_user()
            .identity_store_id(input.identity_store_id)
            .user_name(input.user_name)
            .display_name(input.display_name)
            .set_name(input.name.map(to_sdk_name))
            .set_nick_name(input.nick_name)
            .set_profile_url(input.profile_url)
            .set_title(input.title)
            .set_user_type(input.user_type)
            .set_preferred_language(input.preferred_language)
            .set_locale(input.locale)
            .set_timezone(input.timezone)
            .set_addresses(non_empty(input.addresses, to_sdk_address))
            .set_emails(non_empty(input.emails, to_sdk_email))
            .set_phone_numbers(non_empty(input.phone_numbers, to_sdk_phone_number))
            .send()
            .await
            .map_err(classify)?;

        Ok(CreateUserOutput {
            identity_store_id: out.identity_store_id.into_option().unwrap_or_default(),
            user_id: out.user_id.into_option(),
        })
    }

    async fn describe_user(&self, identity_store_id: &str, user_id: &str) -> ApiResult<User> {
        let out = self
            .client
            .describe_user()
            .identity_store_id(identity_store_id)
            .user_id(user_id)
            .send()
            .await
            .map_err(classify)?;

        let Some(found_user_id) = out.user_id.into_option() else {
            return Err(ApiError::EmptyResult(format!(
                "DescribeUser {}/{}",
                identity_store_id, user_id
            )));
        };

        Ok(User {
            identity_store_id: out
                .identity_store_id
                .into_option()
                .unwrap_or_else(|| identity_store_id.to_string()),
            user_id: found_user_id,
            user_name: out.user_name.into_option(),
            display_name: out.display_name.into_option(),
            name: out.name.map(from_sdk_name),
            nick_name: out.nick_name,
            profile_url: out.profile_url,
            title: out.title,
            user_type: out.user_type,
            preferred_language: out.preferred_language,
            locale: out.locale,
            timezone: out.timezone,
            addresses: out
                .addresses
                .unwrap_or_default()
                .into_iter()
                .map(from_sdk_address)
                .collect(),
            emails: out
                .emails
                .unwrap_or_default()
                .into_iter()
                .map(from_sdk_email)
                .collect(),
            phone_numbers: out
                .phone_numbers
                .unwrap_or_default()
                .into_iter()
                .map(from_sdk_phone_number)
                .collect(),
            external_ids: out
                .external_ids
                .unwrap_or_default()
                .into_iter()
                .map(from_sdk_external_id)
                .collect(),
        })
    }

    async fn update_user(&self, input: UpdateUserInput) -> ApiResult<()> {
        let operations = input
            .operations
            .into_iter()
            .map(to_sdk_operation)
            .collect::<ApiResult<Vec<_>>>()?;

        self.client
            .update_user()
            .identity_store_id(input.identity_store_id)
            .user_id(input.user_id)
            .set_operations(Some(operations))
            .send()
            .await
            .map_err(classify)?;

        Ok(())
    }

    async fn delete_user(&self, identity_store_id: &str, user_id: &str) -> ApiResult<()> {
        self.client
            .delete_user()
            .identity_store_id(identity_store_id)
            .user_id(user_id)
            .send()
            .await
            .map_err(classify)?;

        Ok(())
    }
}

/// Map an SDK failure to `NotFound` or `Service`
fn classify<E, R>(e: SdkError<E, R>) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&e).to_string();
    if e.code() == Some("ResourceNotFoundException") {
        ApiError::NotFound(message)
    } else {
        ApiError::Service(message)
    }
}

// =============================================================================
// SDK Type Conversion
// =============================================================================

/// Members the service models as required arrive as `String`, optional ones
/// as `Option<String>`.
trait IntoOptionalString {
    fn into_option(self) -> Option<String>;
}

impl IntoOptionalString for String {
    fn into_option(self) -> Option<String> {
        Some(self).filter(|s| !s.is_empty())
    }
}

impl IntoOptionalString for Option<String> {
    fn into_option(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

trait IntoFlag {
    fn into_flag(self) -> bool;
}

impl IntoFlag for bool {
    fn into_flag(self) -> bool {
        self
    }
}

impl IntoFlag for Option<bool> {
    fn into_flag(self) -> bool {
        self.unwrap_or(false)
    }
}

fn non_empty<T, U>(items: Vec<T>, convert: fn(T) -> U) -> Option<Vec<U>> {
    if items.is_empty() {
        None
    } else {
        Some(items.into_iter().map(convert).collect())
    }
}

fn to_sdk_name(name: Name) -> types::Name {
    types::Name::builder()
        .set_family_name(name.family_name)
        .set_formatted(name.formatted)
        .set_given_name(name.given_name)
        .set_honorific_prefix(name.honorific_prefix)
        .set_honorific_suffix(name.honorific_suffix)
        .set_middle_name(name.middle_name)
        .build()
}

fn from_sdk_name(name: types::Name) -> Name {
    Name {
        family_name: name.family_name,
        formatted: name.formatted,
        given_name: name.given_name,
        honorific_prefix: name.honorific_prefix,
        honorific_suffix: name.honorific_suffix,
        middle_name: name.middle_name,
    }
}

fn to_sdk_address(address: Address) -> types::Address {
    types::Address::builder()
        .set_country(address.country)
        .set_formatted(address.formatted)
        .set_locality(address.locality)
        .set_postal_code(address.postal_code)
        .primary(address.primary)
        .set_region(address.region)
        .set_street_address(address.street_address)
        .set_type(address.address_type)
        .build()
}

fn from_sdk_address(address: types::Address) -> Address {
    Address {
        country: address.country,
        formatted: address.formatted,
        locality: address.locality,
        postal_code: address.postal_code,
        primary: address.primary.into_flag(),
        region: address.region,
        street_address: address.street_address,
        address_type: address.r#type,
    }
}

fn to_sdk_email(email: Email) -> types::Email {
    types::Email::builder()
        .primary(email.primary)
        .set_type(email.email_type)
        .set_value(email.value)
        .build()
}

fn from_sdk_email(email: types::Email) -> Email {
    Email {
        primary: email.primary.into_flag(),
        email_type: email.r#type,
        value: email.value,
    }
}

fn to_sdk_phone_number(phone_number: PhoneNumber) -> types::PhoneNumber {
    types::PhoneNumber::builder()
        .primary(phone_number.primary)
        .set_type(phone_number.phone_number_type)
        .set_value(phone_number.value)
        .build()
}

fn from_sdk_phone_number(phone_number: types::PhoneNumber) -> PhoneNumber {
    PhoneNumber {
        primary: phone_number.primary.into_flag(),
        phone_number_type: phone_number.r#type,
        value: phone_number.value,
    }
}

fn from_sdk_external_id(external_id: types::ExternalId) -> ExternalId {
    ExternalId {
        id: external_id.id.into_option(),
        issuer: external_id.issuer.into_option(),
    }
}

fn to_sdk_operation(operation: AttributeOperation) -> ApiResult<types::AttributeOperation> {
    let value = operation
        .attribute_value
        .map(to_document)
        .unwrap_or(Document::Null);

    types::AttributeOperation::builder()
        .attribute_path(operation.attribute_path)
        .attribute_value(value)
        .build()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

/// Convert a JSON value into a smithy document
fn to_document(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Null => Document::Null,
        serde_json::Value::Bool(b) => Document::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Document::Number(Number::PosInt(u))
            } else if let Some(i) = n.as_i64() {
                Document::Number(Number::NegInt(i))
            } else {
                Document::Number(Number::Float(n.as_f64().unwrap_or_default()))
            }
        }
        serde_json::Value::String(s) => Document::String(s),
        serde_json::Value::Array(items) => {
            Document::Array(items.into_iter().map(to_document).collect())
        }
        serde_json::Value::Object(map) => Document::Object(
            map.into_iter()
                .map(|(k, v)| (k, to_document(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn classify_maps_resource_not_found() {
        use aws_sdk_identitystore::error::ErrorMetadata;
        use aws_sdk_identitystore::operation::delete_user::DeleteUserError;

        let not_found = DeleteUserError::generic(
            ErrorMetadata::builder()
                .code("ResourceNotFoundException")
                .message("no such user")
                .build(),
        );
        let err = classify(SdkError::<DeleteUserError, ()>::service_error(not_found, ()));
        assert!(err.is_not_found());

        let throttled = DeleteUserError::generic(
            ErrorMetadata::builder().code("ThrottlingException").build(),
        );
        let err = classify(SdkError::<DeleteUserError, ()>::service_error(throttled, ()));
        assert!(matches!(err, ApiError::Service(_)));

        let err = classify(SdkError::<DeleteUserError, ()>::construction_failure("bad input"));
        assert!(matches!(err, ApiError::Service(_)));
    }

    #[test]
    fn to_document_converts_nested_field_maps() {
        let doc = to_document(json!([{"primary": true, "value": "a@b", "count": 2}]));
        let Document::Array(items) = doc else {
            panic!("Expected array");
        };
        let Document::Object(map) = &items[0] else {
            panic!("Expected object");
        };
        let mut expected = HashMap::new();
        expected.insert("primary".to_string(), Document::Bool(true));
        expected.insert("value".to_string(), Document::String("a@b".to_string()));
        expected.insert("count".to_string(), Document::Number(Number::PosInt(2)));
        assert_eq!(map, &expected);
    }

    #[test]
    fn to_document_null_and_negative_numbers() {
        assert_eq!(to_document(json!(null)), Document::Null);
        assert_eq!(
            to_document(json!(-3)),
            Document::Number(Number::NegInt(-3))
        );
    }

    #[test]
    fn unset_operation_sends_null_document() {
        let op = to_sdk_operation(AttributeOperation {
            attribute_path: "nickName".to_string(),
            attribute_value: None,
        })
        .unwrap();
        assert_eq!(op.attribute_path(), "nickName");
        assert_eq!(op.attribute_value(), Some(&Document::Null));
    }

    #[test]
    fn optional_string_normalization() {
        assert_eq!(String::new().into_option(), None);
        assert_eq!("u-1".to_string().into_option(), Some("u-1".to_string()));
        assert_eq!(Some(String::new()).into_option(), None);
        assert!(Some(true).into_flag());
        assert!(!None::<bool>.into_flag());
    }

    #[test]
    fn address_conversion_keeps_every_field() {
        let address = Address {
            country: Some("US".to_string()),
            formatted: Some("1 Main St, Springfield".to_string()),
            locality: Some("Springfield".to_string()),
            postal_code: Some("12345".to_string()),
            primary: true,
            region: Some("IL".to_string()),
            street_address: Some("1 Main St".to_string()),
            address_type: Some("home".to_string()),
        };
        assert_eq!(from_sdk_address(to_sdk_address(address.clone())), address);
    }
}

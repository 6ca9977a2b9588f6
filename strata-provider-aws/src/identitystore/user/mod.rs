//! identitystore.user - Users of an IAM Identity Center identity store
//!
//! Remote identifier: `<identity-store-id>/<user-id>` (see [`UserKey`]).

mod flex;
mod id;
mod model;
mod operations;

use std::collections::HashMap;

use strata_core::provider::{Action, ProviderError, ProviderResult};
use strata_core::resource::{Resource, ResourceId, State, Value};
use strata_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema, types};

use super::api::{CreateUserInput, IdentityStoreApi, UpdateUserInput, User};
use flex::{
    expand_addresses, expand_emails, expand_name, expand_phone_numbers, flatten_addresses,
    flatten_emails, flatten_external_ids, flatten_name_value, flatten_phone_numbers,
};

pub use id::{InvalidUserKey, UserKey};
pub use model::{
    AddressBlock, ConfigError, EmailBlock, ExternalIdBlock, NameBlock, PhoneNumberBlock,
    UserConfig,
};
pub use operations::{FieldMapping, USER_FIELDS, user_operations};

pub const RESOURCE_TYPE: &str = "identitystore.user";

/// Groups written back into state, checked against the schema before use
const FLATTENED_GROUPS: &[&str] = &[
    "name",
    "addresses",
    "emails",
    "phone_numbers",
    "external_ids",
];

// =============================================================================
// Schema
// =============================================================================

fn text() -> AttributeType {
    types::string_len_between(1, 1024)
}

fn primary() -> AttributeSchema {
    AttributeSchema::new("primary", AttributeType::Bool).with_default(Value::Bool(false))
}

fn contact_block() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(primary())
            .attribute(AttributeSchema::new("type", text()))
            .attribute(AttributeSchema::new("value", text()))
            .max_items(1),
    )
}

pub fn user_schema() -> ResourceSchema {
    let address = BlockSchema::new()
        .attribute(AttributeSchema::new("country", text()))
        .attribute(AttributeSchema::new("formatted", text()))
        .attribute(AttributeSchema::new("locality", text()))
        .attribute(AttributeSchema::new("postal_code", text()))
        .attribute(primary())
        .attribute(AttributeSchema::new("region", text()))
        .attribute(AttributeSchema::new("street_address", text()))
        .attribute(AttributeSchema::new("type", text()))
        .max_items(1);

    let name = BlockSchema::new()
        .attribute(AttributeSchema::new("family_name", text()).required())
        .attribute(AttributeSchema::new("formatted", text()))
        .attribute(AttributeSchema::new("given_name", text()).required())
        .attribute(AttributeSchema::new("honorific_prefix", text()))
        .attribute(AttributeSchema::new("honorific_suffix", text()))
        .attribute(AttributeSchema::new("middle_name", text()))
        .max_items(1);

    let external_id = BlockSchema::new()
        .attribute(AttributeSchema::new("id", AttributeType::String))
        .attribute(AttributeSchema::new("issuer", AttributeType::String));

    let mut schema = ResourceSchema::new(RESOURCE_TYPE)
        .with_description("A user in an IAM Identity Center identity store")
        .attribute(AttributeSchema::new("addresses", AttributeType::Block(address)))
        .attribute(
            AttributeSchema::new("display_name", text())
                .required()
                .with_description("Name displayed for the user"),
        )
        .attribute(AttributeSchema::new("emails", contact_block()))
        .attribute(AttributeSchema::new("external_ids", AttributeType::Block(external_id)).computed())
        .attribute(
            AttributeSchema::new("identity_store_id", AttributeType::String)
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("name", AttributeType::Block(name))
                .required()
                .with_description("Structured name of the user"),
        )
        .attribute(AttributeSchema::new("phone_numbers", contact_block()))
        .attribute(
            AttributeSchema::new("user_id", AttributeType::String)
                .computed()
                .with_description("Identifier assigned by the identity store"),
        )
        .attribute(
            AttributeSchema::new("user_name", types::string_len_between(1, 128))
                .required()
                .force_new(),
        );

    for optional in [
        "locale",
        "nickname",
        "preferred_language",
        "profile_url",
        "timezone",
        "title",
        "user_type",
    ] {
        schema = schema.attribute(AttributeSchema::new(optional, text()));
    }
    schema
}

// =============================================================================
// Handlers
// =============================================================================

fn parse_key(id: &ResourceId, identifier: &str, action: Action) -> ProviderResult<UserKey> {
    identifier.parse::<UserKey>().map_err(|e| {
        ProviderError::from_cause(action, e)
            .with_identifier(identifier)
            .for_resource(id.clone())
    })
}

fn create_input(config: &UserConfig) -> CreateUserInput {
    CreateUserInput {
        identity_store_id: config.identity_store_id.clone(),
        user_name: config.user_name.clone(),
        display_name: config.display_name.clone(),
        name: Some(expand_name(&config.name)),
        nick_name: config.nickname.clone(),
        profile_url: config.profile_url.clone(),
        title: config.title.clone(),
        user_type: config.user_type.clone(),
        preferred_language: config.preferred_language.clone(),
        locale: config.locale.clone(),
        timezone: config.timezone.clone(),
        addresses: expand_addresses(config.addresses.as_ref()),
        emails: expand_emails(config.emails.as_ref()),
        phone_numbers: expand_phone_numbers(config.phone_numbers.as_ref()),
    }
}

pub async fn create_user(api: &dyn IdentityStoreApi, resource: &Resource) -> ProviderResult<State> {
    let id = &resource.id;
    let config = UserConfig::from_attributes(&resource.attributes).map_err(|e| {
        ProviderError::from_cause(Action::Creating, e).for_resource(id.clone())
    })?;

    log::debug!(
        "creating identity store user {} in {}",
        config.user_name,
        config.identity_store_id
    );
    let output = api.create_user(create_input(&config)).await.map_err(|e| {
        ProviderError::from_cause(Action::Creating, e)
            .with_identifier(&config.user_name)
            .for_resource(id.clone())
    })?;

    let user_id = output.user_id.ok_or_else(|| {
        ProviderError::new("empty output")
            .with_action(Action::Creating)
            .with_identifier(&config.user_name)
            .for_resource(id.clone())
    })?;
    let identity_store_id = if output.identity_store_id.is_empty() {
        config.identity_store_id
    } else {
        output.identity_store_id
    };

    let key = UserKey::new(identity_store_id, user_id);
    read_user(api, id, &key.to_string(), true).await
}

/// Fetch a user and render it into state.
///
/// A user that no longer exists is reported as `State::not_found` unless it
/// was just created, in which case the lookup failure is an error.
pub async fn read_user(
    api: &dyn IdentityStoreApi,
    id: &ResourceId,
    identifier: &str,
    new_resource: bool,
) -> ProviderResult<State> {
    let key = parse_key(id, identifier, Action::Reading)?;

    let user = match api.describe_user(&key.identity_store_id, &key.user_id).await {
        Ok(user) => user,
        Err(e) if e.is_not_found() && !new_resource => {
            log::warn!(
                "identity store user ({}) not found, removing from state",
                identifier
            );
            return Ok(State::not_found(id.clone()));
        }
        Err(e) => {
            return Err(ProviderError::from_cause(Action::Reading, e)
                .with_identifier(identifier)
                .for_resource(id.clone()));
        }
    };

    let attributes = user_attributes(&key, user);
    let schema = user_schema();
    for group in FLATTENED_GROUPS {
        if let Some(value) = attributes.get(*group) {
            schema.validate_attribute_shape(group, value).map_err(|e| {
                ProviderError::from_cause(Action::Setting, e)
                    .with_identifier(identifier)
                    .for_resource(id.clone())
            })?;
        }
    }

    Ok(State::existing(id.clone(), attributes).with_identifier(key.to_string()))
}

fn user_attributes(key: &UserKey, user: User) -> HashMap<String, Value> {
    let mut attributes = HashMap::new();
    attributes.insert(
        "identity_store_id".to_string(),
        Value::String(key.identity_store_id.clone()),
    );
    attributes.insert("user_id".to_string(), Value::String(key.user_id.clone()));

    let scalars = [
        ("user_name", user.user_name),
        ("display_name", user.display_name),
        ("nickname", user.nick_name),
        ("profile_url", user.profile_url),
        ("title", user.title),
        ("user_type", user.user_type),
        ("preferred_language", user.preferred_language),
        ("locale", user.locale),
        ("timezone", user.timezone),
    ];
    for (name, value) in scalars {
        if let Some(v) = value {
            attributes.insert(name.to_string(), Value::String(v));
        }
    }

    let groups = [
        ("name", flatten_name_value(user.name.as_ref())),
        ("addresses", flatten_addresses(&user.addresses)),
        ("emails", flatten_emails(&user.emails)),
        ("phone_numbers", flatten_phone_numbers(&user.phone_numbers)),
        ("external_ids", flatten_external_ids(&user.external_ids)),
    ];
    for (name, value) in groups {
        if let Some(v) = value {
            attributes.insert(name.to_string(), v);
        }
    }
    attributes
}

pub async fn update_user(
    api: &dyn IdentityStoreApi,
    id: &ResourceId,
    identifier: &str,
    from: &State,
    to: &Resource,
) -> ProviderResult<State> {
    let key = parse_key(id, identifier, Action::Updating)?;
    let config_error = |e: ConfigError| {
        ProviderError::from_cause(Action::Updating, e)
            .with_identifier(identifier)
            .for_resource(id.clone())
    };
    let prior = UserConfig::from_attributes(&from.attributes).map_err(config_error)?;
    let proposed = UserConfig::from_attributes(&to.attributes).map_err(config_error)?;

    let operations = user_operations(&prior, &proposed).map_err(|e| {
        ProviderError::from_cause(Action::Updating, e)
            .with_identifier(identifier)
            .for_resource(id.clone())
    })?;
    if !operations.is_empty() {
        log::debug!(
            "updating identity store user ({}): {:?}",
            identifier,
            operations
        );
        let input = UpdateUserInput {
            identity_store_id: key.identity_store_id.clone(),
            user_id: key.user_id.clone(),
            operations,
        };
        api.update_user(input).await.map_err(|e| {
            ProviderError::from_cause(Action::Updating, e)
                .with_identifier(identifier)
                .for_resource(id.clone())
        })?;
    }

    read_user(api, id, identifier, false).await
}

pub async fn delete_user(
    api: &dyn IdentityStoreApi,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<()> {
    log::info!("deleting identity store user ({})", identifier);
    let key = parse_key(id, identifier, Action::Deleting)?;

    match api.delete_user(&key.identity_store_id, &key.user_id).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(ProviderError::from_cause(Action::Deleting, e)
            .with_identifier(identifier)
            .for_resource(id.clone())),
    }
}

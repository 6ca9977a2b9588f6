//! Typed configuration of an Identity Store user
//!
//! The host hands configuration and state over as attribute maps. They are
//! parsed into `UserConfig` once, so the handlers never inspect loosely typed
//! values. Empty strings are treated as "not set" at this boundary.

use std::collections::HashMap;

use strata_core::resource::Value;
use thiserror::Error;

/// Errors raised while reading a user's attributes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("required attribute '{0}' is missing")]
    Missing(String),

    #[error("attribute '{name}' must be a {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("attribute '{name}' allows at most {max} item(s), got {got}")]
    TooManyItems { name: String, max: usize, got: usize },
}

type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameBlock {
    pub family_name: Option<String>,
    pub formatted: Option<String>,
    pub given_name: Option<String>,
    pub honorific_prefix: Option<String>,
    pub honorific_suffix: Option<String>,
    pub middle_name: Option<String>,
}

impl NameBlock {
    pub fn from_map(map: &HashMap<String, Value>) -> ConfigResult<Self> {
        Ok(Self {
            family_name: optional_string(map, "family_name")?,
            formatted: optional_string(map, "formatted")?,
            given_name: optional_string(map, "given_name")?,
            honorific_prefix: optional_string(map, "honorific_prefix")?,
            honorific_suffix: optional_string(map, "honorific_suffix")?,
            middle_name: optional_string(map, "middle_name")?,
        })
    }

    pub fn to_value(&self) -> Value {
        MapBuilder::default()
            .string("family_name", &self.family_name)
            .string("formatted", &self.formatted)
            .string("given_name", &self.given_name)
            .string("honorific_prefix", &self.honorific_prefix)
            .string("honorific_suffix", &self.honorific_suffix)
            .string("middle_name", &self.middle_name)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBlock {
    pub country: Option<String>,
    pub formatted: Option<String>,
    pub locality: Option<String>,
    pub postal_code: Option<String>,
    pub primary: bool,
    pub region: Option<String>,
    pub street_address: Option<String>,
    pub address_type: Option<String>,
}

impl AddressBlock {
    pub fn from_map(map: &HashMap<String, Value>) -> ConfigResult<Self> {
        Ok(Self {
            country: optional_string(map, "country")?,
            formatted: optional_string(map, "formatted")?,
            locality: optional_string(map, "locality")?,
            postal_code: optional_string(map, "postal_code")?,
            primary: flag(map, "primary")?,
            region: optional_string(map, "region")?,
            street_address: optional_string(map, "street_address")?,
            address_type: optional_string(map, "type")?,
        })
    }

    pub fn to_value(&self) -> Value {
        MapBuilder::default()
            .string("country", &self.country)
            .string("formatted", &self.formatted)
            .string("locality", &self.locality)
            .string("postal_code", &self.postal_code)
            .flag("primary", self.primary)
            .string("region", &self.region)
            .string("street_address", &self.street_address)
            .string("type", &self.address_type)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailBlock {
    pub primary: bool,
    pub email_type: Option<String>,
    pub value: Option<String>,
}

impl EmailBlock {
    pub fn from_map(map: &HashMap<String, Value>) -> ConfigResult<Self> {
        Ok(Self {
            primary: flag(map, "primary")?,
            email_type: optional_string(map, "type")?,
            value: optional_string(map, "value")?,
        })
    }

    pub fn to_value(&self) -> Value {
        MapBuilder::default()
            .flag("primary", self.primary)
            .string("type", &self.email_type)
            .string("value", &self.value)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneNumberBlock {
    pub primary: bool,
    pub phone_number_type: Option<String>,
    pub value: Option<String>,
}

impl PhoneNumberBlock {
    pub fn from_map(map: &HashMap<String, Value>) -> ConfigResult<Self> {
        Ok(Self {
            primary: flag(map, "primary")?,
            phone_number_type: optional_string(map, "type")?,
            value: optional_string(map, "value")?,
        })
    }

    pub fn to_value(&self) -> Value {
        MapBuilder::default()
            .flag("primary", self.primary)
            .string("type", &self.phone_number_type)
            .string("value", &self.value)
            .build()
    }
}

/// Read-only; only ever produced from API responses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalIdBlock {
    pub id: Option<String>,
    pub issuer: Option<String>,
}

impl ExternalIdBlock {
    pub fn to_value(&self) -> Value {
        MapBuilder::default()
            .string("id", &self.id)
            .string("issuer", &self.issuer)
            .build()
    }
}

/// Configurable attributes of a user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserConfig {
    pub identity_store_id: String,
    pub user_name: String,
    pub display_name: String,
    pub name: NameBlock,
    pub locale: Option<String>,
    pub nickname: Option<String>,
    pub preferred_language: Option<String>,
    pub profile_url: Option<String>,
    pub timezone: Option<String>,
    pub title: Option<String>,
    pub user_type: Option<String>,
    pub addresses: Option<AddressBlock>,
    pub emails: Option<EmailBlock>,
    pub phone_numbers: Option<PhoneNumberBlock>,
}

impl UserConfig {
    /// Parse configuration or state attributes. Computed attributes
    /// (`user_id`, `external_ids`) are ignored.
    pub fn from_attributes(attributes: &HashMap<String, Value>) -> ConfigResult<Self> {
        let name = single_block(attributes, "name")?
            .map(NameBlock::from_map)
            .transpose()?
            .ok_or_else(|| ConfigError::Missing("name".to_string()))?;

        Ok(Self {
            identity_store_id: required_string(attributes, "identity_store_id")?,
            user_name: required_string(attributes, "user_name")?,
            display_name: required_string(attributes, "display_name")?,
            name,
            locale: optional_string(attributes, "locale")?,
            nickname: optional_string(attributes, "nickname")?,
            preferred_language: optional_string(attributes, "preferred_language")?,
            profile_url: optional_string(attributes, "profile_url")?,
            timezone: optional_string(attributes, "timezone")?,
            title: optional_string(attributes, "title")?,
            user_type: optional_string(attributes, "user_type")?,
            addresses: single_block(attributes, "addresses")?
                .map(AddressBlock::from_map)
                .transpose()?,
            emails: single_block(attributes, "emails")?
                .map(EmailBlock::from_map)
                .transpose()?,
            phone_numbers: single_block(attributes, "phone_numbers")?
                .map(PhoneNumberBlock::from_map)
                .transpose()?,
        })
    }

    /// Render back into configuration attributes
    pub fn to_attributes(&self) -> HashMap<String, Value> {
        let mut attributes = HashMap::new();
        let scalars = [
            ("identity_store_id", Some(&self.identity_store_id)),
            ("user_name", Some(&self.user_name)),
            ("display_name", Some(&self.display_name)),
            ("locale", self.locale.as_ref()),
            ("nickname", self.nickname.as_ref()),
            ("preferred_language", self.preferred_language.as_ref()),
            ("profile_url", self.profile_url.as_ref()),
            ("timezone", self.timezone.as_ref()),
            ("title", self.title.as_ref()),
            ("user_type", self.user_type.as_ref()),
        ];
        for (key, value) in scalars {
            if let Some(v) = value {
                attributes.insert(key.to_string(), Value::String(v.clone()));
            }
        }

        attributes.insert("name".to_string(), single(self.name.to_value()));
        if let Some(ref block) = self.addresses {
            attributes.insert("addresses".to_string(), single(block.to_value()));
        }
        if let Some(ref block) = self.emails {
            attributes.insert("emails".to_string(), single(block.to_value()));
        }
        if let Some(ref block) = self.phone_numbers {
            attributes.insert("phone_numbers".to_string(), single(block.to_value()));
        }
        attributes
    }
}

/// Wrap a block value in the one-element list representation
pub fn single(value: Value) -> Value {
    Value::List(vec![value])
}

// =============================================================================
// Attribute Helpers
// =============================================================================

fn optional_string(map: &HashMap<String, Value>, key: &str) -> ConfigResult<Option<String>> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::TypeMismatch {
            name: key.to_string(),
            expected: "string",
        }),
    }
}

fn required_string(map: &HashMap<String, Value>, key: &str) -> ConfigResult<String> {
    optional_string(map, key)?.ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn flag(map: &HashMap<String, Value>, key: &str) -> ConfigResult<bool> {
    match map.get(key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(ConfigError::TypeMismatch {
            name: key.to_string(),
            expected: "bool",
        }),
    }
}

/// Read a block capped at one item. An empty list counts as absent.
fn single_block<'a>(
    map: &'a HashMap<String, Value>,
    key: &str,
) -> ConfigResult<Option<&'a HashMap<String, Value>>> {
    let items = match map.get(key) {
        None => return Ok(None),
        Some(Value::List(items)) => items,
        Some(_) => {
            return Err(ConfigError::TypeMismatch {
                name: key.to_string(),
                expected: "list",
            });
        }
    };

    match items.as_slice() {
        [] => Ok(None),
        [Value::Map(block)] => Ok(Some(block)),
        [_] => Err(ConfigError::TypeMismatch {
            name: key.to_string(),
            expected: "list of maps",
        }),
        _ => Err(ConfigError::TooManyItems {
            name: key.to_string(),
            max: 1,
            got: items.len(),
        }),
    }
}

#[derive(Default)]
struct MapBuilder(HashMap<String, Value>);

impl MapBuilder {
    fn string(mut self, key: &str, value: &Option<String>) -> Self {
        if let Some(v) = value {
            self.0.insert(key.to_string(), Value::String(v.clone()));
        }
        self
    }

    fn flag(mut self, key: &str, value: bool) -> Self {
        self.0.insert(key.to_string(), Value::Bool(value));
        self
    }

    fn build(self) -> Value {
        Value::Map(self.0)
    }
}

//! Expand (configuration -> API) and flatten (API -> configuration) helpers
//! for the nested groups of a user.
//!
//! Empty strings never reach the API: expand leaves such fields unset.
//! Flatten leaves unset API fields absent. `primary` is carried both ways.

use strata_core::resource::Value;

use super::model::{
    AddressBlock, EmailBlock, ExternalIdBlock, NameBlock, PhoneNumberBlock, single,
};
use crate::identitystore::api::{Address, Email, ExternalId, Name, PhoneNumber};

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

// =============================================================================
// Name
// =============================================================================

pub fn expand_name(block: &NameBlock) -> Name {
    Name {
        family_name: non_empty(&block.family_name),
        formatted: non_empty(&block.formatted),
        given_name: non_empty(&block.given_name),
        honorific_prefix: non_empty(&block.honorific_prefix),
        honorific_suffix: non_empty(&block.honorific_suffix),
        middle_name: non_empty(&block.middle_name),
    }
}

pub fn flatten_name(api_object: &Name) -> NameBlock {
    NameBlock {
        family_name: api_object.family_name.clone(),
        formatted: api_object.formatted.clone(),
        given_name: api_object.given_name.clone(),
        honorific_prefix: api_object.honorific_prefix.clone(),
        honorific_suffix: api_object.honorific_suffix.clone(),
        middle_name: api_object.middle_name.clone(),
    }
}

// =============================================================================
// Addresses
// =============================================================================

pub fn expand_address(block: &AddressBlock) -> Address {
    Address {
        country: non_empty(&block.country),
        formatted: non_empty(&block.formatted),
        locality: non_empty(&block.locality),
        postal_code: non_empty(&block.postal_code),
        primary: block.primary,
        region: non_empty(&block.region),
        street_address: non_empty(&block.street_address),
        address_type: non_empty(&block.address_type),
    }
}

pub fn expand_addresses(block: Option<&AddressBlock>) -> Vec<Address> {
    block.map(expand_address).into_iter().collect()
}

pub fn flatten_address(api_object: &Address) -> AddressBlock {
    AddressBlock {
        country: api_object.country.clone(),
        formatted: api_object.formatted.clone(),
        locality: api_object.locality.clone(),
        postal_code: api_object.postal_code.clone(),
        primary: api_object.primary,
        region: api_object.region.clone(),
        street_address: api_object.street_address.clone(),
        address_type: api_object.address_type.clone(),
    }
}

/// `None` when the user has no addresses, so the attribute stays unset
pub fn flatten_addresses(api_objects: &[Address]) -> Option<Value> {
    flatten_list(api_objects, |a| flatten_address(a).to_value())
}

// =============================================================================
// Emails
// =============================================================================

pub fn expand_email(block: &EmailBlock) -> Email {
    Email {
        primary: block.primary,
        email_type: non_empty(&block.email_type),
        value: non_empty(&block.value),
    }
}

pub fn expand_emails(block: Option<&EmailBlock>) -> Vec<Email> {
    block.map(expand_email).into_iter().collect()
}

pub fn flatten_email(api_object: &Email) -> EmailBlock {
    EmailBlock {
        primary: api_object.primary,
        email_type: api_object.email_type.clone(),
        value: api_object.value.clone(),
    }
}

pub fn flatten_emails(api_objects: &[Email]) -> Option<Value> {
    flatten_list(api_objects, |e| flatten_email(e).to_value())
}

// =============================================================================
// Phone Numbers
// =============================================================================

pub fn expand_phone_number(block: &PhoneNumberBlock) -> PhoneNumber {
    PhoneNumber {
        primary: block.primary,
        phone_number_type: non_empty(&block.phone_number_type),
        value: non_empty(&block.value),
    }
}

pub fn expand_phone_numbers(block: Option<&PhoneNumberBlock>) -> Vec<PhoneNumber> {
    block.map(expand_phone_number).into_iter().collect()
}

pub fn flatten_phone_number(api_object: &PhoneNumber) -> PhoneNumberBlock {
    PhoneNumberBlock {
        primary: api_object.primary,
        phone_number_type: api_object.phone_number_type.clone(),
        value: api_object.value.clone(),
    }
}

pub fn flatten_phone_numbers(api_objects: &[PhoneNumber]) -> Option<Value> {
    flatten_list(api_objects, |p| flatten_phone_number(p).to_value())
}

// =============================================================================
// External IDs
// =============================================================================

pub fn flatten_external_id(api_object: &ExternalId) -> ExternalIdBlock {
    ExternalIdBlock {
        id: api_object.id.clone(),
        issuer: api_object.issuer.clone(),
    }
}

pub fn flatten_external_ids(api_objects: &[ExternalId]) -> Option<Value> {
    flatten_list(api_objects, |e| flatten_external_id(e).to_value())
}

/// Flatten the name into its one-element list representation
pub fn flatten_name_value(api_object: Option<&Name>) -> Option<Value> {
    api_object.map(|name| single(flatten_name(name).to_value()))
}

fn flatten_list<T>(api_objects: &[T], flatten: impl Fn(&T) -> Value) -> Option<Value> {
    if api_objects.is_empty() {
        return None;
    }
    Some(Value::List(api_objects.iter().map(flatten).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn name_round_trip() {
        let block = NameBlock {
            family_name: s("Doe"),
            formatted: s("Dr. Jane Q. Doe Jr."),
            given_name: s("Jane"),
            honorific_prefix: s("Dr."),
            honorific_suffix: s("Jr."),
            middle_name: s("Quinn"),
        };
        assert_eq!(flatten_name(&expand_name(&block)), block);

        let partial = NameBlock {
            given_name: s("Jane"),
            ..Default::default()
        };
        assert_eq!(flatten_name(&expand_name(&partial)), partial);
    }

    #[test]
    fn address_round_trip() {
        let block = AddressBlock {
            country: s("FR"),
            formatted: s("1 Rue de Rivoli, 75001 Paris"),
            locality: s("Paris"),
            postal_code: s("75001"),
            primary: true,
            region: s("IDF"),
            street_address: s("1 Rue de Rivoli"),
            address_type: s("work"),
        };
        assert_eq!(flatten_address(&expand_address(&block)), block);
    }

    #[test]
    fn email_and_phone_round_trip() {
        let email = EmailBlock {
            primary: false,
            email_type: s("home"),
            value: s("jane@example.com"),
        };
        assert_eq!(flatten_email(&expand_email(&email)), email);

        let phone = PhoneNumberBlock {
            primary: true,
            phone_number_type: None,
            value: s("+33 1 23 45 67 89"),
        };
        assert_eq!(flatten_phone_number(&expand_phone_number(&phone)), phone);
    }

    #[test]
    fn expand_omits_empty_strings() {
        let block = AddressBlock {
            country: s(""),
            locality: s("Paris"),
            ..Default::default()
        };
        let address = expand_address(&block);
        assert_eq!(address.country, None);
        assert_eq!(address.locality, s("Paris"));
        assert!(!address.primary);

        let email = expand_email(&EmailBlock {
            primary: true,
            email_type: s(""),
            value: s(""),
        });
        assert_eq!(
            email,
            Email {
                primary: true,
                email_type: None,
                value: None
            }
        );
    }

    #[test]
    fn flatten_omits_unset_fields_but_keeps_primary() {
        let value = flatten_email(&Email::default()).to_value();
        let mut expected = HashMap::new();
        expected.insert("primary".to_string(), Value::Bool(false));
        assert_eq!(value, Value::Map(expected));

        let name = flatten_name(&Name {
            given_name: s("Jane"),
            ..Default::default()
        })
        .to_value();
        let Value::Map(map) = name else {
            panic!("Expected map");
        };
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("given_name"), Some(&Value::from("Jane")));
    }

    #[test]
    fn plural_helpers_wrap_single_entries() {
        assert!(expand_addresses(None).is_empty());
        assert_eq!(expand_emails(Some(&EmailBlock::default())).len(), 1);
        assert_eq!(expand_phone_numbers(Some(&PhoneNumberBlock::default())).len(), 1);

        assert_eq!(flatten_addresses(&[]), None);
        let flattened = flatten_phone_numbers(&[PhoneNumber::default()]).unwrap();
        assert_eq!(flattened.as_list().map(|l| l.len()), Some(1));
    }

    #[test]
    fn external_ids_flatten() {
        let ids = vec![ExternalId {
            id: s("abc"),
            issuer: s("https://idp.example.com"),
        }];
        let value = flatten_external_ids(&ids).unwrap();
        let entry = &value.as_list().unwrap()[0];
        assert_eq!(
            entry.as_map().unwrap().get("issuer"),
            Some(&Value::from("https://idp.example.com"))
        );
        assert_eq!(flatten_external_ids(&[]), None);
    }

    #[test]
    fn name_value_is_a_single_item_list() {
        assert_eq!(flatten_name_value(None), None);
        let value = flatten_name_value(Some(&Name::default())).unwrap();
        assert_eq!(value, Value::List(vec![Value::Map(HashMap::new())]));
    }
}

//! Attribute operations for UpdateUser
//!
//! UpdateUser takes a list of (attribute path, value) operations. Each row of
//! `USER_FIELDS` maps one configuration attribute to its remote path and
//! renders the value sent for it; a row produces an operation when the
//! rendered value differs between the prior and the proposed configuration.
//!
//! Addresses, emails and phone numbers cannot be patched field by field: a
//! change anywhere in the group replaces the whole group. Inside those
//! groups a field is removed by leaving it out of the value, which is why
//! they are sent as plain field maps rather than records with null members.
//! A whole attribute is unset by sending null.

use serde::Serialize;
use serde_json::Value as Json;

use super::flex::{expand_addresses, expand_emails, expand_phone_numbers};
use super::model::UserConfig;
use crate::identitystore::api::AttributeOperation;

/// One updatable attribute of a user
pub struct FieldMapping {
    /// Attribute in the provider schema, e.g. `name.0.given_name`
    pub attribute: &'static str,
    /// Attribute path in the Identity Store API, e.g. `name.givenName`
    pub path: &'static str,
    /// Value to send for this attribute; `None` unsets it
    pub render: fn(&UserConfig) -> serde_json::Result<Option<Json>>,
}

macro_rules! scalar {
    ($attribute:literal, $path:literal, |$user:ident| $accessor:expr) => {
        FieldMapping {
            attribute: $attribute,
            path: $path,
            render: |$user| Ok(string_value($accessor)),
        }
    };
}

pub const USER_FIELDS: &[FieldMapping] = &[
    scalar!("display_name", "displayName", |u| Some(&u.display_name)),
    scalar!("locale", "locale", |u| u.locale.as_ref()),
    scalar!("name.0.family_name", "name.familyName", |u| u.name.family_name.as_ref()),
    scalar!("name.0.formatted", "name.formatted", |u| u.name.formatted.as_ref()),
    scalar!("name.0.given_name", "name.givenName", |u| u.name.given_name.as_ref()),
    scalar!("name.0.honorific_prefix", "name.honorificPrefix", |u| u.name.honorific_prefix.as_ref()),
    scalar!("name.0.honorific_suffix", "name.honorificSuffix", |u| u.name.honorific_suffix.as_ref()),
    scalar!("name.0.middle_name", "name.middleName", |u| u.name.middle_name.as_ref()),
    scalar!("nickname", "nickName", |u| u.nickname.as_ref()),
    scalar!("preferred_language", "preferredLanguage", |u| u.preferred_language.as_ref()),
    scalar!("profile_url", "profileUrl", |u| u.profile_url.as_ref()),
    scalar!("timezone", "timezone", |u| u.timezone.as_ref()),
    scalar!("title", "title", |u| u.title.as_ref()),
    scalar!("user_type", "userType", |u| u.user_type.as_ref()),
    FieldMapping {
        attribute: "addresses",
        path: "addresses",
        render: |u| group_value(expand_addresses(u.addresses.as_ref())),
    },
    FieldMapping {
        attribute: "emails",
        path: "emails",
        render: |u| group_value(expand_emails(u.emails.as_ref())),
    },
    FieldMapping {
        attribute: "phone_numbers",
        path: "phoneNumbers",
        render: |u| group_value(expand_phone_numbers(u.phone_numbers.as_ref())),
    },
];

/// The API does not accept empty attribute values; unset them instead
fn string_value(value: Option<&String>) -> Option<Json> {
    value
        .filter(|s| !s.is_empty())
        .map(|s| Json::String(s.clone()))
}

/// Render a composite group, or `None` to unset it when it has no entries
fn group_value<T: Serialize>(items: Vec<T>) -> serde_json::Result<Option<Json>> {
    if items.is_empty() {
        return Ok(None);
    }
    serde_json::to_value(items).map(Some)
}

/// Operations that move a user from `prior` to `proposed`, in table order
pub fn user_operations(
    prior: &UserConfig,
    proposed: &UserConfig,
) -> serde_json::Result<Vec<AttributeOperation>> {
    field_operations(USER_FIELDS, prior, proposed)
}

fn field_operations(
    fields: &[FieldMapping],
    prior: &UserConfig,
    proposed: &UserConfig,
) -> serde_json::Result<Vec<AttributeOperation>> {
    let mut operations = Vec::new();
    for field in fields {
        let before = (field.render)(prior)?;
        let after = (field.render)(proposed)?;
        if before != after {
            log::trace!("attribute {} changed", field.attribute);
            operations.push(AttributeOperation {
                attribute_path: field.path.to_string(),
                attribute_value: after,
            });
        }
    }
    Ok(operations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identitystore::user::model::{AddressBlock, EmailBlock, NameBlock, PhoneNumberBlock};
    use serde_json::json;

    fn jane() -> UserConfig {
        UserConfig {
            identity_store_id: "d-1234".to_string(),
            user_name: "jdoe".to_string(),
            display_name: "Jane Doe".to_string(),
            name: NameBlock {
                given_name: Some("Jane".to_string()),
                family_name: Some("Doe".to_string()),
                ..Default::default()
            },
            nickname: Some("J".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn no_changes_no_operations() {
        assert!(user_operations(&jane(), &jane()).unwrap().is_empty());

        let mut full = jane();
        full.addresses = Some(AddressBlock {
            locality: Some("Paris".to_string()),
            ..Default::default()
        });
        full.emails = Some(EmailBlock::default());
        assert!(user_operations(&full, &full.clone()).unwrap().is_empty());
    }

    #[test]
    fn nickname_change() {
        let mut proposed = jane();
        proposed.nickname = Some("Jane".to_string());

        assert_eq!(
            user_operations(&jane(), &proposed).unwrap(),
            vec![AttributeOperation {
                attribute_path: "nickName".to_string(),
                attribute_value: Some(json!("Jane")),
            }]
        );
    }

    #[test]
    fn nickname_set_to_empty_string_unsets_it() {
        let mut proposed = jane();
        proposed.nickname = Some(String::new());

        assert_eq!(
            user_operations(&jane(), &proposed).unwrap(),
            vec![AttributeOperation {
                attribute_path: "nickName".to_string(),
                attribute_value: None,
            }]
        );
    }

    #[test]
    fn nickname_removed_unsets_it() {
        let mut proposed = jane();
        proposed.nickname = None;

        let ops = user_operations(&jane(), &proposed).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].attribute_path, "nickName");
        assert_eq!(ops[0].attribute_value, None);
    }

    #[test]
    fn one_operation_per_changed_scalar() {
        let mut proposed = jane();
        proposed.display_name = "Jane Q. Doe".to_string();
        proposed.name.middle_name = Some("Quinn".to_string());
        proposed.title = Some("Engineer".to_string());

        let paths: Vec<String> = user_operations(&jane(), &proposed)
            .unwrap()
            .into_iter()
            .map(|op| op.attribute_path)
            .collect();
        assert_eq!(paths, vec!["displayName", "name.middleName", "title"]);
    }

    #[test]
    fn changed_group_is_replaced_whole() {
        let mut prior = jane();
        prior.addresses = Some(AddressBlock {
            locality: Some("Paris".to_string()),
            country: Some("FR".to_string()),
            ..Default::default()
        });
        let mut proposed = prior.clone();
        proposed.addresses = Some(AddressBlock {
            locality: Some("Lyon".to_string()),
            country: Some("FR".to_string()),
            primary: true,
            ..Default::default()
        });

        assert_eq!(
            user_operations(&prior, &proposed).unwrap(),
            vec![AttributeOperation {
                attribute_path: "addresses".to_string(),
                attribute_value: Some(json!([
                    {"locality": "Lyon", "country": "FR", "primary": true}
                ])),
            }]
        );
    }

    #[test]
    fn removed_field_inside_group_is_left_out() {
        let mut prior = jane();
        prior.emails = Some(EmailBlock {
            primary: true,
            email_type: Some("work".to_string()),
            value: Some("jane@example.com".to_string()),
        });
        let mut proposed = prior.clone();
        proposed.emails = Some(EmailBlock {
            primary: true,
            email_type: None,
            value: Some("jane@example.com".to_string()),
        });

        let ops = user_operations(&prior, &proposed).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(
            ops[0].attribute_value,
            Some(json!([{"primary": true, "value": "jane@example.com"}]))
        );
    }

    #[test]
    fn removed_group_is_unset() {
        let mut prior = jane();
        prior.phone_numbers = Some(PhoneNumberBlock {
            primary: false,
            phone_number_type: Some("mobile".to_string()),
            value: Some("+1 555 0100".to_string()),
        });

        assert_eq!(
            user_operations(&prior, &jane()).unwrap(),
            vec![AttributeOperation {
                attribute_path: "phoneNumbers".to_string(),
                attribute_value: None,
            }]
        );
    }

    #[test]
    fn render_failure_is_an_error_not_an_unset() {
        let failing = [FieldMapping {
            attribute: "emails",
            path: "emails",
            render: |_| serde_json::from_str::<Json>("[").map(Some),
        }];
        assert!(field_operations(&failing, &jane(), &jane()).is_err());
    }

    #[test]
    fn every_row_maps_a_distinct_path() {
        let mut paths: Vec<&str> = USER_FIELDS.iter().map(|f| f.path).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), USER_FIELDS.len());
    }
}

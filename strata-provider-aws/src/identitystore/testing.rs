//! In-memory Identity Store used by tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value as Json;

use super::api::{
    ApiError, ApiResult, AttributeOperation, CreateUserInput, CreateUserOutput, IdentityStoreApi,
    Name, UpdateUserInput, User,
};

#[derive(Default)]
struct Inner {
    users: HashMap<(String, String), User>,
    next_id: u32,
    created: Vec<CreateUserInput>,
    updates: Vec<UpdateUserInput>,
    deletes: Vec<(String, String)>,
    failure: Option<String>,
    empty_create_output: bool,
    forget_created: bool,
}

#[derive(Default)]
pub struct FakeIdentityStore {
    inner: Mutex<Inner>,
}

impl FakeIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a user as if it had been created out of band
    pub fn insert_user(&self, user: User) {
        let key = (user.identity_store_id.clone(), user.user_id.clone());
        self.inner.lock().unwrap().users.insert(key, user);
    }

    pub fn user(&self, identity_store_id: &str, user_id: &str) -> Option<User> {
        self.inner
            .lock()
            .unwrap()
            .users
            .get(&(identity_store_id.to_string(), user_id.to_string()))
            .cloned()
    }

    /// Every call fails with a service error carrying `message`
    pub fn fail_with(&self, message: &str) {
        self.inner.lock().unwrap().failure = Some(message.to_string());
    }

    /// CreateUser succeeds but returns no user id
    pub fn return_empty_create_output(&self) {
        self.inner.lock().unwrap().empty_create_output = true;
    }

    /// CreateUser succeeds but the user is not visible to DescribeUser
    pub fn forget_created_users(&self) {
        self.inner.lock().unwrap().forget_created = true;
    }

    pub fn created(&self) -> Vec<CreateUserInput> {
        self.inner.lock().unwrap().created.clone()
    }

    pub fn updates(&self) -> Vec<UpdateUserInput> {
        self.inner.lock().unwrap().updates.clone()
    }

    pub fn deletes(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().deletes.clone()
    }

    fn check_failure(inner: &Inner) -> ApiResult<()> {
        match inner.failure {
            Some(ref message) => Err(ApiError::Service(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityStoreApi for FakeIdentityStore {
    async fn create_user(&self, input: CreateUserInput) -> ApiResult<CreateUserOutput> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_failure(&inner)?;
        inner.created.push(input.clone());

        if inner.empty_create_output {
            return Ok(CreateUserOutput {
                identity_store_id: input.identity_store_id,
                user_id: None,
            });
        }

        inner.next_id += 1;
        let user_id = format!("u-{:04}", inner.next_id);
        let user = User {
            identity_store_id: input.identity_store_id.clone(),
            user_id: user_id.clone(),
            user_name: Some(input.user_name),
            display_name: Some(input.display_name),
            name: input.name,
            nick_name: input.nick_name,
            profile_url: input.profile_url,
            title: input.title,
            user_type: input.user_type,
            preferred_language: input.preferred_language,
            locale: input.locale,
            timezone: input.timezone,
            addresses: input.addresses,
            emails: input.emails,
            phone_numbers: input.phone_numbers,
            external_ids: Vec::new(),
        };
        if !inner.forget_created {
            inner
                .users
                .insert((input.identity_store_id.clone(), user_id.clone()), user);
        }

        Ok(CreateUserOutput {
            identity_store_id: input.identity_store_id,
            user_id: Some(user_id),
        })
    }

    async fn describe_user(&self, identity_store_id: &str, user_id: &str) -> ApiResult<User> {
        let inner = self.inner.lock().unwrap();
        Self::check_failure(&inner)?;
        inner
            .users
            .get(&(identity_store_id.to_string(), user_id.to_string()))
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))
    }

    async fn update_user(&self, input: UpdateUserInput) -> ApiResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_failure(&inner)?;
        inner.updates.push(input.clone());

        let key = (input.identity_store_id.clone(), input.user_id.clone());
        let mut user = inner
            .users
            .get(&key)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("user {} not found", input.user_id)))?;
        for operation in &input.operations {
            apply(&mut user, operation)?;
        }
        inner.users.insert(key, user);
        Ok(())
    }

    async fn delete_user(&self, identity_store_id: &str, user_id: &str) -> ApiResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_failure(&inner)?;
        let key = (identity_store_id.to_string(), user_id.to_string());
        inner.deletes.push(key.clone());
        inner
            .users
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))
    }
}

fn apply(user: &mut User, operation: &AttributeOperation) -> ApiResult<()> {
    let value = operation.attribute_value.clone();
    let string = || match value.clone() {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(s)) => Ok(Some(s)),
        Some(other) => Err(ApiError::InvalidRequest(format!(
            "{}: expected a string, got {other}",
            operation.attribute_path
        ))),
    };
    let list = || -> ApiResult<Json> { Ok(value.clone().unwrap_or(Json::Array(Vec::new()))) };
    let invalid = |e: serde_json::Error| ApiError::InvalidRequest(e.to_string());

    match operation.attribute_path.as_str() {
        "displayName" => user.display_name = string()?,
        "locale" => user.locale = string()?,
        "nickName" => user.nick_name = string()?,
        "preferredLanguage" => user.preferred_language = string()?,
        "profileUrl" => user.profile_url = string()?,
        "timezone" => user.timezone = string()?,
        "title" => user.title = string()?,
        "userType" => user.user_type = string()?,
        "addresses" => user.addresses = serde_json::from_value(list()?).map_err(invalid)?,
        "emails" => user.emails = serde_json::from_value(list()?).map_err(invalid)?,
        "phoneNumbers" => user.phone_numbers = serde_json::from_value(list()?).map_err(invalid)?,
        path => {
            let Some(field) = path.strip_prefix("name.") else {
                return Err(ApiError::InvalidRequest(format!("unknown attribute path {path}")));
            };
            let name = user.name.get_or_insert_with(Name::default);
            let slot = match field {
                "familyName" => &mut name.family_name,
                "formatted" => &mut name.formatted,
                "givenName" => &mut name.given_name,
                "honorificPrefix" => &mut name.honorific_prefix,
                "honorificSuffix" => &mut name.honorific_suffix,
                "middleName" => &mut name.middle_name,
                _ => return Err(ApiError::InvalidRequest(format!("unknown attribute path {path}"))),
            };
            *slot = string()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn operation(path: &str, value: Json) -> AttributeOperation {
        AttributeOperation {
            attribute_path: path.to_string(),
            attribute_value: Some(value),
        }
    }

    #[tokio::test]
    async fn update_batch_is_all_or_nothing() {
        let api = FakeIdentityStore::new();
        api.insert_user(User {
            identity_store_id: "d-1234".to_string(),
            user_id: "u-1".to_string(),
            title: Some("Engineer".to_string()),
            ..Default::default()
        });

        let err = api
            .update_user(UpdateUserInput {
                identity_store_id: "d-1234".to_string(),
                user_id: "u-1".to_string(),
                operations: vec![
                    operation("title", json!("Manager")),
                    operation("favoriteColor", json!("blue")),
                ],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert_eq!(
            api.user("d-1234", "u-1").unwrap().title.as_deref(),
            Some("Engineer")
        );

        api.update_user(UpdateUserInput {
            identity_store_id: "d-1234".to_string(),
            user_id: "u-1".to_string(),
            operations: vec![operation("title", json!("Manager"))],
        })
        .await
        .unwrap();
        assert_eq!(
            api.user("d-1234", "u-1").unwrap().title.as_deref(),
            Some("Manager")
        );
    }
}

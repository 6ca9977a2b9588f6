//! Provider configuration

use std::collections::HashMap;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use strata_core::resource::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderConfigError {
    #[error("provider attribute '{0}' is required")]
    Missing(&'static str),

    #[error("provider attribute '{name}' must be a {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("invalid region: {0:?}")]
    InvalidRegion(String),
}

/// AWS provider settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Region in AWS form, e.g. `us-east-1`
    pub region: String,
    /// Named profile from the shared config files
    pub profile: Option<String>,
    /// Endpoint overrides keyed by service package name
    pub endpoints: HashMap<String, String>,
}

impl ProviderConfig {
    pub fn new(region: &str) -> Self {
        Self {
            region: normalize_region(region),
            ..Default::default()
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Override the endpoint of one service package. Empty URLs are ignored.
    pub fn with_endpoint(mut self, service: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.is_empty() {
            self.endpoints.insert(service.into(), url);
        }
        self
    }

    /// Build from provider block attributes:
    ///
    /// ```text
    /// region    = aws.Region.us_east_1   # or "us-east-1"
    /// profile   = "dev"                   # optional
    /// endpoints = { identitystore = "http://localhost:4566" }
    /// ```
    pub fn from_attributes(
        attributes: &HashMap<String, Value>,
    ) -> Result<Self, ProviderConfigError> {
        let region = match attributes.get("region") {
            Some(Value::String(s)) => normalize_region(s),
            Some(_) => {
                return Err(ProviderConfigError::TypeMismatch {
                    name: "region".to_string(),
                    expected: "string",
                });
            }
            None => return Err(ProviderConfigError::Missing("region")),
        };
        if !is_valid_region(&region) {
            return Err(ProviderConfigError::InvalidRegion(region));
        }

        let mut config = Self {
            region,
            ..Default::default()
        };

        match attributes.get("profile") {
            Some(Value::String(s)) if !s.is_empty() => config.profile = Some(s.clone()),
            Some(Value::String(_)) | None => {}
            Some(_) => {
                return Err(ProviderConfigError::TypeMismatch {
                    name: "profile".to_string(),
                    expected: "string",
                });
            }
        }

        match attributes.get("endpoints") {
            Some(Value::Map(map)) => {
                for (service, url) in map {
                    let Value::String(url) = url else {
                        return Err(ProviderConfigError::TypeMismatch {
                            name: format!("endpoints.{service}"),
                            expected: "string",
                        });
                    };
                    config = config.with_endpoint(service.clone(), url.clone());
                }
            }
            Some(_) => {
                return Err(ProviderConfigError::TypeMismatch {
                    name: "endpoints".to_string(),
                    expected: "map",
                });
            }
            None => {}
        }

        Ok(config)
    }

    /// Endpoint override for a service package
    pub fn endpoint(&self, service: &str) -> Option<&str> {
        self.endpoints.get(service).map(String::as_str)
    }

    /// Load shared AWS configuration (credentials chain, retries) for this region
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()));
        if let Some(ref profile) = self.profile {
            loader = loader.profile_name(profile);
        }
        loader.load().await
    }
}

/// Normalize region value (e.g., "aws.Region.ap_northeast_1" -> "ap-northeast-1")
pub fn normalize_region(s: &str) -> String {
    let region_part = s.rsplit('.').next().unwrap_or(s);
    region_part.replace('_', "-")
}

fn is_valid_region(region: &str) -> bool {
    !region.is_empty()
        && !region.starts_with('-')
        && !region.ends_with('-')
        && region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

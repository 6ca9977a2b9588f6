//! Schema - Define type schemas for resources
//!
//! Providers declare a schema for each resource type. The host uses it to
//! validate and diff configuration; providers use it to check values they
//! write back into state.

use std::collections::HashMap;
use std::fmt;

use crate::resource::Value;

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// String
    String,
    /// String whose byte length must lie within `min..=max`
    BoundedString { min: usize, max: usize },
    /// Boolean
    Bool,
    /// Nested block, represented as a list of attribute maps
    Block(BlockSchema),
}

/// How strictly a value is checked against its type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    /// Everything configuration must satisfy
    Config,
    /// Types, nesting and item counts only; values read back from a remote
    /// API may leave required fields out or break length bounds
    Shape,
}

impl AttributeType {
    /// Check if a value conforms to this type
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        self.check(value, Check::Config)
    }

    /// Check only the structure of a value: types, nesting and item counts
    pub fn validate_shape(&self, value: &Value) -> Result<(), TypeError> {
        self.check(value, Check::Shape)
    }

    fn check(&self, value: &Value, mode: Check) -> Result<(), TypeError> {
        match (self, value) {
            (AttributeType::String, Value::String(_)) => Ok(()),
            (AttributeType::BoundedString { min, max }, Value::String(s)) => {
                if mode == Check::Config && (s.len() < *min || s.len() > *max) {
                    Err(TypeError::LengthOutOfRange {
                        len: s.len(),
                        min: *min,
                        max: *max,
                    })
                } else {
                    Ok(())
                }
            }
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),
            (AttributeType::Block(block), Value::List(items)) => block.check(items, mode),
            _ => Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value.type_name().to_string(),
            }),
        }
    }

    fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::BoundedString { min, max } => format!("String({}..{})", min, max),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::Block(_) => "Block".to_string(),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Length {len} out of range, expected between {min} and {max}")]
    LengthOutOfRange { len: usize, min: usize, max: usize },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Unknown attribute '{name}'")]
    UnknownAttribute { name: String },

    #[error("Too many items: at most {max} allowed, got {got}")]
    TooManyItems { max: usize, got: usize },

    #[error("Attribute '{name}': {inner}")]
    AttributeError { name: String, inner: Box<TypeError> },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub required: bool,
    /// Set by the provider from the remote API rather than by configuration
    pub computed: bool,
    /// A change to this attribute forces the resource to be replaced
    pub force_new: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            required: false,
            computed: false,
            force_new: false,
            default: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    fn is_missing_in(&self, attributes: &HashMap<String, Value>) -> bool {
        self.required && !attributes.contains_key(&self.name) && self.default.is_none()
    }
}

/// Schema of a nested block
#[derive(Debug, Clone, Default)]
pub struct BlockSchema {
    pub attributes: HashMap<String, AttributeSchema>,
    pub max_items: Option<usize>,
}

impl BlockSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    fn check(&self, items: &[Value], mode: Check) -> Result<(), TypeError> {
        if let Some(max) = self.max_items
            && items.len() > max
        {
            return Err(TypeError::TooManyItems {
                max,
                got: items.len(),
            });
        }

        for (index, item) in items.iter().enumerate() {
            self.check_item(item, mode)
                .map_err(|e| TypeError::ListItemError {
                    index,
                    inner: Box::new(e),
                })?;
        }
        Ok(())
    }

    fn check_item(&self, item: &Value, mode: Check) -> Result<(), TypeError> {
        let Value::Map(map) = item else {
            return Err(TypeError::TypeMismatch {
                expected: "Map".to_string(),
                got: item.type_name().to_string(),
            });
        };

        for schema in self.attributes.values() {
            if mode == Check::Config && schema.is_missing_in(map) {
                return Err(TypeError::MissingRequired {
                    name: schema.name.clone(),
                });
            }
        }

        for (name, value) in map {
            let schema = self
                .attributes
                .get(name)
                .ok_or_else(|| TypeError::UnknownAttribute { name: name.clone() })?;
            schema
                .attr_type
                .check(value, mode)
                .map_err(|e| TypeError::AttributeError {
                    name: name.clone(),
                    inner: Box::new(e),
                })?;
        }
        Ok(())
    }
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: HashMap<String, AttributeSchema>,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: HashMap::new(),
            description: None,
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.get(name)
    }

    /// Names of attributes whose change requires replacement, sorted
    pub fn force_new_attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .attributes
            .values()
            .filter(|a| a.force_new)
            .map(|a| a.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Validate a single attribute value against its declared type
    pub fn validate_attribute(&self, name: &str, value: &Value) -> Result<(), TypeError> {
        let schema = self
            .attributes
            .get(name)
            .ok_or_else(|| TypeError::UnknownAttribute {
                name: name.to_string(),
            })?;
        schema
            .attr_type
            .validate(value)
            .map_err(|e| TypeError::AttributeError {
                name: name.to_string(),
                inner: Box::new(e),
            })
    }

    /// Check the structure of a single attribute value, as when writing a
    /// value read from the remote API into state
    pub fn validate_attribute_shape(&self, name: &str, value: &Value) -> Result<(), TypeError> {
        let schema = self
            .attributes
            .get(name)
            .ok_or_else(|| TypeError::UnknownAttribute {
                name: name.to_string(),
            })?;
        schema
            .attr_type
            .validate_shape(value)
            .map_err(|e| TypeError::AttributeError {
                name: name.to_string(),
                inner: Box::new(e),
            })
    }

    /// Validate resource attributes
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        let mut errors = Vec::new();

        // Check required attributes
        for (name, schema) in &self.attributes {
            if schema.is_missing_in(attributes) {
                errors.push(TypeError::MissingRequired { name: name.clone() });
            }
        }

        // Type check each attribute
        for (name, value) in attributes {
            if self.attributes.contains_key(name)
                && let Err(e) = self.validate_attribute(name, value)
            {
                errors.push(e);
            }
            // Unknown top-level attributes are allowed (host bookkeeping)
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Helper functions for common types
pub mod types {
    use super::*;

    /// String type with a byte length between `min` and `max` inclusive
    pub fn string_len_between(min: usize, max: usize) -> AttributeType {
        AttributeType::BoundedString { min, max }
    }
}

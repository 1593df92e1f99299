//! Core types for Quire providers.
//!
//! These types cross the kernel/provider boundary. Their serialized field
//! names are part of the provider contract and must not change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// String-keyed option mapping attached to content types and entries.
pub type Options = serde_json::Map<String, Value>;

/// Request handed to a provider when an entry is resolved.
///
/// `options` and `type_options` are kept apart so a provider can tell
/// entry-level overrides from type-level defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionRequest {
    /// Entry slug.
    pub slug: String,

    /// Content type name.
    #[serde(rename = "type")]
    pub content_type: String,

    /// Provider key the content type is bound to.
    pub provider: String,

    /// Entry options, as stored.
    #[serde(default)]
    pub options: Options,

    /// Content type options, as stored.
    #[serde(default)]
    pub type_options: Options,
}

impl ResolutionRequest {
    /// Get an entry option as a string.
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }

    /// Get a type option as a string.
    pub fn type_option_str(&self, key: &str) -> Option<&str> {
        self.type_options.get(key).and_then(Value::as_str)
    }

    /// Attach resolved data, producing the provider response.
    pub fn into_resolved(self, data: Options) -> ResolvedContent {
        ResolvedContent {
            request: self,
            data,
        }
    }
}

/// Successful provider response: the original request plus `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedContent {
    #[serde(flatten)]
    pub request: ResolutionRequest,

    /// Content attributes produced by the provider.
    #[serde(default)]
    pub data: Options,
}

impl ResolvedContent {
    /// Get a data attribute.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Get a data attribute as a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// Conventional value type of a field. Values are not coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    TextLong,
    Integer,
    Float,
    Boolean,
    Json,
}

/// A named slot, backed by an options mapping, that a provider declares
/// as valid configuration for a content type or entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Option key the field reads from.
    pub name: String,

    pub field_type: FieldType,

    /// Human-readable label.
    pub label: String,

    #[serde(default)]
    pub required: bool,
}

impl FieldDescriptor {
    /// Create an optional field labelled after its name.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            field_type,
            required: false,
        }
    }

    /// Shorthand for an optional text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

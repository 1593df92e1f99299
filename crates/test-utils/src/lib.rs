//! Quire test utilities.
//!
//! Helpers for testing: option builders, stand-in providers that record or
//! fail, and assertion utilities for resolved content.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value as JsonValue;

use quire_sdk::{
    FieldDescriptor, Options, Provider, ProviderError, ResolutionRequest, ResolvedContent,
};

/// Build an option mapping from a JSON object literal.
///
/// Panics if `value` is not an object.
#[allow(clippy::panic)]
pub fn options(value: JsonValue) -> Options {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected a JSON object, got: {other}"),
    }
}

/// A provider that records every request and answers with fixed data.
///
/// Clones share the same request log.
#[derive(Debug, Clone, Default)]
pub struct RecordingProvider {
    requests: Arc<Mutex<Vec<ResolutionRequest>>>,
    data: Options,
    type_fields: Vec<FieldDescriptor>,
    entry_fields: Vec<String>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data returned with every response.
    pub fn with_data(mut self, data: Options) -> Self {
        self.data = data;
        self
    }

    /// Declare type-level fields.
    pub fn with_type_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.type_fields = fields;
        self
    }

    /// Declare entry-level fields.
    pub fn with_entry_fields(mut self, fields: &[&str]) -> Self {
        self.entry_fields = fields.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ResolutionRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<ResolutionRequest> {
        self.requests.lock().last().cloned()
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Provider for RecordingProvider {
    async fn call(&self, request: ResolutionRequest) -> Result<ResolvedContent, ProviderError> {
        self.requests.lock().push(request.clone());
        Ok(request.into_resolved(self.data.clone()))
    }

    fn entry_type_fields(&self) -> Vec<FieldDescriptor> {
        self.type_fields.clone()
    }

    fn entry_fields(&self) -> Vec<String> {
        self.entry_fields.clone()
    }
}

/// A provider whose every call fails with a backend error.
#[derive(Debug, Clone)]
pub struct FailingProvider {
    message: String,
}

impl FailingProvider {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Provider for FailingProvider {
    async fn call(&self, _request: ResolutionRequest) -> Result<ResolvedContent, ProviderError> {
        Err(ProviderError::Backend(self.message.clone()))
    }
}

/// Assertion helpers for resolved content.
pub mod assert {
    use quire_sdk::ResolvedContent;
    use serde_json::Value;

    /// Assert that resolved data has a specific string attribute.
    pub fn data_str(content: &ResolvedContent, key: &str, expected: &str) {
        assert_eq!(
            content.get_str(key),
            Some(expected),
            "Expected data.{} == {:?}, got data: {}",
            key,
            expected,
            Value::Object(content.data.clone())
        );
    }

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{}', got: {}",
            key,
            value
        );
    }
}

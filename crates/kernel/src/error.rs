//! Kernel error types.

use thiserror::Error;
use uuid::Uuid;

use quire_sdk::ProviderError;

/// Record validation failures, raised at create/update time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty or whitespace.
    #[error("{field} can't be blank")]
    Blank { field: &'static str },

    /// A write-once field was changed after the record was persisted.
    #[error("{field} is read-only once the record is persisted")]
    ReadOnlyField { field: &'static str },
}

/// Errors surfaced by the content kernel.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The provider name has no registered implementation.
    #[error("unknown provider: {name}")]
    UnknownProvider { name: String },

    /// Two providers were registered under one name.
    #[error("provider already registered: {name}")]
    DuplicateProvider { name: String },

    /// Error returned by a provider, passed through unchanged.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The entry belongs to a different content type.
    #[error("entry belongs to content type {entry_type_id}, not {content_type_id}")]
    ForeignEntry {
        entry_type_id: Uuid,
        content_type_id: Uuid,
    },

    #[error("content type not found: {0}")]
    ContentTypeNotFound(String),

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ContentError {
    /// Check whether a provider reported that the content does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Provider(e) if e.is_not_found())
    }
}

/// Result type alias using ContentError.
pub type ContentResult<T> = Result<T, ContentError>;

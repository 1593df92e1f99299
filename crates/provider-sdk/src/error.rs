//! Provider error types.

use thiserror::Error;

/// Errors a provider may return from [`Provider::call`](crate::Provider::call).
///
/// The kernel passes these through to its caller without inspecting them.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No content exists for the slug.
    #[error("no content found for slug '{slug}'")]
    NotFound { slug: String },

    /// The request lacks something the provider needs.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The backing source failed (database, remote API, filesystem).
    #[error("provider backend error: {0}")]
    Backend(String),

    /// Any other provider-defined failure.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Build a `NotFound` for a slug.
    pub fn not_found(slug: impl Into<String>) -> Self {
        Self::NotFound { slug: slug.into() }
    }

    /// Check whether this is a `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

//! Quire Provider SDK
//!
//! Types and traits shared between the Quire kernel and content providers.
//! A provider depends on this crate only: it implements [`Provider`],
//! receives a [`ResolutionRequest`] and answers with a [`ResolvedContent`]
//! or a [`ProviderError`].

pub mod error;
pub mod provider;
pub mod types;

pub use error::ProviderError;
pub use provider::Provider;
pub use types::{FieldDescriptor, FieldType, Options, ResolutionRequest, ResolvedContent};

// Re-export serde_json so providers build options without a direct dependency.
#[doc(hidden)]
pub use serde_json;

pub mod prelude {
    pub use crate::error::ProviderError;
    pub use crate::provider::Provider;
    pub use crate::types::*;
}

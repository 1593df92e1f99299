//! Content providers.
//!
//! This module provides:
//! - ProviderRegistry: Immutable provider key → implementation mapping
//! - StaticPageProvider: Reference provider resolving entries to static pages

mod registry;
pub mod static_page;

pub use registry::{ProviderRegistry, ProviderRegistryBuilder};
pub use static_page::{
    MemoryPageStore, Page, PageStore, PgPageStore, STATIC_PROVIDER, StaticPageProvider,
};

pub use quire_sdk::{Provider, ProviderError};

//! Quire Kernel Library
//!
//! Content types bound to pluggable providers, entries of those types, and
//! the resolution path that turns an entry into content. The `quire` binary
//! wires these together against PostgreSQL.

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod models;
pub mod provider;
pub mod state;
pub mod store;

pub use config::Config;
pub use content::ContentResolver;
pub use error::{ContentError, ContentResult, ValidationError};
pub use models::{ContentType, ContentTypeUpdate, Entry, EntryUpdate, NewContentType, NewEntry};
pub use provider::{ProviderRegistry, StaticPageProvider};
pub use state::AppState;
pub use store::{ContentStore, MemoryContentStore, PgContentStore};

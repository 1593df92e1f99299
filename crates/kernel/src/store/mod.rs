//! Content storage abstraction layer.
//!
//! Content types and entries are persisted through [`ContentStore`]. The
//! store owns uniqueness (content type names), referential integrity (every
//! entry points at a live content type) and cascading deletes.
//!
//! # Implementations
//!
//! - [`MemoryContentStore`] - process-local maps, used by tests and tools
//! - [`PgContentStore`] - the `content_type` and `entry` tables in PostgreSQL

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryContentStore;
pub use postgres::PgContentStore;

use crate::error::{ContentError, ContentResult};
use crate::models::{ContentType, Entry};

/// Persistence for content types and entries.
///
/// Saving an unpersisted record assigns its ID. Loading re-binds the
/// content type's provider, so loads can fail with `UnknownProvider` when a
/// stored provider key is no longer registered.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert or update a content type.
    ///
    /// Fails with `Conflict` if another content type has the same name.
    async fn save_content_type(&self, content_type: &mut ContentType) -> ContentResult<()>;

    /// Load a content type by ID.
    async fn load_content_type(&self, id: Uuid) -> ContentResult<Option<ContentType>>;

    /// Find a content type by its unique name.
    async fn find_content_type_by_name(&self, name: &str) -> ContentResult<Option<ContentType>>;

    /// List all content types, ordered by name.
    async fn list_content_types(&self) -> ContentResult<Vec<ContentType>>;

    /// Delete a content type and all of its entries.
    ///
    /// Returns `true` if a content type was deleted.
    async fn delete_content_type(&self, id: Uuid) -> ContentResult<bool>;

    /// Insert or update an entry.
    ///
    /// Fails with `ContentTypeNotFound` if the owning content type is gone.
    async fn save_entry(&self, entry: &mut Entry) -> ContentResult<()>;

    /// Load an entry by ID.
    async fn load_entry(&self, id: Uuid) -> ContentResult<Option<Entry>>;

    /// Find the oldest entry of a content type with the given slug.
    async fn find_entry_by_slug(
        &self,
        content_type_id: Uuid,
        slug: &str,
    ) -> ContentResult<Option<Entry>>;

    /// List the entries of a content type, oldest first.
    async fn entries_for(&self, content_type_id: Uuid) -> ContentResult<Vec<Entry>>;

    /// Delete an entry. Returns `true` if it existed.
    async fn delete_entry(&self, id: Uuid) -> ContentResult<bool>;

    /// Load a content type by name, failing when it does not exist.
    async fn content_type_by_name(&self, name: &str) -> ContentResult<ContentType> {
        self.find_content_type_by_name(name)
            .await?
            .ok_or_else(|| ContentError::ContentTypeNotFound(name.to_string()))
    }
}

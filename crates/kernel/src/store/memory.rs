//! In-memory implementation of ContentStore.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use super::ContentStore;
use crate::error::{ContentError, ContentResult};
use crate::models::{ContentType, Entry};

/// Process-local content store.
///
/// Enforces the same constraints as the database schema: unique content
/// type names, entries referencing a live content type, cascading deletes.
/// Saving a record whose id is no longer stored fails as not found.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    types: HashMap<Uuid, ContentType>,
    entries: HashMap<Uuid, Entry>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries across all content types.
    pub fn entry_count(&self) -> usize {
        self.inner.read().entries.len()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn save_content_type(&self, content_type: &mut ContentType) -> ContentResult<()> {
        let mut inner = self.inner.write();

        if let Some(id) = content_type.id().filter(|id| !inner.types.contains_key(id)) {
            return Err(ContentError::ContentTypeNotFound(id.to_string()));
        }

        let taken = inner
            .types
            .values()
            .any(|t| t.name() == content_type.name() && t.id() != content_type.id());
        if taken {
            return Err(ContentError::Conflict(format!(
                "content type name '{}' is already taken",
                content_type.name()
            )));
        }

        let id = match content_type.id() {
            Some(id) => id,
            None => {
                let id = Uuid::now_v7();
                content_type.mark_persisted(id);
                info!(type_name = %content_type.name(), %id, "content type created");
                id
            }
        };

        inner.types.insert(id, content_type.clone());
        Ok(())
    }

    async fn load_content_type(&self, id: Uuid) -> ContentResult<Option<ContentType>> {
        Ok(self.inner.read().types.get(&id).cloned())
    }

    async fn find_content_type_by_name(&self, name: &str) -> ContentResult<Option<ContentType>> {
        Ok(self
            .inner
            .read()
            .types
            .values()
            .find(|t| t.name() == name)
            .cloned())
    }

    async fn list_content_types(&self) -> ContentResult<Vec<ContentType>> {
        let mut types: Vec<ContentType> = self.inner.read().types.values().cloned().collect();
        types.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(types)
    }

    async fn delete_content_type(&self, id: Uuid) -> ContentResult<bool> {
        let mut inner = self.inner.write();

        let Some(removed) = inner.types.remove(&id) else {
            return Ok(false);
        };

        let before = inner.entries.len();
        inner.entries.retain(|_, e| e.content_type_id() != id);
        let cascaded = before - inner.entries.len();

        info!(type_name = %removed.name(), entries = cascaded, "content type deleted");
        Ok(true)
    }

    async fn save_entry(&self, entry: &mut Entry) -> ContentResult<()> {
        let mut inner = self.inner.write();

        if !inner.types.contains_key(&entry.content_type_id()) {
            return Err(ContentError::ContentTypeNotFound(
                entry.content_type_id().to_string(),
            ));
        }

        if let Some(id) = entry.id().filter(|id| !inner.entries.contains_key(id)) {
            return Err(ContentError::EntryNotFound(id.to_string()));
        }

        let id = match entry.id() {
            Some(id) => id,
            None => {
                let id = Uuid::now_v7();
                entry.mark_persisted(id);
                id
            }
        };

        inner.entries.insert(id, entry.clone());
        Ok(())
    }

    async fn load_entry(&self, id: Uuid) -> ContentResult<Option<Entry>> {
        Ok(self.inner.read().entries.get(&id).cloned())
    }

    async fn find_entry_by_slug(
        &self,
        content_type_id: Uuid,
        slug: &str,
    ) -> ContentResult<Option<Entry>> {
        Ok(self
            .inner
            .read()
            .entries
            .values()
            .filter(|e| e.content_type_id() == content_type_id && e.slug() == slug)
            .min_by_key(|e| e.id())
            .cloned())
    }

    async fn entries_for(&self, content_type_id: Uuid) -> ContentResult<Vec<Entry>> {
        let mut entries: Vec<Entry> = self
            .inner
            .read()
            .entries
            .values()
            .filter(|e| e.content_type_id() == content_type_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.id());
        Ok(entries)
    }

    async fn delete_entry(&self, id: Uuid) -> ContentResult<bool> {
        Ok(self.inner.write().entries.remove(&id).is_some())
    }
}

//! Content resolver.
//!
//! Turns stored entries into provider content. The resolver adds lookup by
//! ID or slug on top of [`ContentType::content_for`]; it does not cache,
//! retry or time out provider calls.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use quire_sdk::ResolvedContent;

use crate::error::{ContentError, ContentResult};
use crate::models::{ContentType, Entry};
use crate::provider::ProviderRegistry;
use crate::store::ContentStore;

/// Resolves entries through their content type's provider.
#[derive(Clone)]
pub struct ContentResolver {
    inner: Arc<ContentResolverInner>,
}

struct ContentResolverInner {
    registry: Arc<ProviderRegistry>,
    store: Arc<dyn ContentStore>,
}

impl ContentResolver {
    /// Create a resolver.
    pub fn new(registry: Arc<ProviderRegistry>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            inner: Arc::new(ContentResolverInner { registry, store }),
        }
    }

    /// Resolve an entry of a content type the caller already holds.
    pub async fn content_for(
        &self,
        content_type: &ContentType,
        entry: &Entry,
    ) -> ContentResult<ResolvedContent> {
        let result = content_type.content_for(entry, &self.inner.registry).await;

        match &result {
            Ok(_) => debug!(
                type_name = %content_type.name(),
                slug = %entry.slug(),
                "entry resolved"
            ),
            Err(e) => warn!(
                type_name = %content_type.name(),
                slug = %entry.slug(),
                error = %e,
                "entry resolution failed"
            ),
        }

        result
    }

    /// Load an entry and its content type, then resolve it.
    pub async fn resolve_entry(&self, entry_id: Uuid) -> ContentResult<ResolvedContent> {
        let entry = self
            .inner
            .store
            .load_entry(entry_id)
            .await?
            .ok_or_else(|| ContentError::EntryNotFound(entry_id.to_string()))?;

        let content_type = self
            .inner
            .store
            .load_content_type(entry.content_type_id())
            .await?
            .ok_or_else(|| ContentError::ContentTypeNotFound(entry.content_type_id().to_string()))?;

        self.content_for(&content_type, &entry).await
    }

    /// Resolve the entry with `slug` in the content type named `type_name`.
    pub async fn resolve_slug(&self, type_name: &str, slug: &str) -> ContentResult<ResolvedContent> {
        let content_type = self.inner.store.content_type_by_name(type_name).await?;
        let type_id = content_type
            .id()
            .ok_or_else(|| ContentError::ContentTypeNotFound(type_name.to_string()))?;

        let entry = self
            .inner
            .store
            .find_entry_by_slug(type_id, slug)
            .await?
            .ok_or_else(|| ContentError::EntryNotFound(format!("{type_name}/{slug}")))?;

        self.content_for(&content_type, &entry).await
    }
}

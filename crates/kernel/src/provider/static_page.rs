//! Static page provider.
//!
//! Resolves entries against a store of pages keyed by slug. The slug comes
//! from the entry's `slug` option when present, otherwise from the entry
//! itself. A `slug` option that is not a string is rejected. The resolved `data` is the page's full attribute map.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;

use quire_sdk::{
    FieldDescriptor, Options, Provider, ProviderError, ResolutionRequest, ResolvedContent,
};

/// Provider key the kernel registers this provider under by default.
pub const STATIC_PROVIDER: &str = "static";

/// A static page record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub slug: String,
    /// All page columns, `slug` included.
    pub attributes: Options,
}

impl Page {
    /// Build a page; `slug` is added to the attributes.
    pub fn new(slug: impl Into<String>, mut attributes: Options) -> Self {
        let slug = slug.into();
        attributes.insert("slug".to_string(), slug.clone().into());
        Self { slug, attributes }
    }
}

/// Lookup of pages by slug.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Find a single page. `None` when no page has the slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Page>, ProviderError>;
}

/// In-memory page store.
#[derive(Debug, Default, Clone)]
pub struct MemoryPageStore {
    pages: Arc<DashMap<String, Page>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a page.
    pub fn insert(&self, page: Page) {
        self.pages.insert(page.slug.clone(), page);
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Page>, ProviderError> {
        Ok(self.pages.get(slug).map(|p| p.clone()))
    }
}

/// PostgreSQL page store reading the `page` table.
#[derive(Clone)]
pub struct PgPageStore {
    pool: PgPool,
}

impl PgPageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageStore for PgPageStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Page>, ProviderError> {
        let row: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT to_jsonb(p) FROM page p WHERE p.slug = $1 LIMIT 1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| ProviderError::Backend(e.to_string()))?;

        Ok(row.map(|value| Page {
            slug: slug.to_string(),
            attributes: match value {
                serde_json::Value::Object(map) => map,
                _ => Options::new(),
            },
        }))
    }
}

/// Provider backed by a [`PageStore`].
pub struct StaticPageProvider {
    pages: Arc<dyn PageStore>,
}

impl StaticPageProvider {
    pub fn new(pages: impl PageStore + 'static) -> Self {
        Self {
            pages: Arc::new(pages),
        }
    }
}

#[async_trait]
impl Provider for StaticPageProvider {
    async fn call(&self, request: ResolutionRequest) -> Result<ResolvedContent, ProviderError> {
        let slug = match request.options.get("slug") {
            None | Some(serde_json::Value::Null) => request.slug.clone(),
            Some(serde_json::Value::String(slug)) => slug.clone(),
            Some(other) => {
                return Err(ProviderError::InvalidRequest(format!(
                    "slug option must be a string, got {other}"
                )));
            }
        };

        let page = self
            .pages
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ProviderError::not_found(slug.as_str()))?;

        debug!(slug = %slug, "static page found");
        Ok(request.into_resolved(page.attributes))
    }

    fn entry_type_fields(&self) -> Vec<FieldDescriptor> {
        Vec::new()
    }

    fn entry_fields(&self) -> Vec<String> {
        vec!["slug".to_string()]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryPageStore {
        let store = MemoryPageStore::new();
        store.insert(Page::new(
            "about-us",
            json!({"title": "About Us"}).as_object().cloned().unwrap(),
        ));
        store
    }

    fn request(slug: &str, options: serde_json::Value) -> ResolutionRequest {
        ResolutionRequest {
            slug: slug.to_string(),
            content_type: "page".to_string(),
            provider: STATIC_PROVIDER.to_string(),
            options: options.as_object().cloned().unwrap(),
            type_options: Options::new(),
        }
    }

    #[tokio::test]
    async fn slug_option_takes_precedence() {
        let provider = StaticPageProvider::new(store());

        let resolved = provider
            .call(request("ignored", json!({"slug": "about-us"})))
            .await
            .unwrap();

        assert_eq!(resolved.get_str("title"), Some("About Us"));
        assert_eq!(resolved.get_str("slug"), Some("about-us"));
        assert_eq!(resolved.request.slug, "ignored");
    }

    #[tokio::test]
    async fn falls_back_to_entry_slug() {
        let provider = StaticPageProvider::new(store());

        let resolved = provider.call(request("about-us", json!({}))).await.unwrap();
        assert_eq!(resolved.get_str("title"), Some("About Us"));
    }

    #[tokio::test]
    async fn non_string_slug_option_is_invalid() {
        let provider = StaticPageProvider::new(store());

        let err = provider
            .call(request("about-us", json!({"slug": 7})))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(ref m) if m.contains('7')));
    }

    #[tokio::test]
    async fn null_slug_option_falls_back() {
        let provider = StaticPageProvider::new(store());

        let resolved = provider
            .call(request("about-us", json!({"slug": null})))
            .await
            .unwrap();
        assert_eq!(resolved.get_str("title"), Some("About Us"));
    }

    #[tokio::test]
    async fn missing_page_is_not_found() {
        let provider = StaticPageProvider::new(store());

        let err = provider
            .call(request("", json!({"slug": "missing"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotFound { ref slug } if slug == "missing"));
    }

    #[test]
    fn declares_schemas() {
        let provider = StaticPageProvider::new(MemoryPageStore::new());
        assert!(provider.entry_type_fields().is_empty());
        assert_eq!(provider.entry_fields(), vec!["slug".to_string()]);
    }
}

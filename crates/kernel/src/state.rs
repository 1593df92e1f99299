//! Application state wired once at startup.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::Config;
use crate::content::ContentResolver;
use crate::db;
use crate::provider::{PgPageStore, ProviderRegistry, STATIC_PROVIDER, StaticPageProvider};
use crate::store::{ContentStore, PgContentStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Provider registry, frozen at startup.
    registry: Arc<ProviderRegistry>,

    /// Content type and entry storage.
    store: Arc<dyn ContentStore>,

    /// Entry resolution.
    resolver: ContentResolver,
}

impl AppState {
    /// Connect to the database and build the provider registry.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config).await?;
        if !db::check_health(&pool).await {
            bail!("database health check failed");
        }

        let registry = Arc::new(build_registry(config, &pool)?);
        let store: Arc<dyn ContentStore> =
            Arc::new(PgContentStore::new(pool, Arc::clone(&registry)));
        let resolver = ContentResolver::new(Arc::clone(&registry), Arc::clone(&store));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                registry,
                store,
                resolver,
            }),
        })
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.inner.registry
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.inner.store.as_ref()
    }

    pub fn resolver(&self) -> &ContentResolver {
        &self.inner.resolver
    }
}

/// Register the enabled providers the kernel ships with.
///
/// Unknown keys in the configuration are skipped with a warning; they
/// surface as `UnknownProvider` when a content type refers to them.
pub fn build_registry(config: &Config, pool: &PgPool) -> Result<ProviderRegistry> {
    let mut builder = ProviderRegistry::builder();

    if config.provider_enabled(STATIC_PROVIDER) {
        builder = builder.register(
            STATIC_PROVIDER,
            StaticPageProvider::new(PgPageStore::new(pool.clone())),
        );
    }

    for other in config.providers.iter().filter(|p| p.as_str() != STATIC_PROVIDER) {
        warn!(provider = %other, "no built-in provider with this key; skipping");
    }

    let registry = builder.build().context("failed to build provider registry")?;
    info!(providers = registry.len(), "providers registered");
    Ok(registry)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn config(providers: &[&str]) -> Config {
        Config {
            database_url: None,
            database_max_connections: 1,
            providers: providers.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn build_registry_registers_enabled_providers_only() {
        let pool = PgPool::connect_lazy("postgres://localhost/quire_test").unwrap();

        let registry = build_registry(&config(&["static", "json"]), &pool).unwrap();
        assert!(registry.contains(STATIC_PROVIDER));
        assert!(!registry.contains("json"));
        assert_eq!(registry.len(), 1);

        let empty = build_registry(&config(&["json"]), &pool).unwrap();
        assert!(empty.is_empty());
    }
}

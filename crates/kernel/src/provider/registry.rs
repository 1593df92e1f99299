//! Provider registry.
//!
//! Maps provider keys to implementations. Built once at startup through
//! [`ProviderRegistryBuilder`] and read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::info;

use quire_sdk::Provider;

use crate::error::{ContentError, ValidationError};

/// Immutable registry of content providers.
///
/// Share it as `Arc<ProviderRegistry>`; lookups need no locking.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Start building a registry.
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::default()
    }

    /// Look up a provider by key.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Provider>, ContentError> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| ContentError::UnknownProvider {
                name: name.to_string(),
            })
    }

    /// Check whether a provider key is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered provider keys, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

/// Collects providers before the registry is frozen.
#[derive(Default)]
pub struct ProviderRegistryBuilder {
    providers: HashMap<String, Arc<dyn Provider>>,
    duplicate: Option<String>,
    blank: bool,
}

impl ProviderRegistryBuilder {
    /// Register a provider under a key.
    ///
    /// Errors (blank or duplicate keys) are reported by [`build`](Self::build).
    pub fn register(mut self, name: impl Into<String>, provider: impl Provider + 'static) -> Self {
        self.insert(name.into(), Arc::new(provider));
        self
    }

    fn insert(&mut self, name: String, provider: Arc<dyn Provider>) {
        if name.trim().is_empty() {
            self.blank = true;
            return;
        }
        if self.providers.contains_key(&name) {
            self.duplicate.get_or_insert(name);
            return;
        }
        self.providers.insert(name, provider);
    }

    /// Freeze the registry.
    pub fn build(self) -> Result<ProviderRegistry, ContentError> {
        if self.blank {
            return Err(ValidationError::Blank {
                field: "provider_name",
            }
            .into());
        }
        if let Some(name) = self.duplicate {
            return Err(ContentError::DuplicateProvider { name });
        }

        let registry = ProviderRegistry {
            providers: self.providers,
        };
        info!(providers = ?registry.names(), "provider registry built");
        Ok(registry)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quire_sdk::{FieldDescriptor, ProviderError, ResolutionRequest, ResolvedContent};

    struct Named(&'static str);

    #[async_trait]
    impl Provider for Named {
        async fn call(
            &self,
            request: ResolutionRequest,
        ) -> Result<ResolvedContent, ProviderError> {
            Ok(request.into_resolved(Default::default()))
        }

        fn entry_type_fields(&self) -> Vec<FieldDescriptor> {
            vec![FieldDescriptor::text(self.0)]
        }
    }

    #[test]
    fn lookup_registered_provider() {
        let registry = ProviderRegistry::builder()
            .register("static", Named("a"))
            .register("json", Named("b"))
            .build()
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["json", "static"]);
        let provider = registry.lookup("json").unwrap();
        assert_eq!(provider.entry_type_fields()[0].name, "b");
    }

    #[test]
    fn lookup_unknown_provider_fails() {
        let registry = ProviderRegistry::builder().build().unwrap();
        assert!(registry.is_empty());

        let err = registry.lookup("prismic").err().unwrap();
        assert!(matches!(err, ContentError::UnknownProvider { ref name } if name == "prismic"));
    }

    #[test]
    fn duplicate_key_rejected() {
        let err = ProviderRegistry::builder()
            .register("static", Named("a"))
            .register("static", Named("b"))
            .build()
            .err()
            .unwrap();

        assert!(matches!(err, ContentError::DuplicateProvider { ref name } if name == "static"));
    }

    #[test]
    fn blank_key_rejected() {
        let err = ProviderRegistry::builder()
            .register("  ", Named("a"))
            .build()
            .err()
            .unwrap();

        assert!(matches!(err, ContentError::Validation(ValidationError::Blank { .. })));
    }

    #[test]
    fn concurrent_lookups() {
        let registry = Arc::new(
            ProviderRegistry::builder()
                .register("static", Named("a"))
                .build()
                .unwrap(),
        );

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.lookup("static").is_ok())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}

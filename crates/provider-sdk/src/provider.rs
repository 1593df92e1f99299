//! The provider trait.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{FieldDescriptor, ResolutionRequest, ResolvedContent};

/// A pluggable content source.
///
/// Providers are stateless from the kernel's point of view: one instance is
/// registered at startup and shared by every resolution, possibly from many
/// tasks at once. `call` may block on I/O; the kernel adds no timeout or
/// retry around it.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Resolve an entry into content.
    ///
    /// On success the response carries the request unchanged plus `data`.
    async fn call(&self, request: ResolutionRequest) -> Result<ResolvedContent, ProviderError>;

    /// Fields a content type bound to this provider may carry.
    fn entry_type_fields(&self) -> Vec<FieldDescriptor> {
        Vec::new()
    }

    /// Option keys an entry of such a content type may carry.
    fn entry_fields(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::types::Options;

    struct Echo;

    #[async_trait]
    impl Provider for Echo {
        async fn call(
            &self,
            request: ResolutionRequest,
        ) -> Result<ResolvedContent, ProviderError> {
            let mut data = Options::new();
            data.insert("echo".to_string(), request.slug.clone().into());
            Ok(request.into_resolved(data))
        }
    }

    #[tokio::test]
    async fn default_schemas_are_empty() {
        let provider: Box<dyn Provider> = Box::new(Echo);
        assert!(provider.entry_type_fields().is_empty());
        assert!(provider.entry_fields().is_empty());

        let request = ResolutionRequest {
            slug: "home".to_string(),
            content_type: "page".to_string(),
            provider: "echo".to_string(),
            options: Options::new(),
            type_options: Options::new(),
        };
        let resolved = provider.call(request).await.unwrap();
        assert_eq!(resolved.get_str("echo"), Some("home"));
    }
}

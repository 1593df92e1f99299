#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for resolving entries through providers.

use std::sync::Arc;

use quire_kernel::models::{Entry, NewEntry};
use quire_kernel::provider::{MemoryPageStore, Page, STATIC_PROVIDER, StaticPageProvider};
use quire_kernel::{
    ContentError, ContentResolver, ContentStore, ContentType, MemoryContentStore, NewContentType,
    ProviderRegistry,
};
use quire_sdk::ProviderError;
use quire_test_utils::{FailingProvider, RecordingProvider, assert, options};
use serde_json::json;

/// Registry with a static provider over one "about-us" page, a recording
/// provider and a failing one.
fn setup() -> (Arc<ProviderRegistry>, RecordingProvider) {
    let pages = MemoryPageStore::new();
    pages.insert(Page::new(
        "about-us",
        options(json!({"title": "About Us", "body": "<p>Hello</p>"})),
    ));

    let recording = RecordingProvider::new().with_data(options(json!({"rendered": true})));

    let registry = ProviderRegistry::builder()
        .register(STATIC_PROVIDER, StaticPageProvider::new(pages))
        .register("recording", recording.clone())
        .register("broken", FailingProvider::new("upstream unavailable"))
        .build()
        .unwrap();

    (Arc::new(registry), recording)
}

async fn persisted_type(
    store: &MemoryContentStore,
    registry: &ProviderRegistry,
    input: NewContentType,
) -> ContentType {
    let mut content_type = ContentType::create(input, registry).unwrap();
    store.save_content_type(&mut content_type).await.unwrap();
    content_type
}

async fn persisted_entry(store: &MemoryContentStore, input: NewEntry) -> Entry {
    let mut entry = Entry::new(input);
    store.save_entry(&mut entry).await.unwrap();
    entry
}

// ============================================================================
// Static Page Provider
// ============================================================================

#[tokio::test]
async fn resolves_static_page_from_slug_option() {
    let (registry, _) = setup();
    let store = MemoryContentStore::new();

    let page = persisted_type(&store, &registry, NewContentType::new("page", "static")).await;
    let entry = persisted_entry(
        &store,
        NewEntry::new(page.id().unwrap()).with_options(options(json!({"slug": "about-us"}))),
    )
    .await;

    let content = page.content_for(&entry, &registry).await.unwrap();

    assert::data_str(&content, "title", "About Us");
    assert_eq!(content.request.content_type, "page");
    assert_eq!(content.request.provider, "static");
    assert_eq!(content.request.slug, "");
}

#[tokio::test]
async fn missing_static_page_is_not_found() {
    let (registry, _) = setup();
    let store = MemoryContentStore::new();

    let page = persisted_type(&store, &registry, NewContentType::new("page", "static")).await;
    let entry = persisted_entry(
        &store,
        NewEntry::new(page.id().unwrap()).with_options(options(json!({"slug": "missing"}))),
    )
    .await;

    let err = page.content_for(&entry, &registry).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(
        err,
        ContentError::Provider(ProviderError::NotFound { ref slug }) if slug == "missing"
    ));
}

// ============================================================================
// Request Shape
// ============================================================================

#[tokio::test]
async fn request_carries_entry_and_type_options_as_stored() {
    let (registry, recording) = setup();
    let store = MemoryContentStore::new();

    let input = NewContentType::new("teaser", "recording")
        .with_options(options(json!({"Locale": "en", "layout": "card"})));
    let teaser = persisted_type(&store, &registry, input).await;
    let entry = persisted_entry(
        &store,
        NewEntry::new(teaser.id().unwrap())
            .with_slug("spring-sale")
            .with_options(options(json!({"locale": "it", "Max-Items": 3}))),
    )
    .await;

    let content = teaser.content_for(&entry, &registry).await.unwrap();

    let request = recording.last_request().unwrap();
    assert_eq!(request.slug, "spring-sale");
    assert_eq!(request.content_type, "teaser");
    assert_eq!(request.provider, "recording");
    assert_eq!(&request.options, entry.options());
    assert_eq!(&request.type_options, teaser.options());
    assert_eq!(request.options, options(json!({"locale": "it", "Max-Items": 3})));
    assert_eq!(
        request.type_options,
        options(json!({"Locale": "en", "layout": "card"}))
    );
    assert_eq!(content.request, request);
    assert_eq!(content.get("rendered"), Some(&json!(true)));
}

#[tokio::test]
async fn provider_errors_pass_through_unchanged() {
    let (registry, _) = setup();
    let store = MemoryContentStore::new();

    let broken = persisted_type(&store, &registry, NewContentType::new("feed", "broken")).await;
    let entry = persisted_entry(&store, NewEntry::new(broken.id().unwrap()).with_slug("x")).await;

    let err = broken.content_for(&entry, &registry).await.unwrap_err();
    assert!(matches!(
        err,
        ContentError::Provider(ProviderError::Backend(ref m)) if m == "upstream unavailable"
    ));
}

#[tokio::test]
async fn every_call_reaches_the_provider() {
    let (registry, recording) = setup();
    let store = MemoryContentStore::new();

    let teaser = persisted_type(&store, &registry, NewContentType::new("teaser", "recording")).await;
    let entry = persisted_entry(&store, NewEntry::new(teaser.id().unwrap()).with_slug("a")).await;

    teaser.content_for(&entry, &registry).await.unwrap();
    teaser.content_for(&entry, &registry).await.unwrap();

    assert_eq!(recording.call_count(), 2);
}

// ============================================================================
// ContentResolver
// ============================================================================

#[tokio::test]
async fn resolver_resolves_by_id_and_slug() {
    let (registry, _) = setup();
    let store = Arc::new(MemoryContentStore::new());

    let page = persisted_type(&store, &registry, NewContentType::new("page", "static")).await;
    let entry = persisted_entry(&store, NewEntry::new(page.id().unwrap()).with_slug("about-us")).await;

    let resolver = ContentResolver::new(Arc::clone(&registry), store.clone());

    let by_id = resolver.resolve_entry(entry.id().unwrap()).await.unwrap();
    assert::data_str(&by_id, "title", "About Us");

    let by_slug = resolver.resolve_slug("page", "about-us").await.unwrap();
    assert_eq!(by_id, by_slug);
}

#[tokio::test]
async fn resolver_reports_missing_records() {
    let (registry, _) = setup();
    let store = Arc::new(MemoryContentStore::new());
    persisted_type(&store, &registry, NewContentType::new("page", "static")).await;

    let resolver = ContentResolver::new(registry, store.clone());

    let err = resolver.resolve_entry(uuid::Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, ContentError::EntryNotFound(_)));

    let err = resolver.resolve_slug("post", "hello").await.unwrap_err();
    assert!(matches!(err, ContentError::ContentTypeNotFound(_)));

    let err = resolver.resolve_slug("page", "hello").await.unwrap_err();
    assert!(matches!(err, ContentError::EntryNotFound(ref key) if key == "page/hello"));
}

#[tokio::test]
async fn resolver_is_shareable_across_tasks() {
    let (registry, recording) = setup();
    let store = Arc::new(MemoryContentStore::new());

    let teaser = persisted_type(&store, &registry, NewContentType::new("teaser", "recording")).await;
    for slug in ["a", "b", "c", "d"] {
        persisted_entry(&store, NewEntry::new(teaser.id().unwrap()).with_slug(slug)).await;
    }

    let resolver = ContentResolver::new(registry, store.clone());
    let handles: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|slug| {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve_slug("teaser", slug).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(recording.call_count(), 4);
}

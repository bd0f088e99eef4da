mod common;

use async_trait::async_trait;
use edge_url_shortener::application::services::{
    AllocationService, AllocationSettings, EnumerationService,
};
use edge_url_shortener::domain::repositories::{
    KeyItem, KeyPage, KeyValueStore, StoreDescription, StoreError, StoreVersion,
};
use edge_url_shortener::error::AppError;
use edge_url_shortener::infrastructure::store::InMemoryKeyValueStore;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn allocator(store: Arc<dyn KeyValueStore>) -> AllocationService<dyn KeyValueStore> {
    AllocationService::new(store, common::settings())
}

/// Lets another writer slip in right after the first `describe`.
struct InterleavingStore {
    inner: Arc<InMemoryKeyValueStore>,
    interfered: AtomicBool,
}

impl InterleavingStore {
    fn new(inner: Arc<InMemoryKeyValueStore>) -> Self {
        Self {
            inner,
            interfered: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl KeyValueStore for InterleavingStore {
    async fn describe(&self) -> Result<StoreDescription, StoreError> {
        let description = self.inner.describe().await?;

        if !self.interfered.swap(true, Ordering::SeqCst) {
            let etag = self.inner.describe().await?.etag.unwrap();
            self.inner
                .put_key("other1", "https://other.example", &etag)
                .await?;
        }

        Ok(description)
    }

    async fn list_keys(
        &self,
        max_results: Option<u32>,
        next_token: Option<String>,
    ) -> Result<KeyPage, StoreError> {
        self.inner.list_keys(max_results, next_token).await
    }

    async fn get_key(&self, key: &str) -> Result<Option<KeyItem>, StoreError> {
        self.inner.get_key(key).await
    }

    async fn put_key(
        &self,
        key: &str,
        value: &str,
        if_match: &StoreVersion,
    ) -> Result<StoreVersion, StoreError> {
        self.inner.put_key(key, value, if_match).await
    }
}

/// Replica whose listing is frozen at creation while its version tag and
/// writes are live.
struct LaggingListingStore {
    inner: Arc<InMemoryKeyValueStore>,
    snapshot: InMemoryKeyValueStore,
}

#[async_trait]
impl KeyValueStore for LaggingListingStore {
    async fn describe(&self) -> Result<StoreDescription, StoreError> {
        self.inner.describe().await
    }

    async fn list_keys(
        &self,
        max_results: Option<u32>,
        next_token: Option<String>,
    ) -> Result<KeyPage, StoreError> {
        self.snapshot.list_keys(max_results, next_token).await
    }

    async fn get_key(&self, key: &str) -> Result<Option<KeyItem>, StoreError> {
        self.inner.get_key(key).await
    }

    async fn put_key(
        &self,
        key: &str,
        value: &str,
        if_match: &StoreVersion,
    ) -> Result<StoreVersion, StoreError> {
        self.inner.put_key(key, value, if_match).await
    }
}

/// Yields to the scheduler after reading the version tag, so concurrent
/// allocations all read the same tag before any of them writes.
struct YieldingStore {
    inner: Arc<InMemoryKeyValueStore>,
}

#[async_trait]
impl KeyValueStore for YieldingStore {
    async fn describe(&self) -> Result<StoreDescription, StoreError> {
        let description = self.inner.describe().await?;
        tokio::task::yield_now().await;
        Ok(description)
    }

    async fn list_keys(
        &self,
        max_results: Option<u32>,
        next_token: Option<String>,
    ) -> Result<KeyPage, StoreError> {
        self.inner.list_keys(max_results, next_token).await
    }

    async fn get_key(&self, key: &str) -> Result<Option<KeyItem>, StoreError> {
        self.inner.get_key(key).await
    }

    async fn put_key(
        &self,
        key: &str,
        value: &str,
        if_match: &StoreVersion,
    ) -> Result<StoreVersion, StoreError> {
        self.inner.put_key(key, value, if_match).await
    }
}

#[tokio::test]
async fn test_identifiers_are_unique_up_to_capacity() {
    let store = common::empty_store();
    let service = allocator(store.clone());

    let mut ids = HashSet::new();
    for n in 0..50 {
        let allocation = service
            .allocate(&format!("https://example.com/page/{n}"))
            .await
            .unwrap();
        assert!(allocation.created);
        assert!(ids.insert(allocation.short_id));
    }

    let result = service.allocate("https://example.com/page/50").await;

    assert!(matches!(result, Err(AppError::CapacityExceeded { .. })));
    assert_eq!(store.len(), 50);
}

#[tokio::test]
async fn test_repeated_allocation_is_idempotent() {
    let store = common::empty_store();
    let service = allocator(store.clone());

    let first = service.allocate("https://example.com/a").await.unwrap();
    let second = service.allocate("https://example.com/a").await.unwrap();
    let third = service.allocate("https://example.com/a").await.unwrap();

    assert!(first.created);
    assert!(!second.created && !third.created);
    assert_eq!(first.short_id, second.short_id);
    assert_eq!(first.short_id, third.short_id);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_urls_differing_only_in_trailing_slash_are_distinct() {
    let store = common::empty_store();
    let service = allocator(store.clone());

    let a = service.allocate("https://example.com/path").await.unwrap();
    let b = service.allocate("https://example.com/path/").await.unwrap();

    assert_ne!(a.short_id, b.short_id);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_dedup_scans_every_page() {
    let store = common::seeded_store(120);
    let service = allocator(store.clone());

    let allocation = service.allocate("https://seed.example/110").await.unwrap();

    assert!(!allocation.created);
    assert_eq!(allocation.short_id, "id110");
}

#[tokio::test]
async fn test_enumeration_is_complete() {
    let store = common::seeded_store(37);
    let service = EnumerationService::new(store.clone(), 10);

    let all = service.list_all().await.unwrap();

    let ids: HashSet<_> = all.iter().map(|m| m.short_id.clone()).collect();
    assert_eq!(all.len(), 37);
    assert_eq!(ids.len(), 37);
}

#[tokio::test]
async fn test_write_after_concurrent_change_is_rejected() {
    let inner = common::empty_store();
    let store = Arc::new(InterleavingStore::new(inner.clone()));
    let service = allocator(store);

    let result = service.allocate("https://example.com/mine").await;

    assert!(matches!(
        result,
        Err(AppError::ConcurrentModification { .. })
    ));
    // Only the interfering write landed.
    assert_eq!(inner.len(), 1);
    assert!(inner.get_key("other1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_retry_recovers_from_concurrent_change() {
    let inner = common::empty_store();
    let store = Arc::new(InterleavingStore::new(inner.clone()));
    let mut settings = AllocationSettings::new(common::PUBLIC_DOMAIN);
    settings.conflict_retries = 2;
    let service = AllocationService::new(store, settings);

    let allocation = service
        .allocate_with_retry("https://example.com/mine")
        .await
        .unwrap();

    assert!(allocation.created);
    assert_eq!(inner.len(), 2);
}

#[tokio::test]
async fn test_concurrent_allocations_never_lose_writes() {
    let store = common::empty_store();
    let service = Arc::new(allocator(Arc::new(YieldingStore {
        inner: store.clone(),
    })));

    let mut handles = Vec::new();
    for n in 0..16 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.allocate(&format!("https://example.com/{n}")).await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(allocation) => {
                assert!(allocation.created);
                created += 1;
            }
            Err(err) => {
                assert!(err.is_concurrent_modification());
                conflicts += 1;
            }
        }
    }

    // Every task read the same version, so exactly one write lands.
    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(store.len(), created);
}

#[tokio::test]
async fn test_lagging_listing_can_duplicate_url() {
    let inner = common::empty_store();
    let store = Arc::new(LaggingListingStore {
        inner: inner.clone(),
        snapshot: InMemoryKeyValueStore::new("snapshot"),
    });
    let service = allocator(store);

    let first = service.allocate("https://example.com/race").await.unwrap();
    let second = service.allocate("https://example.com/race").await.unwrap();

    // The second call cannot see the first mapping, so it writes another.
    assert!(first.created && second.created);
    assert_ne!(first.short_id, second.short_id);
    assert_eq!(inner.len(), 2);
}

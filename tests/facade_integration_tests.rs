//! Integration Tests for the Composite Cache Façade
//!
//! End-to-end scenarios over the bundled memory store, plus failure-path
//! coverage through store doubles that refuse reads or writes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use composite_cache::{
    BackingStore, CacheError, CompositeCache, MemoryStore, SetOptions, Shape, StoreEntry,
    StoreError, Ttl,
};

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "composite_cache=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn memory_cache() -> CompositeCache<MemoryStore> {
    init_tracing();
    CompositeCache::new(MemoryStore::new(1000))
}

// == Store Doubles ==

/// A store that is down: every call fails.
struct DownStore;

#[async_trait]
impl BackingStore for DownStore {
    async fn get_raw(&self, _key: &str) -> Result<Option<StoreEntry>, StoreError> {
        Err(StoreError::Unavailable("down".into()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Option<u64>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("down".into()))
    }

    async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("down".into()))
    }

    async fn has(&self, _key: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("down".into()))
    }
}

/// A store whose writes can be switched off mid-test, reads keep working.
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(1000),
            fail_writes: AtomicBool::new(false),
        }
    }

    fn break_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl BackingStore for FlakyStore {
    async fn get_raw(&self, key: &str) -> Result<Option<StoreEntry>, StoreError> {
        self.inner.get_raw(key).await
    }

    async fn set(&self, key: &str, value: String, ttl: Option<u64>) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.inner.delete(key).await
    }

    async fn has(&self, key: &str) -> Result<bool, StoreError> {
        self.inner.has(key).await
    }
}

// == Round-Trip and TTL ==

#[tokio::test]
async fn test_scalar_roundtrip_with_ttl_decay() {
    let cache = memory_cache();

    assert!(cache.set("k", json!("v"), SetOptions::ttl(10_000)).await);
    assert_eq!(cache.get("k").await.unwrap(), Some(json!("v")));

    let first = cache.ttl("k").await.millis().expect("bounded");
    assert!(first <= 10_000);

    tokio::time::sleep(Duration::from_millis(150)).await;
    let second = cache.ttl("k").await.millis().expect("bounded");
    assert!(second < first, "ttl must decay: {second} >= {first}");
}

#[tokio::test]
async fn test_scalar_absent_after_expiry() {
    let cache = memory_cache();

    assert!(cache.set("k", json!("v"), SetOptions::ttl(60)).await);
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(cache.get("k").await.unwrap(), None);
    assert!(!cache.has("k").await);
    assert_eq!(cache.ttl("k").await, Ttl::Millis(0));
}

#[tokio::test]
async fn test_list_mutation_preserves_remaining_ttl() {
    let cache = memory_cache();

    cache.push_back("l", vec![json!(1)]).await.unwrap();
    assert!(cache.expire("l", 10_000).await);

    tokio::time::sleep(Duration::from_millis(250)).await;
    cache.push_back("l", vec![json!(2)]).await.unwrap();

    match cache.ttl("l").await {
        Ttl::Millis(ms) => {
            assert!(ms <= 9_900, "ttl was reset: {ms}");
            assert!(ms >= 8_000, "ttl collapsed: {ms}");
        }
        Ttl::Unbounded => panic!("ttl was stripped"),
    }
    assert_eq!(cache.len("l").await.unwrap(), 2);
}

// == Cross-Contract Scenarios ==

#[tokio::test]
async fn test_three_shapes_coexist_under_distinct_keys() {
    let cache = memory_cache();

    cache.set("scalar", json!(1), SetOptions::NONE).await;
    cache
        .push_back("list", vec![json!(1), json!(2)])
        .await
        .unwrap();
    cache
        .map_set("map", "x", json!(1), SetOptions::NONE)
        .await
        .unwrap();

    assert_eq!(cache.get("scalar").await.unwrap(), Some(json!(1)));
    assert_eq!(cache.len("list").await.unwrap(), 2);
    assert_eq!(cache.map_len("map").await.unwrap(), 1);
}

#[tokio::test]
async fn test_shape_enforcement_on_scalar_key() {
    let cache = memory_cache();

    cache.set("k", json!("scalar"), SetOptions::NONE).await;

    let violations = [
        cache.push_back("k", vec![json!(1)]).await.err(),
        cache.list("k", 0, -1).await.err(),
        cache.pop_front("k", 1).await.err(),
        cache
            .map_set("k", "x", json!(1), SetOptions::NONE)
            .await
            .err(),
        cache.map_keys("k").await.err(),
        cache.map_increase("k", "x", 1).await.err(),
    ];

    for violation in violations {
        match violation {
            Some(CacheError::WrongShape { key, found, .. }) => {
                assert_eq!(key, "k");
                assert_eq!(found, Shape::Scalar);
            }
            other => panic!("expected a shape violation, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_delete_clears_any_shape() {
    let cache = memory_cache();

    cache.push_back("l", vec![json!(1)]).await.unwrap();
    assert!(cache.delete("l").await);
    assert!(!cache.has("l").await);

    // Reuse the key as a map after deletion.
    cache
        .map_set("l", "x", json!(1), SetOptions::NONE)
        .await
        .unwrap();
    assert_eq!(cache.map_len("l").await.unwrap(), 1);
}

#[tokio::test]
async fn test_emptied_containers_remain_present() {
    let cache = memory_cache();

    cache.push_back("l", vec![json!(1)]).await.unwrap();
    cache.pop_back("l", 1).await.unwrap();
    assert!(cache.has("l").await);

    cache
        .map_set("m", "x", json!(1), SetOptions::NONE)
        .await
        .unwrap();
    cache.map_delete("m", "x").await.unwrap();
    assert!(cache.has("m").await);
}

// == Store Fault Fallbacks ==

#[tokio::test]
async fn test_down_store_falls_back_everywhere() {
    init_tracing();
    let cache = CompositeCache::new(DownStore);

    assert_eq!(cache.get("k").await.unwrap(), None);
    assert!(!cache.set("k", json!(1), SetOptions::NONE).await);
    assert!(!cache.delete("k").await);
    assert!(!cache.has("k").await);
    assert_eq!(cache.ttl("k").await, Ttl::Millis(0));
    assert!(!cache.expire("k", 1_000).await);

    // Failed read counts as absent (previous value 0), failed write keeps it.
    assert_eq!(cache.increase("k", 5).await.unwrap(), 0);

    assert_eq!(cache.push_back("k", vec![json!(1)]).await.unwrap(), 0);
    assert!(cache.pop_front("k", 1).await.unwrap().is_empty());
    assert!(cache.list("k", 0, -1).await.unwrap().is_empty());

    assert_eq!(cache.map_get("m", "x").await.unwrap(), None);
    assert!(!cache.map_set("m", "x", json!(1), SetOptions::NONE).await.unwrap());
    assert!(!cache.map_delete("m", "x").await.unwrap());
    assert!(cache.map_keys("m").await.unwrap().is_empty());
    assert_eq!(cache.map_random_key("m").await.unwrap(), None);
    assert_eq!(cache.map_len("m").await.unwrap(), 0);
}

#[tokio::test]
async fn test_write_failure_reports_previous_state() {
    init_tracing();
    let cache = CompositeCache::new(FlakyStore::new());

    cache.set("counter", json!(5), SetOptions::NONE).await;
    cache
        .push_back("l", vec![json!(1), json!(2)])
        .await
        .unwrap();
    cache
        .map_set("m", "hits", json!(3), SetOptions::NONE)
        .await
        .unwrap();

    cache.store().break_writes();

    // Counters fall back to the value still in the store.
    assert_eq!(cache.increase("counter", 10).await.unwrap(), 5);
    assert_eq!(cache.map_increase("m", "hits", 10).await.unwrap(), 3);

    // Pushes report the unchanged length, pops remove nothing.
    assert_eq!(cache.push_back("l", vec![json!(3)]).await.unwrap(), 2);
    assert!(cache.pop_back("l", 1).await.unwrap().is_empty());
    assert_eq!(cache.len("l").await.unwrap(), 2);

    assert!(!cache.set("other", json!(1), SetOptions::NONE).await);
    assert!(!cache.setnx("fresh", json!(1), SetOptions::NONE).await);
}

// == Concurrency ==

#[tokio::test]
async fn test_concurrent_increases_serialize() {
    let cache = Arc::new(memory_cache());

    let mut handles = Vec::new();
    for _ in 0..32 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            cache.increase("counter", 1).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.get("counter").await.unwrap(), Some(json!(32)));
}

#[tokio::test]
async fn test_concurrent_pushes_lose_nothing() {
    let cache = Arc::new(memory_cache());

    let mut handles = Vec::new();
    for i in 0..16 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            cache
                .push_back("l", vec![json!(i), json!(i)])
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.len("l").await.unwrap(), 32);
}

#[tokio::test]
async fn test_concurrent_setnx_single_winner() {
    let cache = Arc::new(memory_cache());

    let mut handles = Vec::new();
    for i in 0..16 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            cache.setnx("k", json!(i), SetOptions::NONE).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

//! Memory Store Module
//!
//! In-memory implementation of the Backing Store contract, used by the test
//! suite and by embedders that don't bring their own store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::store::{BackingStore, StoreEntry};

// == Memory Store ==
/// HashMap-backed store with TTL expiration and a hard entry cap.
///
/// Expired entries are dropped lazily when a read touches them. When the cap
/// is reached, writes of new keys are rejected rather than evicting; the
/// façade converts that rejection into its per-operation fallback.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoreEntry>>,
    max_entries: usize,
}

impl MemoryStore {
    // == Constructors ==
    /// Creates a store holding at most `max_entries` live entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries,
        }
    }

    /// Creates a store from a [`StoreConfig`].
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.max_entries)
    }

    /// Current number of entries, including not-yet-purged expired ones.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    async fn get_raw(&self, key: &str) -> Result<Option<StoreEntry>, StoreError> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Entry exists but expired: purge it under the write lock.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired()) {
            entries.remove(key);
            debug!(key, "purged expired entry on read");
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl_ms: Option<u64>) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;

        let is_overwrite = entries
            .get(key)
            .is_some_and(|existing| !existing.is_expired());
        if !is_overwrite && entries.len() >= self.max_entries {
            // One pass of lazy purging before giving up.
            entries.retain(|_, entry| !entry.is_expired());
            if entries.len() >= self.max_entries {
                return Err(StoreError::CapacityExceeded(format!(
                    "store holds {} entries",
                    entries.len()
                )));
            }
        }

        entries.insert(key.to_string(), StoreEntry::new(value, ttl_ms));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(key).is_some())
    }

    async fn has(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get_raw(key).await?.is_some())
    }
}

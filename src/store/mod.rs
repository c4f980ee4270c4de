//! Store Module
//!
//! The Backing Store contract the façade is built on, plus the bundled
//! in-memory implementation.

mod entry;
mod memory;

pub use entry::{current_timestamp_ms, StoreEntry};
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;

// == Backing Store Contract ==
/// The flat key-value collaborator underneath the façade.
///
/// The store only understands opaque serialized payloads and optional TTL
/// expiration. Everything richer (lists, maps, counters, TTL-preserving
/// mutation) is emulated on top of these four primitives by
/// [`CompositeCache`](crate::cache::CompositeCache).
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Reads the raw entry under `key`, including expiration metadata.
    ///
    /// Returns `None` for absent or expired keys.
    async fn get_raw(&self, key: &str) -> Result<Option<StoreEntry>, StoreError>;

    /// Writes `value` under `key` with an optional TTL in milliseconds.
    async fn set(&self, key: &str, value: String, ttl_ms: Option<u64>) -> Result<(), StoreError>;

    /// Removes `key`. Returns whether an entry was actually removed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Checks whether `key` currently holds a live (non-expired) entry.
    async fn has(&self, key: &str) -> Result<bool, StoreError>;

    /// Reads just the payload under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get_raw(key).await?.map(|entry| entry.value))
    }
}

//! Façade Module
//!
//! `CompositeCache` owns the backing store handle, the per-key lock
//! registry, and the raw-entry helpers every sub-contract funnels through.
//!
//! Every mutating operation follows one pattern: read the raw entry,
//! decode and shape-check it, compute the new value, and write it back
//! with the TTL recomputed from the original absolute expiration. The
//! per-key lock makes that read-modify-write window exclusive inside this
//! process; across processes the guarantees are whatever the backing
//! store gives.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::cache::value::StoredValue;
use crate::cache::Shape;
use crate::error::CacheError;
use crate::store::BackingStore;

// == Composite Cache ==
/// Scalar, list and map operations emulated over a flat key-value store.
///
/// The store only persists opaque payloads with optional TTL; this type
/// supplies the richer semantics. Holds no state of its own beyond the
/// lock registry: everything it serves is read from and rewritten to the
/// backing store per call.
pub struct CompositeCache<S: BackingStore> {
    store: S,
    /// Per-key serialization points for read-modify-write windows
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<S: BackingStore> CompositeCache<S> {
    // == Constructor ==
    /// Wraps a backing store in the composite façade.
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    /// The underlying backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // == Per-Key Locking ==
    /// Acquires the exclusive lock for `key`.
    ///
    /// Held across the whole read-modify-write window of every compound
    /// operation so that concurrent mutations of one key serialize instead
    /// of losing updates.
    pub(crate) async fn lock_key(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    // == Raw Entry Helpers ==
    /// Reads and decodes the envelope under `key`.
    ///
    /// Returns the decoded value plus the remaining TTL in milliseconds
    /// computed from the entry's absolute expiration. Store faults and
    /// undecodable payloads both read as absent; shape checking is left to
    /// the callers, which know which shape they expect.
    pub(crate) async fn read_envelope(&self, key: &str) -> Option<(StoredValue, Option<u64>)> {
        let entry = match self.store.get_raw(key).await {
            Ok(entry) => entry?,
            Err(err) => {
                warn!(key, error = %err, "backing store read failed, treating key as absent");
                return None;
            }
        };

        let remaining_ttl = entry.remaining_ttl_ms();
        match serde_json::from_str::<StoredValue>(&entry.value) {
            Ok(value) => Some((value, remaining_ttl)),
            Err(err) => {
                debug!(key, error = %err, "undecodable entry treated as absent");
                None
            }
        }
    }

    /// Serializes `value` and writes it under `key` with the given TTL.
    ///
    /// Returns whether the write reached the store; failures are logged
    /// and reported as `false` so each operation can fall back to its
    /// documented result.
    pub(crate) async fn write_envelope(
        &self,
        key: &str,
        value: &StoredValue,
        ttl_ms: Option<u64>,
    ) -> bool {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(key, error = %err, "failed to serialize value");
                return false;
            }
        };

        match self.store.set(key, payload, ttl_ms).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "backing store write failed");
                false
            }
        }
    }

    /// Builds the shape-violation error for `key`.
    pub(crate) fn wrong_shape(key: &str, expected: Shape, found: Shape) -> CacheError {
        CacheError::WrongShape {
            key: key.to_string(),
            expected,
            found,
        }
    }
}

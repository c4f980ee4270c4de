//! Scalar Operations
//!
//! get/set/setnx, counters, delete/has, and the TTL accessors. Counters
//! preserve the entry's remaining TTL across rewrites, the same policy every
//! other mutation path follows.

use serde_json::Value;
use tracing::warn;

use crate::cache::value::StoredValue;
use crate::cache::{CompositeCache, SetOptions, Shape, Ttl};
use crate::error::{CacheError, Result};
use crate::store::BackingStore;

impl<S: BackingStore> CompositeCache<S> {
    // == Get ==
    /// Returns the scalar stored under `key`.
    ///
    /// Absent, expired and undecodable entries all read as `None`. A key
    /// holding a list or map is a shape violation.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        match self.read_envelope(key).await {
            None => Ok(None),
            Some((StoredValue::Scalar(value), _)) => Ok(Some(value)),
            Some((other, _)) => Err(Self::wrong_shape(key, Shape::Scalar, other.shape())),
        }
    }

    // == Set ==
    /// Writes a scalar under `key`, expiring after `options.ttl_ms` if set.
    ///
    /// Returns whether the write reached the store.
    pub async fn set(&self, key: &str, value: Value, options: SetOptions) -> bool {
        self.write_envelope(key, &StoredValue::Scalar(value), options.ttl_ms)
            .await
    }

    // == Set If Absent ==
    /// Writes `value` only when `key` holds no live entry.
    ///
    /// Returns false when the key already existed or the write failed. The
    /// check and the write are two separate store calls; the per-key lock
    /// serializes them against other façade calls in this process, but a
    /// writer going straight to the backing store can still slip between.
    pub async fn setnx(&self, key: &str, value: Value, options: SetOptions) -> bool {
        let _guard = self.lock_key(key).await;

        let exists = match self.store().has(key).await {
            Ok(exists) => exists,
            Err(err) => {
                warn!(key, error = %err, "existence check failed, treating key as absent");
                false
            }
        };
        if exists {
            return false;
        }

        self.write_envelope(key, &StoredValue::Scalar(value), options.ttl_ms)
            .await
    }

    // == Counters ==
    /// Adds `count` to the integer under `key`, starting from 0 when absent.
    ///
    /// The entry's remaining TTL is preserved across the rewrite. Returns
    /// the new value, or the previous value when the write did not reach
    /// the store.
    ///
    /// # Errors
    /// [`CacheError::NotNumeric`] when the stored scalar is not an integer,
    /// [`CacheError::WrongShape`] when the key holds a list or map.
    pub async fn increase(&self, key: &str, count: i64) -> Result<i64> {
        let _guard = self.lock_key(key).await;

        let (previous, remaining_ttl) = match self.read_envelope(key).await {
            None => (0, None),
            Some((StoredValue::Scalar(value), ttl)) => match value.as_i64() {
                Some(n) => (n, ttl),
                None => {
                    return Err(CacheError::NotNumeric {
                        key: key.to_string(),
                    })
                }
            },
            Some((other, _)) => return Err(Self::wrong_shape(key, Shape::Scalar, other.shape())),
        };

        let next = previous.saturating_add(count);
        if self
            .write_envelope(key, &StoredValue::Scalar(next.into()), remaining_ttl)
            .await
        {
            Ok(next)
        } else {
            Ok(previous)
        }
    }

    /// Subtracts `count` from the integer under `key`. See [`Self::increase`].
    pub async fn decrease(&self, key: &str, count: i64) -> Result<i64> {
        self.increase(key, count.saturating_neg()).await
    }

    // == Delete / Has ==
    /// Removes `key`. Store faults report false.
    pub async fn delete(&self, key: &str) -> bool {
        match self.store().delete(key).await {
            Ok(removed) => removed,
            Err(err) => {
                warn!(key, error = %err, "delete failed");
                false
            }
        }
    }

    /// Whether `key` holds a live entry. Store faults report false.
    pub async fn has(&self, key: &str) -> bool {
        match self.store().has(key).await {
            Ok(exists) => exists,
            Err(err) => {
                warn!(key, error = %err, "existence check failed");
                false
            }
        }
    }

    // == TTL ==
    /// Remaining lifetime of `key`.
    ///
    /// `Ttl::Unbounded` when the entry has no expiration; `Ttl::Millis(0)`
    /// when the key is absent or the read fails.
    pub async fn ttl(&self, key: &str) -> Ttl {
        match self.store().get_raw(key).await {
            Ok(Some(entry)) => match entry.remaining_ttl_ms() {
                Some(ms) => Ttl::Millis(ms),
                None => Ttl::Unbounded,
            },
            Ok(None) => Ttl::Millis(0),
            Err(err) => {
                warn!(key, error = %err, "ttl read failed");
                Ttl::Millis(0)
            }
        }
    }

    // == Expire ==
    /// Rewrites `key` with a fresh TTL of `ttl_ms` milliseconds.
    ///
    /// Works on any shape since the payload is rewritten untouched. Returns
    /// false when the key is absent or the store fails.
    pub async fn expire(&self, key: &str, ttl_ms: u64) -> bool {
        let _guard = self.lock_key(key).await;

        let entry = match self.store().get_raw(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return false,
            Err(err) => {
                warn!(key, error = %err, "expire read failed");
                return false;
            }
        };

        match self.store().set(key, entry.value, Some(ttl_ms)).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "expire write failed");
                false
            }
        }
    }
}

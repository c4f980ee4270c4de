//! Map Emulation
//!
//! String-keyed field mappings stored whole under one key. Field order is
//! insertion order (serde_json's preserve_order feature), which makes
//! `map_keys` deterministic.

use rand::seq::SliceRandom;
use serde_json::{Map, Value};

use crate::cache::value::StoredValue;
use crate::cache::{CompositeCache, SetOptions, Shape};
use crate::error::{CacheError, Result};
use crate::store::BackingStore;

impl<S: BackingStore> CompositeCache<S> {
    // == Map Helpers ==
    /// Decodes the mapping under `map`; absent keys read as empty.
    async fn read_map(&self, map: &str) -> Result<(Map<String, Value>, Option<u64>)> {
        match self.read_envelope(map).await {
            None => Ok((Map::new(), None)),
            Some((StoredValue::Map(fields), ttl)) => Ok((fields, ttl)),
            Some((other, _)) => Err(Self::wrong_shape(map, Shape::Map, other.shape())),
        }
    }

    // == Get ==
    /// Returns the value under `key` in the mapping `map`, or `None`.
    pub async fn map_get(&self, map: &str, key: &str) -> Result<Option<Value>> {
        let (fields, _) = self.read_map(map).await?;
        Ok(fields.get(key).cloned())
    }

    // == Set ==
    /// Sets `key` to `value` inside the mapping `map`.
    ///
    /// An explicit `options.ttl_ms` rewrites the expiration; otherwise the
    /// entry's remaining TTL is preserved. Returns whether the write
    /// reached the store.
    pub async fn map_set(
        &self,
        map: &str,
        key: &str,
        value: Value,
        options: SetOptions,
    ) -> Result<bool> {
        let _guard = self.lock_key(map).await;

        let (mut fields, remaining_ttl) = self.read_map(map).await?;
        fields.insert(key.to_string(), value);

        let ttl = options.ttl_ms.or(remaining_ttl);
        Ok(self.write_envelope(map, &StoredValue::Map(fields), ttl).await)
    }

    // == Delete ==
    /// Removes `key` from the mapping `map`, preserving TTL.
    ///
    /// Returns false when the mapping itself does not exist, so callers can
    /// tell a no-op from a successful removal.
    pub async fn map_delete(&self, map: &str, key: &str) -> Result<bool> {
        let _guard = self.lock_key(map).await;

        let (mut fields, remaining_ttl) = match self.read_envelope(map).await {
            None => return Ok(false),
            Some((StoredValue::Map(fields), ttl)) => (fields, ttl),
            Some((other, _)) => return Err(Self::wrong_shape(map, Shape::Map, other.shape())),
        };
        fields.remove(key);
        Ok(self
            .write_envelope(map, &StoredValue::Map(fields), remaining_ttl)
            .await)
    }

    // == Counters ==
    /// Adds `count` to the integer field `key` of `map`, starting from 0
    /// when the field or the mapping is absent.
    ///
    /// TTL is preserved. Returns the new value, or the previous value when
    /// the write did not reach the store.
    pub async fn map_increase(&self, map: &str, key: &str, count: i64) -> Result<i64> {
        let _guard = self.lock_key(map).await;

        let (mut fields, remaining_ttl) = self.read_map(map).await?;
        let previous = match fields.get(key) {
            None => 0,
            Some(value) => value.as_i64().ok_or_else(|| CacheError::NotNumeric {
                key: format!("{map}.{key}"),
            })?,
        };

        let next = previous.saturating_add(count);
        fields.insert(key.to_string(), next.into());

        if self
            .write_envelope(map, &StoredValue::Map(fields), remaining_ttl)
            .await
        {
            Ok(next)
        } else {
            Ok(previous)
        }
    }

    /// Subtracts `count` from the integer field `key` of `map`. See
    /// [`Self::map_increase`].
    pub async fn map_decrease(&self, map: &str, key: &str, count: i64) -> Result<i64> {
        self.map_increase(map, key, count.saturating_neg()).await
    }

    // == Keys ==
    /// Field names of `map` in insertion order, empty when absent.
    pub async fn map_keys(&self, map: &str) -> Result<Vec<String>> {
        let (fields, _) = self.read_map(map).await?;
        Ok(fields.keys().cloned().collect())
    }

    /// One uniformly chosen field name, or `None` when the mapping is empty.
    pub async fn map_random_key(&self, map: &str) -> Result<Option<String>> {
        let keys = self.map_keys(map).await?;
        Ok(keys.choose(&mut rand::thread_rng()).cloned())
    }

    // == Length ==
    /// Number of fields in `map`, 0 when absent.
    pub async fn map_len(&self, map: &str) -> Result<usize> {
        let (fields, _) = self.read_map(map).await?;
        Ok(fields.len())
    }
}

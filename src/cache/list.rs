//! List Emulation
//!
//! Ordered sequences stored whole under one key. Ranged reads use inclusive
//! Python-style indexing; pops are destructive splices over the same
//! normalized index arithmetic.

use serde_json::Value;

use crate::cache::value::StoredValue;
use crate::cache::{CompositeCache, Shape};
use crate::error::Result;
use crate::store::BackingStore;

// == Index Normalization ==
/// Normalizes an inclusive `[start, end]` range over a sequence of `len`
/// elements into half-open slice bounds.
///
/// Negative indices count from the tail; out-of-range indices wrap via the
/// Euclidean remainder. `None` when the sequence is empty (which would
/// otherwise divide by zero) or when the normalized bounds cross.
pub(crate) fn normalize_slice(len: usize, start: i64, end: i64) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let l = len as i64;
    // start.rem_euclid(l) == (l + start) mod l without the overflow risk.
    let start = start.rem_euclid(l) as usize;
    let end = end.rem_euclid(l) as usize + 1;
    if start >= end {
        None
    } else {
        Some((start, end))
    }
}

/// Normalizes an inclusive `[start, end]` range into splice bounds: the
/// second component of the result is the exclusive end of the removal,
/// where `(len + end) mod len + 1` elements are removed starting at the
/// normalized start (capped at the sequence end).
pub(crate) fn normalize_splice(len: usize, start: i64, end: i64) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let l = len as i64;
    let start = start.rem_euclid(l) as usize;
    let delete_count = end.rem_euclid(l) as usize + 1;
    Some((start, (start + delete_count).min(len)))
}

impl<S: BackingStore> CompositeCache<S> {
    // == List Helpers ==
    /// Decodes the sequence under `key`; absent keys read as empty.
    async fn read_list(&self, key: &str) -> Result<(Vec<Value>, Option<u64>)> {
        match self.read_envelope(key).await {
            None => Ok((Vec::new(), None)),
            Some((StoredValue::List(items), ttl)) => Ok((items, ttl)),
            Some((other, _)) => Err(Self::wrong_shape(key, Shape::List, other.shape())),
        }
    }

    // == Push ==
    /// Appends `values` at the tail, preserving the entry's remaining TTL.
    ///
    /// Returns the new length, or the prior length when the write did not
    /// reach the store.
    pub async fn push_back(&self, key: &str, values: Vec<Value>) -> Result<usize> {
        let _guard = self.lock_key(key).await;

        let (mut items, remaining_ttl) = self.read_list(key).await?;
        let previous_len = items.len();
        items.extend(values);
        let new_len = items.len();

        if self
            .write_envelope(key, &StoredValue::List(items), remaining_ttl)
            .await
        {
            Ok(new_len)
        } else {
            Ok(previous_len)
        }
    }

    /// Prepends `values` at the head, in the order given. See
    /// [`Self::push_back`].
    pub async fn push_front(&self, key: &str, values: Vec<Value>) -> Result<usize> {
        let _guard = self.lock_key(key).await;

        let (items, remaining_ttl) = self.read_list(key).await?;
        let previous_len = items.len();
        let mut combined = values;
        combined.extend(items);
        let new_len = combined.len();

        if self
            .write_envelope(key, &StoredValue::List(combined), remaining_ttl)
            .await
        {
            Ok(new_len)
        } else {
            Ok(previous_len)
        }
    }

    // == Length ==
    /// Length of the sequence under `key`, 0 when absent.
    pub async fn len(&self, key: &str) -> Result<usize> {
        let (items, _) = self.read_list(key).await?;
        Ok(items.len())
    }

    // == Ranged Read ==
    /// Elements in the inclusive range `[start, end]`, negative indices
    /// counting from the tail. Empty and absent lists yield an empty result.
    pub async fn list(&self, key: &str, start: i64, end: i64) -> Result<Vec<Value>> {
        let (items, _) = self.read_list(key).await?;
        Ok(match normalize_slice(items.len(), start, end) {
            Some((s, e)) => items[s..e].to_vec(),
            None => Vec::new(),
        })
    }

    // == Trim ==
    /// Removes the addressed sub-sequence and rewrites the remainder with
    /// the entry's remaining TTL. Returns the removed elements in their
    /// original order; nothing is removed when the write fails.
    async fn trim(&self, key: &str, start: i64, end: i64) -> Result<Vec<Value>> {
        let _guard = self.lock_key(key).await;

        let (mut items, remaining_ttl) = self.read_list(key).await?;
        let Some((s, e)) = normalize_splice(items.len(), start, end) else {
            return Ok(Vec::new());
        };
        let removed: Vec<Value> = items.drain(s..e).collect();

        if self
            .write_envelope(key, &StoredValue::List(items), remaining_ttl)
            .await
        {
            Ok(removed)
        } else {
            Ok(Vec::new())
        }
    }

    // == Pop ==
    /// Removes and returns the first `count` elements in original order.
    pub async fn pop_front(&self, key: &str, count: usize) -> Result<Vec<Value>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.trim(key, 0, count as i64 - 1).await
    }

    /// Removes and returns the last `count` elements in original order.
    pub async fn pop_back(&self, key: &str, count: usize) -> Result<Vec<Value>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.trim(key, -(count as i64), count as i64 - 1).await
    }
}

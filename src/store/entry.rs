//! Store Entry Module
//!
//! The unit the backing store persists under one key: an opaque serialized
//! payload plus an optional absolute expiration instant.

use std::time::{SystemTime, UNIX_EPOCH};

// == Store Entry ==
/// A single persisted entry: serialized payload and expiration metadata.
///
/// The payload is opaque to the store. TTL is carried as an absolute
/// Unix-millisecond instant so that every read can recompute the remaining
/// duration and hand it forward on rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    /// The serialized payload
    pub value: String,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry with an optional TTL in milliseconds from now.
    pub fn new(value: String, ttl_ms: Option<u64>) -> Self {
        let expires_at = ttl_ms.map(|ttl| current_timestamp_ms() + ttl);
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal
    /// to the expiration instant. Entries without expiration never expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired
    /// - `Some(remaining_ms)` if the entry has a TTL that hasn't elapsed
    /// - `None` if the entry never expires
    pub fn remaining_ttl_ms(&self) -> Option<u64> {
        self.expires_at.map(|expires| {
            let now = current_timestamp_ms();
            expires.saturating_sub(now)
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

//! Cache Module
//!
//! The composite façade: scalar, list and map sub-contracts emulated on top
//! of a flat key-value backing store.

mod facade;
mod list;
mod map;
mod scalar;
mod value;


// Re-export public types
pub use facade::CompositeCache;
pub use value::Shape;

// == Set Options ==
/// Options accepted by the writing operations (`set`, `setnx`, `map_set`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Entry expires this many milliseconds after the write; None means the
    /// operation's default TTL policy applies (no expiration for fresh
    /// scalars, preserved TTL for map mutations).
    pub ttl_ms: Option<u64>,
}

impl SetOptions {
    /// No explicit TTL.
    pub const NONE: SetOptions = SetOptions { ttl_ms: None };

    /// Expire `ms` milliseconds after the write.
    pub fn ttl(ms: u64) -> Self {
        Self { ttl_ms: Some(ms) }
    }
}

// == Ttl ==
/// Remaining lifetime of a key as reported by [`CompositeCache::ttl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// No expiration is set.
    Unbounded,
    /// Milliseconds until expiry. Absent keys and failed reads report 0.
    Millis(u64),
}

impl Ttl {
    /// Remaining milliseconds, treating unbounded as None.
    pub fn millis(self) -> Option<u64> {
        match self {
            Ttl::Unbounded => None,
            Ttl::Millis(ms) => Some(ms),
        }
    }
}

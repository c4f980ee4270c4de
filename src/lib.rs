//! Composite Cache - scalar, list and map semantics over a flat store
//!
//! The backing store only understands opaque values and optional TTL;
//! [`CompositeCache`] emulates the richer types on top of its
//! get/set/delete/has primitives, preserving TTL across every
//! read-modify-write cycle.

pub mod cache;
pub mod config;
pub mod error;
pub mod store;

pub use cache::{CompositeCache, SetOptions, Shape, Ttl};
pub use config::StoreConfig;
pub use error::{CacheError, Result, StoreError};
pub use store::{BackingStore, MemoryStore, StoreEntry};

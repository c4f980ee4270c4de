//! Error types for the composite cache
//!
//! Two failure tiers: `CacheError` carries contract violations that the
//! façade surfaces to callers, while `StoreError` carries backing-store
//! faults that the façade swallows into per-operation fallback values.

use thiserror::Error;

use crate::cache::Shape;

// == Cache Error Enum ==
/// Contract violations surfaced by the façade.
///
/// Backing-store faults never appear here; those are converted into the
/// documented fallback value of each operation (false, absent, 0, or the
/// previous value) and logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A key was accessed through the wrong sub-contract, e.g. a list
    /// operation on a key holding a scalar.
    #[error("wrong shape for key '{key}': expected {expected}, found {found}")]
    WrongShape {
        key: String,
        expected: Shape,
        found: Shape,
    },

    /// A counter operation found a stored value that is not an integer.
    #[error("value under key '{key}' is not an integer counter")]
    NotNumeric { key: String },
}

// == Store Error Enum ==
/// Faults raised by a [`BackingStore`](crate::store::BackingStore)
/// implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store refused a write because it is at capacity.
    #[error("store at capacity: {0}")]
    CapacityExceeded(String),

    /// The store could not be reached or failed mid-operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

// == Result Type Alias ==
/// Convenience Result type for façade operations.
pub type Result<T> = std::result::Result<T, CacheError>;

//! Configuration Module
//!
//! Settings for the bundled memory store, loadable from environment
//! variables with sensible defaults.

use std::env;

/// Memory store configuration parameters.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of entries the store can hold
    pub max_entries: usize,
}

impl StoreConfig {
    /// Creates a new StoreConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum store entries (default: 1000)
    pub fn from_env() -> Self {
        Self {
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { max_entries: 1000 }
    }
}

//! Error types for twoqcache

use thiserror::Error;

/// Result type alias for twoqcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction and lookup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Cache size must be greater than 0
    #[error("invalid size: {0} (must be greater than 0)")]
    InvalidSize(usize),

    /// Ratio outside `[0.0, 1.0]`
    #[error("invalid {name} ratio: {value} (must be within 0.0..=1.0)")]
    InvalidRatio {
        /// Which ratio was rejected ("recent" or "ghost")
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Key not found
    #[error("key not found")]
    NotFound,

    /// Error from an underlying LRU store
    ///
    /// Not produced by a validated config: every store is built with a
    /// capacity of at least 1. Kept so store construction can use `?`.
    #[error(transparent)]
    Store(#[from] lrustore::Error),
}

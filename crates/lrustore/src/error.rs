//! Error types for lrustore

use thiserror::Error;

/// Result type alias for lrustore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Capacity must hold at least one entry
    #[error("invalid capacity: must be greater than 0")]
    InvalidCapacity,

    /// Key not found
    #[error("key not found")]
    NotFound,
}

//! # lrustore
//!
//! Fixed-capacity key/value store ordered by recency.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to arena slot (O(1))
//! - **Slot arena**: `Vec` of nodes with a free list, so slots are reused
//! - **LRU List**: Doubly-linked through slot indices for O(1) move-to-front and eviction
//!
//! The store is not internally synchronized. Every mutating call, `get`
//! included, takes `&mut self`; share a store between threads behind a lock.

#![warn(missing_docs)]

mod error;
mod lru;

pub use error::{Error, Result};
pub use lru::LruStore;

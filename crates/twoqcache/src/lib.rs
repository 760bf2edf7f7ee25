//! # twoqcache
//!
//! Thread-safe 2Q cache built from three bounded LRU stores.
//!
//! ## Architecture
//! - **recent**: keys seen once; new keys land here
//! - **frequent**: keys touched a second time, or returning from the ghost list
//! - **recent_evict**: ghost keys evicted from `recent`, kept without values
//! - **Locking**: one `RwLock` around all three segments; `get` is a writer
//!
//! ```
//! use twoqcache::{Error, TwoQueueCache};
//!
//! let cache = TwoQueueCache::new(2, 0.0, 0.0).unwrap();
//! cache.put(2, 4);
//! assert_eq!(cache.get(&2), Ok(4));
//! assert_eq!(cache.get(&4), Err(Error::NotFound));
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod stats;
mod two_queue;

pub use cache::TwoQueueCache;
pub use config::{TwoQueueConfig, DEFAULT_GHOST_RATIO, DEFAULT_RECENT_RATIO};
pub use error::{Error, Result};
pub use stats::{CacheStats, StatsSnapshot};

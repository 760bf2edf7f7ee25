//! TwoQueueCache: thread-safe handle around the 2Q engine

use std::hash::Hash;

use parking_lot::RwLock;
use tracing::debug;

use crate::config::{TwoQueueConfig, DEFAULT_GHOST_RATIO, DEFAULT_RECENT_RATIO};
use crate::error::{Error, Result};
use crate::stats::CacheStats;
use crate::two_queue::{Access, Placement, TwoQueueCore};

/// Thread-safe 2Q cache
///
/// One lock guards all three segments. `get` takes it exclusively because a
/// hit in the recent segment moves the entry to the frequent one; only
/// `contains`, `peek`, `len` and `keys` share it.
pub struct TwoQueueCache<K, V> {
    /// Recent, frequent and ghost segments
    inner: RwLock<TwoQueueCore<K, V>>,

    /// Cache statistics
    stats: CacheStats,
}

impl<K, V> TwoQueueCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a cache, substituting the default for any ratio of exactly 0.0
    ///
    /// # Arguments
    /// * `size` - Shared budget for recent and frequent entries
    /// * `recent_ratio` - Target share of `size` for once-seen entries (0.0 = 0.20)
    /// * `ghost_ratio` - Ghost list capacity as a share of `size` (0.0 = 0.80)
    pub fn new(size: usize, recent_ratio: f64, ghost_ratio: f64) -> Result<Self> {
        let recent_ratio = if recent_ratio == 0.0 {
            DEFAULT_RECENT_RATIO
        } else {
            recent_ratio
        };
        let ghost_ratio = if ghost_ratio == 0.0 {
            DEFAULT_GHOST_RATIO
        } else {
            ghost_ratio
        };
        Self::with_params(size, recent_ratio, ghost_ratio)
    }

    /// Create a cache using the ratios exactly as given
    pub fn with_params(size: usize, recent_ratio: f64, ghost_ratio: f64) -> Result<Self> {
        let config = TwoQueueConfig::new(size)
            .with_recent_ratio(recent_ratio)
            .with_ghost_ratio(ghost_ratio);
        Self::from_config(&config)
    }

    /// Create a cache from a validated configuration
    pub fn from_config(config: &TwoQueueConfig) -> Result<Self> {
        let core = TwoQueueCore::new(config)?;
        debug!(
            size = core.size(),
            recent_size = core.recent_size(),
            ghost_size = core.ghost_size(),
            "created 2Q cache"
        );

        Ok(Self {
            inner: RwLock::new(core),
            stats: CacheStats::new(),
        })
    }

    /// Look up a value, promoting a once-seen key to the frequent segment
    ///
    /// # Returns
    /// * `Err(Error::NotFound)` - if the key is absent or only a ghost
    pub fn get(&self, key: &K) -> Result<V> {
        let mut inner = self.inner.write();
        match inner.get(key) {
            Some((value, access)) => {
                self.stats.record_hit();
                if access == Access::Promoted {
                    self.stats.record_promotion();
                }
                Ok(value.clone())
            }
            None => {
                self.stats.record_miss();
                Err(Error::NotFound)
            }
        }
    }

    /// Insert or update a value
    ///
    /// New keys enter the recent segment; a second touch or a key returning
    /// from the ghost list goes to the frequent segment.
    pub fn put(&self, key: K, value: V) {
        let mut inner = self.inner.write();
        let outcome = inner.put(key, value);

        match outcome.placement {
            Placement::Updated => {}
            Placement::Promoted => self.stats.record_promotion(),
            Placement::GhostHit => self.stats.record_ghost_hit(),
            Placement::Inserted => self.stats.record_insert(),
        }
        if outcome.evicted.is_some() {
            self.stats.record_eviction();
        }
    }

    /// Check for a live key without touching recency
    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    /// Read a value without touching recency or promoting it
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.read().peek(key).cloned()
    }

    /// Remove a key from whichever segment holds it, ghost list included
    ///
    /// # Returns
    /// * `true` - if the key was found in any segment
    pub fn remove(&self, key: &K) -> bool {
        self.inner.write().remove(key)
    }

    /// Number of live entries (ghosts excluded)
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the cache holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live keys, frequent segment first, each segment oldest to newest
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().keys()
    }

    /// Clear all three segments (statistics are kept)
    pub fn purge(&self) {
        self.inner.write().purge();
        debug!("purged 2Q cache");
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Shared budget for recent and frequent entries
    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    /// Target number of once-seen entries
    pub fn recent_size(&self) -> usize {
        self.inner.read().recent_size()
    }

    /// Ghost list capacity
    pub fn ghost_size(&self) -> usize {
        self.inner.read().ghost_size()
    }
}

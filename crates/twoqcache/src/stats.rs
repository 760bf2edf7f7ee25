//! Cache statistics tracking

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for cache behaviour
///
/// Relaxed atomics, updated while the cache lock is held and read without
/// it, so a snapshot taken during concurrent traffic may mix operations.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    promotions: AtomicU64,
    ghost_hits: AtomicU64,
    evictions: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Lookups that found a value
    pub hits: u64,
    /// Lookups that returned `NotFound`
    pub misses: u64,
    /// New keys admitted to the recent segment
    pub inserts: u64,
    /// Moves from recent to frequent on a second touch
    pub promotions: u64,
    /// Returning keys recognised from the ghost list
    pub ghost_hits: u64,
    /// Entries dropped to stay within the size budget
    pub evictions: u64,
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_promotion(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ghost_hit(&self) {
        self.ghost_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get total misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get total evictions
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Copy every counter
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            inserts: self.inserts.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            ghost_hits: self.ghost_hits.load(Ordering::Relaxed),
            evictions: self.evictions(),
        }
    }

    /// Reset all statistics
    pub fn reset(&self) {
        for counter in [
            &self.hits,
            &self.misses,
            &self.inserts,
            &self.promotions,
            &self.ghost_hits,
            &self.evictions,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_hit_ratio() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_ratio(), 0.0);

        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        assert_eq!(stats.hits(), 2);
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.hit_ratio(), 2.0 / 3.0);
    }

    #[test]
    fn test_stats_snapshot_and_reset() {
        let stats = CacheStats::new();

        stats.record_insert();
        stats.record_promotion();
        stats.record_ghost_hit();
        stats.record_eviction();
        stats.record_eviction();

        let snap = stats.snapshot();
        assert_eq!(snap.inserts, 1);
        assert_eq!(snap.promotions, 1);
        assert_eq!(snap.ghost_hits, 1);
        assert_eq!(snap.evictions, 2);

        stats.reset();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }
}

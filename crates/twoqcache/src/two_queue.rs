//! 2Q policy engine
//!
//! Three bounded LRU stores:
//! - `recent`: keys seen once, capped in practice by `recent_size`
//! - `frequent`: keys touched at least twice
//! - `recent_evict`: ghost keys (no values) recently dropped from `recent`
//!
//! A key lives in at most one store, and `recent.len() + frequent.len()`
//! never exceeds `size`. Not synchronized; [`TwoQueueCache`](crate::TwoQueueCache)
//! wraps it in a lock.

use std::hash::Hash;

use lrustore::LruStore;
use tracing::trace;

use crate::config::TwoQueueConfig;
use crate::error::Result;

/// Internal segment of the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment {
    Recent,
    Frequent,
    #[cfg_attr(not(test), allow(dead_code))]
    Ghost,
}

/// Where a successful lookup was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    /// Already in `frequent`
    Frequent,
    /// Found in `recent` and moved to `frequent`
    Promoted,
}

/// What `put` did with the key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    /// Value replaced in `frequent`
    Updated,
    /// Second touch moved the key from `recent` to `frequent`
    Promoted,
    /// Key returned from the ghost list straight into `frequent`
    GhostHit,
    /// New key admitted to `recent`
    Inserted,
}

/// Result of a `put`: the placement plus the segment that lost an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PutOutcome {
    pub(crate) placement: Placement,
    pub(crate) evicted: Option<Segment>,
}

pub(crate) struct TwoQueueCore<K, V> {
    size: usize,
    recent_size: usize,

    recent: LruStore<K, V>,
    frequent: LruStore<K, V>,
    recent_evict: LruStore<K, ()>,
}

impl<K, V> TwoQueueCore<K, V>
where
    K: Hash + Eq + Clone,
{
    pub(crate) fn new(config: &TwoQueueConfig) -> Result<Self> {
        config.validate()?;

        // `recent` may exceed its target while `frequent` is small, so it
        // gets the full budget; the ghost list needs at least one slot.
        Ok(Self {
            size: config.size,
            recent_size: config.recent_size(),
            recent: LruStore::new(config.size)?,
            frequent: LruStore::new(config.size)?,
            recent_evict: LruStore::new(config.ghost_size().max(1))?,
        })
    }

    pub(crate) fn get(&mut self, key: &K) -> Option<(&V, Access)> {
        if self.frequent.contains(key) {
            return self.frequent.get(key).ok().map(|v| (v, Access::Frequent));
        }

        if self.recent.contains(key) {
            let value = self.recent.remove(key)?;
            let evicted = self.frequent.put(key.clone(), value);
            debug_assert!(evicted.is_none());
            trace!("promoted entry from recent to frequent on get");
            return self.frequent.peek(key).map(|v| (v, Access::Promoted));
        }

        None
    }

    pub(crate) fn put(&mut self, key: K, value: V) -> PutOutcome {
        if self.frequent.contains(&key) {
            self.frequent.put(key, value);
            return PutOutcome {
                placement: Placement::Updated,
                evicted: None,
            };
        }

        if self.recent.contains(&key) {
            self.recent.remove(&key);
            self.frequent.put(key, value);
            trace!("promoted entry from recent to frequent on put");
            return PutOutcome {
                placement: Placement::Promoted,
                evicted: None,
            };
        }

        if self.recent_evict.remove(&key).is_some() {
            let evicted = self.ensure_space(true);
            self.frequent.put(key, value);
            trace!("ghost hit, admitted entry to frequent");
            return PutOutcome {
                placement: Placement::GhostHit,
                evicted,
            };
        }

        let evicted = self.ensure_space(false);
        self.recent.put(key, value);
        PutOutcome {
            placement: Placement::Inserted,
            evicted,
        }
    }

    /// Free one slot of the shared budget if it is full
    ///
    /// Evicts from `recent` while it is over target (or at target for an
    /// ordinary insert), otherwise from `frequent`. Keys leaving `recent`
    /// are remembered in the ghost list.
    fn ensure_space(&mut self, ghost_hit: bool) -> Option<Segment> {
        let recent_len = self.recent.len();
        let frequent_len = self.frequent.len();
        if recent_len + frequent_len < self.size {
            return None;
        }

        let from_recent = recent_len > 0
            && (recent_len > self.recent_size
                || (recent_len == self.recent_size && !ghost_hit)
                || frequent_len == 0);

        if from_recent {
            let (key, _) = self.recent.remove_oldest()?;
            self.recent_evict.put(key, ());
            trace!(recent_len, frequent_len, "evicted oldest recent entry to ghost list");
            return Some(Segment::Recent);
        }

        self.frequent.remove_oldest()?;
        trace!(recent_len, frequent_len, "evicted oldest frequent entry");
        Some(Segment::Frequent)
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.frequent.contains(key) || self.recent.contains(key)
    }

    pub(crate) fn peek(&self, key: &K) -> Option<&V> {
        self.frequent.peek(key).or_else(|| self.recent.peek(key))
    }

    pub(crate) fn remove(&mut self, key: &K) -> bool {
        self.frequent.remove(key).is_some()
            || self.recent.remove(key).is_some()
            || self.recent_evict.remove(key).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.recent.len() + self.frequent.len()
    }

    /// Frequent keys first, each segment oldest to newest
    pub(crate) fn keys(&self) -> Vec<K> {
        let mut keys = self.frequent.keys();
        keys.extend(self.recent.keys());
        keys
    }

    pub(crate) fn purge(&mut self) {
        self.recent.purge();
        self.frequent.purge();
        self.recent_evict.purge();
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn recent_size(&self) -> usize {
        self.recent_size
    }

    pub(crate) fn ghost_size(&self) -> usize {
        self.recent_evict.capacity()
    }

    /// Every segment currently holding `key`
    #[cfg(test)]
    pub(crate) fn segments_of(&self, key: &K) -> Vec<Segment> {
        let mut found = Vec::new();
        if self.recent.contains(key) {
            found.push(Segment::Recent);
        }
        if self.frequent.contains(key) {
            found.push(Segment::Frequent);
        }
        if self.recent_evict.contains(key) {
            found.push(Segment::Ghost);
        }
        found
    }

    #[cfg(test)]
    pub(crate) fn ghost_len(&self) -> usize {
        self.recent_evict.len()
    }
}

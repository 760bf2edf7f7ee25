//! Bounded LRU store
//!
//! Recency list is threaded through arena slot indices instead of pointers.
//! `head` is the most recently used entry, `tail` the least.

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

use crate::error::{Error, Result};

/// Upper bound on slots reserved up front; larger stores grow on demand
const PREALLOC_LIMIT: usize = 1024;

/// Node in the LRU doubly-linked list
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Recency-ordered store with fixed capacity
///
/// Not thread-safe on its own: callers that share a store must serialize
/// every access, reads through [`LruStore::get`] included, since a hit
/// reorders the list.
pub struct LruStore<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    capacity: usize,
}

impl<K, V> LruStore<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new store holding at most `capacity` entries
    ///
    /// # Returns
    /// * `Err(Error::InvalidCapacity)` - if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }

        let reserve = capacity.min(PREALLOC_LIMIT);
        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            nodes: Vec::with_capacity(reserve),
            head: None,
            tail: None,
            free_list: Vec::new(),
            capacity,
        })
    }

    /// Get a value and mark it most recently used
    pub fn get(&mut self, key: &K) -> Result<&V> {
        let idx = *self.map.get(key).ok_or(Error::NotFound)?;
        self.move_to_front(idx);
        self.nodes[idx]
            .as_ref()
            .map(|node| &node.value)
            .ok_or(Error::NotFound)
    }

    /// Insert or update a key-value pair
    ///
    /// An existing key keeps its slot, takes the new value and moves to the
    /// front. A new key arriving at capacity first evicts the least recently
    /// used entry, which is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some(node) = &mut self.nodes[idx] {
                node.value = value;
            }
            self.move_to_front(idx);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.remove_oldest()
        } else {
            None
        };

        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.push_front(idx);
        self.map.insert(key, idx);

        evicted
    }

    /// Read a value without touching recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Check membership without touching recency
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Remove a key, returning its value if it was present
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        self.free_node(idx);
        self.nodes[idx].take().map(|node| node.value)
    }

    /// Evict the least recently used entry, if any
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        self.unlink(idx);
        self.free_node(idx);
        let node = self.nodes[idx].take()?;
        self.map.remove(&node.key);
        Some((node.key, node.value))
    }

    /// Snapshot of the keys, oldest to newest
    pub fn keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.map.len());
        let mut cursor = self.tail;
        while let Some(idx) = cursor {
            match &self.nodes[idx] {
                Some(node) => {
                    keys.push(node.key.clone());
                    cursor = node.prev;
                }
                None => break,
            }
        }
        keys
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry
    pub fn purge(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }

        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.nodes[idx] {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.free_list.push(idx);
    }

    /// Walk the list both ways and check it agrees with the index
    #[cfg(test)]
    fn assert_consistent(&self) {
        let forward: Vec<usize> = {
            let mut out = Vec::new();
            let mut cursor = self.head;
            while let Some(idx) = cursor {
                out.push(idx);
                cursor = self.nodes[idx].as_ref().and_then(|n| n.next);
            }
            out
        };
        let mut backward: Vec<usize> = {
            let mut out = Vec::new();
            let mut cursor = self.tail;
            while let Some(idx) = cursor {
                out.push(idx);
                cursor = self.nodes[idx].as_ref().and_then(|n| n.prev);
            }
            out
        };
        backward.reverse();

        assert_eq!(forward, backward);
        assert_eq!(forward.len(), self.map.len());
        assert!(self.map.len() <= self.capacity);
        for (key, &idx) in &self.map {
            let node = self.nodes[idx].as_ref().expect("indexed slot is empty");
            assert!(node.key == *key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[test]
    fn test_lru_zero_capacity() {
        assert_eq!(
            LruStore::<u32, u32>::new(0).err(),
            Some(Error::InvalidCapacity)
        );
    }

    #[test]
    fn test_lru_huge_capacity_allocates_lazily() {
        let mut store = LruStore::new(usize::MAX).unwrap();
        assert_eq!(store.capacity(), usize::MAX);
        assert!(store.nodes.capacity() <= PREALLOC_LIMIT);

        store.put(1u64, 1u64);
        assert_eq!(store.get(&1), Ok(&1));
        store.assert_consistent();
    }

    #[test]
    fn test_lru_basic() {
        let mut store = LruStore::new(2).unwrap();

        store.put(1, "a");
        store.put(2, "b");

        assert_eq!(store.get(&1), Ok(&"a"));
        assert_eq!(store.get(&2), Ok(&"b"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.capacity(), 2);
    }

    #[test]
    fn test_lru_eviction() {
        let mut store = LruStore::new(2).unwrap();

        store.put(1, "a");
        store.put(2, "b");
        let evicted = store.put(3, "c");

        assert_eq!(evicted, Some((1, "a")));
        assert_eq!(store.get(&1), Err(Error::NotFound));
        assert_eq!(store.get(&2), Ok(&"b"));
        assert_eq!(store.get(&3), Ok(&"c"));
        store.assert_consistent();
    }

    #[test]
    fn test_lru_mixed_keys() {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        enum Key {
            Int(i64),
            Str(&'static str),
        }

        let mut store = LruStore::new(2).unwrap();
        store.put(Key::Int(10), 20);
        store.put(Key::Int(30), 40);
        store.put(Key::Str("50"), 20);

        assert_eq!(store.keys(), vec![Key::Int(30), Key::Str("50")]);
        assert_eq!(store.get(&Key::Int(10)), Err(Error::NotFound));
    }

    #[test]
    fn test_lru_update() {
        let mut store = LruStore::new(2).unwrap();

        store.put(1, "a");
        store.put(2, "b");
        store.get(&1).unwrap();
        store.put(3, "c"); // evicts 2, 1 was refreshed

        assert_eq!(store.get(&1), Ok(&"a"));
        assert_eq!(store.get(&2), Err(Error::NotFound));
        assert_eq!(store.get(&3), Ok(&"c"));
    }

    #[test]
    fn test_lru_overwrite() {
        let mut store = LruStore::new(2).unwrap();

        store.put(1, "a");
        store.put(2, "b");
        assert_eq!(store.put(1, "z"), None);

        assert_eq!(store.keys(), vec![2, 1]);
        assert_eq!(store.peek(&1), Some(&"z"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_lru_peek_and_contains_keep_order() {
        let mut store = LruStore::new(3).unwrap();

        store.put(1, 10);
        store.put(2, 20);
        store.put(3, 30);

        assert_eq!(store.peek(&1), Some(&10));
        assert!(store.contains(&1));
        assert!(!store.contains(&4));
        assert_eq!(store.peek(&4), None);
        assert_eq!(store.keys(), vec![1, 2, 3]);

        store.put(4, 40);
        assert!(!store.contains(&1));
    }

    #[test]
    fn test_lru_remove() {
        let mut store = LruStore::new(3).unwrap();

        store.put(1, "a");
        store.put(2, "b");
        store.put(3, "c");

        assert_eq!(store.remove(&2), Some("b"));
        assert_eq!(store.remove(&2), None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.keys(), vec![1, 3]);
        store.assert_consistent();

        // Freed slot is reused
        store.put(4, "d");
        assert_eq!(store.nodes.len(), 3);
        assert_eq!(store.keys(), vec![1, 3, 4]);
        store.assert_consistent();
    }

    #[test]
    fn test_lru_remove_oldest() {
        let mut store = LruStore::new(3).unwrap();
        assert_eq!(store.remove_oldest(), None);

        store.put(1, "a");
        store.put(2, "b");
        store.get(&1).unwrap();

        assert_eq!(store.remove_oldest(), Some((2, "b")));
        assert_eq!(store.remove_oldest(), Some((1, "a")));
        assert_eq!(store.remove_oldest(), None);
        assert!(store.is_empty());
        store.assert_consistent();
    }

    #[test]
    fn test_lru_capacity_one() {
        let mut store = LruStore::new(1).unwrap();

        store.put(1, "a");
        assert_eq!(store.put(2, "b"), Some((1, "a")));
        assert_eq!(store.keys(), vec![2]);
        store.assert_consistent();
    }

    #[test]
    fn test_lru_purge() {
        let mut store = LruStore::new(3).unwrap();

        store.put(1, "a");
        store.put(2, "b");
        store.purge();

        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert!(store.keys().is_empty());
        assert_eq!(store.get(&1), Err(Error::NotFound));

        store.put(3, "c");
        assert_eq!(store.keys(), vec![3]);
        store.assert_consistent();
    }

    #[derive(Debug, Clone)]
    enum Op {
        Put(u8, u32),
        Get(u8),
        Remove(u8),
        RemoveOldest,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..16, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
            (0u8..16).prop_map(Op::Get),
            (0u8..16).prop_map(Op::Remove),
            Just(Op::RemoveOldest),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_recency_model(
            capacity in 1usize..8,
            ops in prop::collection::vec(op_strategy(), 0..200)
        ) {
            let mut store = LruStore::new(capacity).unwrap();
            // oldest at the front
            let mut model: VecDeque<(u8, u32)> = VecDeque::new();

            for op in ops {
                match op {
                    Op::Put(k, v) => {
                        if let Some(pos) = model.iter().position(|(mk, _)| *mk == k) {
                            model.remove(pos);
                        } else if model.len() == capacity {
                            model.pop_front();
                        }
                        model.push_back((k, v));
                        store.put(k, v);
                    }
                    Op::Get(k) => {
                        let pos = model.iter().position(|(mk, _)| *mk == k);
                        let expected = pos.map(|pos| {
                            let entry = model.remove(pos).unwrap();
                            model.push_back(entry);
                            entry.1
                        });
                        prop_assert_eq!(store.get(&k).ok().copied(), expected);
                    }
                    Op::Remove(k) => {
                        let pos = model.iter().position(|(mk, _)| *mk == k);
                        let expected = pos.and_then(|pos| model.remove(pos)).map(|(_, v)| v);
                        prop_assert_eq!(store.remove(&k), expected);
                    }
                    Op::RemoveOldest => {
                        prop_assert_eq!(store.remove_oldest(), model.pop_front());
                    }
                }

                store.assert_consistent();
                let model_keys: Vec<u8> = model.iter().map(|(k, _)| *k).collect();
                prop_assert_eq!(store.keys(), model_keys);
            }
        }
    }
}

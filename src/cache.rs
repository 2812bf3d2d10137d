//! Operation memoization.
//!
//! [`OpCache`] backs the engine's computed table. It is exact — a map, not a
//! lossy fixed-size cache — because the memoized values feed canonical
//! construction and a collision returning the wrong handle would corrupt
//! results, not just slow them down.
//!
//! Hit/miss counters sit behind [`Cell`] so lookups work through a shared
//! reference; the manager keeps the cache inside a `RefCell` and only takes
//! the mutable borrow to insert.

use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;

pub struct OpCache<K, V> {
    map: HashMap<K, V>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<K, V> Default for OpCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OpCache<K, V> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    /// Number of lookups that fell through to computation.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    /// Drop all memoized entries. Counters keep running.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, V> OpCache<K, V>
where
    K: Eq + Hash,
    V: Copy,
{
    pub fn get(&self, key: &K) -> Option<V> {
        match self.map.get(key) {
            Some(&value) => {
                self.hits.set(self.hits.get() + 1);
                Some(value)
            }
            None => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.map.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_insert() {
        let mut cache = OpCache::<(u32, u32), i32>::new();

        cache.insert((1, 2), 42);
        cache.insert((3, 4), 99);

        assert_eq!(cache.get(&(1, 2)), Some(42));
        assert_eq!(cache.get(&(3, 4)), Some(99));
        assert_eq!(cache.get(&(5, 6)), None);

        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_counters_work_through_shared_ref() {
        let mut cache = OpCache::<u32, u32>::new();
        cache.insert(1, 10);

        let shared = &cache;
        assert_eq!(shared.get(&1), Some(10));
        assert_eq!(shared.get(&2), None);
        assert_eq!(shared.hits(), 1);
        assert_eq!(shared.misses(), 1);
    }

    #[test]
    fn test_clear_keeps_counters() {
        let mut cache = OpCache::<u32, u32>::new();
        cache.insert(1, 10);
        assert_eq!(cache.get(&1), Some(10));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }
}

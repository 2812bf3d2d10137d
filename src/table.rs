//! Generic hash-consing table.
//!
//! [`Table`] maps a structural-equality class to exactly one slot: the first
//! time a value is [`put`][Table::put], it is appended and its index becomes
//! the canonical identity of that class; every later `put` of an equal value
//! returns the same index and discards the candidate.
//!
//! Indices are dense, start at 0, grow in insertion order, and are never
//! reused — they double as the creation order. The table is append-only and
//! unbounded: entries grow geometrically, while the bucket array is fixed at
//! construction and chains simply lengthen. There is no eviction.
//!
//! Not thread-safe: one writer per table instance.

use crate::utils::StructuralHash;

const NIL: usize = usize::MAX;

struct Entry<T> {
    value: T,
    /// Structural hash, memoized at insertion.
    hash: u64,
    /// Next entry in the same bucket chain, or `NIL`.
    next: usize,
}

pub struct Table<T> {
    entries: Vec<Entry<T>>,
    buckets: Vec<usize>,
    bitmask: u64,
}

impl<T> Table<T> {
    /// Create a table with `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bucket bits should be in the range 0..=31");

        let buckets_size = 1 << bits;
        let bitmask = (buckets_size - 1) as u64;

        Self {
            entries: Vec::new(),
            buckets: vec![NIL; buckets_size],
            bitmask,
        }
    }

    /// Number of interned entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value at the given index.
    pub fn value(&self, index: usize) -> &T {
        &self.entries[index].value
    }

    /// The memoized structural hash of the value at the given index.
    pub fn hash(&self, index: usize) -> u64 {
        self.entries[index].hash
    }
}

impl<T> Table<T>
where
    T: Eq + StructuralHash,
{
    fn bucket_index(&self, hash: u64) -> usize {
        (hash & self.bitmask) as usize
    }

    /// Intern a value: return the index of the existing structurally equal
    /// entry, or append the candidate and return its fresh index.
    pub fn put(&mut self, value: T) -> usize {
        let hash = value.hash();
        let bucket_index = self.bucket_index(hash);
        let mut index = self.buckets[bucket_index];

        if index == NIL {
            // Create a new entry and put it into the bucket.
            let i = self.add(value, hash);
            self.buckets[bucket_index] = i;
            return i;
        }

        loop {
            let entry = &self.entries[index];

            if entry.hash == hash && entry.value == value {
                // The entry already exists.
                return index;
            }

            let next = entry.next;

            if next == NIL {
                // Create a new entry and append it to the bucket chain.
                let i = self.add(value, hash);
                self.entries[index].next = i;
                return i;
            } else {
                // Go to the next entry in the bucket chain.
                index = next;
            }
        }
    }

    fn add(&mut self, value: T, hash: u64) -> usize {
        let index = self.entries.len();
        assert!(index < u32::MAX as usize, "Table index space exhausted");
        self.entries.push(Entry {
            value,
            hash,
            next: NIL,
        });
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    struct Item(i32);

    impl StructuralHash for Item {
        fn hash(&self) -> u64 {
            // Collapses x and -x into one bucket.
            self.0.unsigned_abs() as u64
        }
    }

    #[test]
    fn test_put_is_idempotent() {
        let mut table = Table::new(4);
        let i = table.put(Item(5));
        let j = table.put(Item(5));
        assert_eq!(i, j);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_distinct_values_get_distinct_indices() {
        let mut table = Table::new(4);
        let i = table.put(Item(1));
        let j = table.put(Item(2));
        assert_ne!(i, j);
        assert_eq!(*table.value(i), Item(1));
        assert_eq!(*table.value(j), Item(2));
    }

    #[test]
    fn test_indices_are_dense_and_ordered() {
        let mut table = Table::new(4);
        assert_eq!(table.put(Item(10)), 0);
        assert_eq!(table.put(Item(20)), 1);
        assert_eq!(table.put(Item(30)), 2);
        assert_eq!(table.put(Item(20)), 1);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_hash_collisions_resolve_by_chaining() {
        let mut table = Table::new(4);
        let i = table.put(Item(5));
        let j = table.put(Item(-5));
        assert_ne!(i, j);
        assert_eq!(*table.value(i), Item(5));
        assert_eq!(*table.value(j), Item(-5));
        // Interning through the shared chain still finds both.
        assert_eq!(table.put(Item(5)), i);
        assert_eq!(table.put(Item(-5)), j);
    }

    #[test]
    fn test_grows_past_the_bucket_count() {
        let mut table = Table::new(2); // 4 buckets
        for k in 0..100 {
            assert_eq!(table.put(Item(k)), k as usize);
        }
        assert_eq!(table.len(), 100);
        for k in 0..100 {
            assert_eq!(table.put(Item(k)), k as usize);
        }
        assert_eq!(table.len(), 100);
    }

    #[test]
    fn test_memoized_hash() {
        let mut table = Table::new(4);
        let i = table.put(Item(7));
        assert_eq!(table.hash(i), 7);
    }
}

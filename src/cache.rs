//! Direct-mapped, lossy memoization cache for BDD operations.
//!
//! The cache stores the computed hash of the key rather than the key
//! itself, which is sound because keys use a perfect hash
//! ([`StructuralHash`]): equal hashes imply equal keys. Collisions on the
//! truncated slot index simply overwrite, so a lookup is either a correct
//! hit or a miss.
//!
//! Cache entries may reference nodes that a garbage-collection sweep has
//! removed, so the manager clears the cache whenever it sweeps.

use std::cell::Cell;
use std::marker::PhantomData;

use crate::hash::{pairing3, StructuralHash};
use crate::node::NodeId;

struct Slot<V> {
    key: u64,
    value: V,
}

pub struct OpCache<K, V> {
    slots: Vec<Option<Slot<V>>>,
    bitmask: u64,
    hits: Cell<usize>,
    misses: Cell<usize>,
    _phantom: PhantomData<K>,
}

impl<K, V> OpCache<K, V> {
    /// Creates a cache with `2^bits` slots.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Cache bits should be in the range 0..=31");

        let size = 1 << bits;
        Self {
            slots: std::iter::repeat_with(|| None).take(size).collect(),
            bitmask: (size - 1) as u64,
            hits: Cell::new(0),
            misses: Cell::new(0),
            _phantom: PhantomData,
        }
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    /// Number of lookups that missed.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    /// Discards every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.slots.fill_with(|| None);
    }

    fn slot_of(&self, key: u64) -> usize {
        (key & self.bitmask) as usize
    }
}

impl<K, V> OpCache<K, V>
where
    K: StructuralHash,
    V: Copy,
{
    /// Returns the cached result for `key`, if present.
    pub fn get(&self, key: &K) -> Option<V> {
        let key = key.hash64();
        match &self.slots[self.slot_of(key)] {
            Some(slot) if slot.key == key => {
                self.hits.set(self.hits.get() + 1);
                Some(slot.value)
            }
            _ => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    /// Stores `value` for `key`, evicting whatever shared its slot.
    pub fn insert(&mut self, key: &K, value: V) {
        let key = key.hash64();
        let index = self.slot_of(key);
        self.slots[index] = Some(Slot { key, value });
    }
}

impl StructuralHash for (NodeId, NodeId, NodeId) {
    fn hash64(&self) -> u64 {
        pairing3(
            self.0.index() as u64,
            self.1.index() as u64,
            self.2.index() as u64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get() {
        let mut cache = OpCache::<(u64, u64), i32>::new(4);

        cache.insert(&(1, 2), 3);
        cache.insert(&(2, 3), 1);
        cache.insert(&(1, 3), 2);

        assert_eq!(cache.get(&(1, 2)), Some(3));
        assert_eq!(cache.get(&(2, 3)), Some(1));
        assert_eq!(cache.get(&(1, 3)), Some(2));
        assert_eq!(cache.get(&(2, 1)), None);
        assert_eq!(cache.get(&(3, 1)), None);
    }

    #[test]
    fn test_clear() {
        let mut cache = OpCache::<(u64, u64), i32>::new(4);
        cache.insert(&(1, 2), 3);
        assert_eq!(cache.get(&(1, 2)), Some(3));
        cache.clear();
        assert_eq!(cache.get(&(1, 2)), None);
    }

    #[test]
    fn test_counters() {
        let mut cache = OpCache::<(u64, u64), i32>::new(4);
        cache.insert(&(1, 2), 3);
        let _ = cache.get(&(1, 2));
        let _ = cache.get(&(9, 9));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }
}

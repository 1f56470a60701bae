//! The unique table: a bucketed, intrusively-chained hash-cons store.
//!
//! Cells hold plain structural values; a cell index is the value's
//! identity. [`UniqueTable::put`] is the hash-consing entry point: it
//! returns the index of an existing structurally-equal cell or allocates a
//! new one. The table never owns its entries in the reference-counting
//! sense: reclamation happens only through an explicit sweep that walks
//! the bucket chains and calls [`UniqueTable::free`] on dead cells
//! (relinking is the sweeper's job, via [`UniqueTable::bucket`] /
//! [`UniqueTable::set_bucket`] / [`UniqueTable::set_next`]).

use std::cmp::min;

use crate::hash::StructuralHash;

#[derive(Clone)]
struct Cell<T> {
    value: T,
    /// Next cell in the same bucket chain, 0 for end of chain.
    next: usize,
    occupied: bool,
}

impl<T> Default for Cell<T>
where
    T: Default,
{
    fn default() -> Self {
        Self {
            value: T::default(),
            next: 0,
            occupied: false,
        }
    }
}

pub struct UniqueTable<T> {
    cells: Vec<Cell<T>>,
    buckets: Vec<usize>,
    bitmask: u64,
    /// Index of the first *possibly* free cell.
    first_free: usize,
    /// Index of the highest cell ever occupied.
    high_water: usize,
    /// Number of currently occupied cells.
    occupied: usize,
}

impl<T> UniqueTable<T>
where
    T: Default,
{
    /// Creates a table with capacity `2^bits`.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Table bits should be in the range 0..=31");

        let capacity = 1 << bits;
        let mut cells: Vec<Cell<T>> = Vec::with_capacity(capacity);
        cells.resize_with(capacity, Cell::default);
        cells[0].occupied = true; // cell 0 is the sentry

        let buckets_bits = min(bits, 16);
        let buckets_size = 1 << buckets_bits;

        Self {
            cells,
            buckets: vec![0; buckets_size],
            bitmask: (buckets_size - 1) as u64,
            first_free: 1,
            high_water: 0,
            occupied: 0,
        }
    }
}

impl<T> UniqueTable<T> {
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of occupied cells (the sentry not counted).
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Highest cell index ever occupied. Iterating `1..=high_water` visits
    /// every live cell (and possibly freed ones).
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        index != 0 && index <= self.high_water && self.cells[index].occupied
    }

    /// The value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is not occupied.
    pub fn value(&self, index: usize) -> &T {
        assert!(self.is_occupied(index), "Cell {} is not occupied", index);
        &self.cells[index].value
    }

    /// Next cell in the bucket chain of `index` (0 at end of chain).
    pub fn next(&self, index: usize) -> usize {
        assert_ne!(index, 0, "Cell 0 is the sentry");
        self.cells[index].next
    }

    pub fn set_next(&mut self, index: usize, next: usize) {
        assert_ne!(index, 0, "Cell 0 is the sentry");
        self.cells[index].next = next;
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Head of bucket chain `i` (0 for an empty bucket).
    pub fn bucket(&self, i: usize) -> usize {
        self.buckets[i]
    }

    pub fn set_bucket(&mut self, i: usize, head: usize) {
        self.buckets[i] = head;
    }

    fn alloc(&mut self) -> usize {
        let index = (self.first_free..=self.high_water)
            .find(|&i| !self.cells[i].occupied)
            .unwrap_or_else(|| {
                self.high_water += 1;
                self.high_water
            });

        if index >= self.capacity() {
            panic!("Unique table is full");
        }

        self.cells[index].occupied = true;
        self.first_free = index + 1;
        self.occupied += 1;

        index
    }

    /// Stores `value` in a fresh cell, outside any bucket chain.
    ///
    /// Used for the reserved terminal cells, which are looked up by their
    /// fixed indices and must never participate in hash-cons lookups.
    pub fn add(&mut self, value: T) -> usize {
        let index = self.alloc();
        self.cells[index].value = value;
        self.cells[index].next = 0;
        index
    }

    /// Marks the cell at `index` free. The caller is responsible for
    /// unlinking it from its bucket chain first.
    pub fn free(&mut self, index: usize) {
        assert_ne!(index, 0, "Cell 0 is the sentry");

        self.cells[index].occupied = false;
        self.first_free = min(self.first_free, index);
        self.occupied -= 1;
    }
}

impl<T> UniqueTable<T>
where
    T: StructuralHash,
{
    fn bucket_of(&self, value: &T) -> usize {
        (value.hash64() & self.bitmask) as usize
    }

    /// Hash-consing lookup-or-insert: returns the index of the existing
    /// structurally-equal cell, or allocates, chains, and returns a new one.
    pub fn put(&mut self, value: T) -> usize
    where
        T: Eq,
    {
        let bucket = self.bucket_of(&value);
        let mut index = self.buckets[bucket];

        if index == 0 {
            let i = self.add(value);
            self.buckets[bucket] = i;
            return i;
        }

        loop {
            assert!(index > 0);

            if &value == self.value(index) {
                // Already interned.
                return index;
            }

            let next = self.next(index);
            if next == 0 {
                // Append to the chain.
                let i = self.add(value);
                self.set_next(index, i);
                return i;
            }
            index = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
    struct Item(i32);

    impl StructuralHash for Item {
        fn hash64(&self) -> u64 {
            self.0.unsigned_abs() as u64
        }
    }

    #[test]
    fn test_add() {
        let mut table = UniqueTable::new(2);
        let index = table.add(Item(42));
        assert_eq!(index, 1);
        assert_eq!(*table.value(index), Item(42));
        assert_eq!(table.next(index), 0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    #[should_panic(expected = "Unique table is full")]
    fn test_add_too_much() {
        let mut table = UniqueTable::new(2);
        table.add(Item(1));
        table.add(Item(2));
        table.add(Item(3));
        table.add(Item(4));
    }

    #[test]
    fn test_put_dedups() {
        let mut table = UniqueTable::new(4);
        let i1 = table.put(Item(7));
        let i2 = table.put(Item(7));
        assert_eq!(i1, i2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_put_collision_chains() {
        // Same hash, different values: must land in one chain.
        let mut table = UniqueTable::new(4);
        let i1 = table.put(Item(5));
        let i2 = table.put(Item(-5));
        assert_ne!(i1, i2);
        assert_eq!(*table.value(i1), Item(5));
        assert_eq!(*table.value(i2), Item(-5));
        assert_eq!(table.next(i1), i2);
    }

    #[test]
    fn test_free_and_reuse() {
        let mut table = UniqueTable::new(4);
        let i1 = table.add(Item(1));
        let _i2 = table.add(Item(2));
        assert!(table.is_occupied(i1));
        table.free(i1);
        assert!(!table.is_occupied(i1));
        // Freed cell is recycled by the next allocation.
        let i3 = table.add(Item(3));
        assert_eq!(i3, i1);
    }
}

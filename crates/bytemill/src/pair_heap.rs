//! # Indexed Pair Heap
//!
//! [`PairHeap`] is a max-priority queue keyed by ordered token pairs and
//! valued by frequency counts. A dense array holds the entries in max-heap
//! order; a hash index maps each pair to its current array position, so an
//! existing pair's count can be adjusted in place in O(log n) instead of
//! being lazily re-pushed and filtered on pop.
//!
//! Counts may be driven to zero by decrements. Zero-count entries stay in
//! the heap as tombstones; the heap property sinks them below every
//! positive entry, so they are only ever popped once no positive-count
//! pair remains.

use crate::errors::{BMResult, BytemillError};
use crate::training::CountType;
use crate::types::{BMHashMap, Pair, TokenType};

/// A single `{pair, count}` heap entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapEntry<T: TokenType, C: CountType> {
    /// The tracked pair.
    pub pair: Pair<T>,

    /// The pair's current frequency count.
    pub count: C,
}

impl<T: TokenType, C: CountType> HeapEntry<T, C> {
    /// The entry's ordering key.
    ///
    /// Max-heap by count; ties break to the larger pair (deterministic).
    fn heap_key(&self) -> (C, Pair<T>) {
        (self.count, self.pair)
    }
}

/// An indexed max-priority queue over adjacent-pair frequencies.
#[derive(Debug, Clone, Default)]
pub struct PairHeap<T: TokenType, C: CountType> {
    entries: Vec<HeapEntry<T, C>>,
    index: BMHashMap<Pair<T>, usize>,
}

impl<T: TokenType, C: CountType> PairHeap<T, C> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty heap with room for `capacity` entries.
    ///
    /// ## Returns
    /// The heap, or [`BytemillError::OutOfMemory`] if either the entry
    /// array or the index allocation fails.
    pub fn with_capacity(capacity: usize) -> BMResult<Self> {
        let mut entries: Vec<HeapEntry<T, C>> = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .map_err(|_| BytemillError::OutOfMemory { len: capacity })?;

        let mut index: BMHashMap<Pair<T>, usize> = BMHashMap::default();
        index
            .try_reserve(capacity)
            .map_err(|_| BytemillError::OutOfMemory { len: capacity })?;

        Ok(Self { entries, index })
    }

    /// The number of tracked pairs, tombstones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the heap tracks no pairs at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The current count for `pair`, or `None` if untracked.
    pub fn get(
        &self,
        pair: &Pair<T>,
    ) -> Option<C> {
        self.index.get(pair).map(|&i| self.entries[i].count)
    }

    /// The maximum entry, without removing it.
    pub fn peek_max(&self) -> Option<&HeapEntry<T, C>> {
        self.entries.first()
    }

    /// The entries in heap-array order.
    ///
    /// Positions are valid until the next mutation.
    pub fn entries(&self) -> &[HeapEntry<T, C>] {
        &self.entries
    }

    /// Start tracking `pair` at `count`.
    ///
    /// ## Arguments
    /// * `pair` - the pair to track; must not be present.
    /// * `count` - the initial frequency count.
    ///
    /// ## Returns
    /// The entry's final heap position, or
    /// [`BytemillError::AlreadyPresent`] if the pair is tracked.
    pub fn insert(
        &mut self,
        pair: Pair<T>,
        count: C,
    ) -> BMResult<usize> {
        if self.index.contains_key(&pair) {
            return Err(BytemillError::AlreadyPresent);
        }
        let i = self.entries.len();
        self.entries.push(HeapEntry { pair, count });
        self.index.insert(pair, i);
        Ok(self.sift_up(i))
    }

    /// Overwrite the count of a tracked pair.
    ///
    /// Sifts up or down based on the direction of the change. A new count
    /// of zero leaves the entry in the heap as a tombstone.
    ///
    /// ## Returns
    /// The entry's final heap position, or
    /// [`BytemillError::PairMissing`] if the pair is untracked.
    pub fn update(
        &mut self,
        pair: Pair<T>,
        count: C,
    ) -> BMResult<usize> {
        let Some(&i) = self.index.get(&pair) else {
            return Err(BytemillError::PairMissing);
        };
        let old = self.entries[i].count;
        self.entries[i].count = count;
        Ok(match count.cmp(&old) {
            core::cmp::Ordering::Greater => self.sift_up(i),
            core::cmp::Ordering::Less => self.sift_down(i),
            core::cmp::Ordering::Equal => i,
        })
    }

    /// Remove and return the maximum entry.
    ///
    /// A zero count on the returned entry means every tracked pair is a
    /// tombstone.
    ///
    /// ## Returns
    /// The maximum `{pair, count}`, or [`BytemillError::Empty`].
    pub fn pop_max(&mut self) -> BMResult<HeapEntry<T, C>> {
        if self.entries.is_empty() {
            return Err(BytemillError::Empty);
        }
        let last = self.entries.len() - 1;
        self.swap_entries(0, last);

        let entry = self.entries.pop().expect("heap is non-empty");
        self.index.remove(&entry.pair);

        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok(entry)
    }

    /// Add one occurrence of `pair`.
    ///
    /// Tracked pairs bump their count in place; untracked pairs are
    /// inserted at count 1.
    ///
    /// ## Returns
    /// The entry's final heap position.
    pub fn increment(
        &mut self,
        pair: Pair<T>,
    ) -> usize {
        match self.index.get(&pair) {
            Some(&i) => {
                self.entries[i].count += C::one();
                self.sift_up(i)
            }
            None => {
                let i = self.entries.len();
                self.entries.push(HeapEntry {
                    pair,
                    count: C::one(),
                });
                self.index.insert(pair, i);
                self.sift_up(i)
            }
        }
    }

    /// Remove one occurrence of `pair`.
    ///
    /// Counts saturate at zero; the entry stays in the heap as a tombstone.
    /// Untracked pairs are a no-op.
    ///
    /// ## Returns
    /// The entry's final heap position, or `None` for an untracked pair.
    pub fn decrement(
        &mut self,
        pair: Pair<T>,
    ) -> Option<usize> {
        let &i = self.index.get(&pair)?;
        let count = self.entries[i].count;
        if count > C::zero() {
            self.entries[i].count = count - C::one();
        }
        Some(self.sift_down(i))
    }

    /// Swap two entries, keeping the position index consistent.
    fn swap_entries(
        &mut self,
        a: usize,
        b: usize,
    ) {
        self.entries.swap(a, b);
        self.index.insert(self.entries[a].pair, a);
        self.index.insert(self.entries[b].pair, b);
    }

    /// Restore the heap property upward from `i`; returns the final position.
    fn sift_up(
        &mut self,
        mut i: usize,
    ) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].heap_key() > self.entries[parent].heap_key() {
                self.swap_entries(i, parent);
                i = parent;
            } else {
                break;
            }
        }
        i
    }

    /// Restore the heap property downward from `i`; returns the final position.
    fn sift_down(
        &mut self,
        mut i: usize,
    ) -> usize {
        loop {
            let left = 2 * i + 1;
            if left >= self.entries.len() {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < self.entries.len()
                && self.entries[right].heap_key() > self.entries[left].heap_key()
            {
                child = right;
            }
            if self.entries[child].heap_key() > self.entries[i].heap_key() {
                self.swap_entries(i, child);
                i = child;
            } else {
                break;
            }
        }
        i
    }

    /// Assert the heap property and index consistency.
    #[cfg(test)]
    fn check_invariants(&self) {
        for i in 1..self.entries.len() {
            let parent = (i - 1) / 2;
            assert!(
                self.entries[parent].heap_key() >= self.entries[i].heap_key(),
                "heap property violated at {i}"
            );
        }
        assert_eq!(self.index.len(), self.entries.len());
        for (pair, &i) in self.index.iter() {
            assert_eq!(self.entries[i].pair, *pair, "index points at wrong entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type T = u32;
    type C = u32;
    type Heap = PairHeap<T, C>;

    #[test]
    fn test_insert_pop_roundtrip() {
        let mut heap = Heap::new();
        assert!(heap.is_empty());

        heap.insert((1, 2), 5).unwrap();
        heap.check_invariants();

        let entry = heap.pop_max().unwrap();
        assert_eq!(entry.pair, (1, 2));
        assert_eq!(entry.count, 5);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_insert_already_present() {
        let mut heap = Heap::new();
        heap.insert((1, 2), 5).unwrap();

        assert!(matches!(
            heap.insert((1, 2), 7),
            Err(BytemillError::AlreadyPresent)
        ));
        assert_eq!(heap.get(&(1, 2)), Some(5));
    }

    #[test]
    fn test_update_missing() {
        let mut heap = Heap::new();
        assert!(matches!(
            heap.update((1, 2), 5),
            Err(BytemillError::PairMissing)
        ));
    }

    #[test]
    fn test_update_semantics() {
        // Insert A, B, C at 5, 3, 7; pop C; raise B to 9; pop B, A; Empty.
        let a = (10, 11);
        let b = (20, 21);
        let c = (30, 31);

        let mut heap = Heap::with_capacity(3).unwrap();
        heap.insert(a, 5).unwrap();
        heap.insert(b, 3).unwrap();
        heap.insert(c, 7).unwrap();
        heap.check_invariants();
        assert_eq!(heap.len(), 3);

        let top = heap.pop_max().unwrap();
        assert_eq!((top.pair, top.count), (c, 7));

        heap.update(b, 9).unwrap();
        heap.check_invariants();

        let top = heap.pop_max().unwrap();
        assert_eq!((top.pair, top.count), (b, 9));

        let top = heap.pop_max().unwrap();
        assert_eq!((top.pair, top.count), (a, 5));

        assert!(matches!(heap.pop_max(), Err(BytemillError::Empty)));
    }

    #[test]
    fn test_update_to_same_count_is_stable() {
        let mut heap = Heap::new();
        heap.insert((1, 2), 5).unwrap();
        heap.insert((3, 4), 3).unwrap();
        heap.insert((5, 6), 7).unwrap();

        let before: Vec<_> = heap.entries.clone();
        heap.update((3, 4), 3).unwrap();
        heap.check_invariants();
        assert_eq!(heap.entries, before);
    }

    #[test]
    fn test_tie_break_larger_pair_first() {
        let mut heap = Heap::new();
        heap.insert((100, 101), 1).unwrap();
        heap.insert((256, 100), 1).unwrap();
        heap.insert((256, 256), 1).unwrap();
        heap.insert((97, 256), 1).unwrap();

        let order: Vec<Pair<T>> = (0..4).map(|_| heap.pop_max().unwrap().pair).collect();
        assert_eq!(order, vec![(256, 256), (256, 100), (100, 101), (97, 256)]);
    }

    #[test]
    fn test_tombstones_sink() {
        let mut heap = Heap::new();
        heap.insert((1, 2), 4).unwrap();
        heap.insert((3, 4), 2).unwrap();

        heap.update((1, 2), 0).unwrap();
        heap.check_invariants();

        // The tombstone is retained but never reported while a positive
        // entry remains.
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.get(&(1, 2)), Some(0));

        let top = heap.pop_max().unwrap();
        assert_eq!((top.pair, top.count), ((3, 4), 2));

        let top = heap.pop_max().unwrap();
        assert_eq!((top.pair, top.count), ((1, 2), 0));
    }

    #[test]
    fn test_increment_decrement() {
        let mut heap = Heap::new();

        // Increment on an untracked pair inserts at 1.
        heap.increment((1, 2));
        assert_eq!(heap.get(&(1, 2)), Some(1));

        heap.increment((1, 2));
        heap.increment((1, 2));
        assert_eq!(heap.get(&(1, 2)), Some(3));

        // Decrement saturates at zero and keeps the tombstone.
        heap.decrement((1, 2));
        heap.decrement((1, 2));
        heap.decrement((1, 2));
        assert_eq!(heap.get(&(1, 2)), Some(0));
        heap.decrement((1, 2));
        assert_eq!(heap.get(&(1, 2)), Some(0));
        assert_eq!(heap.len(), 1);

        // Decrement on an untracked pair is a no-op.
        assert_eq!(heap.decrement((9, 9)), None);
        heap.check_invariants();
    }

    #[test]
    fn test_peek_max() {
        let mut heap = Heap::new();
        assert!(heap.peek_max().is_none());

        heap.insert((1, 2), 5).unwrap();
        heap.insert((3, 4), 9).unwrap();

        let top = heap.peek_max().unwrap();
        assert_eq!((top.pair, top.count), ((3, 4), 9));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn test_mixed_churn_keeps_invariants() {
        let mut heap = Heap::new();

        for i in 0..32u32 {
            heap.insert((i, i + 1), (i * 7) % 13).unwrap();
            heap.check_invariants();
        }
        for i in (0..32u32).step_by(3) {
            heap.update((i, i + 1), (i * 5) % 11).unwrap();
            heap.check_invariants();
        }
        for i in (0..32u32).step_by(2) {
            heap.decrement((i, i + 1));
            heap.increment((i + 1, i));
            heap.check_invariants();
        }

        // Pops must come out in non-increasing key order.
        let mut last: Option<(C, Pair<T>)> = None;
        while let Ok(entry) = heap.pop_max() {
            heap.check_invariants();
            let key = (entry.count, entry.pair);
            if let Some(prev) = last {
                assert!(prev > key);
            }
            last = Some(key);
        }
        assert!(heap.is_empty());
    }
}

//! Min-max binary heap over chunked storage, root on a max level.
//!
//! Levels alternate max/min by depth, so the maximum sits at the root and
//! the minimum is one of the root's children. Buckets only accumulate and
//! are then read out, so the heap supports insertion and inspection but no
//! removal. All sift paths are iterative; depth is bounded by the storage,
//! not the call stack.

use chunk_seq::{ChunkPool, ChunkSeq};

use crate::key::SortKey;

pub(crate) struct MinMaxHeap<V> {
    items: ChunkSeq<V>,
}

#[inline]
fn on_min_level(index: usize) -> bool {
    (index + 1).ilog2() % 2 == 1
}

impl<V: SortKey> MinMaxHeap<V> {
    pub fn new() -> Self {
        Self {
            items: ChunkSeq::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn get(&self, index: usize) -> V {
        self.items.get(index)
    }

    pub fn push(&mut self, value: V, pool: &mut ChunkPool<V>) {
        self.items.push(value, pool);
        self.trickle_up(self.items.len() - 1);
    }

    /// O(1): the root.
    #[inline]
    pub fn max(&self) -> V {
        self.items.get(0)
    }

    /// Index of the minimum, decided by the element count: a single
    /// element is its own minimum, with two the child holds it, and from
    /// three on it is the smaller of the root's two children.
    #[inline]
    pub fn min_index(&self) -> usize {
        match self.items.len() {
            0 => panic!("empty min-max heap has no minimum"),
            1 => 0,
            2 => 1,
            _ => {
                if self.items.get(1) < self.items.get(2) {
                    1
                } else {
                    2
                }
            }
        }
    }

    #[inline]
    pub fn min(&self) -> V {
        self.items.get(self.min_index())
    }

    /// `(max, mid, min)` indices for a heap of exactly three elements,
    /// resolved with a single comparison: the smaller of the root's two
    /// children is the minimum, the other is the mid, the root is the max.
    #[inline]
    pub fn max_mid_min(&self) -> (usize, usize, usize) {
        debug_assert_eq!(self.items.len(), 3);
        if self.items.get(1) < self.items.get(2) {
            (0, 2, 1)
        } else {
            (0, 1, 2)
        }
    }

    #[inline]
    pub fn all_duplicates(&self) -> bool {
        !(self.min() < self.max())
    }

    pub fn release(self, pool: &mut ChunkPool<V>) {
        self.items.release(pool);
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        let tmp = self.items.get(a);
        self.items.set(a, self.items.get(b));
        self.items.set(b, tmp);
    }

    fn trickle_up(&mut self, index: usize) {
        if index == 0 {
            return;
        }
        let parent = (index - 1) / 2;
        if on_min_level(index) {
            if self.items.get(parent) < self.items.get(index) {
                self.swap(parent, index);
                self.trickle_up_same_level(parent, true);
            } else {
                self.trickle_up_same_level(index, false);
            }
        } else if self.items.get(index) < self.items.get(parent) {
            self.swap(parent, index);
            self.trickle_up_same_level(parent, false);
        } else {
            self.trickle_up_same_level(index, true);
        }
    }

    /// Bubbles toward the root along grandparents, staying on one track
    /// (max levels or min levels).
    fn trickle_up_same_level(&mut self, mut index: usize, max_level: bool) {
        while index > 2 {
            let grandparent = ((index - 1) / 2 - 1) / 2;
            let rises = if max_level {
                self.items.get(grandparent) < self.items.get(index)
            } else {
                self.items.get(index) < self.items.get(grandparent)
            };
            if !rises {
                break;
            }
            self.swap(index, grandparent);
            index = grandparent;
        }
    }
}

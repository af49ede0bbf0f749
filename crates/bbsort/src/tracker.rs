//! Simple order-statistics tracker: a bucket's storage plus running
//! min/max, and the middle value once the bucket holds exactly three
//! elements. Resolving a three-element bucket therefore costs no
//! comparisons at pop time; everything was paid during insertion.

use chunk_seq::{ChunkPool, ChunkSeq};

use crate::key::SortKey;

pub(crate) struct MinMaxMidList<V> {
    storage: ChunkSeq<V>,
    min: V,
    max: V,
    // Reliable only while the bucket holds exactly three elements.
    mid: V,
}

impl<V: SortKey> MinMaxMidList<V> {
    pub fn with_first(value: V, pool: &mut ChunkPool<V>) -> Self {
        let mut storage = ChunkSeq::new();
        storage.push(value, pool);
        Self {
            storage,
            min: value,
            max: value,
            mid: value,
        }
    }

    #[inline]
    pub fn push(&mut self, value: V, pool: &mut ChunkPool<V>) {
        if self.storage.len() == 2 {
            // Third element: place it relative to the known extremes.
            if value < self.min {
                self.mid = self.min;
                self.min = value;
            } else if value > self.max {
                self.mid = self.max;
                self.max = value;
            } else {
                self.mid = value;
            }
        } else {
            if value < self.min {
                self.min = value;
            }
            if value > self.max {
                self.max = value;
            }
        }
        self.storage.push(value, pool);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn get(&self, index: usize) -> V {
        self.storage.get(index)
    }

    #[inline]
    pub fn min(&self) -> V {
        self.min
    }

    #[inline]
    pub fn max(&self) -> V {
        self.max
    }

    #[inline]
    pub fn mid(&self) -> V {
        debug_assert_eq!(self.storage.len(), 3);
        self.mid
    }

    #[inline]
    pub fn all_duplicates(&self) -> bool {
        !(self.min < self.max)
    }

    pub fn release(self, pool: &mut ChunkPool<V>) {
        self.storage.release(pool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[i64]) -> (MinMaxMidList<i64>, ChunkPool<i64>) {
        let mut pool = ChunkPool::new();
        let mut bucket = MinMaxMidList::with_first(values[0], &mut pool);
        for &v in &values[1..] {
            bucket.push(v, &mut pool);
        }
        (bucket, pool)
    }

    #[test]
    fn mid_is_correct_for_every_insertion_order() {
        let perms: [[i64; 3]; 6] = [
            [1, 2, 3],
            [1, 3, 2],
            [2, 1, 3],
            [2, 3, 1],
            [3, 1, 2],
            [3, 2, 1],
        ];
        for perm in perms {
            let (bucket, mut pool) = filled(&perm);
            assert_eq!(bucket.min(), 1, "perm {perm:?}");
            assert_eq!(bucket.mid(), 2, "perm {perm:?}");
            assert_eq!(bucket.max(), 3, "perm {perm:?}");
            bucket.release(&mut pool);
        }
    }

    #[test]
    fn extremes_track_past_three_elements() {
        let (bucket, mut pool) = filled(&[5, 9, 7, -3, 12, 0]);
        assert_eq!(bucket.min(), -3);
        assert_eq!(bucket.max(), 12);
        assert_eq!(bucket.len(), 6);
        bucket.release(&mut pool);
    }

    #[test]
    fn all_duplicates_predicate() {
        let (uniform, mut pool) = filled(&[4, 4, 4, 4]);
        assert!(uniform.all_duplicates());
        uniform.release(&mut pool);

        let (mixed, mut pool) = filled(&[4, 4, 5]);
        assert!(!mixed.all_duplicates());
        mixed.release(&mut pool);
    }

    #[test]
    fn third_duplicate_of_extreme_becomes_mid() {
        let (bucket, mut pool) = filled(&[2, 8, 8]);
        assert_eq!(bucket.min(), 2);
        assert_eq!(bucket.mid(), 8);
        assert_eq!(bucket.max(), 8);
        bucket.release(&mut pool);
    }
}

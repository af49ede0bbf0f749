//! Chunked, pool-backed growable sequences.
//!
//! A `ChunkSeq` stores its elements in fixed-size chunks instead of one
//! contiguous buffer, so growing never reallocates-and-copies the whole
//! sequence and very large sequences never require a single huge
//! allocation. Chunk buffers are acquired from and released to a
//! `ChunkPool`, which lets short-lived sequences (bucket storage during a
//! distribution sort, for example) recycle their allocations instead of
//! going through the global allocator for every bucket.
//!
//! The pool is single-threaded: one owner drives acquire/release with
//! non-overlapping sequence lifetimes, so no synchronization is needed.

pub const CHUNK_BITS: usize = 12;
pub const CHUNK_LEN: usize = 1 << CHUNK_BITS;
const CHUNK_MASK: usize = CHUNK_LEN - 1;

/// Free-list of spare chunk buffers.
pub struct ChunkPool<T> {
    free: Vec<Vec<T>>,
}

impl<T> Default for ChunkPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChunkPool<T> {
    pub fn new() -> Self {
        Self { free: Vec::new() }
    }

    /// Number of chunk buffers currently parked in the pool.
    pub fn spare_chunks(&self) -> usize {
        self.free.len()
    }

    #[inline]
    fn acquire(&mut self) -> Vec<T> {
        self.free
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(CHUNK_LEN))
    }

    #[inline]
    fn recycle(&mut self, mut chunk: Vec<T>) {
        chunk.clear();
        self.free.push(chunk);
    }
}

/// Growable sequence of `T` backed by pool-recycled fixed-size chunks.
///
/// `push` is amortized O(1), indexed access is O(1), and `release` hands
/// every chunk buffer back to a pool, invalidating the sequence.
pub struct ChunkSeq<T> {
    chunks: Vec<Vec<T>>,
    len: usize,
}

impl<T> ChunkSeq<T> {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn push(&mut self, value: T, pool: &mut ChunkPool<T>) {
        if self.len == self.chunks.len() << CHUNK_BITS {
            self.chunks.push(pool.acquire());
        }
        // The last chunk exists and has spare capacity by the check above.
        self.chunks[self.len >> CHUNK_BITS].push(value);
        self.len += 1;
    }

    /// Returns every chunk buffer to `pool`, consuming the sequence.
    pub fn release(self, pool: &mut ChunkPool<T>) {
        for chunk in self.chunks {
            pool.recycle(chunk);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.chunks.iter().flat_map(|chunk| chunk.iter())
    }
}

impl<T: Copy> ChunkSeq<T> {
    pub fn from_slice(values: &[T], pool: &mut ChunkPool<T>) -> Self {
        let mut seq = Self::new();
        for &value in values {
            seq.push(value, pool);
        }
        seq
    }

    #[inline]
    pub fn get(&self, index: usize) -> T {
        debug_assert!(index < self.len);
        // Hot path: the chunk split makes the two bounds checks redundant
        // once the debug assert holds.
        unsafe {
            *self
                .chunks
                .get_unchecked(index >> CHUNK_BITS)
                .get_unchecked(index & CHUNK_MASK)
        }
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        debug_assert!(index < self.len);
        unsafe {
            *self
                .chunks
                .get_unchecked_mut(index >> CHUNK_BITS)
                .get_unchecked_mut(index & CHUNK_MASK) = value;
        }
    }

    pub fn copy_to_slice(&self, out: &mut [T]) {
        assert_eq!(out.len(), self.len);
        let mut cursor = 0;
        for chunk in &self.chunks {
            out[cursor..cursor + chunk.len()].copy_from_slice(chunk);
            cursor += chunk.len();
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out
    }
}

impl<T> Default for ChunkSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

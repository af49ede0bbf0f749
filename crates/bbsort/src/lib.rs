//! BBSort: adaptive recursive bucket sort for numeric sequences.
//!
//! Values are spread across a bounded number of buckets by a linear map
//! over a compressed-magnitude (approximate signed log2) transform, and
//! buckets are resolved iteratively off an explicit work stack: closed
//! forms for up to three elements, an all-duplicates collapse, and a
//! halving re-partition otherwise. When the log-domain transform cannot
//! discriminate a bucket's values, the partition falls back to a
//! raw-value-domain map so every level makes progress.
//!
//! Sequences are stored in pool-backed chunked storage (`chunk_seq`), so
//! neither the input nor any bucket ever needs one huge contiguous
//! allocation.
//!
//! Equal elements may be reordered (the sort is not stable), and NaN is
//! outside the contract.

mod heap;
mod key;
mod tracker;
pub mod transform;
mod variants;

pub use chunk_seq::{ChunkPool, ChunkSeq};
pub use key::SortKey;

/// Duplicate-handling strategy, chosen once per sort call.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SortVariant {
    /// Upfront frequency table; only distinct values are bucketed and
    /// multiplicities are replayed on emit.
    Counting,
    /// No table; raw duplicates travel through min-max heap buckets.
    DictLess,
    /// No table; raw duplicates travel through min/max/mid trackers.
    MinMaxList,
}

pub const ALL_VARIANTS: [SortVariant; 3] = [
    SortVariant::Counting,
    SortVariant::DictLess,
    SortVariant::MinMaxList,
];

pub fn all_variants() -> &'static [SortVariant] {
    &ALL_VARIANTS
}

pub fn variant_name(variant: SortVariant) -> &'static str {
    match variant {
        SortVariant::Counting => "counting",
        SortVariant::DictLess => "dictless",
        SortVariant::MinMaxList => "minmax_list",
    }
}

/// Empirically-chosen knobs. They trade discrimination against fan-out
/// and are not part of the correctness contract.
#[derive(Clone, Copy, Debug)]
pub struct TunedParams {
    /// Top-level bucket fan-out for the counting and dict-less variants.
    pub top_bucket_cap: usize,
    /// Wider top-level fan-out for the minmax-list variant.
    pub flat_top_bucket_cap: usize,
    /// Cap on the halved sub-bucket count in the counting variant.
    pub recurse_bucket_cap: usize,
    /// Below this transformed span, re-partition in the raw value domain.
    pub log_domain_epsilon: f32,
}

pub const TUNED_PARAMS: TunedParams = TunedParams {
    top_bucket_cap: 128,
    flat_top_bucket_cap: 1024,
    recurse_bucket_cap: 128,
    log_domain_epsilon: 0.1,
};

/// Sorts `data` in place with the default compressed-magnitude transform.
/// Length 0 or 1 is a no-op.
pub fn sort<V: SortKey>(variant: SortVariant, data: &mut ChunkSeq<V>, pool: &mut ChunkPool<V>) {
    sort_with(variant, data, pool, &|v: V| v.compressed_log());
}

/// Sorts `data` in place with a caller-supplied compressed-magnitude
/// transform. The transform must be monotone over the value domain;
/// precision only affects bucket shape, not correctness.
pub fn sort_with<V, F>(variant: SortVariant, data: &mut ChunkSeq<V>, pool: &mut ChunkPool<V>, transform: &F)
where
    V: SortKey,
    F: Fn(V) -> f32,
{
    if data.len() < 2 {
        return;
    }
    match variant {
        SortVariant::Counting => variants::counting::sort(data, pool, transform),
        SortVariant::DictLess => variants::dictless::sort(data, pool, transform),
        SortVariant::MinMaxList => variants::minmax_list::sort(data, pool, transform),
    }
}

/// Slice convenience wrapper around [`sort`].
pub fn sort_slice<V: SortKey>(variant: SortVariant, data: &mut [V]) {
    if data.len() < 2 {
        return;
    }
    let mut pool = ChunkPool::new();
    let mut seq = ChunkSeq::from_slice(data, &mut pool);
    sort(variant, &mut seq, &mut pool);
    seq.copy_to_slice(data);
    seq.release(&mut pool);
}

/// Sorts `input` into a caller-supplied `output` buffer.
///
/// Panics if the buffer lengths differ; silently truncating would violate
/// the permutation contract.
pub fn sort_into<V: SortKey>(
    variant: SortVariant,
    input: &ChunkSeq<V>,
    output: &mut ChunkSeq<V>,
    pool: &mut ChunkPool<V>,
) {
    assert_eq!(
        input.len(),
        output.len(),
        "output length must match input length"
    );
    for i in 0..input.len() {
        output.set(i, input.get(i));
    }
    sort(variant, output, pool);
}

/// The `n` smallest values of `data` in ascending order, without sorting
/// the rest. Runs the counting engine against a bounded output; buckets
/// past the cut line are dropped unpartitioned.
pub fn least_n<V: SortKey>(data: &ChunkSeq<V>, n: usize, pool: &mut ChunkPool<V>) -> Vec<V> {
    variants::counting::least_n(data, n, pool, &|v: V| v.compressed_log())
}

//! Counting variant: one upfront pass builds a frequency table and the
//! list of distinct values, the distribution engine then runs over the
//! distinct values only, and every emit replays the value's multiplicity.
//! Runtime scales with the number of distinct values rather than the
//! input length on heavily-duplicated inputs.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chunk_seq::{ChunkPool, ChunkSeq};

use crate::TUNED_PARAMS;
use crate::key::SortKey;
use crate::tracker::MinMaxMidList;
use crate::transform::choose_map;

type FrequencyTable<V: SortKey> = HashMap<<V as SortKey>::Bits, usize>;

pub(crate) fn sort<V, F>(data: &mut ChunkSeq<V>, pool: &mut ChunkPool<V>, transform: &F)
where
    V: SortKey,
    F: Fn(V) -> f32,
{
    let limit = data.len();
    let (freq, distinct, min, max) = scan(data, pool);
    let stack = seed_stack(distinct, min, max, pool, transform);
    drain(stack, &freq, data, limit, pool, transform);
}

/// The `n` smallest values in ascending order. The engine stops as soon
/// as the bounded output is full, so buckets past the cut line are never
/// partitioned.
pub(crate) fn least_n<V, F>(
    data: &ChunkSeq<V>,
    n: usize,
    pool: &mut ChunkPool<V>,
    transform: &F,
) -> Vec<V>
where
    V: SortKey,
    F: Fn(V) -> f32,
{
    let limit = n.min(data.len());
    if limit == 0 {
        return Vec::new();
    }
    if data.len() == 1 {
        return vec![data.get(0)];
    }

    let (freq, distinct, min, max) = scan(data, pool);

    let mut out = ChunkSeq::new();
    for _ in 0..limit {
        out.push(min, pool);
    }

    let stack = seed_stack(distinct, min, max, pool, transform);
    drain(stack, &freq, &mut out, limit, pool, transform);

    let result = out.to_vec();
    out.release(pool);
    result
}

/// Single pass over the input: multiplicity per distinct value, the
/// distinct values themselves, and the global extremes. The table is
/// read-only from here on.
fn scan<V: SortKey>(
    data: &ChunkSeq<V>,
    pool: &mut ChunkPool<V>,
) -> (FrequencyTable<V>, ChunkSeq<V>, V, V) {
    let mut freq = FrequencyTable::<V>::new();
    let mut distinct = ChunkSeq::new();
    let mut min = data.get(0);
    let mut max = min;

    for i in 0..data.len() {
        let value = data.get(i);
        if value < min {
            min = value;
        }
        if max < value {
            max = value;
        }
        match freq.entry(value.bits()) {
            Entry::Occupied(mut entry) => *entry.get_mut() += 1,
            Entry::Vacant(entry) => {
                entry.insert(1);
                distinct.push(value, pool);
            }
        }
    }

    (freq, distinct, min, max)
}

fn seed_stack<V, F>(
    distinct: ChunkSeq<V>,
    min: V,
    max: V,
    pool: &mut ChunkPool<V>,
    transform: &F,
) -> Vec<MinMaxMidList<V>>
where
    V: SortKey,
    F: Fn(V) -> f32,
{
    let bucket_count = distinct.len().min(TUNED_PARAMS.top_bucket_cap);
    let map = choose_map(min, max, transform, bucket_count);

    let mut buckets: Vec<Option<MinMaxMidList<V>>> = (0..bucket_count).map(|_| None).collect();
    for value in distinct.iter().copied() {
        let index = map.index_of(value, transform, bucket_count);
        match &mut buckets[index] {
            Some(bucket) => bucket.push(value, pool),
            slot => *slot = Some(MinMaxMidList::with_first(value, pool)),
        }
    }
    distinct.release(pool);

    let mut stack = Vec::with_capacity(bucket_count);
    for bucket in buckets.into_iter().rev().flatten() {
        stack.push(bucket);
    }
    stack
}

fn drain<V, F>(
    mut stack: Vec<MinMaxMidList<V>>,
    freq: &FrequencyTable<V>,
    output: &mut ChunkSeq<V>,
    limit: usize,
    pool: &mut ChunkPool<V>,
    transform: &F,
) where
    V: SortKey,
    F: Fn(V) -> f32,
{
    let mut cursor = 0usize;

    while let Some(bucket) = stack.pop() {
        if cursor >= limit {
            bucket.release(pool);
            continue;
        }
        match bucket.len() {
            1 => {
                emit(bucket.min(), freq, output, &mut cursor, limit);
                bucket.release(pool);
            }
            2 => {
                emit(bucket.min(), freq, output, &mut cursor, limit);
                emit(bucket.max(), freq, output, &mut cursor, limit);
                bucket.release(pool);
            }
            3 => {
                emit(bucket.min(), freq, output, &mut cursor, limit);
                emit(bucket.mid(), freq, output, &mut cursor, limit);
                emit(bucket.max(), freq, output, &mut cursor, limit);
                bucket.release(pool);
            }
            _ => case_n(bucket, &mut stack, freq, output, &mut cursor, limit, pool, transform),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn case_n<V, F>(
    bucket: MinMaxMidList<V>,
    stack: &mut Vec<MinMaxMidList<V>>,
    freq: &FrequencyTable<V>,
    output: &mut ChunkSeq<V>,
    cursor: &mut usize,
    limit: usize,
    pool: &mut ChunkPool<V>,
    transform: &F,
) where
    V: SortKey,
    F: Fn(V) -> f32,
{
    // Distinct values make an all-equal bucket a single-element bucket,
    // so this collapse only fires for the degenerate one-distinct input.
    if bucket.all_duplicates() {
        emit(bucket.min(), freq, output, cursor, limit);
        bucket.release(pool);
        return;
    }

    let parent_len = bucket.len();
    let sub_count = (parent_len / 2 + 1).min(TUNED_PARAMS.recurse_bucket_cap);
    let map = choose_map(bucket.min(), bucket.max(), transform, sub_count);

    let mut sub_buckets: Vec<Option<MinMaxMidList<V>>> = (0..sub_count).map(|_| None).collect();
    for i in 0..parent_len {
        let value = bucket.get(i);
        let index = map.index_of(value, transform, sub_count);
        match &mut sub_buckets[index] {
            Some(sub) => sub.push(value, pool),
            slot => *slot = Some(MinMaxMidList::with_first(value, pool)),
        }
    }
    let min = bucket.min();
    bucket.release(pool);

    push_sub_buckets(sub_buckets, parent_len, min, stack, pool);
}

/// Pushes non-empty sub-buckets in descending index order so pops proceed
/// ascending. If every element landed in one sub-bucket (both maps failed
/// to discriminate, e.g. values differing only beyond f64 precision), the
/// bucket is split against its minimum instead; both halves are strictly
/// smaller, so no bucket is ever re-pushed unchanged.
pub(crate) fn push_sub_buckets<V: SortKey>(
    sub_buckets: Vec<Option<MinMaxMidList<V>>>,
    parent_len: usize,
    min: V,
    stack: &mut Vec<MinMaxMidList<V>>,
    pool: &mut ChunkPool<V>,
) {
    let occupied = sub_buckets.iter().flatten().count();
    if occupied == 1 {
        for stuck in sub_buckets.into_iter().flatten() {
            debug_assert_eq!(stuck.len(), parent_len);

            let mut low: Option<MinMaxMidList<V>> = None;
            let mut high: Option<MinMaxMidList<V>> = None;
            for i in 0..stuck.len() {
                let value = stuck.get(i);
                let slot = if min < value { &mut high } else { &mut low };
                match slot {
                    Some(bucket) => bucket.push(value, pool),
                    empty => *empty = Some(MinMaxMidList::with_first(value, pool)),
                }
            }
            stuck.release(pool);

            if let Some(bucket) = high {
                stack.push(bucket);
            }
            if let Some(bucket) = low {
                stack.push(bucket);
            }
        }
        return;
    }

    for bucket in sub_buckets.into_iter().rev().flatten() {
        stack.push(bucket);
    }
}

/// Writes `freq[value]` copies of `value`, truncated at `limit` for the
/// bounded (top-n) output.
#[inline]
fn emit<V: SortKey>(
    value: V,
    freq: &FrequencyTable<V>,
    output: &mut ChunkSeq<V>,
    cursor: &mut usize,
    limit: usize,
) {
    let copies = freq[&value.bits()];
    let end = (*cursor + copies).min(limit);
    while *cursor < end {
        output.set(*cursor, value);
        *cursor += 1;
    }
}

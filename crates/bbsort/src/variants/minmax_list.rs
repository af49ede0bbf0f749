//! Dict-less variant over simple min/max/mid trackers instead of heaps.
//! Insertion is O(1) per element, the three-element case reads its cached
//! mid directly, and the top level spreads across a wider bucket fan-out.

use chunk_seq::{ChunkPool, ChunkSeq};

use crate::TUNED_PARAMS;
use crate::key::SortKey;
use crate::tracker::MinMaxMidList;
use crate::transform::choose_map;

use super::counting::push_sub_buckets;

pub(crate) fn sort<V, F>(data: &mut ChunkSeq<V>, pool: &mut ChunkPool<V>, transform: &F)
where
    V: SortKey,
    F: Fn(V) -> f32,
{
    let len = data.len();
    let mut min = data.get(0);
    let mut max = min;
    for i in 1..len {
        let value = data.get(i);
        if value < min {
            min = value;
        }
        if max < value {
            max = value;
        }
    }
    if !(min < max) {
        return;
    }

    let bucket_count = len.min(TUNED_PARAMS.flat_top_bucket_cap);
    let map = choose_map(min, max, transform, bucket_count);

    let mut buckets: Vec<Option<MinMaxMidList<V>>> = (0..bucket_count).map(|_| None).collect();
    for i in 0..len {
        let value = data.get(i);
        let index = map.index_of(value, transform, bucket_count);
        match &mut buckets[index] {
            Some(bucket) => bucket.push(value, pool),
            slot => *slot = Some(MinMaxMidList::with_first(value, pool)),
        }
    }

    let mut stack: Vec<MinMaxMidList<V>> = Vec::with_capacity(bucket_count);
    for bucket in buckets.into_iter().rev().flatten() {
        stack.push(bucket);
    }

    drain(stack, data, pool, transform);
}

fn drain<V, F>(
    mut stack: Vec<MinMaxMidList<V>>,
    output: &mut ChunkSeq<V>,
    pool: &mut ChunkPool<V>,
    transform: &F,
) where
    V: SortKey,
    F: Fn(V) -> f32,
{
    let mut cursor = 0usize;

    while let Some(bucket) = stack.pop() {
        match bucket.len() {
            1 => {
                output.set(cursor, bucket.min());
                cursor += 1;
                bucket.release(pool);
            }
            2 => {
                output.set(cursor, bucket.min());
                output.set(cursor + 1, bucket.max());
                cursor += 2;
                bucket.release(pool);
            }
            3 => {
                output.set(cursor, bucket.min());
                output.set(cursor + 1, bucket.mid());
                output.set(cursor + 2, bucket.max());
                cursor += 3;
                bucket.release(pool);
            }
            _ => case_n(bucket, &mut stack, output, &mut cursor, pool, transform),
        }
    }
}

fn case_n<V, F>(
    bucket: MinMaxMidList<V>,
    stack: &mut Vec<MinMaxMidList<V>>,
    output: &mut ChunkSeq<V>,
    cursor: &mut usize,
    pool: &mut ChunkPool<V>,
    transform: &F,
) where
    V: SortKey,
    F: Fn(V) -> f32,
{
    let parent_len = bucket.len();

    if bucket.all_duplicates() {
        let value = bucket.min();
        for _ in 0..parent_len {
            output.set(*cursor, value);
            *cursor += 1;
        }
        bucket.release(pool);
        return;
    }

    let sub_count = parent_len / 2 + 1;
    let min = bucket.min();
    let map = choose_map(min, bucket.max(), transform, sub_count);

    let mut sub_buckets: Vec<Option<MinMaxMidList<V>>> = (0..sub_count).map(|_| None).collect();
    for i in 0..parent_len {
        let value = bucket.get(i);
        let index = map.index_of(value, transform, sub_count);
        match &mut sub_buckets[index] {
            Some(sub) => sub.push(value, pool),
            slot => *slot = Some(MinMaxMidList::with_first(value, pool)),
        }
    }
    bucket.release(pool);

    push_sub_buckets(sub_buckets, parent_len, min, stack, pool);
}

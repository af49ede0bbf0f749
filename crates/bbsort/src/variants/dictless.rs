//! Dict-less variant over min-max heap buckets. No frequency table: raw
//! duplicates travel through the buckets, and the only duplicate
//! awareness is the all-duplicates collapse. Avoids hashing overhead and
//! table memory on inputs with few duplicates.

use chunk_seq::{ChunkPool, ChunkSeq};

use crate::TUNED_PARAMS;
use crate::heap::MinMaxHeap;
use crate::key::SortKey;
use crate::transform::choose_map;

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
        // All values equal; the input already is the output.
        return;
    }

    let bucket_count = len.min(TUNED_PARAMS.top_bucket_cap);
    let map = choose_map(min, max, transform, bucket_count);

    let mut buckets: Vec<Option<MinMaxHeap<V>>> = (0..bucket_count).map(|_| None).collect();
    for i in 0..len {
        let value = data.get(i);
        let index = map.index_of(value, transform, bucket_count);
        bucket_push(&mut buckets[index], value, pool);
    }

    let mut stack: Vec<MinMaxHeap<V>> = Vec::with_capacity(bucket_count);
    for bucket in buckets.into_iter().rev().flatten() {
        stack.push(bucket);
    }

    drain(stack, data, pool, transform);
}

#[inline]
fn bucket_push<V: SortKey>(slot: &mut Option<MinMaxHeap<V>>, value: V, pool: &mut ChunkPool<V>) {
    match slot {
        Some(bucket) => bucket.push(value, pool),
        empty => {
            let mut bucket = MinMaxHeap::new();
            bucket.push(value, pool);
            *empty = Some(bucket);
        }
    }
}

fn drain<V, F>(
    mut stack: Vec<MinMaxHeap<V>>,
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
                output.set(cursor, bucket.get(0));
                cursor += 1;
                bucket.release(pool);
            }
            2 => {
                // Root is the max; the sole child is the min.
                output.set(cursor, bucket.get(1));
                output.set(cursor + 1, bucket.get(0));
                cursor += 2;
                bucket.release(pool);
            }
            3 => {
                let (max, mid, min) = bucket.max_mid_min();
                output.set(cursor, bucket.get(min));
                output.set(cursor + 1, bucket.get(mid));
                output.set(cursor + 2, bucket.get(max));
                cursor += 3;
                bucket.release(pool);
            }
            _ => case_n(bucket, &mut stack, output, &mut cursor, pool, transform),
        }
    }
}

fn case_n<V, F>(
    bucket: MinMaxHeap<V>,
    stack: &mut Vec<MinMaxHeap<V>>,
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
        let value = bucket.get(0);
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

    let mut sub_buckets: Vec<Option<MinMaxHeap<V>>> = (0..sub_count).map(|_| None).collect();
    for i in 0..parent_len {
        let value = bucket.get(i);
        let index = map.index_of(value, transform, sub_count);
        bucket_push(&mut sub_buckets[index], value, pool);
    }
    bucket.release(pool);

    // Degenerate partition: neither map discriminated, split against the
    // minimum so both halves strictly shrink.
    let occupied = sub_buckets.iter().flatten().count();
    if occupied == 1 {
        for stuck in sub_buckets.into_iter().flatten() {
            debug_assert_eq!(stuck.len(), parent_len);

            let mut low: Option<MinMaxHeap<V>> = None;
            let mut high: Option<MinMaxHeap<V>> = None;
            for i in 0..stuck.len() {
                let value = stuck.get(i);
                let slot = if min < value { &mut high } else { &mut low };
                bucket_push(slot, value, pool);
            }
            stuck.release(pool);

            if let Some(half) = high {
                stack.push(half);
            }
            if let Some(half) = low {
                stack.push(half);
            }
        }
        return;
    }

    for sub in sub_buckets.into_iter().rev().flatten() {
        stack.push(sub);
    }
}

use std::hint::black_box;
use std::time::Duration;

use bbsort::{all_variants, sort_slice, variant_name};
use bench::{random_wide_magnitude, random_with_bits};
use criterion::measurement::Measurement;
use criterion::{
    BenchmarkGroup, BenchmarkId, Criterion, SamplingMode, criterion_group, criterion_main,
};
use rand::Rng;
use rand::rngs::StdRng;
use rand::{SeedableRng, seq::SliceRandom};

const BENCH_SIZES: [usize; 3] = [4096, 65536, 262144];
const BENCH_SAMPLE_SIZE: usize = 10;
const BENCH_WARMUP_MS: u64 = 80;
const BENCH_MEASURE_MS_SMALL: u64 = 150;
const BENCH_MEASURE_MS_LARGE: u64 = 500;

#[derive(Clone, Copy)]
enum Distribution {
    UniformI64,
    WideMagnitudeF64,
    DuplicateHeavy,
    ClusteredNearOneValue,
}

impl Distribution {
    fn label(self) -> &'static str {
        match self {
            Self::UniformI64 => "uniform_i64",
            Self::WideMagnitudeF64 => "wide_magnitude_f64",
            Self::DuplicateHeavy => "duplicate_heavy",
            Self::ClusteredNearOneValue => "clustered",
        }
    }
}

const DISTRIBUTIONS: [Distribution; 4] = [
    Distribution::UniformI64,
    Distribution::WideMagnitudeF64,
    Distribution::DuplicateHeavy,
    Distribution::ClusteredNearOneValue,
];

fn bench_bbsort(c: &mut Criterion) {
    for &dist in &DISTRIBUTIONS {
        let mut group = c.benchmark_group(format!("bbsort/{}", dist.label()));

        for &size in &BENCH_SIZES {
            apply_runtime(&mut group, size);
            let base = generate_f64(dist, size, seed_for(dist, size));

            for &variant in all_variants() {
                group.bench_function(BenchmarkId::new(variant_name(variant), size), |bencher| {
                    bencher.iter_custom(|iters| {
                        let mut total = Duration::ZERO;
                        for _ in 0..iters {
                            let mut data = base.clone();
                            let start = std::time::Instant::now();
                            sort_slice(variant, &mut data);
                            total += start.elapsed();
                            black_box(&data);
                        }
                        total
                    });
                });
            }

            group.bench_function(BenchmarkId::new("std_unstable", size), |bencher| {
                bencher.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    for _ in 0..iters {
                        let mut data = base.clone();
                        let start = std::time::Instant::now();
                        data.sort_unstable_by(|a, b| a.total_cmp(b));
                        total += start.elapsed();
                        black_box(&data);
                    }
                    total
                });
            });
        }

        group.finish();
    }
}

fn bench_least_n(c: &mut Criterion) {
    use bbsort::{ChunkPool, ChunkSeq, least_n};

    let mut group = c.benchmark_group("bbsort/least_n");
    bench::apply_medium_runtime_config(&mut group);

    let size = 262_144;
    let base = generate_f64(Distribution::UniformI64, size, 0x70_0001);
    let mut pool = ChunkPool::new();
    let seq = ChunkSeq::from_slice(&base, &mut pool);

    for &n in &[16_usize, 1024, 65536] {
        group.bench_function(BenchmarkId::new("counting", n), |bencher| {
            bencher.iter(|| black_box(least_n(&seq, n, &mut pool)));
        });
    }

    group.finish();
}

fn apply_runtime<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, size: usize) {
    group.sample_size(BENCH_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(BENCH_WARMUP_MS));
    if size <= 16384 {
        group.sampling_mode(SamplingMode::Auto);
        group.measurement_time(Duration::from_millis(BENCH_MEASURE_MS_SMALL));
    } else {
        group.sampling_mode(SamplingMode::Flat);
        group.measurement_time(Duration::from_millis(BENCH_MEASURE_MS_LARGE));
    }
}

fn generate_f64(dist: Distribution, size: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size);

    match dist {
        Distribution::UniformI64 => {
            for _ in 0..size {
                data.push(rng.random_range(-1_000_000i64..1_000_000) as f64);
            }
        }
        Distribution::WideMagnitudeF64 => {
            for _ in 0..size {
                data.push(random_wide_magnitude(&mut rng, 40.0));
            }
        }
        Distribution::DuplicateHeavy => {
            for _ in 0..size {
                data.push((rng.random_range(0u64..16) * 17) as f64);
            }
        }
        Distribution::ClusteredNearOneValue => {
            // Tight band around 2^40; stresses the raw-domain fallback.
            for _ in 0..size {
                let base = random_with_bits(&mut rng, 10) as f64;
                data.push((1u64 << 40) as f64 + base);
            }
            data.shuffle(&mut rng);
        }
    }

    data
}

#[inline]
fn seed_for(dist: Distribution, size: usize) -> u64 {
    let d = match dist {
        Distribution::UniformI64 => 1_u64,
        Distribution::WideMagnitudeF64 => 2,
        Distribution::DuplicateHeavy => 3,
        Distribution::ClusteredNearOneValue => 4,
    };
    mix_seed(0x5EED_2026 ^ (d << 48) ^ size as u64)
}

#[inline]
fn mix_seed(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

criterion_group!(benches, bench_bbsort, bench_least_n);
criterion_main!(benches);

//! Mauka PDS Benchmarks
//!
//! Insert and query throughput for each structure, measured with Criterion.
//!
//! To run the benchmarks:
//! ```bash
//! cargo bench --features benchmarking
//! ```

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, SamplingMode,
    Throughput,
};
use std::time::Duration;

use mauka_pds_lib::data_structures::cuckoo_filter::CuckooFilterConfig;
use mauka_pds_lib::data_structures::quotient_filter::QuotientFilterConfig;
use mauka_pds_lib::data_structures::{
    BloomFilter, Cardinality, CountingBloomFilter, CuckooFilter, FlajoletMartinCounter, FnvHash,
    HashFactory, LinearCounter, Membership, Murmur3Hash, QuotientFilter, SeededHash,
};

const SIZES: [u64; 3] = [1_000, 10_000, 100_000];

fn configure(c: &mut Criterion, name: &str) -> criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> {
    let mut group = c.benchmark_group(name);
    group.sampling_mode(SamplingMode::Flat);
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));
    group
}

/// Benchmark the hash functions on short keys.
fn bench_hashing(c: &mut Criterion) {
    let mut group = configure(c, "hashing");
    let murmur32: Murmur3Hash<u32> = HashFactory::from_seed(1).create();
    let murmur64: Murmur3Hash<u64> = HashFactory::from_seed(1).create();
    let fnv: FnvHash = HashFactory::from_seed(1).create();
    let key = "https://example.com/some/path?query=1";

    group.throughput(Throughput::Bytes(key.len() as u64));
    group.bench_function("murmur3_u32", |b| b.iter(|| murmur32.value(black_box(key))));
    group.bench_function("murmur3_u64", |b| b.iter(|| murmur64.value(black_box(key))));
    group.bench_function("fnv", |b| b.iter(|| fnv.value(black_box(key))));
    group.finish();
}

/// Benchmark inserts into each membership filter.
fn bench_membership_insert(c: &mut Criterion) {
    let mut group = configure(c, "membership_insert");

    for &size in &SIZES {
        group.throughput(Throughput::Elements(size));

        group.bench_with_input(BenchmarkId::new("bloom", size), &size, |b, &size| {
            b.iter_batched(
                || BloomFilter::<u64>::with_factory(7, (size * 10) as usize, &mut HashFactory::from_seed(1)).unwrap(),
                |mut filter| {
                    for key in 0..size {
                        filter.insert(black_box(&key));
                    }
                    filter
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("counting_bloom", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    CountingBloomFilter::<u64>::with_factory(7, (size * 10) as usize, &mut HashFactory::from_seed(1))
                        .unwrap()
                },
                |mut filter| {
                    for key in 0..size {
                        filter.insert(black_box(&key));
                    }
                    filter
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("cuckoo", size), &size, |b, &size| {
            let config = CuckooFilterConfig::new()
                .with_bucket_count((size / 2) as usize)
                .with_fingerprint_bits(16);
            b.iter_batched(
                || CuckooFilter::<u64>::from_config(&config, &mut HashFactory::from_seed(1)).unwrap(),
                |mut filter| {
                    for key in 0..size {
                        filter.insert(black_box(&key));
                    }
                    filter
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("quotient", size), &size, |b, &size| {
            let quotient_bits = (size * 2).next_power_of_two().trailing_zeros();
            let config = QuotientFilterConfig::new(quotient_bits + 8, quotient_bits);
            b.iter_batched(
                || QuotientFilter::<u64>::from_config(&config, &mut HashFactory::from_seed(1)).unwrap(),
                |mut filter| {
                    for key in 0..size {
                        filter.insert(black_box(&key));
                    }
                    filter
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

/// Benchmark positive and negative lookups at moderate load.
fn bench_membership_query(c: &mut Criterion) {
    let mut group = configure(c, "membership_query");
    let size = 10_000u64;

    let mut bloom = BloomFilter::<u64>::with_factory(7, 100_000, &mut HashFactory::from_seed(1)).unwrap();
    let mut cuckoo = CuckooFilter::<u64>::from_config(
        &CuckooFilterConfig::new().with_bucket_count(4096).with_fingerprint_bits(16),
        &mut HashFactory::from_seed(1),
    )
    .unwrap();
    let mut quotient =
        QuotientFilter::<u64>::from_config(&QuotientFilterConfig::new(23, 15), &mut HashFactory::from_seed(1))
            .unwrap();
    for key in 0..size {
        bloom.insert(&key);
        cuckoo.insert(&key);
        quotient.insert(&key);
    }

    group.throughput(Throughput::Elements(size));
    for (name, offset) in [("hit", 0u64), ("miss", 1_000_000u64)] {
        group.bench_function(BenchmarkId::new("bloom", name), |b| {
            b.iter(|| (offset..offset + size).filter(|key| bloom.contains(black_box(key))).count())
        });
        group.bench_function(BenchmarkId::new("cuckoo", name), |b| {
            b.iter(|| (offset..offset + size).filter(|key| cuckoo.contains(black_box(key))).count())
        });
        group.bench_function(BenchmarkId::new("quotient", name), |b| {
            b.iter(|| (offset..offset + size).filter(|key| quotient.contains(black_box(key))).count())
        });
    }
    group.finish();
}

/// Benchmark cardinality estimator updates.
fn bench_cardinality(c: &mut Criterion) {
    let mut group = configure(c, "cardinality");
    let size = 100_000u64;
    group.throughput(Throughput::Elements(size));

    group.bench_function("flajolet_martin", |b| {
        let mut counter =
            FlajoletMartinCounter::<u64>::with_factory(1024, 32, &mut HashFactory::from_seed(1)).unwrap();
        b.iter(|| {
            for key in 0..size {
                counter.insert(black_box(&key));
            }
            counter.count()
        })
    });
    group.bench_function("linear", |b| {
        let mut counter = LinearCounter::<u64>::with_factory(1 << 20, &mut HashFactory::from_seed(1)).unwrap();
        b.iter(|| {
            for key in 0..size {
                counter.insert(black_box(&key));
            }
            counter.count()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_hashing,
    bench_membership_insert,
    bench_membership_query,
    bench_cardinality
);
criterion_main!(benches);

// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Integration tests for the Bloom filter family.

use std::sync::{Arc, Barrier};
use std::thread;

use mauka_pds_lib::data_structures::bloom_filter::{BloomFilterConfig, BloomParams};
use mauka_pds_lib::data_structures::{
    BloomFilter, BloomFilterCalculator, CountingBloomFilter, HashFactory, Membership,
    SharedFilter,
};
use mauka_pds_lib::PdsError;
use test_case::test_case;

#[test]
fn test_url_filter() {
    let mut filter = BloomFilter::<str>::with_factory(4, 64, &mut HashFactory::from_seed(1)).unwrap();

    filter.insert("https://facebook.com");
    assert!(filter.contains("https://facebook.com"));
    assert!(filter.fill_ratio() > 0.0);
    assert!(filter.fill_ratio() <= 4.0 / 64.0);
}

#[test]
fn test_counting_insert_twice_erase_twice() {
    let mut filter = CountingBloomFilter::<str>::new(3, 512).unwrap();

    filter.insert("kona");
    filter.insert("kona");
    assert!(filter.erase("kona").unwrap());
    assert!(filter.contains("kona"));
    assert!(filter.erase("kona").unwrap());
    assert!(!filter.contains("kona"));
    assert!(matches!(
        filter.erase("kona"),
        Err(PdsError::CounterUnderflow { .. })
    ));
}

#[test]
fn test_calculator_round_trip() {
    let BloomParams {
        hash_count,
        bit_count,
    } = BloomFilterCalculator::optimal_params(1_000_000, 0.01).unwrap();
    assert_eq!(hash_count, 7);
    assert_eq!(bit_count, 9_585_059);

    let fpp =
        BloomFilterCalculator::false_positive_probability(1_000_000, hash_count, bit_count).unwrap();
    assert!((fpp - 0.01).abs() < 0.002, "fpp was {fpp}");
}

#[test_case(0.1; "ten percent")]
#[test_case(0.01; "one percent")]
#[test_case(0.001; "a tenth of a percent")]
fn test_observed_false_positive_rate(rate: f64) {
    let config = BloomFilterConfig::new()
        .with_expected_items(10_000)
        .with_false_positive_rate(rate);
    let mut filter =
        BloomFilter::<u64>::from_config(&config, &mut HashFactory::from_seed(31)).unwrap();

    for key in 0..10_000u64 {
        filter.insert(&key);
    }
    let trials = 100_000u64;
    let false_positives = (1_000_000..1_000_000 + trials)
        .filter(|key| filter.contains(key))
        .count();
    let observed = false_positives as f64 / trials as f64;
    assert!(observed < rate * 2.0, "observed {observed} for target {rate}");
}

#[test]
fn test_clear_is_idempotent() {
    let mut filter = CountingBloomFilter::<str>::new(3, 256).unwrap();
    filter.insert("a");
    filter.clear();
    filter.clear();
    assert!(!filter.contains("a"));
    assert_eq!(filter.fill_ratio(), 0.0);
}

#[test]
fn test_shared_counting_filter() {
    let filter = Arc::new(SharedFilter::new(
        CountingBloomFilter::<str>::with_factory(4, 16_384, &mut HashFactory::from_seed(2))
            .unwrap(),
    ));
    let threads = 4;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let filter = Arc::clone(&filter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..250 {
                    filter.insert::<str>(&format!("t{t}-{i}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for t in 0..threads {
        for i in 0..250 {
            assert!(filter.contains::<str>(&format!("t{t}-{i}")));
        }
    }
}

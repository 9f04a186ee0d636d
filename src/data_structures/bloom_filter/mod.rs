// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Bloom filters.
//!
//! A Bloom filter answers "have I seen this item?" with no false negatives
//! and a tunable false positive rate, using a fixed bit array and a family of
//! independently seeded hashes.
//!
//! # Contents
//!
//! - [`BloomFilter`]: the classic filter. Insert-only; `erase` is rejected.
//! - [`CountingBloomFilter`]: a counter behind every bit, so items can be
//!   removed again. Counter width is a type parameter (`u16` by default).
//! - [`BloomFilterCalculator`]: optimal hash count and bit count for a given
//!   load and target error rate, and the error rate of a given shape.
//! - [`BloomFilterConfig`]: builder that resolves into filter parameters.
//!
//! # Example
//!
//! ```
//! use mauka_pds_lib::data_structures::bloom_filter::{BloomFilter, BloomFilterConfig};
//! use mauka_pds_lib::data_structures::{HashFactory, Membership};
//!
//! let config = BloomFilterConfig::new()
//!     .with_expected_items(10_000)
//!     .with_false_positive_rate(0.001);
//!
//! let mut factory = HashFactory::from_seed(42);
//! let mut filter = BloomFilter::<str>::from_config(&config, &mut factory).unwrap();
//!
//! filter.insert("https://facebook.com");
//! assert!(filter.contains("https://facebook.com"));
//! ```
//!
//! # Sizing
//!
//! For `n` expected items and target rate `p` the calculator uses
//! `k = ceil(-log2 p)` hashes and `m = ceil(-n ln p / (ln 2)^2)` bits. The
//! resulting rate is `(1 - e^(-k n / m))^k`.

mod calculator;
mod config;
mod counting;
mod filter;

// Re-exports
pub use calculator::{BloomFilterCalculator, BloomParams};
pub use config::BloomFilterConfig;
pub use counting::CountingBloomFilter;
pub use filter::BloomFilter;

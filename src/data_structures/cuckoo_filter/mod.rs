// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Cuckoo filter.
//!
//! A membership filter that stores a short fingerprint of every item in one
//! of two candidate buckets. Unlike a Bloom filter it supports deletion, and
//! at low false positive rates it is more compact.
//!
//! # Features
//!
//! - Fingerprints of 2, 4, 8, 16 or 32 bits packed into 64-bit words.
//! - Power-of-two bucket counts so the alternate bucket is a single XOR.
//! - Bounded relocation with random victim selection.
//! - Observable failure: an insertion that exhausts its relocation budget
//!   returns `false` and is counted in [`CuckooFilter::dropped`].
//!
//! # Example
//!
//! ```
//! use mauka_pds_lib::data_structures::cuckoo_filter::{
//!     CuckooFilter, CuckooFilterConfig, EvictionPolicy,
//! };
//! use mauka_pds_lib::data_structures::{HashFactory, Membership};
//!
//! let config = CuckooFilterConfig::new()
//!     .with_bucket_count(1 << 12)
//!     .with_fingerprint_bits(16)
//!     .with_eviction_policy(EvictionPolicy::Rollback);
//!
//! let mut filter = CuckooFilter::<u64>::from_config(&config, &mut HashFactory::from_seed(1)).unwrap();
//! for key in 0..1000u64 {
//!     assert!(filter.insert(&key));
//! }
//! assert!(filter.contains(&999));
//! ```
//!
//! # Saturation
//!
//! With [`EvictionPolicy::DropVictim`] a failed insertion keeps its kicks and
//! discards the last homeless fingerprint. The new item is then stored but an
//! earlier one may no longer be found, so a saturated filter can report false
//! negatives. The default [`EvictionPolicy::Rollback`] never does.

mod config;
mod filter;
mod table;

// Re-exports
pub use config::{CuckooFilterConfig, EvictionPolicy};
pub use filter::CuckooFilter;

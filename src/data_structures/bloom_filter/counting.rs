// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Counting Bloom filter.

use std::fmt;
use std::hash::Hash;

use tracing::warn;

use super::config::BloomFilterConfig;
use super::filter::{bit_position, BloomFilter};
use crate::data_structures::counter::Counter;
use crate::data_structures::hash::{HashFactory, Murmur3Hash, SeededHash};
use crate::data_structures::traits::Membership;
use crate::error::{PdsError, PdsResult};

/// A Bloom filter that supports deletion.
///
/// Every bit carries a counter of width `C`. Bit `i` is set exactly when
/// counter `i` is non-zero, so lookups read the bit array alone.
///
/// A counter that reaches `C::MAX` stays there: once saturated, the number of
/// items behind it is unknown and decrementing could introduce false
/// negatives.
///
/// # Examples
///
/// ```
/// use mauka_pds_lib::data_structures::{CountingBloomFilter, Membership};
///
/// let mut filter = CountingBloomFilter::<str>::new(4, 256).unwrap();
/// filter.insert("kona");
/// filter.insert("kona");
///
/// filter.erase("kona").unwrap();
/// assert!(filter.contains("kona"));
///
/// filter.erase("kona").unwrap();
/// assert!(!filter.contains("kona"));
/// ```
pub struct CountingBloomFilter<T: ?Sized, H: SeededHash = Murmur3Hash<u32>, C: Counter = u16> {
    core: BloomFilter<T, H>,
    counters: Vec<C>,

    /// Positions of the item being erased; reserved for `hash_count` entries
    scratch: Vec<usize>,
}

impl<T: Hash + ?Sized, H: SeededHash, C: Counter> CountingBloomFilter<T, H, C> {
    /// Create a filter with `hash_count` hashes over `bit_count` counters.
    pub fn new(hash_count: usize, bit_count: usize) -> PdsResult<Self> {
        Self::with_factory(hash_count, bit_count, &mut HashFactory::new())
    }

    /// Create a filter drawing its hashes from `factory`.
    pub fn with_factory(
        hash_count: usize,
        bit_count: usize,
        factory: &mut HashFactory<H>,
    ) -> PdsResult<Self> {
        let core = BloomFilter::with_factory(hash_count, bit_count, factory)?;
        Ok(Self {
            core,
            counters: vec![C::default(); bit_count],
            scratch: Vec::with_capacity(hash_count),
        })
    }

    /// Create a filter sized by `config`.
    pub fn from_config(config: &BloomFilterConfig, factory: &mut HashFactory<H>) -> PdsResult<Self> {
        let params = config.resolve()?;
        Self::with_factory(params.hash_count, params.bit_count, factory)
    }

    /// The underlying Bloom filter.
    pub fn as_bloom(&self) -> &BloomFilter<T, H> {
        &self.core
    }

    /// Counter value at `position`.
    pub fn counter(&self, position: usize) -> Option<u64> {
        self.counters.get(position).map(|counter| counter.get())
    }

    /// Fraction of counters that are non-zero.
    pub fn fill_ratio(&self) -> f64 {
        self.core.fill_ratio()
    }
}

impl<T: Hash + ?Sized, H: SeededHash, C: Counter> Membership<T> for CountingBloomFilter<T, H, C> {
    fn insert(&mut self, item: &T) -> bool {
        let bit_count = self.counters.len();
        for hash in &self.core.hashes {
            let position = bit_position(hash, item, bit_count);
            let counter = &mut self.counters[position];
            match counter.checked_increment() {
                Some(next) => {
                    if counter.is_zero() {
                        self.core.bits.set(position);
                    }
                    *counter = next;
                }
                None => warn!(position, "counting bloom filter counter saturated"),
            }
        }
        true
    }

    fn erase(&mut self, item: &T) -> PdsResult<bool> {
        let bit_count = self.counters.len();
        self.scratch.clear();
        for hash in &self.core.hashes {
            self.scratch.push(bit_position(hash, item, bit_count));
        }
        self.scratch.sort_unstable();

        // Check every counter first so a failed erase leaves no trace.
        for group in self.scratch.chunk_by(|a, b| a == b) {
            let position = group[0];
            let counter = self.counters[position];
            if counter != C::MAX && counter.get() < group.len() as u64 {
                return Err(PdsError::CounterUnderflow { position });
            }
        }

        for &position in &self.scratch {
            let counter = &mut self.counters[position];
            if *counter == C::MAX {
                continue;
            }
            if let Some(next) = counter.checked_decrement() {
                *counter = next;
                if next.is_zero() {
                    self.core.bits.unset(position);
                }
            }
        }
        Ok(true)
    }

    fn clear(&mut self) {
        self.core.clear();
        self.counters.iter_mut().for_each(|counter| *counter = C::default());
    }

    fn contains(&self, item: &T) -> bool {
        self.core.contains(item)
    }
}

impl<T: ?Sized, H: SeededHash, C: Counter> fmt::Debug for CountingBloomFilter<T, H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingBloomFilter")
            .field("core", &self.core)
            .field("counter_bits", &(std::mem::size_of::<C>() * 8))
            .finish()
    }
}

// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Linear counting.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::{debug, warn};

use super::config::CardinalityConfig;
use crate::data_structures::bits::BitArray;
use crate::data_structures::hash::{HashFactory, HashWord, Murmur3Hash, SeededHash};
use crate::data_structures::traits::Cardinality;
use crate::error::{PdsError, PdsResult};

/// Linear counting over a bit array.
///
/// Each item sets one bit. With `m` bits of which `z` are still clear the
/// estimate is `-m ln(z / m)`. Accurate while the number of distinct items
/// stays well below `m`; once every bit is set the estimate saturates at
/// `m ln m`.
///
/// # Examples
///
/// ```
/// use mauka_pds_lib::data_structures::{Cardinality, LinearCounter};
///
/// let mut counter = LinearCounter::<str>::new(10_000).unwrap();
/// for word in ["kona", "puka", "niihau", "kona"] {
///     counter.insert(word);
/// }
/// assert!((counter.count() - 3.0).abs() < 0.5);
/// ```
pub struct LinearCounter<T: ?Sized, H: SeededHash = Murmur3Hash<u32>> {
    bits: BitArray,
    hash: H,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized, H: SeededHash> LinearCounter<T, H> {
    /// Create a counter over `bit_count` bits.
    pub fn new(bit_count: usize) -> PdsResult<Self> {
        Self::with_factory(bit_count, &mut HashFactory::new())
    }

    /// Create a counter drawing its hash from `factory`.
    pub fn with_factory(bit_count: usize, factory: &mut HashFactory<H>) -> PdsResult<Self> {
        if bit_count == 0 {
            return Err(PdsError::InvalidConfiguration(
                "linear counter needs at least one bit".to_string(),
            ));
        }
        debug!(bit_count, "created linear counter");

        Ok(Self {
            bits: BitArray::new(bit_count),
            hash: factory.create(),
            _marker: PhantomData,
        })
    }

    /// Create a counter sized by `config`.
    pub fn from_config(config: &CardinalityConfig, factory: &mut HashFactory<H>) -> PdsResult<Self> {
        Self::with_factory(config.linear_bits, factory)
    }

    /// Size of the bit array.
    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }

    /// Fraction of bits set.
    pub fn fill_ratio(&self) -> f64 {
        self.bits.count_ones() as f64 / self.bits.len() as f64
    }
}

impl<T: Hash + ?Sized, H: SeededHash> Cardinality<T> for LinearCounter<T, H> {
    fn insert(&mut self, item: &T) {
        let position = (self.hash.value(item).as_u64() % self.bits.len() as u64) as usize;
        self.bits.set(position);
    }

    fn clear(&mut self) {
        self.bits.reset();
    }

    fn count(&self) -> f64 {
        let size = self.bits.len() as f64;
        let mut zeros = self.bits.count_zeros();
        if zeros == 0 {
            warn!(bit_count = self.bits.len(), "linear counter saturated");
            zeros = 1;
        }
        -size * (zeros as f64 / size).ln()
    }
}

impl<T: ?Sized, H: SeededHash> fmt::Debug for LinearCounter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearCounter")
            .field("bit_count", &self.bits.len())
            .field("bits_set", &self.bits.count_ones())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(bit_count: usize) -> LinearCounter<u64> {
        LinearCounter::with_factory(bit_count, &mut HashFactory::from_seed(17)).unwrap()
    }

    #[test]
    fn test_empty_counts_zero() {
        assert_eq!(seeded(128).count(), 0.0);
    }

    #[test]
    fn test_saturation_is_clamped() {
        let mut counter = seeded(1);
        counter.insert(&5);
        // ln(1/1) would be zero and ln(0/1) infinite; the clamp keeps one zero.
        assert_eq!(counter.count(), 0.0);
        assert!(counter.count().is_finite());
    }

    #[test]
    fn test_saturated_estimate_is_m_ln_m() {
        let mut counter = seeded(8);
        for key in 0..10_000u64 {
            counter.insert(&key);
        }
        assert_eq!(counter.fill_ratio(), 1.0);
        assert!((counter.count() - 8.0 * 8f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_zero_bits() {
        assert!(LinearCounter::<u64>::new(0).is_err());
    }

    #[test]
    fn test_clear() {
        let mut counter = seeded(64);
        counter.insert(&1);
        counter.clear();
        assert_eq!(counter.fill_ratio(), 0.0);
    }
}

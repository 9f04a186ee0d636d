// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Main implementation of the Bloom filter.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::debug;

use super::config::BloomFilterConfig;
use crate::data_structures::bits::BitArray;
use crate::data_structures::hash::{HashFactory, HashWord, Murmur3Hash, SeededHash};
use crate::data_structures::traits::Membership;
use crate::error::{PdsError, PdsResult};

/// A classic Bloom filter.
///
/// Each item sets one bit per hash function. Bits are never cleared except by
/// [`Membership::clear`], so the filter cannot forget items and `erase` is
/// rejected with [`PdsError::UnsupportedOperation`].
///
/// # Type Parameters
///
/// * `T` - The type of items stored in the filter. Unsized types such as `str` work.
/// * `H` - The seeded hash family.
///
/// # Examples
///
/// ```
/// use mauka_pds_lib::data_structures::{BloomFilter, Membership};
///
/// let mut filter = BloomFilter::<str>::new(4, 64).unwrap();
/// filter.insert("https://facebook.com");
///
/// assert!(filter.contains("https://facebook.com"));
/// assert!(filter.erase("https://facebook.com").is_err());
/// ```
pub struct BloomFilter<T: ?Sized, H: SeededHash = Murmur3Hash<u32>> {
    /// Bit array addressed by `hash mod bit_count`
    pub(super) bits: BitArray,

    /// One hash per bit set on insert, with pairwise-distinct seeds
    pub(super) hashes: Vec<H>,

    _marker: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized, H: SeededHash> BloomFilter<T, H> {
    /// Create a filter with `hash_count` hashes over `bit_count` bits.
    ///
    /// Hash seeds come from operating-system entropy.
    pub fn new(hash_count: usize, bit_count: usize) -> PdsResult<Self> {
        Self::with_factory(hash_count, bit_count, &mut HashFactory::new())
    }

    /// Create a filter drawing its hashes from `factory`.
    pub fn with_factory(
        hash_count: usize,
        bit_count: usize,
        factory: &mut HashFactory<H>,
    ) -> PdsResult<Self> {
        if hash_count == 0 {
            return Err(PdsError::InvalidConfiguration(
                "bloom filter needs at least one hash function".to_string(),
            ));
        }
        if bit_count == 0 {
            return Err(PdsError::InvalidConfiguration(
                "bloom filter needs at least one bit".to_string(),
            ));
        }

        let hashes = factory.create_many(hash_count)?;
        debug!(hash_count, bit_count, "created bloom filter");

        Ok(Self {
            bits: BitArray::new(bit_count),
            hashes,
            _marker: PhantomData,
        })
    }

    /// Create a filter sized by `config`.
    pub fn from_config(config: &BloomFilterConfig, factory: &mut HashFactory<H>) -> PdsResult<Self> {
        let params = config.resolve()?;
        Self::with_factory(params.hash_count, params.bit_count, factory)
    }

    /// Number of hash functions.
    pub fn hash_count(&self) -> usize {
        self.hashes.len()
    }

    /// Size of the bit array.
    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }

    /// Fraction of bits currently set.
    pub fn fill_ratio(&self) -> f64 {
        self.bits.count_ones() as f64 / self.bits.len() as f64
    }

    /// False positive rate implied by the current fill, `fill_ratio ^ hash_count`.
    pub fn approximate_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.hashes.len() as i32)
    }
}

/// Bit addressed by `hash` for `item` in an array of `bit_count` bits.
#[inline]
pub(super) fn bit_position<T: Hash + ?Sized, H: SeededHash>(
    hash: &H,
    item: &T,
    bit_count: usize,
) -> usize {
    (hash.value(item).as_u64() % bit_count as u64) as usize
}

impl<T: Hash + ?Sized, H: SeededHash> Membership<T> for BloomFilter<T, H> {
    fn insert(&mut self, item: &T) -> bool {
        let bit_count = self.bits.len();
        for hash in &self.hashes {
            self.bits.set(bit_position(hash, item, bit_count));
        }
        true
    }

    fn erase(&mut self, _item: &T) -> PdsResult<bool> {
        Err(PdsError::UnsupportedOperation {
            structure: "BloomFilter",
            operation: "erase",
        })
    }

    fn clear(&mut self) {
        self.bits.reset();
    }

    fn contains(&self, item: &T) -> bool {
        let bit_count = self.bits.len();
        self.hashes
            .iter()
            .all(|hash| self.bits.get(bit_position(hash, item, bit_count)))
    }
}

impl<T: ?Sized, H: SeededHash> fmt::Debug for BloomFilter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("hash_count", &self.hashes.len())
            .field("bit_count", &self.bits.len())
            .field("bits_set", &self.bits.count_ones())
            .finish()
    }
}

// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Main implementation of the quotient filter.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::debug;

use super::config::QuotientFilterConfig;
use super::table::SlotTable;
use crate::data_structures::counter::SlotCount;
use crate::data_structures::hash::{HashFactory, HashWord, Murmur3Hash, SeededHash};
use crate::data_structures::traits::Membership;
use crate::error::{PdsError, PdsResult};

/// A quotient filter over items of type `T`.
///
/// The low `fingerprint_bits` of an item's hash form its fingerprint. The top
/// `quotient_bits` of the fingerprint pick a slot and the rest is stored there
/// as the remainder. Items whose fingerprints agree are indistinguishable.
///
/// With the default `C = ()` the filter cannot delete. Use
/// [`CountingQuotientFilter`] when removal is needed.
///
/// # Examples
///
/// ```
/// use mauka_pds_lib::data_structures::{Membership, QuotientFilter};
///
/// let mut filter = QuotientFilter::<str>::new(24, 10).unwrap();
/// assert!(filter.insert("niihau"));
/// assert!(filter.contains("niihau"));
/// assert!(filter.erase("niihau").is_err());
/// ```
pub struct QuotientFilter<T: ?Sized, H: SeededHash = Murmur3Hash<u32>, C: SlotCount = ()> {
    table: SlotTable<C>,
    hash: H,
    fingerprint_bits: u32,
    quotient_bits: u32,
    _marker: PhantomData<fn(&T)>,
}

/// Quotient filter with per-slot counters, supporting removal.
///
/// ```
/// use mauka_pds_lib::data_structures::{CountingQuotientFilter, Membership};
///
/// let mut filter = CountingQuotientFilter::<u64>::new(32, 12).unwrap();
/// filter.insert(&7);
/// filter.insert(&7);
///
/// assert!(filter.erase(&7).unwrap());
/// assert!(filter.contains(&7));
/// assert!(filter.erase(&7).unwrap());
/// assert!(!filter.contains(&7));
/// ```
pub type CountingQuotientFilter<T, H = Murmur3Hash<u32>> = QuotientFilter<T, H, u32>;

impl<T: Hash + ?Sized, H: SeededHash, C: SlotCount> QuotientFilter<T, H, C> {
    /// Create a filter keeping `fingerprint_bits` of the hash, `quotient_bits` of
    /// which index the `2^quotient_bits` slots.
    pub fn new(fingerprint_bits: u32, quotient_bits: u32) -> PdsResult<Self> {
        Self::from_config(
            &QuotientFilterConfig::new(fingerprint_bits, quotient_bits),
            &mut HashFactory::new(),
        )
    }

    /// Create a filter from `config`, drawing its hash from `factory`.
    pub fn from_config(config: &QuotientFilterConfig, factory: &mut HashFactory<H>) -> PdsResult<Self> {
        config.validate(<H::Output as HashWord>::BITS)?;
        let table = SlotTable::new(config.slot_count(), config.remainder_bits())?;

        debug!(
            fingerprint_bits = config.fingerprint_bits,
            quotient_bits = config.quotient_bits,
            counting = C::COUNTING,
            "created quotient filter"
        );

        Ok(Self {
            table,
            hash: factory.create(),
            fingerprint_bits: config.fingerprint_bits,
            quotient_bits: config.quotient_bits,
            _marker: PhantomData,
        })
    }

    /// Number of distinct fingerprints stored.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no fingerprints are stored.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Fraction of slots in use.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Fingerprint width.
    pub fn fingerprint_bits(&self) -> u32 {
        self.fingerprint_bits
    }

    /// Quotient width.
    pub fn quotient_bits(&self) -> u32 {
        self.quotient_bits
    }

    /// The backing slot table.
    pub fn table(&self) -> &SlotTable<C> {
        &self.table
    }

    /// Slot index and remainder for `item`.
    pub fn split(&self, item: &T) -> (usize, u64) {
        let fingerprint = self.hash.value(item).as_u64() & low_mask(self.fingerprint_bits);
        let remainder_bits = self.fingerprint_bits - self.quotient_bits;
        let quotient = (fingerprint >> remainder_bits) as usize;
        (quotient, fingerprint & low_mask(remainder_bits))
    }
}

#[inline]
fn low_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

impl<T: Hash + ?Sized, H: SeededHash, C: SlotCount> Membership<T> for QuotientFilter<T, H, C> {
    fn insert(&mut self, item: &T) -> bool {
        let (quotient, remainder) = self.split(item);
        self.table.insert(quotient, remainder)
    }

    fn erase(&mut self, item: &T) -> PdsResult<bool> {
        if !C::COUNTING {
            return Err(PdsError::UnsupportedOperation {
                structure: "QuotientFilter",
                operation: "erase",
            });
        }
        let (quotient, remainder) = self.split(item);
        Ok(self.table.erase(quotient, remainder))
    }

    fn clear(&mut self) {
        self.table.clear();
    }

    fn contains(&self, item: &T) -> bool {
        let (quotient, remainder) = self.split(item);
        self.table.contains(quotient, remainder)
    }
}

impl<T: ?Sized, H: SeededHash, C: SlotCount> fmt::Debug for QuotientFilter<T, H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuotientFilter")
            .field("fingerprint_bits", &self.fingerprint_bits)
            .field("quotient_bits", &self.quotient_bits)
            .field("counting", &C::COUNTING)
            .field("table", &self.table)
            .finish()
    }
}

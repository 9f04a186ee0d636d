// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Flajolet–Martin distinct counter with stochastic averaging.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::debug;

use super::config::{validate_fm_shape, CardinalityConfig};
use crate::data_structures::hash::{HashFactory, HashWord, Murmur3Hash, SeededHash};
use crate::data_structures::traits::Cardinality;
use crate::error::PdsResult;

/// Flajolet–Martin bias correction constant.
pub const PHI: f64 = 0.77351;

/// Probabilistic counting with stochastic averaging.
///
/// The low `register_bits` of an item's hash form its fingerprint. The
/// fingerprint modulo the register count picks a register; the quotient's
/// number of trailing zero bits picks the bit to set in it. The estimate is
/// `registers / PHI * 2^mean`, where `mean` averages, over all registers, the
/// index of the lowest bit still clear.
///
/// # Examples
///
/// ```
/// use mauka_pds_lib::data_structures::{Cardinality, FlajoletMartinCounter};
///
/// let mut counter = FlajoletMartinCounter::<u64>::new(256, 32).unwrap();
/// for key in 0..50_000u64 {
///     counter.insert(&key);
/// }
/// let estimate = counter.count();
/// assert!(estimate > 40_000.0 && estimate < 60_000.0);
/// ```
pub struct FlajoletMartinCounter<T: ?Sized, H: SeededHash = Murmur3Hash<u32>> {
    registers: Vec<u64>,
    register_bits: u32,
    hash: H,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized, H: SeededHash> FlajoletMartinCounter<T, H> {
    /// Create a counter with `register_count` registers of `register_bits` bits.
    pub fn new(register_count: usize, register_bits: u32) -> PdsResult<Self> {
        Self::with_factory(register_count, register_bits, &mut HashFactory::new())
    }

    /// Create a counter drawing its hash from `factory`.
    pub fn with_factory(
        register_count: usize,
        register_bits: u32,
        factory: &mut HashFactory<H>,
    ) -> PdsResult<Self> {
        validate_fm_shape(register_count, register_bits)?;
        debug!(register_count, register_bits, "created flajolet-martin counter");

        Ok(Self {
            registers: vec![0; register_count],
            register_bits,
            hash: factory.create(),
            _marker: PhantomData,
        })
    }

    /// Create a counter sized by `config`.
    pub fn from_config(config: &CardinalityConfig, factory: &mut HashFactory<H>) -> PdsResult<Self> {
        Self::with_factory(config.fm_registers, config.fm_register_bits, factory)
    }

    /// Number of registers.
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    /// Raw register value.
    pub fn register(&self, index: usize) -> Option<u64> {
        self.registers.get(index).copied()
    }

    /// Bit set in a register for a quotient: its trailing zero count, capped
    /// at the top bit, with zero mapping to the top bit.
    fn rank(&self, quotient: u64) -> u32 {
        let top = self.register_bits - 1;
        if quotient == 0 {
            top
        } else {
            quotient.trailing_zeros().min(top)
        }
    }

    /// Index of the lowest clear bit of a register.
    fn first_zero(&self, register: u64) -> u32 {
        (!register).trailing_zeros().min(self.register_bits)
    }
}

impl<T: Hash + ?Sized, H: SeededHash> Cardinality<T> for FlajoletMartinCounter<T, H> {
    fn insert(&mut self, item: &T) {
        let width = self.register_bits.min(<H::Output as HashWord>::BITS);
        let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
        let fingerprint = self.hash.value(item).as_u64() & mask;

        let register_count = self.registers.len() as u64;
        let index = (fingerprint % register_count) as usize;
        let rank = self.rank(fingerprint / register_count);
        self.registers[index] |= 1u64 << rank;
    }

    fn clear(&mut self) {
        self.registers.iter_mut().for_each(|register| *register = 0);
    }

    fn count(&self) -> f64 {
        let register_count = self.registers.len() as f64;
        let total: u64 = self
            .registers
            .iter()
            .map(|&register| u64::from(self.first_zero(register)))
            .sum();
        let mean = total as f64 / register_count;
        register_count / PHI * mean.exp2()
    }
}

impl<T: ?Sized, H: SeededHash> fmt::Debug for FlajoletMartinCounter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlajoletMartinCounter")
            .field("register_count", &self.registers.len())
            .field("register_bits", &self.register_bits)
            .finish()
    }
}

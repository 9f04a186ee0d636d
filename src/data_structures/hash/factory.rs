// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Factory for seeded hashes.

use std::marker::PhantomData;

use hashbrown::HashSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::error::{HashError, Result};
use super::seeded::{HashWord, SeededHash};

/// Draws allowed per requested seed before rejection sampling gives up.
const DRAWS_PER_SEED: usize = 64;

/// Draws always allowed on top of the per-seed allowance.
const BASE_DRAWS: usize = 1024;

/// Creates [`SeededHash`] instances with explicit or random seeds.
///
/// Each factory owns its random source, so two factories never share state.
/// Use [`HashFactory::from_seed`] for reproducible filters in tests and
/// benchmarks.
#[derive(Debug, Clone)]
pub struct HashFactory<H> {
    rng: StdRng,
    _hash: PhantomData<fn() -> H>,
}

impl<H: SeededHash> Default for HashFactory<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: SeededHash> HashFactory<H> {
    /// Create a factory seeded from operating-system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            _hash: PhantomData,
        }
    }

    /// Create a factory whose seed sequence is fully determined by `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            _hash: PhantomData,
        }
    }

    /// Create a hash bound to the given seed.
    pub fn create_with_seed(&self, seed: H::Seed) -> H {
        H::with_seed(seed)
    }

    /// Create a hash with a fresh random seed.
    pub fn create(&mut self) -> H {
        H::with_seed(H::Seed::random(&mut self.rng))
    }

    /// Create `count` hashes whose seeds are pairwise distinct.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::SeedSpaceExhausted`] when `count` exceeds the
    /// number of representable seeds, and [`HashError::SeedGenerationStalled`]
    /// if rejection sampling runs out of draws.
    pub fn create_many(&mut self, count: usize) -> Result<Vec<H>> {
        let seeds = self.distinct_seeds(count)?;
        debug!(count, "created seeded hash family");
        Ok(seeds.into_iter().map(H::with_seed).collect())
    }

    /// Derive an independent random generator from this factory's stream.
    pub(crate) fn derive_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.gen())
    }

    fn distinct_seeds(&mut self, count: usize) -> Result<Vec<H::Seed>> {
        let available = 1u128 << <H::Seed as HashWord>::BITS;
        if count as u128 > available {
            return Err(HashError::SeedSpaceExhausted {
                requested: count,
                available,
            });
        }

        let max_draws = count.saturating_mul(DRAWS_PER_SEED).saturating_add(BASE_DRAWS);
        let mut seen = HashSet::with_capacity(count);
        let mut seeds = Vec::with_capacity(count);
        let mut draws = 0;

        while seeds.len() < count {
            if draws == max_draws {
                return Err(HashError::SeedGenerationStalled {
                    requested: count,
                    generated: seeds.len(),
                    draws,
                });
            }
            draws += 1;

            let seed = H::Seed::random(&mut self.rng);
            if seen.insert(seed) {
                seeds.push(seed);
            } else {
                trace!(%seed, "rejected duplicate seed");
            }
        }

        Ok(seeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::hash::{FnvHash, Murmur3Hash};

    #[test]
    fn test_create_many_yields_distinct_seeds() {
        let mut factory = HashFactory::<Murmur3Hash<u32>>::from_seed(1);
        let hashes = factory.create_many(256).unwrap();

        let seeds: HashSet<u32> = hashes.iter().map(|h| h.seed()).collect();
        assert_eq!(seeds.len(), 256);
    }

    #[test]
    fn test_same_factory_seed_reproduces_family() {
        let mut a = HashFactory::<FnvHash>::from_seed(99);
        let mut b = HashFactory::<FnvHash>::from_seed(99);

        let seeds_a: Vec<u64> = a.create_many(5).unwrap().iter().map(|h| h.seed()).collect();
        let seeds_b: Vec<u64> = b.create_many(5).unwrap().iter().map(|h| h.seed()).collect();
        assert_eq!(seeds_a, seeds_b);
    }

    #[test]
    fn test_create_many_zero_is_empty() {
        let mut factory = HashFactory::<Murmur3Hash>::from_seed(3);
        assert!(factory.create_many(0).unwrap().is_empty());
    }

    #[test]
    fn test_create_with_seed_is_exact() {
        let factory = HashFactory::<Murmur3Hash<u64>>::from_seed(3);
        assert_eq!(factory.create_with_seed(1234).seed(), 1234);
    }

    #[test]
    fn test_create_draws_fresh_seeds() {
        let mut factory = HashFactory::<FnvHash>::from_seed(5);
        let first = factory.create();
        let second = factory.create();
        assert_ne!(first.seed(), second.seed());
    }
}

//! Validation for the per-structure configuration sections.
//!
//! The structure configs live next to the structures and report problems as
//! [`PdsError`](crate::error::PdsError); here those are folded into
//! [`ConfigError::ValidationError`] tagged with the section name.

use serde::{Deserialize, Serialize};

use super::{ConfigResult, Validate};
use crate::data_structures::bloom_filter::BloomFilterConfig;
use crate::data_structures::cardinality::CardinalityConfig;
use crate::data_structures::cuckoo_filter::CuckooFilterConfig;
use crate::data_structures::hash::{DefaultHash, HashFactory, HashWord, SeededHash};
use crate::data_structures::quotient_filter::QuotientFilterConfig;
use crate::error::config::ConfigError;
use crate::error::PdsResult;

/// Output width of the hash structures are built with from a loaded config.
const CONFIG_HASH_BITS: u32 = <<DefaultHash as SeededHash>::Output as HashWord>::BITS;

/// Hash seeding configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    /// Seed for the hash factory's generator; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl HashingConfig {
    /// Build a hash factory honoring `rng_seed`.
    pub fn factory<H: SeededHash>(&self) -> HashFactory<H> {
        match self.rng_seed {
            Some(seed) => HashFactory::from_seed(seed),
            None => HashFactory::new(),
        }
    }
}

fn section<T>(section: &'static str, result: PdsResult<T>) -> ConfigResult<()> {
    result
        .map(|_| ())
        .map_err(|e| ConfigError::ValidationError {
            section,
            message: e.to_string(),
        })
}

impl Validate for HashingConfig {
    fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }
}

impl Validate for BloomFilterConfig {
    fn validate(&self) -> ConfigResult<()> {
        section("bloom", self.resolve())
    }
}

impl Validate for CuckooFilterConfig {
    fn validate(&self) -> ConfigResult<()> {
        section("cuckoo", CuckooFilterConfig::validate(self))
    }
}

impl Validate for QuotientFilterConfig {
    fn validate(&self) -> ConfigResult<()> {
        section("quotient", QuotientFilterConfig::validate(self, CONFIG_HASH_BITS))
    }
}

impl Validate for CardinalityConfig {
    fn validate(&self) -> ConfigResult<()> {
        section("cardinality", self.validate_fm())?;
        section("cardinality", self.validate_linear())
    }
}

// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration for Bloom filters.

use serde::{Deserialize, Serialize};

use super::calculator::{BloomFilterCalculator, BloomParams};
use crate::error::{PdsError, PdsResult};

/// Sizing options for a Bloom filter or counting Bloom filter.
///
/// Either give the expected load and target error rate and let the calculator
/// pick the shape, or pin the hash count and bit count explicitly. Explicit
/// values always win over derived ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomFilterConfig {
    /// Expected number of distinct items
    expected_items: usize,

    /// Target probability of false positives (0.0 to 1.0 exclusive)
    false_positive_rate: f64,

    /// Explicit number of hash functions
    hash_functions: Option<usize>,

    /// Explicit bit array size
    bit_count: Option<usize>,
}

impl BloomFilterConfig {
    /// Create a new default configuration.
    ///
    /// Default values:
    /// - expected_items: 100,000
    /// - false_positive_rate: 0.01 (1%)
    /// - hash_functions: None (derived)
    /// - bit_count: None (derived)
    pub fn new() -> Self {
        Self {
            expected_items: 100_000,
            false_positive_rate: 0.01,
            hash_functions: None,
            bit_count: None,
        }
    }

    /// Set the expected number of items.
    pub fn with_expected_items(mut self, expected_items: usize) -> Self {
        self.expected_items = expected_items;
        self
    }

    /// Set the target false positive rate.
    pub fn with_false_positive_rate(mut self, false_positive_rate: f64) -> Self {
        self.false_positive_rate = false_positive_rate;
        self
    }

    /// Pin the number of hash functions.
    pub fn with_hash_functions(mut self, hash_functions: usize) -> Self {
        self.hash_functions = Some(hash_functions);
        self
    }

    /// Pin the size of the bit array.
    pub fn with_bit_count(mut self, bit_count: usize) -> Self {
        self.bit_count = Some(bit_count);
        self
    }

    /// Get the expected number of items.
    pub fn expected_items(&self) -> usize {
        self.expected_items
    }

    /// Get the target false positive rate.
    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    /// Resolve the final hash count and bit count.
    pub fn resolve(&self) -> PdsResult<BloomParams> {
        let hash_count = match self.hash_functions {
            Some(hash_count) => hash_count,
            None => BloomFilterCalculator::optimal_hash_count(self.false_positive_rate)?,
        };
        let bit_count = match self.bit_count {
            Some(bit_count) => bit_count,
            None => {
                BloomFilterCalculator::optimal_bit_count(self.expected_items, self.false_positive_rate)?
            }
        };

        if hash_count == 0 {
            return Err(PdsError::InvalidConfiguration(
                "hash function count must be greater than 0".to_string(),
            ));
        }
        if bit_count == 0 {
            return Err(PdsError::InvalidConfiguration(
                "bit count must be greater than 0".to_string(),
            ));
        }

        Ok(BloomParams {
            hash_count,
            bit_count,
        })
    }
}

impl Default for BloomFilterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolves_through_calculator() {
        let params = BloomFilterConfig::default().resolve().unwrap();
        assert_eq!(params.hash_count, 7);
        assert_eq!(params.bit_count, 958_506);
    }

    #[test]
    fn test_explicit_values_win() {
        let params = BloomFilterConfig::new()
            .with_hash_functions(4)
            .with_bit_count(64)
            .resolve()
            .unwrap();
        assert_eq!(params, BloomParams { hash_count: 4, bit_count: 64 });
    }

    #[test]
    fn test_explicit_zero_is_rejected() {
        assert!(BloomFilterConfig::new().with_hash_functions(0).resolve().is_err());
        assert!(BloomFilterConfig::new().with_bit_count(0).resolve().is_err());
    }

    #[test]
    fn test_invalid_rate_is_rejected() {
        let config = BloomFilterConfig::new().with_false_positive_rate(1.5);
        assert!(config.resolve().is_err());
    }
}

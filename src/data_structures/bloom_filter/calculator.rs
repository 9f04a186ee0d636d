// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Bloom filter sizing formulas.

use serde::{Deserialize, Serialize};

use crate::error::{PdsError, PdsResult};

/// Hash count and bit count for a Bloom filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomParams {
    /// Number of hash functions
    pub hash_count: usize,
    /// Size of the bit array
    pub bit_count: usize,
}

/// Computes Bloom filter parameters from a capacity and a target error rate.
///
/// # Examples
///
/// ```
/// use mauka_pds_lib::data_structures::bloom_filter::BloomFilterCalculator;
///
/// let params = BloomFilterCalculator::optimal_params(1_000_000, 0.01).unwrap();
/// assert_eq!(params.hash_count, 7);
/// assert_eq!(params.bit_count, 9_585_059);
///
/// let p = BloomFilterCalculator::false_positive_probability(
///     1_000_000,
///     params.hash_count,
///     params.bit_count,
/// )
/// .unwrap();
/// assert!((p - 0.01).abs() < 0.001);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BloomFilterCalculator;

impl BloomFilterCalculator {
    /// Hash count and bit count for `expected_items` at `false_positive_rate`.
    pub fn optimal_params(expected_items: usize, false_positive_rate: f64) -> PdsResult<BloomParams> {
        Ok(BloomParams {
            hash_count: Self::optimal_hash_count(false_positive_rate)?,
            bit_count: Self::optimal_bit_count(expected_items, false_positive_rate)?,
        })
    }

    /// `ceil(-log2 p)`.
    pub fn optimal_hash_count(false_positive_rate: f64) -> PdsResult<usize> {
        check_rate(false_positive_rate)?;
        let hash_count = (-false_positive_rate.log2()).ceil() as usize;
        Ok(hash_count.max(1))
    }

    /// `ceil(-n ln p / (ln 2)^2)`.
    pub fn optimal_bit_count(expected_items: usize, false_positive_rate: f64) -> PdsResult<usize> {
        check_rate(false_positive_rate)?;
        if expected_items == 0 {
            return Err(PdsError::InvalidConfiguration(
                "expected items must be greater than 0".to_string(),
            ));
        }

        let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;
        let bits = -(expected_items as f64) * false_positive_rate.ln() / ln2_squared;
        Ok((bits.ceil() as usize).max(1))
    }

    /// `(1 - e^(-k n / m))^k` for `n` items, `k` hashes and `m` bits.
    pub fn false_positive_probability(
        expected_items: usize,
        hash_count: usize,
        bit_count: usize,
    ) -> PdsResult<f64> {
        if hash_count == 0 || bit_count == 0 {
            return Err(PdsError::InvalidConfiguration(
                "hash count and bit count must be greater than 0".to_string(),
            ));
        }

        let k = hash_count as f64;
        let exponent = -k * expected_items as f64 / bit_count as f64;
        Ok((1.0 - exponent.exp()).powf(k))
    }
}

fn check_rate(false_positive_rate: f64) -> PdsResult<()> {
    if false_positive_rate > 0.0 && false_positive_rate < 1.0 {
        Ok(())
    } else {
        Err(PdsError::InvalidConfiguration(format!(
            "false positive rate must be in (0, 1), got {false_positive_rate}"
        )))
    }
}

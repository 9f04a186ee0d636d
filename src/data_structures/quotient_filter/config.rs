// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration for the quotient filter.

use serde::{Deserialize, Serialize};

use super::slot::MAX_REMAINDER_BITS;
use crate::error::{PdsError, PdsResult};

/// Largest supported quotient width; the table holds `2^quotient_bits` slots.
pub const MAX_QUOTIENT_BITS: u32 = 32;

/// Fingerprint and quotient widths for a quotient filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotientFilterConfig {
    /// Bits of the hash kept as the fingerprint
    pub fingerprint_bits: u32,

    /// High fingerprint bits used as the slot index
    pub quotient_bits: u32,
}

impl Default for QuotientFilterConfig {
    fn default() -> Self {
        Self {
            fingerprint_bits: 32,
            quotient_bits: 16,
        }
    }
}

impl QuotientFilterConfig {
    /// Create a configuration with the given widths.
    pub fn new(fingerprint_bits: u32, quotient_bits: u32) -> Self {
        Self {
            fingerprint_bits,
            quotient_bits,
        }
    }

    /// Width of the stored remainder.
    pub fn remainder_bits(&self) -> u32 {
        self.fingerprint_bits.saturating_sub(self.quotient_bits)
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        1usize << self.quotient_bits
    }

    /// Check the widths against each other and against a `hash_bits`-wide hash.
    pub fn validate(&self, hash_bits: u32) -> PdsResult<()> {
        if self.quotient_bits == 0 || self.quotient_bits > MAX_QUOTIENT_BITS {
            return Err(PdsError::InvalidConfiguration(format!(
                "quotient bits must be in 1..={MAX_QUOTIENT_BITS}; got {}",
                self.quotient_bits
            )));
        }
        if self.fingerprint_bits <= self.quotient_bits {
            return Err(PdsError::InvalidConfiguration(format!(
                "fingerprint bits ({}) must exceed quotient bits ({})",
                self.fingerprint_bits, self.quotient_bits
            )));
        }
        if self.fingerprint_bits > hash_bits {
            return Err(PdsError::InvalidConfiguration(format!(
                "fingerprint bits ({}) exceed the {hash_bits}-bit hash output",
                self.fingerprint_bits
            )));
        }
        if self.remainder_bits() > MAX_REMAINDER_BITS {
            return Err(PdsError::InvalidConfiguration(format!(
                "remainder of {} bits does not fit in a slot (max {MAX_REMAINDER_BITS})",
                self.remainder_bits()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_fits_a_32_bit_hash() {
        let config = QuotientFilterConfig::default();
        assert!(config.validate(32).is_ok());
        assert_eq!(config.remainder_bits(), 16);
        assert_eq!(config.slot_count(), 65_536);
    }

    #[test_case(8, 8, 32 ; "fingerprint not wider than quotient")]
    #[test_case(16, 0, 32 ; "zero quotient")]
    #[test_case(48, 33, 64 ; "quotient too wide")]
    #[test_case(40, 8, 32 ; "fingerprint wider than hash")]
    #[test_case(64, 2, 64 ; "remainder wider than slot")]
    fn test_rejects(fingerprint_bits: u32, quotient_bits: u32, hash_bits: u32) {
        let config = QuotientFilterConfig::new(fingerprint_bits, quotient_bits);
        assert!(config.validate(hash_bits).is_err());
    }

    #[test]
    fn test_widest_remainder_is_accepted() {
        assert!(QuotientFilterConfig::new(64, 3).validate(64).is_ok());
    }
}

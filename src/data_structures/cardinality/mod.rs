// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Distinct-count estimators.
//!
//! Both estimators observe a stream of items and report roughly how many
//! distinct ones went by, in memory independent of that number.
//!
//! - [`LinearCounter`]: one bit per hash bucket; very accurate while the
//!   cardinality is well below the bit count.
//! - [`FlajoletMartinCounter`]: probabilistic counting with stochastic
//!   averaging over many small registers; covers cardinalities far beyond its
//!   memory footprint at a relative error of about `0.78 / sqrt(registers)`.

mod config;
mod fm_counter;
mod linear_counter;

// Re-exports
pub use config::{CardinalityConfig, MAX_REGISTER_BITS};
pub use fm_counter::{FlajoletMartinCounter, PHI};
pub use linear_counter::LinearCounter;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::{Cardinality, HashFactory};

    #[test]
    fn test_counters_from_config() {
        let config = CardinalityConfig {
            fm_registers: 64,
            fm_register_bits: 24,
            linear_bits: 4096,
        };
        let mut factory = HashFactory::from_seed(23);
        let mut fm = FlajoletMartinCounter::<str>::from_config(&config, &mut factory).unwrap();
        let mut linear = LinearCounter::<str>::from_config(&config, &mut factory).unwrap();

        for word in ["a", "b", "c"] {
            fm.insert(word);
            linear.insert(word);
        }
        assert_eq!(fm.register_count(), 64);
        assert_eq!(linear.bit_count(), 4096);
        assert!(linear.count() > 2.5 && linear.count() < 3.5);
    }
}

// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Quotient filter.
//!
//! A compact, cache-friendly membership filter. Each item's fingerprint is
//! split into a *quotient*, which names a home slot, and a *remainder*, which
//! is what actually gets stored. Collisions on the home slot are resolved by
//! linear probing that keeps every quotient's remainders together and sorted,
//! with three flag bits per slot recording enough structure to decode which
//! quotient each stored remainder belongs to.
//!
//! # Slot flags
//!
//! - `occupied`: some stored fingerprint has this slot as its quotient.
//! - `continuation`: the remainder here belongs to the same run as the one in
//!   the previous slot.
//! - `shifted`: the remainder here is not in its home slot.
//!
//! A slot with all three flags clear is empty. See [`Slot`] for the bit layout.
//!
//! # Contents
//!
//! - [`SlotTable`]: the open-addressed table with insertion (shift right),
//!   lookup and deletion (shift left). Usable on its own with explicit
//!   quotients and remainders.
//! - [`QuotientFilter`]: hashes items onto a slot table. Insert-only.
//! - [`CountingQuotientFilter`]: keeps a count per slot and supports `erase`.
//!
//! # Example
//!
//! ```
//! use mauka_pds_lib::data_structures::quotient_filter::{QuotientFilter, QuotientFilterConfig};
//! use mauka_pds_lib::data_structures::{HashFactory, Membership};
//!
//! let config = QuotientFilterConfig::new(28, 12);
//! let mut filter =
//!     QuotientFilter::<str>::from_config(&config, &mut HashFactory::from_seed(5)).unwrap();
//!
//! filter.insert("kahuna");
//! assert!(filter.contains("kahuna"));
//! let (quotient, _) = filter.split("kahuna");
//! assert!(!filter.table().run(quotient).is_empty());
//! ```

mod config;
mod filter;
mod slot;
mod table;

// Re-exports
pub use config::{QuotientFilterConfig, MAX_QUOTIENT_BITS};
pub use filter::{CountingQuotientFilter, QuotientFilter};
pub use slot::{Slot, MAX_REMAINDER_BITS};
pub use table::SlotTable;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::{HashFactory, Membership};

    #[test]
    fn test_no_false_negatives_under_load() {
        let mut filter = QuotientFilter::<u64>::from_config(
            &QuotientFilterConfig::new(32, 10),
            &mut HashFactory::from_seed(9),
        )
        .unwrap();

        // 90% load forces long clusters.
        for key in 0..920u64 {
            assert!(filter.insert(&key));
        }
        for key in 0..920u64 {
            assert!(filter.contains(&key));
        }
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut filter = CountingQuotientFilter::<str>::new(20, 6).unwrap();
        filter.insert("a");
        filter.insert("b");
        filter.clear();
        filter.clear();
        assert!(filter.is_empty());
        assert!(!filter.contains("a"));
    }
}

//! Probabilistic data structures.
//!
//! This module contains approximate membership filters and distinct-count
//! estimators, all built on a shared family of seeded hash functions:
//! - Bloom filters, plain and counting
//! - Cuckoo filters with bounded relocation
//! - Quotient filters, plain and counting, over a linear-probing slot table
//! - Flajolet-Martin and linear-counting cardinality estimators
//!
//! Filters implement [`Membership`], estimators implement [`Cardinality`].
//! No structure synchronizes internally; wrap one in [`SharedFilter`] to share
//! it between threads.

pub mod bits;
pub mod bloom_filter;
pub mod cardinality;
pub mod counter;
pub mod cuckoo_filter;
pub mod hash;
pub mod quotient_filter;
mod shared;
mod traits;

// Re-export common data structures
pub use bloom_filter::{BloomFilter, BloomFilterCalculator, CountingBloomFilter};
pub use cardinality::{FlajoletMartinCounter, LinearCounter};
pub use cuckoo_filter::{CuckooFilter, EvictionPolicy};
pub use hash::{FnvHash, HashFactory, Murmur3Hash, SeededHash};
pub use quotient_filter::{CountingQuotientFilter, QuotientFilter, SlotTable};
pub use shared::SharedFilter;
pub use traits::{Cardinality, Membership};

// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Seeded hash functions shared by every filter and estimator.
//!
//! A [`SeededHash`] is a pure function from an item to an integer word, bound
//! to a seed chosen when the hash is created. Items are fed through
//! [`std::hash::Hash`] into a byte sink, and the captured bytes are handed to
//! the underlying primitive together with the seed. Two hashes with the same
//! seed always agree; hashes with different seeds behave as independent
//! functions, which is what Bloom filters and the cuckoo filter rely on.
//!
//! Hashes are created through a [`HashFactory`], which owns its own random
//! source. The factory can hand out a single hash, a hash with an explicit
//! seed, or a batch of hashes whose seeds are pairwise distinct.
//!
//! # Example
//!
//! ```
//! use mauka_pds_lib::data_structures::hash::{HashFactory, Murmur3Hash, SeededHash};
//!
//! let mut factory = HashFactory::<Murmur3Hash<u64>>::from_seed(7);
//! let hashes = factory.create_many(4).unwrap();
//!
//! // Same seed, same function.
//! let again = factory.create_with_seed(hashes[0].seed());
//! assert_eq!(hashes[0].value("mauka"), again.value("mauka"));
//! ```

mod error;
mod factory;
mod seeded;

// Re-exports
pub use error::{HashError, Result};
pub use factory::HashFactory;
pub use seeded::{FnvHash, HashWord, Murmur3Hash, SeededHash, INLINE_KEY_BYTES};

/// The hash every structure uses unless told otherwise.
pub type DefaultHash = Murmur3Hash<u32>;

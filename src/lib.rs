//! Mauka probabilistic data structures.
//!
//! Approximate membership filters (Bloom, counting Bloom, cuckoo, quotient)
//! and cardinality estimators (Flajolet-Martin, linear counting) parameterized
//! over a family of seeded hash functions. The library is used by the
//! `mauka_pds` binary, but can also be used as a dependency by other projects.
//!
//! # Architecture
//!
//! - [`data_structures`]: the structures, their capability traits and hashing
//! - [`config`]: file and environment driven parameters for every structure
//! - [`error`]: the crate-wide error type and error reporting
//!
//! Structures are single-threaded values; sharing goes through
//! [`data_structures::SharedFilter`].

pub mod config;
pub mod data_structures;
pub mod error;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

pub use data_structures::{Cardinality, Membership};
pub use error::{PdsError, PdsResult};

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

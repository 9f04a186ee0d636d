// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Capability traits implemented by the filters and estimators.

use crate::error::PdsResult;

/// Approximate set membership.
///
/// `contains` may report false positives. False negatives are ruled out for
/// every implementation except a cuckoo filter configured to drop victims
/// once its relocation budget runs out.
pub trait Membership<T: ?Sized> {
    /// Insert `item`, returning whether it is now represented in the filter.
    ///
    /// Only bounded-capacity structures return `false`: a saturated cuckoo
    /// filter or a full quotient filter.
    fn insert(&mut self, item: &T) -> bool;

    /// Remove one copy of `item`, returning whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns [`PdsError::UnsupportedOperation`](crate::error::PdsError::UnsupportedOperation)
    /// for structures that cannot delete, and
    /// [`PdsError::CounterUnderflow`](crate::error::PdsError::CounterUnderflow) when a
    /// counting Bloom filter is asked to remove an item it never saw.
    fn erase(&mut self, item: &T) -> PdsResult<bool>;

    /// Reset to the freshly constructed state.
    fn clear(&mut self);

    /// Whether `item` is probably present.
    fn contains(&self, item: &T) -> bool;
}

/// Approximate count of distinct items.
pub trait Cardinality<T: ?Sized> {
    /// Observe `item`.
    fn insert(&mut self, item: &T);

    /// Forget every observation.
    fn clear(&mut self);

    /// Estimated number of distinct items observed.
    fn count(&self) -> f64;
}

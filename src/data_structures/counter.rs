// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Counter types for counting filters.
//!
//! [`Counter`] is the width-parametric counter used by the counting Bloom
//! filter. [`SlotCount`] is the per-slot payload of the quotient filter's slot
//! table: `()` for the plain table, an unsigned integer for the counting one.

use std::fmt;

/// An unsigned saturating counter.
pub trait Counter: Copy + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + 'static {
    /// Largest representable count.
    const MAX: Self;

    /// Whether the count is zero.
    fn is_zero(self) -> bool;

    /// Add one, or `None` on overflow.
    fn checked_increment(self) -> Option<Self>;

    /// Subtract one, or `None` on underflow.
    fn checked_decrement(self) -> Option<Self>;

    /// Widen to `u64`.
    fn get(self) -> u64;
}

/// Per-slot multiplicity stored alongside a quotient filter remainder.
pub trait SlotCount: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Whether the table tracks multiplicities and therefore supports removal.
    const COUNTING: bool;

    /// Count of a freshly stored entry.
    fn one() -> Self;

    /// Whether the count is zero. Always true for `()`.
    fn is_zero(self) -> bool;

    /// Record another copy; saturates at the counter maximum.
    fn increment(&mut self);

    /// Drop one copy, returning whether copies remain.
    fn decrement(&mut self) -> bool;

    /// Multiplicity as `u64`; `()` counts as one.
    fn get(self) -> u64;
}

impl SlotCount for () {
    const COUNTING: bool = false;

    fn one() -> Self {}

    fn is_zero(self) -> bool {
        true
    }

    fn increment(&mut self) {}

    fn decrement(&mut self) -> bool {
        false
    }

    fn get(self) -> u64 {
        1
    }
}

macro_rules! impl_counter {
    ($($ty:ty),*) => {
        $(
            impl Counter for $ty {
                const MAX: Self = <$ty>::MAX;

                #[inline]
                fn is_zero(self) -> bool {
                    self == 0
                }

                #[inline]
                fn checked_increment(self) -> Option<Self> {
                    self.checked_add(1)
                }

                #[inline]
                fn checked_decrement(self) -> Option<Self> {
                    self.checked_sub(1)
                }

                #[inline]
                fn get(self) -> u64 {
                    self as u64
                }
            }

            impl SlotCount for $ty {
                const COUNTING: bool = true;

                fn one() -> Self {
                    1
                }

                fn is_zero(self) -> bool {
                    self == 0
                }

                fn increment(&mut self) {
                    *self = self.saturating_add(1);
                }

                fn decrement(&mut self) -> bool {
                    *self = self.saturating_sub(1);
                    *self > 0
                }

                fn get(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_counter!(u8, u16, u32, u64);

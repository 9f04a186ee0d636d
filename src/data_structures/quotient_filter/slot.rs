// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Packed quotient filter slot.
//!
//! Layout of the 64-bit word, least significant bit first:
//!
//! | bits  | field                                   |
//! |-------|-----------------------------------------|
//! | 0     | `occupied`: some fingerprint has this slot as its quotient |
//! | 1     | `continuation`: this slot continues the run of the slot before it |
//! | 2     | `shifted`: the remainder here is not in its canonical slot |
//! | 3..64 | remainder, at most 61 bits              |

/// Maximum remainder width that fits beside the flags.
pub const MAX_REMAINDER_BITS: u32 = 64 - FLAG_BITS;

const FLAG_BITS: u32 = 3;
const OCCUPIED: u64 = 1 << 0;
const CONTINUATION: u64 = 1 << 1;
const SHIFTED: u64 = 1 << 2;
const FLAG_MASK: u64 = OCCUPIED | CONTINUATION | SHIFTED;

/// One slot of a quotient filter table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot(u64);

impl Slot {
    /// Whether some stored fingerprint has this slot as its quotient.
    #[inline]
    pub fn is_occupied(self) -> bool {
        self.0 & OCCUPIED != 0
    }

    /// Whether this slot continues the run started before it.
    #[inline]
    pub fn is_continuation(self) -> bool {
        self.0 & CONTINUATION != 0
    }

    /// Whether the remainder here was pushed away from its canonical slot.
    #[inline]
    pub fn is_shifted(self) -> bool {
        self.0 & SHIFTED != 0
    }

    /// Whether all three flags are clear.
    #[inline]
    pub fn flags_clear(self) -> bool {
        self.0 & FLAG_MASK == 0
    }

    /// Stored remainder.
    #[inline]
    pub fn remainder(self) -> u64 {
        self.0 >> FLAG_BITS
    }

    #[inline]
    pub(super) fn set_occupied(&mut self, value: bool) {
        self.set_flag(OCCUPIED, value);
    }

    #[inline]
    pub(super) fn set_continuation(&mut self, value: bool) {
        self.set_flag(CONTINUATION, value);
    }

    #[inline]
    pub(super) fn set_shifted(&mut self, value: bool) {
        self.set_flag(SHIFTED, value);
    }

    /// Replace the remainder. Callers mask it to the table's width first.
    #[inline]
    pub(super) fn set_remainder(&mut self, remainder: u64) {
        self.0 = (self.0 & FLAG_MASK) | (remainder << FLAG_BITS);
    }

    #[inline]
    fn set_flag(&mut self, flag: u64, value: bool) {
        if value {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_independent() {
        let mut slot = Slot::default();
        assert!(slot.flags_clear());

        slot.set_continuation(true);
        slot.set_shifted(true);
        assert!(!slot.is_occupied());
        assert!(slot.is_continuation() && slot.is_shifted());

        slot.set_continuation(false);
        assert!(slot.is_shifted() && !slot.is_continuation());
    }

    #[test]
    fn test_remainder_does_not_touch_flags() {
        let mut slot = Slot::default();
        slot.set_occupied(true);
        slot.set_remainder((1 << MAX_REMAINDER_BITS) - 1);

        assert!(slot.is_occupied());
        assert!(!slot.is_shifted());
        assert_eq!(slot.remainder(), (1 << MAX_REMAINDER_BITS) - 1);

        slot.set_remainder(5);
        assert_eq!(slot.remainder(), 5);
        assert!(slot.is_occupied());
    }
}

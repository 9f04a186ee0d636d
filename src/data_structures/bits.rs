// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Fixed-size bit array packed into 64-bit words.

/// A fixed-length array of bits.
///
/// Bit `i` lives in word `i / 64` at position `i % 64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitArray {
    words: Vec<u64>,
    len: usize,
}

impl BitArray {
    /// Create an array of `len` cleared bits.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Number of bits in the array.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no bits at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read bit `index`.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        let (word_index, bit_mask) = Self::locate(index);
        self.words[word_index] & bit_mask != 0
    }

    /// Set bit `index`, returning whether it was previously clear.
    #[inline]
    pub fn set(&mut self, index: usize) -> bool {
        let (word_index, bit_mask) = Self::locate(index);
        let old_val = self.words[word_index];
        self.words[word_index] = old_val | bit_mask;
        old_val & bit_mask == 0
    }

    /// Clear bit `index`.
    #[inline]
    pub fn unset(&mut self, index: usize) {
        let (word_index, bit_mask) = Self::locate(index);
        self.words[word_index] &= !bit_mask;
    }

    /// Clear every bit.
    pub fn reset(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Number of clear bits.
    pub fn count_zeros(&self) -> usize {
        self.len - self.count_ones()
    }

    #[inline]
    fn locate(index: usize) -> (usize, u64) {
        let word_index = index / 64;
        let bit_index = index % 64;
        (word_index, 1u64 << bit_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_across_words() {
        let mut bits = BitArray::new(130);
        assert!(bits.set(0));
        assert!(bits.set(64));
        assert!(bits.set(129));
        assert!(!bits.set(64));

        assert!(bits.get(0) && bits.get(64) && bits.get(129));
        assert!(!bits.get(1));
        assert_eq!(bits.count_ones(), 3);
        assert_eq!(bits.count_zeros(), 127);
    }

    #[test]
    fn test_unset_and_reset() {
        let mut bits = BitArray::new(10);
        bits.set(3);
        bits.set(7);
        bits.unset(3);
        assert!(!bits.get(3));
        assert!(bits.get(7));

        bits.reset();
        assert_eq!(bits.count_ones(), 0);
        assert_eq!(bits.len(), 10);
    }
}

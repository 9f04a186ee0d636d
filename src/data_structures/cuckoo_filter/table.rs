// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Packed fingerprint table.
//!
//! Slot `k` of bucket `b` occupies bits `(b * slots + k) * fingerprint_bits`
//! onwards, counted from the least significant bit of word 0. Fingerprint
//! widths are powers of two no wider than 32 bits, so a slot never straddles
//! two words. With 4-bit fingerprints a byte holds two slots, low nibble
//! first. A zero fingerprint marks an empty slot.

/// Fixed-size table of fingerprint buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct CuckooTable {
    words: Vec<u64>,
    bucket_count: usize,
    slots_per_bucket: usize,
    fingerprint_bits: u32,
    mask: u64,
}

impl CuckooTable {
    /// Allocate an empty table. Callers validate the shape.
    pub(super) fn new(bucket_count: usize, slots_per_bucket: usize, fingerprint_bits: u32) -> Self {
        let total_bits = bucket_count * slots_per_bucket * fingerprint_bits as usize;
        Self {
            words: vec![0; total_bits.div_ceil(64)],
            bucket_count,
            slots_per_bucket,
            fingerprint_bits,
            mask: (1u64 << fingerprint_bits) - 1,
        }
    }

    pub(super) fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    pub(super) fn slots_per_bucket(&self) -> usize {
        self.slots_per_bucket
    }

    #[inline]
    fn locate(&self, bucket: usize, slot: usize) -> (usize, u32) {
        let bit = (bucket * self.slots_per_bucket + slot) * self.fingerprint_bits as usize;
        (bit / 64, (bit % 64) as u32)
    }

    /// Fingerprint stored in `slot` of `bucket`; zero when empty.
    #[inline]
    pub(super) fn get(&self, bucket: usize, slot: usize) -> u64 {
        let (word, shift) = self.locate(bucket, slot);
        (self.words[word] >> shift) & self.mask
    }

    #[inline]
    fn put(&mut self, bucket: usize, slot: usize, fingerprint: u64) {
        let (word, shift) = self.locate(bucket, slot);
        let cleared = self.words[word] & !(self.mask << shift);
        self.words[word] = cleared | ((fingerprint & self.mask) << shift);
    }

    /// Store `fingerprint` in the first free slot of `bucket`.
    pub(super) fn try_insert(&mut self, bucket: usize, fingerprint: u64) -> bool {
        for slot in 0..self.slots_per_bucket {
            if self.get(bucket, slot) == 0 {
                self.put(bucket, slot, fingerprint);
                return true;
            }
        }
        false
    }

    pub(super) fn contains(&self, bucket: usize, fingerprint: u64) -> bool {
        (0..self.slots_per_bucket).any(|slot| self.get(bucket, slot) == fingerprint)
    }

    /// Remove one copy of `fingerprint` from `bucket`.
    pub(super) fn remove(&mut self, bucket: usize, fingerprint: u64) -> bool {
        for slot in 0..self.slots_per_bucket {
            if self.get(bucket, slot) == fingerprint {
                self.put(bucket, slot, 0);
                return true;
            }
        }
        false
    }

    /// Replace the fingerprint in `slot` of `bucket`, returning the previous one.
    pub(super) fn swap(&mut self, bucket: usize, slot: usize, fingerprint: u64) -> u64 {
        let previous = self.get(bucket, slot);
        self.put(bucket, slot, fingerprint);
        previous
    }

    pub(super) fn clear(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibbles_pack_low_first() {
        let mut table = CuckooTable::new(2, 4, 4);
        assert_eq!(table.words.len(), 1);

        assert!(table.try_insert(0, 0xA));
        assert!(table.try_insert(0, 0xB));
        assert!(table.try_insert(1, 0x3));

        assert_eq!(table.words[0] & 0xFF, 0xBA);
        // Bucket 1 starts at bit 16.
        assert_eq!((table.words[0] >> 16) & 0xF, 0x3);
    }

    #[test]
    fn test_bucket_fills_then_rejects() {
        let mut table = CuckooTable::new(4, 2, 8);
        assert!(table.try_insert(3, 7));
        assert!(table.try_insert(3, 9));
        assert!(!table.try_insert(3, 11));
        assert!(table.contains(3, 9));
        assert!(!table.contains(2, 9));
    }

    #[test]
    fn test_remove_takes_one_copy() {
        let mut table = CuckooTable::new(1, 4, 16);
        table.try_insert(0, 500);
        table.try_insert(0, 500);

        assert!(table.remove(0, 500));
        assert!(table.contains(0, 500));
        assert!(table.remove(0, 500));
        assert!(!table.remove(0, 500));
    }

    #[test]
    fn test_swap_and_clear() {
        let mut table = CuckooTable::new(2, 2, 32);
        table.try_insert(1, 0xDEAD_BEEF);
        assert_eq!(table.swap(1, 0, 0x1234), 0xDEAD_BEEF);
        assert_eq!(table.get(1, 0), 0x1234);

        table.clear();
        assert_eq!(table.get(1, 0), 0);
    }

    #[test]
    fn test_neighbouring_slots_are_untouched() {
        let mut table = CuckooTable::new(1, 8, 8);
        for slot in 0..8 {
            table.put(0, slot, slot as u64 + 1);
        }
        table.put(0, 3, 0xFF);
        let values: Vec<u64> = (0..8).map(|slot| table.get(0, slot)).collect();
        assert_eq!(values, vec![1, 2, 3, 0xFF, 5, 6, 7, 8]);
    }
}

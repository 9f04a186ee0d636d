// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Seeded hash primitives.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::marker::PhantomData;

use fnv::FnvHasher;
use rand::Rng;

/// An unsigned machine word produced by a hash or used as its seed.
pub trait HashWord:
    Copy + Default + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Width of the word in bits.
    const BITS: u32;

    /// Keep the low bits of a 128-bit digest.
    fn truncate(wide: u128) -> Self;

    /// Widen to `u64`.
    fn as_u64(self) -> u64;

    /// Draw a uniformly distributed word.
    fn random<R: Rng>(rng: &mut R) -> Self;
}

macro_rules! impl_hash_word {
    ($($ty:ty),*) => {
        $(
            impl HashWord for $ty {
                const BITS: u32 = <$ty>::BITS;

                #[inline]
                fn truncate(wide: u128) -> Self {
                    wide as $ty
                }

                #[inline]
                fn as_u64(self) -> u64 {
                    self as u64
                }

                fn random<R: Rng>(rng: &mut R) -> Self {
                    rng.gen()
                }
            }
        )*
    };
}

impl_hash_word!(u32, u64);

/// A hash function bound to an immutable seed.
///
/// Implementors only provide the byte-level primitive [`SeededHash::hash_bytes`];
/// [`SeededHash::value`] adapts any `T: Hash` onto it.
pub trait SeededHash: fmt::Debug + Sized {
    /// Seed type. Its width bounds how many distinct functions exist.
    type Seed: HashWord;

    /// Output word type.
    type Output: HashWord;

    /// Build the hash bound to `seed`.
    fn with_seed(seed: Self::Seed) -> Self;

    /// The seed this hash was built with.
    fn seed(&self) -> Self::Seed;

    /// Hash a raw byte string.
    fn hash_bytes(&self, bytes: &[u8]) -> Self::Output;

    /// Hash any item through its [`Hash`] implementation.
    ///
    /// The item's hash stream is captured byte for byte and passed to
    /// [`SeededHash::hash_bytes`], so equal items always produce equal values.
    /// Streams up to [`INLINE_KEY_BYTES`] long are captured on the stack.
    fn value<T: Hash + ?Sized>(&self, item: &T) -> Self::Output {
        let mut sink = ByteSink::new();
        item.hash(&mut sink);
        self.hash_bytes(sink.as_bytes())
    }
}

/// Longest item hash stream [`SeededHash::value`] captures without touching
/// the heap.
pub const INLINE_KEY_BYTES: usize = 256;

/// Captures the byte stream an item writes into a [`Hasher`].
///
/// Bytes land in a fixed inline buffer and spill to the heap only once an
/// item writes more than [`INLINE_KEY_BYTES`].
struct ByteSink {
    inline: [u8; INLINE_KEY_BYTES],
    len: usize,
    spill: Option<Vec<u8>>,
}

impl ByteSink {
    fn new() -> Self {
        Self {
            inline: [0; INLINE_KEY_BYTES],
            len: 0,
            spill: None,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        match &self.spill {
            Some(spill) => spill,
            None => &self.inline[..self.len],
        }
    }
}

impl Hasher for ByteSink {
    fn write(&mut self, bytes: &[u8]) {
        if let Some(spill) = self.spill.as_mut() {
            spill.extend_from_slice(bytes);
            return;
        }

        let end = self.len + bytes.len();
        if end <= INLINE_KEY_BYTES {
            self.inline[self.len..end].copy_from_slice(bytes);
            self.len = end;
        } else {
            let mut spill = Vec::with_capacity(end.max(2 * INLINE_KEY_BYTES));
            spill.extend_from_slice(&self.inline[..self.len]);
            spill.extend_from_slice(bytes);
            self.spill = Some(spill);
        }
    }

    /// The digest comes from [`SeededHash::hash_bytes`]; nothing reads this.
    fn finish(&self) -> u64 {
        0
    }
}

/// MurmurHash3 (x64, 128-bit) truncated to the output word `S`.
///
/// Seeds are 32 bits wide, matching the reference algorithm.
pub struct Murmur3Hash<S = u32> {
    seed: u32,
    _word: PhantomData<fn() -> S>,
}

impl<S> fmt::Debug for Murmur3Hash<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Murmur3Hash").field("seed", &self.seed).finish()
    }
}

impl<S> Clone for Murmur3Hash<S> {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            _word: PhantomData,
        }
    }
}

impl<S: HashWord> SeededHash for Murmur3Hash<S> {
    type Seed = u32;
    type Output = S;

    fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            _word: PhantomData,
        }
    }

    fn seed(&self) -> u32 {
        self.seed
    }

    fn hash_bytes(&self, bytes: &[u8]) -> S {
        // Reading from an in-memory cursor cannot fail.
        let digest = murmur3::murmur3_x64_128(&mut Cursor::new(bytes), self.seed).unwrap_or(0);
        S::truncate(digest)
    }
}

/// FNV-1a with the seed used as the offset basis.
///
/// Streams items straight into the hasher, so it never buffers key bytes.
#[derive(Debug, Clone)]
pub struct FnvHash {
    seed: u64,
}

impl SeededHash for FnvHash {
    type Seed = u64;
    type Output = u64;

    fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        let mut hasher = FnvHasher::with_key(self.seed);
        hasher.write(bytes);
        hasher.finish()
    }

    fn value<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        let mut hasher = FnvHasher::with_key(self.seed);
        item.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murmur_is_deterministic_per_seed() {
        let a = Murmur3Hash::<u32>::with_seed(11);
        let b = Murmur3Hash::<u32>::with_seed(11);
        let c = Murmur3Hash::<u32>::with_seed(12);

        assert_eq!(a.hash_bytes(b"mauka"), b.hash_bytes(b"mauka"));
        assert_ne!(a.hash_bytes(b"mauka"), c.hash_bytes(b"mauka"));
    }

    #[test]
    fn test_wide_output_keeps_low_half() {
        let narrow = Murmur3Hash::<u32>::with_seed(5);
        let wide = Murmur3Hash::<u64>::with_seed(5);

        let low = wide.hash_bytes(b"kona") as u32;
        assert_eq!(narrow.hash_bytes(b"kona"), low);
    }

    #[test]
    fn test_fnv_value_matches_streamed_bytes() {
        let hash = FnvHash::with_seed(0xcbf2_9ce4_8422_2325);
        // `str` hashes as its bytes followed by a 0xff terminator.
        let mut bytes = b"puka".to_vec();
        bytes.push(0xff);

        assert_eq!(hash.value("puka"), hash.hash_bytes(&bytes));
    }

    #[test]
    fn test_value_routes_through_hash_bytes() {
        let hash = Murmur3Hash::<u64>::with_seed(9);
        let mut bytes = b"niihau".to_vec();
        bytes.push(0xff);

        assert_eq!(hash.value("niihau"), hash.hash_bytes(&bytes));
    }

    #[test]
    fn test_oversized_items_spill_without_changing_the_digest() {
        let hash = Murmur3Hash::<u64>::with_seed(21);
        let long = "kauai-".repeat(INLINE_KEY_BYTES / 4);
        let mut bytes = long.as_bytes().to_vec();
        bytes.push(0xff);

        assert!(bytes.len() > INLINE_KEY_BYTES);
        assert_eq!(hash.value(long.as_str()), hash.hash_bytes(&bytes));
    }

    #[test]
    fn test_sink_collects_writes_across_the_inline_boundary() {
        let mut sink = ByteSink::new();
        sink.write(&[1; INLINE_KEY_BYTES - 1]);
        sink.write(&[2, 3]);
        sink.write(&[4]);

        let bytes = sink.as_bytes();
        assert_eq!(bytes.len(), INLINE_KEY_BYTES + 2);
        assert_eq!(&bytes[INLINE_KEY_BYTES - 2..], &[1, 2, 3, 4]);
        assert_eq!(sink.finish(), 0);
    }

    #[test]
    fn test_hash_word_widths() {
        assert_eq!(<u32 as HashWord>::BITS, 32);
        assert_eq!(<u64 as HashWord>::BITS, 64);
        assert_eq!(<u32 as HashWord>::truncate(u128::MAX), u32::MAX);
        assert_eq!(<u64 as HashWord>::truncate((1u128 << 64) | 7), 7);
    }
}

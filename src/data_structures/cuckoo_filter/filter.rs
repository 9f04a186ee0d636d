// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Main implementation of the cuckoo filter.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, trace, warn};

use super::config::{CuckooFilterConfig, EvictionPolicy};
use super::table::CuckooTable;
use crate::data_structures::hash::{HashFactory, HashWord, Murmur3Hash, SeededHash};
use crate::data_structures::traits::Membership;
use crate::error::{PdsError, PdsResult};

/// A cuckoo filter storing short fingerprints in two candidate buckets.
///
/// An item's fingerprint and primary bucket both come from one hash; the
/// alternate bucket is the primary XOR a hash of the fingerprint, so either
/// bucket can be recovered from the other and the fingerprint alone. When both
/// buckets are full the filter relocates resident fingerprints, at most
/// `max_kicks` times per insertion.
///
/// Placement differs from the textbook `h mod 2^f` and `h mod N`: the
/// fingerprint is `h mod (2^f - 1) + 1`, so zero never names a stored item,
/// and the primary bucket is `h` rotated right by `f` bits, then reduced mod
/// the bucket count, so bucket and fingerprint use different hash bits.
///
/// An insertion that runs out of kicks returns `false`. What happens to the
/// filter then depends on the [`EvictionPolicy`]: the default rolls the kicks
/// back, while [`EvictionPolicy::DropVictim`] keeps them and drops the last
/// homeless fingerprint, which may belong to an earlier item.
///
/// # Examples
///
/// ```
/// use mauka_pds_lib::data_structures::{CuckooFilter, Membership};
///
/// let mut filter = CuckooFilter::<str>::new(256, 4, 16, 500).unwrap();
/// assert!(filter.insert("puka"));
/// assert!(filter.contains("puka"));
///
/// assert!(filter.erase("puka").unwrap());
/// assert!(!filter.contains("puka"));
/// ```
pub struct CuckooFilter<T: ?Sized, H: SeededHash = Murmur3Hash<u32>> {
    table: CuckooTable,

    /// Hash producing the fingerprint and the primary bucket
    fingerprint_hash: H,

    /// Hash of the fingerprint used to derive the alternate bucket
    bucket_hash: H,

    fingerprint_bits: u32,
    max_kicks: usize,
    policy: EvictionPolicy,

    /// Victim selection
    rng: StdRng,

    /// Slots touched by the current kick chain, reserved for `max_kicks` entries
    kick_path: Vec<(usize, usize)>,

    len: usize,
    dropped: usize,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized, H: SeededHash> CuckooFilter<T, H> {
    /// Create a filter with the rollback policy and hashes seeded from entropy.
    ///
    /// # Arguments
    ///
    /// * `bucket_count` - Requested buckets, rounded up to a power of two
    /// * `slots_per_bucket` - Fingerprints per bucket
    /// * `fingerprint_bits` - 2, 4, 8, 16 or 32, and no wider than the hash output
    /// * `max_kicks` - Relocation budget per insertion
    pub fn new(
        bucket_count: usize,
        slots_per_bucket: usize,
        fingerprint_bits: u32,
        max_kicks: usize,
    ) -> PdsResult<Self> {
        let config = CuckooFilterConfig::new()
            .with_bucket_count(bucket_count)
            .with_slots_per_bucket(slots_per_bucket)
            .with_fingerprint_bits(fingerprint_bits)
            .with_max_kicks(max_kicks);
        Self::from_config(&config, &mut HashFactory::new())
    }

    /// Create a filter from `config`, drawing hashes and victim selection from `factory`.
    pub fn from_config(config: &CuckooFilterConfig, factory: &mut HashFactory<H>) -> PdsResult<Self> {
        config.validate()?;
        let output_bits = <H::Output as HashWord>::BITS;
        if config.fingerprint_bits > output_bits {
            return Err(PdsError::InvalidConfiguration(format!(
                "fingerprint bits {} exceed the {output_bits}-bit hash output",
                config.fingerprint_bits
            )));
        }

        let bucket_count = config.effective_bucket_count()?;
        let mut hashes = factory.create_many(2)?;
        let bucket_hash = hashes.pop();
        let fingerprint_hash = hashes.pop();
        let (Some(fingerprint_hash), Some(bucket_hash)) = (fingerprint_hash, bucket_hash) else {
            return Err(PdsError::InvalidConfiguration(
                "hash factory returned too few hashes".to_string(),
            ));
        };

        debug!(
            bucket_count,
            slots_per_bucket = config.slots_per_bucket,
            fingerprint_bits = config.fingerprint_bits,
            max_kicks = config.max_kicks,
            policy = ?config.eviction_policy,
            "created cuckoo filter"
        );

        Ok(Self {
            table: CuckooTable::new(bucket_count, config.slots_per_bucket, config.fingerprint_bits),
            fingerprint_hash,
            bucket_hash,
            fingerprint_bits: config.fingerprint_bits,
            max_kicks: config.max_kicks,
            policy: config.eviction_policy,
            rng: factory.derive_rng(),
            kick_path: Vec::with_capacity(config.max_kicks),
            len: 0,
            dropped: 0,
            _marker: PhantomData,
        })
    }

    /// Number of fingerprints stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no fingerprints are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.table.bucket_count() * self.table.slots_per_bucket()
    }

    /// Fraction of slots in use.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Number of buckets after rounding.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Insertions that exhausted the relocation budget since construction or the last clear.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Fingerprint and both candidate buckets for `item`.
    fn locate(&self, item: &T) -> (u64, usize, usize) {
        let hash = self.fingerprint_hash.value(item).as_u64();
        // Fingerprints live in 1..2^bits so that zero can mark an empty slot.
        let fingerprint = hash % ((1u64 << self.fingerprint_bits) - 1) + 1;
        let index = index_bits(hash, self.fingerprint_bits, <H::Output as HashWord>::BITS);
        let primary = (index as usize) & (self.table.bucket_count() - 1);
        (fingerprint, primary, self.alternate(primary, fingerprint))
    }

    #[inline]
    fn alternate(&self, bucket: usize, fingerprint: u64) -> usize {
        let offset = self.bucket_hash.value(&fingerprint).as_u64() as usize;
        bucket ^ (offset & (self.table.bucket_count() - 1))
    }

    /// Relocate fingerprints until `fingerprint` finds a home or the budget runs out.
    fn kick(&mut self, fingerprint: u64, primary: usize, alternate: usize) -> bool {
        let mut bucket = if self.rng.gen::<bool>() { primary } else { alternate };
        let mut homeless = fingerprint;
        self.kick_path.clear();

        for _ in 0..self.max_kicks {
            let slot = self.rng.gen_range(0..self.table.slots_per_bucket());
            homeless = self.table.swap(bucket, slot, homeless);
            self.kick_path.push((bucket, slot));

            bucket = self.alternate(bucket, homeless);
            if self.table.try_insert(bucket, homeless) {
                trace!(kicks = self.kick_path.len(), "relocated fingerprints");
                return true;
            }
        }

        if self.policy == EvictionPolicy::Rollback {
            while let Some((bucket, slot)) = self.kick_path.pop() {
                homeless = self.table.swap(bucket, slot, homeless);
            }
        }

        self.dropped += 1;
        warn!(
            max_kicks = self.max_kicks,
            policy = ?self.policy,
            load_factor = self.load_factor(),
            "cuckoo filter relocation budget exhausted"
        );
        false
    }
}

/// `hash` rotated right by the fingerprint width within a `width`-bit word, so
/// the bucket index starts with the bits the fingerprint does not use.
#[inline]
fn index_bits(hash: u64, fingerprint_bits: u32, width: u32) -> u64 {
    if fingerprint_bits >= width {
        return hash;
    }
    (hash >> fingerprint_bits) | (hash << (width - fingerprint_bits))
}

impl<T: Hash + ?Sized, H: SeededHash> Membership<T> for CuckooFilter<T, H> {
    fn insert(&mut self, item: &T) -> bool {
        let (fingerprint, primary, alternate) = self.locate(item);

        let placed = self.table.try_insert(primary, fingerprint)
            || self.table.try_insert(alternate, fingerprint)
            || self.kick(fingerprint, primary, alternate);
        if placed {
            self.len += 1;
        }
        placed
    }

    fn erase(&mut self, item: &T) -> PdsResult<bool> {
        let (fingerprint, primary, alternate) = self.locate(item);

        let removed =
            self.table.remove(primary, fingerprint) || self.table.remove(alternate, fingerprint);
        if removed {
            self.len -= 1;
        }
        Ok(removed)
    }

    fn clear(&mut self) {
        self.table.clear();
        self.len = 0;
        self.dropped = 0;
    }

    fn contains(&self, item: &T) -> bool {
        let (fingerprint, primary, alternate) = self.locate(item);
        self.table.contains(primary, fingerprint) || self.table.contains(alternate, fingerprint)
    }
}

impl<T: ?Sized, H: SeededHash> fmt::Debug for CuckooFilter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuckooFilter")
            .field("bucket_count", &self.table.bucket_count())
            .field("slots_per_bucket", &self.table.slots_per_bucket())
            .field("fingerprint_bits", &self.fingerprint_bits)
            .field("len", &self.len)
            .field("dropped", &self.dropped)
            .finish()
    }
}

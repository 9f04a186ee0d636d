// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration for the cuckoo filter.

use serde::{Deserialize, Serialize};

use crate::error::{PdsError, PdsResult};

/// Default number of buckets.
const DEFAULT_BUCKET_COUNT: usize = 1024;

/// Default slots per bucket.
const DEFAULT_SLOTS_PER_BUCKET: usize = 4;

/// Default fingerprint width in bits.
const DEFAULT_FINGERPRINT_BITS: u32 = 8;

/// Default relocation budget per insertion.
const DEFAULT_MAX_KICKS: usize = 500;

/// Upper bound on the relocation budget; the kick path is reserved up front.
pub(super) const MAX_KICKS_LIMIT: usize = 65_536;

/// What an insertion does when its relocation budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Undo the kick chain. The filter is left exactly as before the call.
    #[default]
    Rollback,

    /// Drop whichever fingerprint is homeless when the budget runs out. That
    /// may be one inserted earlier, which then becomes a false negative.
    DropVictim,
}

/// Configuration for a [`CuckooFilter`](super::CuckooFilter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuckooFilterConfig {
    /// Requested number of buckets, rounded up to a power of two
    pub bucket_count: usize,

    /// Fingerprint slots per bucket
    pub slots_per_bucket: usize,

    /// Fingerprint width: 2, 4, 8, 16 or 32 bits
    pub fingerprint_bits: u32,

    /// Maximum relocations attempted by one insertion
    pub max_kicks: usize,

    /// Behaviour once `max_kicks` is exhausted
    pub eviction_policy: EvictionPolicy,
}

impl Default for CuckooFilterConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            slots_per_bucket: DEFAULT_SLOTS_PER_BUCKET,
            fingerprint_bits: DEFAULT_FINGERPRINT_BITS,
            max_kicks: DEFAULT_MAX_KICKS,
            eviction_policy: EvictionPolicy::default(),
        }
    }
}

impl CuckooFilterConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested bucket count.
    pub fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    /// Set the number of slots per bucket.
    pub fn with_slots_per_bucket(mut self, slots_per_bucket: usize) -> Self {
        self.slots_per_bucket = slots_per_bucket;
        self
    }

    /// Set the fingerprint width.
    pub fn with_fingerprint_bits(mut self, fingerprint_bits: u32) -> Self {
        self.fingerprint_bits = fingerprint_bits;
        self
    }

    /// Set the relocation budget.
    pub fn with_max_kicks(mut self, max_kicks: usize) -> Self {
        self.max_kicks = max_kicks;
        self
    }

    /// Set the eviction policy.
    pub fn with_eviction_policy(mut self, eviction_policy: EvictionPolicy) -> Self {
        self.eviction_policy = eviction_policy;
        self
    }

    /// Bucket count after rounding up to a power of two.
    pub fn effective_bucket_count(&self) -> PdsResult<usize> {
        if self.bucket_count == 0 {
            return Err(PdsError::InvalidConfiguration(
                "bucket count must be greater than 0".to_string(),
            ));
        }
        self.bucket_count.checked_next_power_of_two().ok_or_else(|| {
            PdsError::InvalidConfiguration(format!(
                "bucket count {} cannot be rounded to a power of two",
                self.bucket_count
            ))
        })
    }

    /// Check the construction contract.
    pub fn validate(&self) -> PdsResult<()> {
        let bucket_count = self.effective_bucket_count()?;

        if self.slots_per_bucket == 0 {
            return Err(PdsError::InvalidConfiguration(
                "slots per bucket must be greater than 0".to_string(),
            ));
        }

        if !(2..=32).contains(&self.fingerprint_bits) || !self.fingerprint_bits.is_power_of_two() {
            return Err(PdsError::InvalidConfiguration(format!(
                "fingerprint bits must be one of 2, 4, 8, 16, 32; got {}",
                self.fingerprint_bits
            )));
        }

        if self.max_kicks > MAX_KICKS_LIMIT {
            return Err(PdsError::InvalidConfiguration(format!(
                "max kicks must be at most {MAX_KICKS_LIMIT}; got {}",
                self.max_kicks
            )));
        }

        let total_bits = bucket_count
            .checked_mul(self.slots_per_bucket)
            .and_then(|slots| slots.checked_mul(self.fingerprint_bits as usize));
        if total_bits.is_none() {
            return Err(PdsError::InvalidConfiguration(
                "cuckoo table size overflows".to_string(),
            ));
        }

        Ok(())
    }
}

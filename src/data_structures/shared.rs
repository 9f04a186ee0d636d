// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Lock wrapper for sharing a filter between threads.
//!
//! None of the structures synchronise internally. [`SharedFilter`] puts one
//! behind a [`parking_lot::Mutex`] so callers can insert and query through a
//! shared reference.

use parking_lot::{Mutex, MutexGuard};

use crate::data_structures::traits::Membership;
use crate::error::PdsResult;

/// A membership structure guarded by a mutex.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mauka_pds_lib::data_structures::{BloomFilter, SharedFilter};
///
/// let filter = BloomFilter::<str>::new(4, 1024).unwrap();
/// let shared = Arc::new(SharedFilter::new(filter));
///
/// let writer = Arc::clone(&shared);
/// std::thread::spawn(move || {
///     writer.insert("kahuna");
/// })
/// .join()
/// .unwrap();
///
/// assert!(shared.contains("kahuna"));
/// ```
#[derive(Debug, Default)]
pub struct SharedFilter<M> {
    inner: Mutex<M>,
}

impl<M> SharedFilter<M> {
    /// Wrap `filter`.
    pub fn new(filter: M) -> Self {
        Self {
            inner: Mutex::new(filter),
        }
    }

    /// Lock the filter for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, M> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access to the filter.
    pub fn with<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Unwrap the filter.
    pub fn into_inner(self) -> M {
        self.inner.into_inner()
    }

    /// Insert `item` under the lock.
    pub fn insert<T: ?Sized>(&self, item: &T) -> bool
    where
        M: Membership<T>,
    {
        self.inner.lock().insert(item)
    }

    /// Erase `item` under the lock.
    pub fn erase<T: ?Sized>(&self, item: &T) -> PdsResult<bool>
    where
        M: Membership<T>,
    {
        self.inner.lock().erase(item)
    }

    /// Query `item` under the lock.
    pub fn contains<T: ?Sized>(&self, item: &T) -> bool
    where
        M: Membership<T>,
    {
        self.inner.lock().contains(item)
    }

    /// Clear the filter under the lock.
    pub fn clear<T: ?Sized>(&self)
    where
        M: Membership<T>,
    {
        self.inner.lock().clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::{CountingBloomFilter, HashFactory};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_thread_safety() {
        let mut factory = HashFactory::from_seed(17);
        let filter = CountingBloomFilter::<String>::with_factory(5, 8192, &mut factory).unwrap();
        let shared = Arc::new(SharedFilter::new(filter));
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let shared = Arc::clone(&shared);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..100 {
                        shared.insert(&format!("worker-{worker}-item-{i}"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        for worker in 0..4 {
            for i in 0..100 {
                assert!(shared.contains(&format!("worker-{worker}-item-{i}")));
            }
        }

        shared.clear::<String>();
        assert!(!shared.contains(&"worker-0-item-0".to_string()));
    }

    #[test]
    fn test_with_runs_under_lock() {
        let mut factory = HashFactory::from_seed(2);
        let filter = CountingBloomFilter::<str>::with_factory(3, 256, &mut factory).unwrap();
        let shared = SharedFilter::new(filter);

        shared.with(|filter| {
            filter.insert("a");
            filter.insert("a");
        });

        assert!(shared.erase("a").unwrap());
        assert!(shared.contains("a"));
        assert!(shared.into_inner().contains("a"));
    }
}

// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Checks that filters and estimators stay off the heap once built.
//!
//! The allocator is process wide, so this binary holds a single test and only
//! counts allocations made by the thread that switched counting on.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

use mauka_pds_lib::data_structures::{
    BloomFilter, Cardinality, CountingBloomFilter, CountingQuotientFilter, CuckooFilter,
    FlajoletMartinCounter, HashFactory, LinearCounter, Membership, QuotientFilter,
};

struct CountingAllocator;

static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static COUNTING: Cell<bool> = const { Cell::new(false) };
}

fn record() {
    if COUNTING.try_with(Cell::get).unwrap_or(false) {
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        record();
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        record();
        System.alloc_zeroed(layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        record();
        System.realloc(ptr, layout, new_size)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

/// Run `f` and return how many heap allocations it made on this thread.
fn allocations_during(f: impl FnOnce()) -> usize {
    ALLOCATIONS.store(0, Ordering::Relaxed);
    COUNTING.with(|counting| counting.set(true));
    f();
    COUNTING.with(|counting| counting.set(false));
    ALLOCATIONS.load(Ordering::Relaxed)
}

#[test]
fn test_operations_do_not_allocate_after_construction() {
    let keys: Vec<String> = (0..1000).map(|i| format!("honu-{i}")).collect();

    let mut bloom = BloomFilter::<str>::with_factory(4, 1024, &mut HashFactory::from_seed(1)).unwrap();
    let mut counting_bloom =
        CountingBloomFilter::<str>::with_factory(4, 8192, &mut HashFactory::from_seed(2)).unwrap();
    let mut cuckoo = CuckooFilter::<str>::new(1024, 4, 16, 500).unwrap();
    let mut quotient = QuotientFilter::<str>::new(24, 12).unwrap();
    let mut counting_quotient = CountingQuotientFilter::<str>::new(24, 12).unwrap();
    let mut flajolet_martin =
        FlajoletMartinCounter::<str>::with_factory(64, 32, &mut HashFactory::from_seed(3)).unwrap();
    let mut linear = LinearCounter::<str>::with_factory(4096, &mut HashFactory::from_seed(4)).unwrap();

    let mut exercise = |keys: &[String]| {
        let mut hits = 0usize;
        for key in keys {
            let key = key.as_str();
            bloom.insert(key);
            counting_bloom.insert(key);
            cuckoo.insert(key);
            quotient.insert(key);
            counting_quotient.insert(key);
            flajolet_martin.insert(key);
            linear.insert(key);

            hits += usize::from(bloom.contains(key));
            hits += usize::from(counting_bloom.contains(key));
            hits += usize::from(cuckoo.contains(key));
            hits += usize::from(quotient.contains(key));
            hits += usize::from(counting_quotient.contains(key));
        }
        for key in keys {
            let key = key.as_str();
            hits += usize::from(counting_bloom.erase(key).unwrap_or(false));
            hits += usize::from(cuckoo.erase(key).unwrap_or(false));
            hits += usize::from(counting_quotient.erase(key).unwrap_or(false));
        }
        hits
    };

    // Touch every code path once so lazily registered tracing callsites are set up.
    exercise(&keys[..10]);

    let mut hits = 0;
    let allocations = allocations_during(|| hits = exercise(&keys[10..]));

    assert_eq!(allocations, 0, "heap allocations during 990 operations per structure");
    assert!(hits >= 8 * 990);
    assert!(flajolet_martin.count() > 0.0);
    assert!(linear.count() > 0.0);
}

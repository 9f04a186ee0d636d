//! Test modules for the probabilistic data structures.
//!
//! This module contains the crate-internal test suites:
//! - Property-based tests using proptest
//! - Configuration loading and validation tests
//! - Error type and reporting tests
//! - Test fixtures and utilities
//!
//! Per-structure unit tests live next to the structures; cross-structure
//! scenarios live in the integration tests under `tests/`.


// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{create_test_dir, key_strategy, slot_op_strategy, SlotOp, TestFixture};

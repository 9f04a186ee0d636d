// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Slot table backing the quotient filter.
//!
//! Remainders sharing a quotient form a *run*, kept sorted and stored
//! contiguously. Adjacent runs with no empty slot between them form a
//! *cluster*. A remainder can only be displaced towards higher indices (with
//! wrap-around), so a run is found by walking back to the start of its
//! cluster over `shifted` slots and then forward one run per `occupied` slot.

use std::fmt;

use tracing::{trace, warn};

use super::slot::{Slot, MAX_REMAINDER_BITS};
use crate::data_structures::counter::SlotCount;
use crate::error::{PdsError, PdsResult};

/// Everything a shift moves between slots. `occupied` stays with its index.
#[derive(Debug, Clone, Copy)]
struct Entry<C> {
    remainder: u64,
    continuation: bool,
    shifted: bool,
    count: C,
}

/// A fixed-size table of quotient filter slots.
///
/// `C` is the per-slot multiplicity: `()` for a plain table, where inserting a
/// present remainder is a no-op and removal is still possible, or an unsigned
/// integer for a counting table, where duplicates are counted and removal
/// takes one copy at a time.
///
/// Quotients are reduced modulo the table size and remainders are truncated
/// to the table's remainder width.
///
/// # Examples
///
/// ```
/// use mauka_pds_lib::data_structures::quotient_filter::SlotTable;
///
/// let mut table = SlotTable::<()>::new(8, 12).unwrap();
/// table.insert(0, 11);
/// table.insert(0, 10);
///
/// assert!(table.contains(0, 10));
/// assert_eq!(table.run(0), vec![10, 11]);
/// ```
#[derive(Clone)]
pub struct SlotTable<C: SlotCount = ()> {
    slots: Vec<Slot>,
    counts: Vec<C>,
    remainder_bits: u32,
    remainder_mask: u64,
    len: usize,
}

impl<C: SlotCount> SlotTable<C> {
    /// Create an empty table of `size` slots holding `remainder_bits`-bit remainders.
    pub fn new(size: usize, remainder_bits: u32) -> PdsResult<Self> {
        if size == 0 {
            return Err(PdsError::InvalidConfiguration(
                "slot table needs at least one slot".to_string(),
            ));
        }
        if remainder_bits == 0 || remainder_bits > MAX_REMAINDER_BITS {
            return Err(PdsError::InvalidConfiguration(format!(
                "remainder bits must be in 1..={MAX_REMAINDER_BITS}; got {remainder_bits}"
            )));
        }

        Ok(Self {
            slots: vec![Slot::default(); size],
            counts: vec![C::default(); size],
            remainder_bits,
            remainder_mask: (1u64 << remainder_bits) - 1,
            len: 0,
        })
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of distinct entries stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Width of stored remainders.
    pub fn remainder_bits(&self) -> u32 {
        self.remainder_bits
    }

    /// Fraction of slots in use.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Raw slot at `index`.
    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.slots.get(index).copied()
    }

    /// Store `remainder` under `quotient`.
    ///
    /// Returns `false` only when the remainder is new and every slot is taken.
    pub fn insert(&mut self, quotient: usize, remainder: u64) -> bool {
        let quotient = quotient % self.capacity();
        let remainder = remainder & self.remainder_mask;

        if self.is_empty_at(quotient) {
            let mut slot = Slot::default();
            slot.set_occupied(true);
            slot.set_remainder(remainder);
            self.slots[quotient] = slot;
            self.counts[quotient] = C::one();
            self.len += 1;
            return true;
        }

        let run_exists = self.slots[quotient].is_occupied();
        if run_exists {
            if let Some(index) = self.find_in_run(quotient, remainder) {
                self.counts[index].increment();
                return true;
            }
        }

        if self.len == self.capacity() {
            warn!(
                quotient,
                capacity = self.capacity(),
                "slot table full; remainder not stored"
            );
            return false;
        }

        self.slots[quotient].set_occupied(true);
        let run_start = self.find_run_start(quotient);
        let mut position = run_start;
        let mut continuation = false;

        if run_exists {
            // First remainder larger than the new one, or the slot after the run.
            loop {
                if self.slots[position].remainder() > remainder {
                    break;
                }
                position = self.next(position);
                if !self.slots[position].is_continuation() {
                    break;
                }
            }

            if position == run_start {
                // The new remainder heads the run; the old head continues it.
                self.slots[run_start].set_continuation(true);
            } else {
                continuation = true;
            }
        }

        let entry = Entry {
            remainder,
            continuation,
            shifted: position != quotient,
            count: C::one(),
        };
        self.insert_and_shift_right(position, entry);
        self.len += 1;
        true
    }

    /// Whether `remainder` is stored under `quotient`.
    pub fn contains(&self, quotient: usize, remainder: u64) -> bool {
        let quotient = quotient % self.capacity();
        self.slots[quotient].is_occupied()
            && self.find_in_run(quotient, remainder & self.remainder_mask).is_some()
    }

    /// Multiplicity of `remainder` under `quotient`; zero when absent.
    pub fn count(&self, quotient: usize, remainder: u64) -> u64 {
        let quotient = quotient % self.capacity();
        if !self.slots[quotient].is_occupied() {
            return 0;
        }
        self.find_in_run(quotient, remainder & self.remainder_mask)
            .map_or(0, |index| self.counts[index].get())
    }

    /// Remove one copy of `remainder` under `quotient`.
    ///
    /// Returns whether anything was stored. When the last copy goes, the slots
    /// after it shift left to close the gap.
    pub fn erase(&mut self, quotient: usize, remainder: u64) -> bool {
        let quotient = quotient % self.capacity();
        let remainder = remainder & self.remainder_mask;

        if !self.slots[quotient].is_occupied() {
            return false;
        }
        let Some(index) = self.find_in_run(quotient, remainder) else {
            return false;
        };

        if self.counts[index].decrement() {
            return true;
        }

        self.remove_and_shift_left(quotient, index);
        self.len -= 1;
        true
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = Slot::default());
        self.counts.iter_mut().for_each(|count| *count = C::default());
        self.len = 0;
    }

    /// Remainders stored under `quotient`, in run order.
    pub fn run(&self, quotient: usize) -> Vec<u64> {
        let quotient = quotient % self.capacity();
        let mut remainders = Vec::new();
        if !self.slots[quotient].is_occupied() {
            return remainders;
        }

        let mut index = self.find_run_start(quotient);
        loop {
            remainders.push(self.slots[index].remainder());
            index = self.next(index);
            if !self.slots[index].is_continuation() {
                return remainders;
            }
        }
    }

    #[inline]
    fn next(&self, index: usize) -> usize {
        if index + 1 == self.capacity() {
            0
        } else {
            index + 1
        }
    }

    #[inline]
    fn prev(&self, index: usize) -> usize {
        if index == 0 {
            self.capacity() - 1
        } else {
            index - 1
        }
    }

    #[inline]
    fn is_empty_at(&self, index: usize) -> bool {
        self.slots[index].flags_clear() && self.counts[index].is_zero()
    }

    /// Next occupied slot after `index`, wrapping around.
    fn next_occupied(&self, index: usize) -> usize {
        let mut current = self.next(index);
        for _ in 0..self.capacity() {
            if self.slots[current].is_occupied() {
                break;
            }
            current = self.next(current);
        }
        current
    }

    /// First slot of the run for `quotient`, which must be occupied.
    fn find_run_start(&self, quotient: usize) -> usize {
        let mut bucket = quotient;
        for _ in 0..self.capacity() {
            if !self.slots[bucket].is_shifted() {
                break;
            }
            bucket = self.prev(bucket);
        }

        let mut run_start = bucket;
        while bucket != quotient {
            loop {
                run_start = self.next(run_start);
                if !self.slots[run_start].is_continuation() {
                    break;
                }
            }
            bucket = self.next_occupied(bucket);
        }
        run_start
    }

    /// Slot holding `remainder` in the run for `quotient`, which must be occupied.
    fn find_in_run(&self, quotient: usize, remainder: u64) -> Option<usize> {
        let mut index = self.find_run_start(quotient);
        loop {
            let stored = self.slots[index].remainder();
            if stored == remainder {
                return Some(index);
            }
            if stored > remainder {
                return None;
            }
            index = self.next(index);
            if !self.slots[index].is_continuation() {
                return None;
            }
        }
    }

    fn read_entry(&self, index: usize) -> Entry<C> {
        let slot = self.slots[index];
        Entry {
            remainder: slot.remainder(),
            continuation: slot.is_continuation(),
            shifted: slot.is_shifted(),
            count: self.counts[index],
        }
    }

    fn write_entry(&mut self, index: usize, entry: Entry<C>) {
        let slot = &mut self.slots[index];
        slot.set_remainder(entry.remainder);
        slot.set_continuation(entry.continuation);
        slot.set_shifted(entry.shifted);
        self.counts[index] = entry.count;
    }

    fn clear_entry(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.set_remainder(0);
        slot.set_continuation(false);
        slot.set_shifted(false);
        self.counts[index] = C::default();
    }

    /// Write `entry` at `index`, pushing the following entries one slot right
    /// until an empty slot absorbs the cascade.
    fn insert_and_shift_right(&mut self, index: usize, entry: Entry<C>) {
        let mut carry = entry;
        let mut current = index;
        let mut moved = 0usize;

        loop {
            let was_empty = self.is_empty_at(current);
            let displaced = self.read_entry(current);
            self.write_entry(current, carry);
            if was_empty {
                break;
            }

            carry = Entry {
                shifted: true,
                ..displaced
            };
            current = self.next(current);
            moved += 1;
        }

        if moved > 0 {
            trace!(index, moved, "shifted slots right");
        }
    }

    /// Drop the entry at `index` from the run for `quotient` and pull the
    /// following shifted entries one slot left.
    fn remove_and_shift_left(&mut self, quotient: usize, index: usize) {
        let removed_run_head = !self.slots[index].is_continuation();
        let run_empties = removed_run_head && !self.slots[self.next(index)].is_continuation();

        let mut run_quotient = quotient;
        let mut promote = removed_run_head;
        let mut hole = index;

        for _ in 0..self.capacity() {
            let source = self.next(hole);
            if self.is_empty_at(source) || !self.slots[source].is_shifted() {
                break;
            }

            let mut entry = self.read_entry(source);
            if entry.continuation {
                if promote {
                    entry.continuation = false;
                }
            } else {
                run_quotient = self.next_occupied(run_quotient);
            }
            promote = false;
            entry.shifted = hole != run_quotient;

            self.write_entry(hole, entry);
            hole = source;
        }

        self.clear_entry(hole);
        if run_empties {
            self.slots[quotient].set_occupied(false);
        }
        trace!(index, hole, "shifted slots left");
    }
}

impl<C: SlotCount> fmt::Debug for SlotTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotTable")
            .field("capacity", &self.capacity())
            .field("remainder_bits", &self.remainder_bits)
            .field("len", &self.len)
            .finish()
    }
}

/// Renders one line per slot: index, the three flags, remainder and count.
impl<C: SlotCount> fmt::Display for SlotTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>6} {:>3} {:>4} {:>5} {:>12} {:>6}", "slot", "occ", "cont", "shift", "remainder", "count")?;
        for (index, slot) in self.slots.iter().enumerate() {
            if self.is_empty_at(index) {
                writeln!(f, "{index:>6} {:>3} {:>4} {:>5} {:>12} {:>6}", 0, 0, 0, "-", "-")?;
                continue;
            }
            writeln!(
                f,
                "{index:>6} {:>3} {:>4} {:>5} {:>12} {:>6}",
                u8::from(slot.is_occupied()),
                u8::from(slot.is_continuation()),
                u8::from(slot.is_shifted()),
                slot.remainder(),
                self.counts[index].get()
            )?;
        }
        Ok(())
    }
}

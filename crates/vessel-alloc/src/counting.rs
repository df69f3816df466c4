//! A trivially-stateful strategy that counts every call it serves.
//!
//! [`CountingStrategy`] forwards storage requests to [`SystemStrategy`]
//! and records each allocate / deallocate / construct / destroy. Clones
//! share one counter block, so a strategy moved into a container can still
//! be observed through a clone kept by the caller.

#![allow(unsafe_code)]

use std::cell::Cell;
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;

use crate::error::AllocError;
use crate::strategy::AllocStrategy;
use crate::system::SystemStrategy;

/// Point-in-time copy of a [`CountingStrategy`]'s counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountingStats {
    /// Successful `allocate` calls.
    pub allocations: usize,
    /// `allocate` calls that returned an error.
    pub failed_allocations: usize,
    /// `deallocate` calls.
    pub deallocations: usize,
    /// `construct` calls.
    pub constructs: usize,
    /// `destroy` calls.
    pub destroys: usize,
    /// Slots currently allocated and not yet released.
    pub outstanding_slots: usize,
}

impl CountingStats {
    /// Number of slots constructed and not yet destroyed.
    ///
    /// Values moved out of a slot without `destroy` (e.g. during growth)
    /// still count as live here; callers comparing against a container's
    /// length should account for that.
    pub fn constructed_minus_destroyed(&self) -> isize {
        self.constructs as isize - self.destroys as isize
    }
}

#[derive(Default)]
struct Counters {
    allocations: Cell<usize>,
    failed_allocations: Cell<usize>,
    deallocations: Cell<usize>,
    constructs: Cell<usize>,
    destroys: Cell<usize>,
    outstanding_slots: Cell<usize>,
}

fn bump(cell: &Cell<usize>, by: usize) {
    cell.set(cell.get() + by);
}

/// System-backed strategy that counts the calls it serves.
///
/// Not `Send`/`Sync`: counters are shared through `Rc<Cell<_>>`.
#[derive(Clone, Default)]
pub struct CountingStrategy {
    inner: SystemStrategy,
    counters: Rc<Counters>,
}

impl CountingStrategy {
    /// Create a strategy with a fresh, zeroed counter block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current counter values.
    pub fn stats(&self) -> CountingStats {
        let c = &self.counters;
        CountingStats {
            allocations: c.allocations.get(),
            failed_allocations: c.failed_allocations.get(),
            deallocations: c.deallocations.get(),
            constructs: c.constructs.get(),
            destroys: c.destroys.get(),
            outstanding_slots: c.outstanding_slots.get(),
        }
    }
}

impl PartialEq for CountingStrategy {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.counters, &other.counters)
    }
}

impl Eq for CountingStrategy {}

impl fmt::Debug for CountingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingStrategy")
            .field("stats", &self.stats())
            .finish()
    }
}

// SAFETY: storage comes from `SystemStrategy`, which upholds the contract;
// the counters never influence the returned pointers.
unsafe impl AllocStrategy for CountingStrategy {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        match self.inner.allocate::<T>(count) {
            Ok(ptr) => {
                bump(&self.counters.allocations, 1);
                bump(&self.counters.outstanding_slots, count);
                Ok(ptr)
            }
            Err(err) => {
                bump(&self.counters.failed_allocations, 1);
                Err(err)
            }
        }
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        bump(&self.counters.deallocations, 1);
        let outstanding = &self.counters.outstanding_slots;
        outstanding.set(outstanding.get().saturating_sub(count));
        // SAFETY: forwarded caller contract; `inner` allocated `ptr`.
        unsafe { self.inner.deallocate(ptr, count) };
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        bump(&self.counters.constructs, 1);
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.construct(slot, value) };
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        bump(&self.counters.destroys, 1);
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.destroy(slot) };
    }
}

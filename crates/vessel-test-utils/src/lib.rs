//! Test utilities and mock strategies for vessel development.
//!
//! Provides allocation strategies that misbehave or keep books on
//! purpose, plus an element type that counts its drops:
//!
//! - [`FailingStrategy`]: fails its K-th `allocate` call.
//! - [`TrackingStrategy`]: records every live allocation and panics on a
//!   deallocation that does not match one.
//! - [`PanickingStrategy`]: panics inside its K-th `construct`.
//! - [`DropCounter`]: element whose drops are tallied in a shared cell.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ptr::NonNull;
use std::rc::Rc;

use vessel_alloc::{AllocError, AllocStrategy, SystemStrategy};

/// Fails the `fail_on`-th call to `allocate` (1-based); every other call is
/// served by the system allocator.
///
/// Clones share the call counter, so the strategy can be observed after it
/// is moved into a container.
#[derive(Clone, Debug)]
pub struct FailingStrategy {
    fail_on: usize,
    calls: Rc<Cell<usize>>,
}

impl FailingStrategy {
    /// Create a strategy whose `fail_on`-th allocation fails.
    pub fn new(fail_on: usize) -> Self {
        Self {
            fail_on,
            calls: Rc::new(Cell::new(0)),
        }
    }

    /// How many times `allocate` has been called.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl PartialEq for FailingStrategy {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.calls, &other.calls)
    }
}

// SAFETY: successful requests are forwarded to `SystemStrategy`.
unsafe impl AllocStrategy for FailingStrategy {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if n == self.fail_on {
            return Err(AllocError::OutOfMemory {
                count,
                bytes: count.saturating_mul(std::mem::size_of::<T>()),
            });
        }
        SystemStrategy.allocate(count)
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        // SAFETY: forwarded caller contract.
        unsafe { SystemStrategy.deallocate(ptr, count) };
    }
}

/// Keeps a ledger of live allocations keyed by address.
///
/// A deallocation whose address is unknown, or whose count differs from
/// the one it was allocated with, panics. [`live`](Self::live) reports what
/// is still outstanding, so a test can assert nothing leaked.
#[derive(Clone, Debug, Default)]
pub struct TrackingStrategy {
    ledger: Rc<RefCell<HashMap<usize, usize>>>,
}

impl TrackingStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocations not yet released.
    pub fn live(&self) -> usize {
        self.ledger.borrow().len()
    }

    /// Slot count recorded for the allocation at `ptr`, if it is live.
    pub fn count_at<T>(&self, ptr: *const T) -> Option<usize> {
        self.ledger.borrow().get(&(ptr as usize)).copied()
    }
}

impl PartialEq for TrackingStrategy {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.ledger, &other.ledger)
    }
}

// SAFETY: storage comes from `SystemStrategy`; the ledger only observes.
unsafe impl AllocStrategy for TrackingStrategy {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let ptr = SystemStrategy.allocate::<T>(count)?;
        // Zero-byte allocations share the dangling address; only real
        // storage is tracked.
        if count * std::mem::size_of::<T>() > 0 {
            self.ledger.borrow_mut().insert(ptr.as_ptr() as usize, count);
        }
        Ok(ptr)
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        if count * std::mem::size_of::<T>() > 0 {
            let recorded = self.ledger.borrow_mut().remove(&(ptr.as_ptr() as usize));
            assert_eq!(
                recorded,
                Some(count),
                "deallocate({:p}, {count}) does not match a live allocation",
                ptr
            );
        }
        // SAFETY: forwarded caller contract.
        unsafe { SystemStrategy.deallocate(ptr, count) };
    }
}

/// Panics inside the `panic_on`-th call to `construct` (1-based), before
/// the slot is written. Storage is served by the system allocator.
///
/// Clones share the call counter.
#[derive(Clone, Debug)]
pub struct PanickingStrategy {
    panic_on: usize,
    constructs: Rc<Cell<usize>>,
}

impl PanickingStrategy {
    /// Create a strategy whose `panic_on`-th construction panics.
    pub fn new(panic_on: usize) -> Self {
        Self {
            panic_on,
            constructs: Rc::new(Cell::new(0)),
        }
    }

    /// How many times `construct` has been called.
    pub fn constructs(&self) -> usize {
        self.constructs.get()
    }
}

impl PartialEq for PanickingStrategy {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.constructs, &other.constructs)
    }
}

// SAFETY: storage comes from `SystemStrategy`.
unsafe impl AllocStrategy for PanickingStrategy {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        SystemStrategy.allocate(count)
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        // SAFETY: forwarded caller contract.
        unsafe { SystemStrategy.deallocate(ptr, count) };
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        let n = self.constructs.get() + 1;
        self.constructs.set(n);
        if n == self.panic_on {
            panic!("construct #{n} panicked");
        }
        // SAFETY: forwarded caller contract.
        unsafe { SystemStrategy.construct(slot, value) };
    }
}

/// An element that increments a shared counter when dropped.
#[derive(Debug)]
pub struct DropCounter {
    pub id: usize,
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    /// Create `n` counters sharing one tally, with ids `0..n`.
    pub fn batch(n: usize) -> (Vec<DropCounter>, Rc<Cell<usize>>) {
        let drops = Rc::new(Cell::new(0));
        let items = (0..n)
            .map(|id| DropCounter {
                id,
                drops: Rc::clone(&drops),
            })
            .collect();
        (items, drops)
    }
}

impl Clone for DropCounter {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            drops: Rc::clone(&self.drops),
        }
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

//! Owned, strategy-allocated element storage.
//!
//! [`RawBuf`] is the only place in this crate that dereferences raw
//! pointers. It owns one contiguous allocation of `cap` slots obtained from
//! its strategy and tracks how many of them (`len`, always a prefix) are
//! live. Everything it hands out is a safe slice over that prefix.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

use vessel_alloc::{AllocError, AllocStrategy};

/// Contiguous storage of `cap` slots, the first `len` of which are live.
pub(crate) struct RawBuf<T, S: AllocStrategy> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    strategy: S,
    /// Owns values of `T` for drop-check purposes.
    _owns: PhantomData<T>,
}

impl<T, S: AllocStrategy> RawBuf<T, S> {
    /// Allocate `cap` uninitialized slots through `strategy`.
    pub(crate) fn with_capacity_in(cap: usize, strategy: S) -> Result<Self, AllocError> {
        let ptr = strategy.allocate::<T>(cap)?;
        Ok(Self {
            ptr,
            cap,
            len: 0,
            strategy,
            _owns: PhantomData,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    pub(crate) fn strategy(&self) -> &S {
        &self.strategy
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are live and `ptr` is non-null and
        // aligned even when `len == 0`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Unchecked element access.
    ///
    /// # Safety
    ///
    /// `index < self.len()`.
    pub(crate) unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        // SAFETY: caller guarantees `index` addresses a live slot.
        unsafe { &*self.ptr.as_ptr().add(index) }
    }

    /// Unchecked mutable element access.
    ///
    /// # Safety
    ///
    /// `index < self.len()`.
    pub(crate) unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        // SAFETY: caller guarantees `index` addresses a live slot.
        unsafe { &mut *self.ptr.as_ptr().add(index) }
    }

    /// Construct `value` in the first free slot.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is full; callers grow first.
    pub(crate) fn push(&mut self, value: T) {
        assert!(self.len < self.cap, "push into a full buffer");
        // SAFETY: `len < cap`, so the slot is in bounds and uninitialized.
        unsafe { self.strategy.construct(self.ptr.add(self.len), value) };
        self.len += 1;
    }

    /// Move the last live value out, if any.
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` was live and is now outside
        // the live prefix, so it is read exactly once.
        Some(unsafe { ptr::read(self.ptr.as_ptr().add(self.len)) })
    }

    /// Destroy every live value in index order, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        let live = self.len;
        // Shrink the live prefix first so a panicking drop leaks instead of
        // double-dropping.
        self.len = 0;
        for i in 0..live {
            // SAFETY: `i < live`; each live slot is destroyed exactly once.
            unsafe { self.strategy.destroy(self.ptr.add(i)) };
        }
    }

    /// Move the live prefix into a fresh allocation of `new_cap` slots.
    ///
    /// Only slots `[0, len)` are touched; slots `[len, new_cap)` of the new
    /// storage stay uninitialized. On allocation failure the buffer is left
    /// exactly as it was.
    pub(crate) fn grow_to(&mut self, new_cap: usize) -> Result<(), AllocError> {
        debug_assert!(new_cap > self.cap);
        let new_ptr = self.strategy.allocate::<T>(new_cap)?;

        // Values leave the old buffer one by one. Empty the live prefix for
        // the duration so an unwinding `construct` leaks instead of letting
        // `Drop` destroy slots that were already moved out.
        let live = self.len;
        self.len = 0;
        for i in 0..live {
            // SAFETY: `i < live <= cap < new_cap`. The old slot is live and is
            // read exactly once; the new slot is in bounds and uninitialized.
            unsafe {
                let value = ptr::read(self.ptr.as_ptr().add(i));
                self.strategy.construct(new_ptr.add(i), value);
            }
        }

        // SAFETY: every live value was moved out above, so the old storage
        // holds nothing live; it was allocated with `self.cap` slots.
        unsafe { self.strategy.deallocate(self.ptr, self.cap) };
        self.ptr = new_ptr;
        self.cap = new_cap;
        self.len = live;
        Ok(())
    }
}

impl<T, S: AllocStrategy> Drop for RawBuf<T, S> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: `clear` destroyed every live slot; `ptr` was allocated
        // with `cap` slots by this strategy and is released once.
        unsafe { self.strategy.deallocate(self.ptr, self.cap) };
    }
}

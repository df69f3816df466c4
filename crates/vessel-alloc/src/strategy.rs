//! The allocation strategy policy trait.

#![allow(unsafe_code)]

use std::ptr::{self, NonNull};

use crate::error::AllocError;

/// A policy that obtains, releases, and initializes element storage.
///
/// Containers are generic over a strategy, so every call is monomorphized
/// and there is no dynamic dispatch. Methods are generic over the element
/// type: one strategy value can serve containers of any `T`.
///
/// Equality expresses interchangeability. If `a == b`, storage allocated
/// through `a` may be released through `b`. Stateless strategies compare
/// equal unconditionally; stateful ones compare equal only when they share
/// state.
///
/// # Safety
///
/// Implementors must guarantee that a pointer returned by
/// [`allocate::<T>(count)`](AllocStrategy::allocate) is non-null, aligned
/// for `T`, valid for reads and writes of `count` consecutive `T` slots,
/// and not aliased by any other live allocation until it is passed back to
/// [`deallocate`](AllocStrategy::deallocate). Containers rely on this for
/// memory safety.
///
/// [`construct`](AllocStrategy::construct) should not unwind. If it does,
/// the value passed in is dropped by the unwind and containers leak the
/// rest of the operation's elements rather than dropping any of them twice.
pub unsafe trait AllocStrategy: Clone + PartialEq {
    /// Allocate uninitialized storage for exactly `count` elements of `T`.
    ///
    /// Zero-byte requests (`count == 0` or a zero-sized `T`) must succeed
    /// and may return a dangling, well-aligned pointer.
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError>;

    /// Release storage previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate::<T>(count)` on this strategy (or one
    /// equal to it) with the same `count`, must not have been released
    /// already, and must hold no live elements.
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize);

    /// Move `value` into the uninitialized slot at `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must be valid for writes and aligned for `T`. Any value
    /// already in the slot is overwritten without being dropped.
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        // SAFETY: caller guarantees `slot` is valid for writes.
        unsafe { ptr::write(slot.as_ptr(), value) };
    }

    /// Drop the live value at `slot`, leaving it uninitialized.
    ///
    /// # Safety
    ///
    /// `slot` must hold a live `T` that is not used again until it is
    /// reconstructed. Must be called at most once per construction.
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: caller guarantees `slot` holds a live, unaliased value.
        unsafe { ptr::drop_in_place(slot.as_ptr()) };
    }
}

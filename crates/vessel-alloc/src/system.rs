//! The default strategy, backed by the global allocator.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::AllocError;
use crate::strategy::AllocStrategy;

/// Allocates through the global allocator (`std::alloc`).
///
/// Stateless: every instance is interchangeable with every other, so all
/// values compare equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SystemStrategy;

impl SystemStrategy {
    /// Create the system strategy.
    pub const fn new() -> Self {
        Self
    }
}

/// Layout for `count` slots of `T`, or `CapacityOverflow`.
pub(crate) fn array_layout<T>(count: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(count).map_err(|_| AllocError::CapacityOverflow { count })
}

// SAFETY: non-empty requests come straight from `alloc::alloc` with a
// layout for `count` slots of `T`; empty requests return a dangling
// pointer that is never dereferenced for a non-zero size.
unsafe impl AllocStrategy for SystemStrategy {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let layout = array_layout::<T>(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        match NonNull::new(raw.cast::<T>()) {
            Some(ptr) => {
                tracing::trace!(count, bytes = layout.size(), "system allocate");
                Ok(ptr)
            }
            None => {
                tracing::warn!(count, bytes = layout.size(), "system allocator returned null");
                Err(AllocError::OutOfMemory {
                    count,
                    bytes: layout.size(),
                })
            }
        }
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        let layout = match array_layout::<T>(count) {
            Ok(layout) => layout,
            // `allocate::<T>(count)` already rejected this count, so no
            // pointer can exist for it.
            Err(_) => {
                unreachable!("deallocate of {count} slots does not match any allocation")
            }
        };
        if layout.size() == 0 {
            return;
        }
        tracing::trace!(count, bytes = layout.size(), "system deallocate");
        // SAFETY: caller guarantees `ptr` came from `allocate::<T>(count)`,
        // which used this exact layout.
        unsafe { alloc::dealloc(ptr.as_ptr().cast::<u8>(), layout) };
    }
}

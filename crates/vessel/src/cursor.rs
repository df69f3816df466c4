//! Forward traversal cursors over a sequence's live elements.
//!
//! A [`Cursor`] is a position inside a [`GrowVec`](crate::GrowVec). It
//! borrows the sequence, so it cannot outlive the buffer or observe a
//! reallocation: `push` and `reserve` need `&mut` and are rejected by the
//! borrow checker while any cursor is alive.

use std::fmt;
use std::iter::FusedIterator;
use std::ptr;

/// A non-owning position in a sequence, from `begin()` up to `end()`.
///
/// Cursors compare equal iff they name the same slot of the same buffer.
/// Reading and advancing are checked: [`get`](Cursor::get) returns `None`
/// at the end position and [`advance`](Cursor::advance) panics there.
///
/// A cursor is also an [`Iterator`] that yields the current element and
/// then steps forward. Traversal is single-pass; take a fresh
/// `begin()` to restart.
pub struct Cursor<'a, T> {
    live: &'a [T],
    pos: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(live: &'a [T], pos: usize) -> Self {
        debug_assert!(pos <= live.len());
        Self { live, pos }
    }

    /// The element at this position, or `None` at the end position.
    pub fn get(&self) -> Option<&'a T> {
        self.live.get(self.pos)
    }

    /// Step forward by one slot.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is already at the end position.
    pub fn advance(&mut self) {
        assert!(
            self.pos < self.live.len(),
            "cannot advance a cursor past end (position {})",
            self.pos
        );
        self.pos += 1;
    }

    /// Index of this position within the sequence.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether this cursor sits one past the last live element.
    pub fn is_end(&self) -> bool {
        self.pos == self.live.len()
    }

    /// Address of the slot this cursor names.
    ///
    /// At the end position this is one past the last live element and must
    /// not be dereferenced.
    pub fn as_ptr(&self) -> *const T {
        self.live.as_ptr().wrapping_add(self.pos)
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        // Base address plus index rather than slot address alone, so that
        // positions in a buffer of zero-sized values stay distinct.
        ptr::eq(self.live.as_ptr(), other.live.as_ptr()) && self.pos == other.pos
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.pos)
            .field("len", &self.live.len())
            .finish()
    }
}

impl<'a, T> Iterator for Cursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.get()?;
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.live.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Cursor<'_, T> {}

impl<T> FusedIterator for Cursor<'_, T> {}

//! The growable sequence container.
//!
//! [`GrowVec`] owns one contiguous buffer obtained from an
//! [`AllocStrategy`]. It starts with room for a single element and doubles
//! its capacity on the push that would overflow. Growth moves only the live
//! elements into the new buffer; trailing uninitialized slots are never
//! read.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::slice;

use vessel_alloc::{AllocStrategy, SystemStrategy};

use crate::cursor::Cursor;
use crate::error::SeqError;
use crate::raw::RawBuf;

/// Contiguous, growable sequence parameterized by its allocation strategy.
///
/// Invariants:
/// - `0 <= len() <= capacity()` and `capacity() >= 1`.
/// - Slots `[0, len)` are live, slots `[len, capacity)` are uninitialized.
/// - Capacity never decreases.
///
/// Growing invalidates the buffer address. Every borrow into the sequence
/// (slices, [`Cursor`]s, element references) is tied to `&self`, so the
/// borrow checker rules out use after reallocation.
pub struct GrowVec<T, S: AllocStrategy = SystemStrategy> {
    buf: RawBuf<T, S>,
}

impl<T> GrowVec<T> {
    /// Create an empty sequence backed by the system allocator.
    ///
    /// Fails only if the initial single-slot allocation fails.
    pub fn new() -> Result<Self, SeqError> {
        Self::new_in(SystemStrategy::new())
    }
}

impl<T, S: AllocStrategy> GrowVec<T, S> {
    /// Slots allocated at construction.
    pub const INITIAL_CAPACITY: usize = 1;

    /// Capacity multiplier applied when a push finds the buffer full.
    pub const GROWTH_FACTOR: usize = 2;

    /// Create an empty sequence that allocates through `strategy`.
    pub fn new_in(strategy: S) -> Result<Self, SeqError> {
        let buf = RawBuf::with_capacity_in(Self::INITIAL_CAPACITY, strategy)?;
        Ok(Self { buf })
    }

    /// Append `value` as the new last element.
    ///
    /// If the buffer is full, capacity is first multiplied by
    /// [`GROWTH_FACTOR`](Self::GROWTH_FACTOR). On failure `value` is
    /// dropped and the sequence is unchanged.
    pub fn push(&mut self, value: T) -> Result<(), SeqError> {
        if self.len() == self.capacity() {
            let target = Self::grown_capacity(self.capacity())?;
            self.reserve(target)?;
        }
        self.buf.push(value);
        Ok(())
    }

    /// Capacity after one doubling step from `capacity`.
    fn grown_capacity(capacity: usize) -> Result<usize, SeqError> {
        capacity
            .checked_mul(Self::GROWTH_FACTOR)
            .ok_or(SeqError::CapacityOverflow { capacity })
    }

    /// Ensure capacity for at least `target` elements.
    ///
    /// Requests at or below the current capacity are ignored: the
    /// sequence never shrinks here and the buffer is not moved. Otherwise
    /// exactly `target` slots are allocated and the live elements moved
    /// across in index order. If the allocation fails the sequence is left
    /// as it was.
    pub fn reserve(&mut self, target: usize) -> Result<(), SeqError> {
        let old_capacity = self.capacity();
        if target <= old_capacity {
            return Ok(());
        }
        if let Err(err) = self.buf.grow_to(target) {
            tracing::warn!(
                old_capacity,
                target,
                len = self.len(),
                error = %err,
                "sequence growth failed"
            );
            return Err(err.into());
        }
        tracing::debug!(
            old_capacity,
            new_capacity = target,
            len = self.len(),
            "sequence grew"
        );
        Ok(())
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        self.buf.pop()
    }

    /// Destroy every element, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Push every item of `iter` in order, stopping at the first failure.
    ///
    /// Items pushed before the failure stay in the sequence.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), SeqError>
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.push(value)?;
        }
        Ok(())
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Whether the sequence has no elements, i.e. `begin() == end()`.
    pub fn is_empty(&self) -> bool {
        self.begin() == self.end()
    }

    /// Cursor at the first element (equal to `end()` when empty).
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0)
    }

    /// Cursor one past the last live element (not one past capacity).
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), self.len())
    }

    /// Checked element access.
    pub fn get(&self, index: usize) -> Result<&T, SeqError> {
        let len = self.len();
        self.as_slice()
            .get(index)
            .ok_or(SeqError::OutOfBounds { index, len })
    }

    /// Checked mutable element access.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, SeqError> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(SeqError::OutOfBounds { index, len })
    }

    /// Element access without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len).
    #[allow(unsafe_code)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        // SAFETY: forwarded caller contract.
        unsafe { self.buf.get_unchecked(index) }
    }

    /// Mutable element access without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len).
    #[allow(unsafe_code)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        // SAFETY: forwarded caller contract.
        unsafe { self.buf.get_unchecked_mut(index) }
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf.as_mut_slice()
    }

    /// Iterate over the live elements in index order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterate mutably over the live elements in index order.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// The strategy this sequence allocates through.
    pub fn strategy(&self) -> &S {
        self.buf.strategy()
    }
}

impl<T: Clone, S: AllocStrategy> GrowVec<T, S> {
    /// Copy this sequence into a new buffer from a clone of the strategy.
    ///
    /// The copy has capacity for exactly the live elements (at least one
    /// slot). Fallible, so there is no `Clone` impl.
    pub fn try_clone(&self) -> Result<Self, SeqError> {
        let mut copy = Self::new_in(self.strategy().clone())?;
        copy.reserve(self.len())?;
        copy.try_extend(self.iter().cloned())?;
        Ok(copy)
    }
}

impl<T, S: AllocStrategy> Index<usize> for GrowVec<T, S> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, S: AllocStrategy> IndexMut<usize> for GrowVec<T, S> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, T, S: AllocStrategy> IntoIterator for &'a GrowVec<T, S> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, S: AllocStrategy> IntoIterator for &'a mut GrowVec<T, S> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: fmt::Debug, S: AllocStrategy> fmt::Debug for GrowVec<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U, S1, S2> PartialEq<GrowVec<U, S2>> for GrowVec<T, S1>
where
    T: PartialEq<U>,
    S1: AllocStrategy,
    S2: AllocStrategy,
{
    fn eq(&self, other: &GrowVec<U, S2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, S: AllocStrategy> Eq for GrowVec<T, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_alloc::CountingStrategy;

    fn filled(n: i32) -> GrowVec<i32> {
        let mut v = GrowVec::new().unwrap();
        v.try_extend(0..n).unwrap();
        v
    }

    #[test]
    fn doubling_past_usize_reports_current_capacity() {
        assert_eq!(GrowVec::<u8>::grown_capacity(8), Ok(16));
        assert_eq!(
            GrowVec::<u8>::grown_capacity(usize::MAX),
            Err(SeqError::CapacityOverflow {
                capacity: usize::MAX
            })
        );
    }

    #[test]
    fn new_is_empty_with_one_slot() {
        let v: GrowVec<i32> = GrowVec::new().unwrap();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 1);
        assert!(v.is_empty());
        assert_eq!(v.begin(), v.end());
    }

    #[test]
    fn push_preserves_insertion_order() {
        let v = filled(10);
        assert_eq!(v.len(), 10);
        assert!(!v.is_empty());
        assert_eq!(v.as_slice(), [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn growth_is_lazy_and_doubles() {
        let mut v = GrowVec::new().unwrap();
        let mut capacities = Vec::new();
        for i in 0..9 {
            v.push(i).unwrap();
            capacities.push(v.capacity());
        }
        assert_eq!(capacities, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
    }

    #[test]
    fn one_allocation_per_doubling_boundary() {
        let strategy = CountingStrategy::new();
        let mut v = GrowVec::new_in(strategy.clone()).unwrap();
        for i in 0..8 {
            v.push(i).unwrap();
        }
        // 1 initial + growths to 2, 4, 8.
        assert_eq!(strategy.stats().allocations, 4);
        assert_eq!(strategy.stats().deallocations, 3);
        v.push(8).unwrap();
        assert_eq!(strategy.stats().allocations, 5);
    }

    #[test]
    fn reserve_at_or_below_capacity_is_noop() {
        let mut v = filled(3);
        assert_eq!(v.capacity(), 4);
        let before = v.begin().as_ptr();
        v.reserve(2).unwrap();
        v.reserve(4).unwrap();
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.begin().as_ptr(), before);
    }

    #[test]
    fn reserve_above_capacity_allocates_exact_target() {
        let mut v = filled(3);
        v.reserve(37).unwrap();
        assert_eq!(v.capacity(), 37);
        assert_eq!(v.as_slice(), [0, 1, 2]);
    }

    #[test]
    fn growth_after_reserve_moves_only_live_elements() {
        let strategy = CountingStrategy::new();
        let mut v = GrowVec::new_in(strategy.clone()).unwrap();
        v.reserve(8).unwrap();
        v.try_extend(["a", "b", "c"].map(String::from)).unwrap();
        assert_eq!(strategy.stats().constructs, 3);

        v.reserve(64).unwrap();
        // Three moves, nothing for the five uninitialized slots.
        assert_eq!(strategy.stats().constructs, 6);
        assert_eq!(strategy.stats().destroys, 0);
        assert_eq!(v.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn checked_access_reports_out_of_bounds() {
        let mut v = filled(2);
        assert_eq!(v.get(1), Ok(&1));
        assert_eq!(v.get(2), Err(SeqError::OutOfBounds { index: 2, len: 2 }));
        *v.get_mut(0).unwrap() = 42;
        assert_eq!(v[0], 42);
        assert!(v.get_mut(5).is_err());
    }

    #[test]
    #[should_panic(expected = "index 3 out of bounds for length 3")]
    fn index_past_len_panics() {
        let v = filled(3);
        let _ = v[3];
    }

    #[test]
    fn index_mut_writes_through() {
        let mut v = filled(4);
        v[2] += 100;
        assert_eq!(v.as_slice(), [0, 1, 102, 3]);
    }

    #[test]
    #[allow(unsafe_code)]
    fn unchecked_access_reads_live_slot() {
        let v = filled(5);
        assert_eq!(unsafe { *v.get_unchecked(4) }, 4);
    }

    #[test]
    fn cursor_traversal_visits_each_element_once() {
        let v = filled(6);
        let mut cursor = v.begin();
        let end = v.end();
        let mut seen = Vec::new();
        while cursor != end {
            seen.push(*cursor.get().unwrap());
            cursor.advance();
        }
        assert_eq!(seen, [0, 1, 2, 3, 4, 5]);
        assert_eq!(end.position(), v.len());
    }

    #[test]
    fn end_is_past_len_not_past_capacity() {
        let mut v = filled(3);
        v.reserve(10).unwrap();
        assert_eq!(v.end().position(), 3);
    }

    #[test]
    fn pop_and_clear() {
        let mut v = filled(3);
        assert_eq!(v.pop(), Some(2));
        assert_eq!(v.len(), 2);
        v.clear();
        assert!(v.is_empty());
        assert_eq!(v.pop(), None);
        assert_eq!(v.capacity(), 4);
    }

    #[test]
    fn clear_destroys_through_strategy() {
        let strategy = CountingStrategy::new();
        let mut v = GrowVec::new_in(strategy.clone()).unwrap();
        v.try_extend([vec![1], vec![2], vec![3]]).unwrap();
        v.clear();
        assert_eq!(strategy.stats().destroys, 3);
    }

    #[test]
    fn try_clone_copies_elements_with_shared_strategy() {
        let strategy = CountingStrategy::new();
        let mut v = GrowVec::new_in(strategy.clone()).unwrap();
        v.try_extend(0..5).unwrap();
        let copy = v.try_clone().unwrap();
        assert_eq!(copy, v);
        assert_eq!(copy.capacity(), 5);
        assert_eq!(copy.strategy(), v.strategy());
    }

    #[test]
    fn equality_across_strategies() {
        let mut a = GrowVec::new().unwrap();
        let mut b = GrowVec::new_in(CountingStrategy::new()).unwrap();
        a.try_extend(0..4).unwrap();
        b.try_extend(0..4).unwrap();
        assert!(a == b);
    }

    #[test]
    fn debug_lists_elements() {
        assert_eq!(format!("{:?}", filled(3)), "[0, 1, 2]");
    }

    #[test]
    fn iter_mut_and_into_iterator() {
        let mut v = filled(3);
        for x in &mut v {
            *x *= 2;
        }
        let collected: Vec<_> = (&v).into_iter().copied().collect();
        assert_eq!(collected, [0, 2, 4]);
    }

    #[test]
    fn zero_sized_elements_count_correctly() {
        let mut v = GrowVec::new().unwrap();
        for _ in 0..5 {
            v.push(()).unwrap();
        }
        assert_eq!(v.len(), 5);
        assert!(!v.is_empty());
        assert_eq!(v.begin().count(), 5);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Push(u16),
            Pop,
            Reserve(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => any::<u16>().prop_map(Op::Push),
                1 => Just(Op::Pop),
                1 => (0usize..64).prop_map(Op::Reserve),
            ]
        }

        proptest! {
            #[test]
            fn agrees_with_vec_model(ops in proptest::collection::vec(op(), 0..200)) {
                let mut v = GrowVec::new().unwrap();
                let mut model = Vec::new();
                let mut last_capacity = v.capacity();
                for op in ops {
                    match op {
                        Op::Push(x) => {
                            v.push(x).unwrap();
                            model.push(x);
                        }
                        Op::Pop => {
                            prop_assert_eq!(v.pop(), model.pop());
                        }
                        Op::Reserve(n) => v.reserve(n).unwrap(),
                    }
                    prop_assert!(v.capacity() >= last_capacity);
                    prop_assert!(v.len() <= v.capacity());
                    last_capacity = v.capacity();
                }
                prop_assert_eq!(v.as_slice(), model.as_slice());
                prop_assert_eq!(v.is_empty(), model.is_empty());
            }

            #[test]
            fn push_only_capacity_is_power_of_two(n in 0usize..500) {
                let mut v = GrowVec::new().unwrap();
                for i in 0..n {
                    v.push(i).unwrap();
                }
                prop_assert!(v.capacity().is_power_of_two());
                prop_assert!(v.capacity() >= n);
                prop_assert_eq!(v.begin().count(), n);
            }
        }
    }
}

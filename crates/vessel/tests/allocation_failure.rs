//! Integration test: injected allocation failures leave the sequence intact.
//!
//! A strategy that refuses its K-th `allocate` call must make the push or
//! reserve that triggered it fail with `SeqError::Alloc`, while `len()`,
//! `capacity()` and every previously readable element stay as they were.

use vessel::{AllocError, GrowVec, SeqError};
use vessel_test_utils::FailingStrategy;

#[test]
fn construction_fails_when_first_allocation_fails() {
    let result = GrowVec::<u32, _>::new_in(FailingStrategy::new(1));
    assert!(matches!(
        result,
        Err(SeqError::Alloc(AllocError::OutOfMemory { count: 1, .. }))
    ));
}

#[test]
fn failing_growth_on_push_keeps_prior_state() {
    // Allocation 1: construction. 2: growth to 2. 3: growth to 4 (fails).
    let strategy = FailingStrategy::new(3);
    let mut v = GrowVec::new_in(strategy.clone()).unwrap();
    v.push(10).unwrap();
    v.push(20).unwrap();
    assert_eq!(v.capacity(), 2);

    let err = v.push(30).unwrap_err();
    assert!(matches!(
        err,
        SeqError::Alloc(AllocError::OutOfMemory { count: 4, .. })
    ));
    assert_eq!(strategy.calls(), 3);
    assert_eq!(v.len(), 2);
    assert_eq!(v.capacity(), 2);
    assert_eq!(v.as_slice(), [10, 20]);

    // The next attempt is allocation 4 and succeeds.
    v.push(30).unwrap();
    assert_eq!(v.as_slice(), [10, 20, 30]);
    assert_eq!(v.capacity(), 4);
}

#[test]
fn failing_reserve_keeps_storage_address() {
    let strategy = FailingStrategy::new(2);
    let mut v = GrowVec::new_in(strategy).unwrap();
    v.push(String::from("kept")).unwrap();
    let before = v.begin().as_ptr();

    assert!(v.reserve(100).is_err());
    assert_eq!(v.capacity(), 1);
    assert_eq!(v.begin().as_ptr(), before);
    assert_eq!(v[0], "kept");
}

#[test]
fn try_extend_stops_at_first_failure() {
    // Growth to 4 is allocation 3.
    let mut v = GrowVec::new_in(FailingStrategy::new(3)).unwrap();
    let result = v.try_extend(0..10);
    assert!(result.is_err());
    assert_eq!(v.as_slice(), [0, 1]);
}

#[test]
fn capacity_overflow_is_reported_not_panicked() {
    let mut v: GrowVec<u64> = GrowVec::new().unwrap();
    v.push(1).unwrap();
    let err = v.reserve(usize::MAX).unwrap_err();
    assert_eq!(
        err,
        SeqError::Alloc(AllocError::CapacityOverflow { count: usize::MAX })
    );
    assert_eq!(v.as_slice(), [1]);
}

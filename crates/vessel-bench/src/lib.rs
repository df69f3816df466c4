//! Benchmark workloads and utilities for the vessel containers.
//!
//! Provides pre-built fills shared by the benchmarks and the demo:
//!
//! - [`fill_sequential`]: push `0..n` through any strategy
//! - [`factorials`]: the `(k, k!)` table printed by the demo

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::BTreeMap;

use vessel::{AllocStrategy, GrowVec, SeqError};

/// Push `0..n` into a fresh sequence backed by `strategy`.
pub fn fill_sequential<S: AllocStrategy>(n: u64, strategy: S) -> Result<GrowVec<u64, S>, SeqError> {
    let mut v = GrowVec::new_in(strategy)?;
    v.try_extend(0..n)?;
    Ok(v)
}

/// Map each `k` in `0..n` to `k!`, saturating at `u64::MAX`.
pub fn factorials(n: u64) -> BTreeMap<u64, u64> {
    let mut acc = 1u64;
    (0..n)
        .map(|k| {
            acc = acc.saturating_mul(k.max(1));
            (k, acc)
        })
        .collect()
}

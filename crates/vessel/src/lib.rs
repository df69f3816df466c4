//! vessel: a growable sequence over a swappable allocation strategy.
//!
//! [`GrowVec<T, S>`](GrowVec) is a contiguous container that obtains its
//! storage from an [`AllocStrategy`] chosen by type parameter (the system
//! allocator by default). It starts with a single slot and doubles on the
//! push that would overflow. [`Cursor`] provides forward traversal tied to
//! a borrow of the sequence.
//!
//! # Architecture
//!
//! ```text
//! GrowVec<T, S>            (safe API: push, reserve, index, cursors)
//! └── RawBuf<T, S>         (raw.rs: the only unsafe in this crate)
//!     └── S: AllocStrategy (vessel-alloc: allocate / deallocate /
//!                           construct / destroy)
//! ```
//!
//! # Example
//!
//! ```rust
//! use vessel::{CountingStrategy, GrowVec};
//!
//! let strategy = CountingStrategy::new();
//! let mut v = GrowVec::new_in(strategy.clone()).unwrap();
//! assert!(v.is_empty());
//! for i in 0..10 {
//!     v.push(i).unwrap();
//! }
//! assert_eq!(v.len(), 10);
//! assert_eq!(v.begin().copied().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
//! assert_eq!(strategy.stats().allocations, 5);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod cursor;
pub mod error;
mod raw;
pub mod seq;

// Public re-exports for the primary API surface.
pub use cursor::Cursor;
pub use error::SeqError;
pub use seq::GrowVec;
pub use vessel_alloc::{AllocError, AllocStrategy, CountingStats, CountingStrategy, SystemStrategy};

//! Pluggable allocation strategies for vessel containers.
//!
//! This is the leaf crate of the workspace. It defines the
//! [`AllocStrategy`] policy trait that containers are generic over, the
//! [`AllocError`] type reported when storage cannot be obtained, and two
//! ready-made strategies:
//!
//! - [`SystemStrategy`]: the global allocator. Stateless; every instance
//!   compares equal.
//! - [`CountingStrategy`]: wraps the system strategy and counts every
//!   allocate / deallocate / construct / destroy call. Clones share one
//!   counter block.
//!
//! # Strategy contract
//!
//! ```text
//! allocate(count)          -> uninitialized storage for `count` slots
//!   construct(slot, value) -> slot becomes live
//!   destroy(slot)          -> slot becomes uninitialized again
//! deallocate(ptr, count)   -> same `count` as the matching allocate
//! ```
//!
//! `unsafe_code` is denied at the crate root. The modules that declare or
//! implement the strategy trait opt back in, and only `system.rs` touches
//! the global allocator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod counting;
pub mod error;
pub mod strategy;
pub mod system;

pub use counting::{CountingStats, CountingStrategy};
pub use error::AllocError;
pub use strategy::AllocStrategy;
pub use system::SystemStrategy;

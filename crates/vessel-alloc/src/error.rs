//! Allocation error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur while obtaining storage from a strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The byte size of the request does not fit in a valid layout
    /// (`count * size_of::<T>()` overflows or exceeds `isize::MAX`).
    CapacityOverflow {
        /// Number of element slots requested.
        count: usize,
    },
    /// The underlying allocator could not satisfy the request.
    OutOfMemory {
        /// Number of element slots requested.
        count: usize,
        /// Size of the request in bytes.
        bytes: usize,
    },
}

impl AllocError {
    /// Number of element slots in the failed request.
    pub fn count(&self) -> usize {
        match self {
            Self::CapacityOverflow { count } | Self::OutOfMemory { count, .. } => *count,
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { count } => {
                write!(f, "capacity overflow: {count} slots do not fit in a layout")
            }
            Self::OutOfMemory { count, bytes } => {
                write!(
                    f,
                    "out of memory: failed to allocate {count} slots ({bytes} bytes)"
                )
            }
        }
    }
}

impl Error for AllocError {}

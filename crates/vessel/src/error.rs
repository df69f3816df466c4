//! Sequence error types.

use std::error::Error;
use std::fmt;

use vessel_alloc::AllocError;

/// Errors reported by [`GrowVec`](crate::GrowVec) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeqError {
    /// The strategy could not provide storage. Raised by construction,
    /// `push` and `reserve`; the sequence is left unchanged.
    Alloc(AllocError),
    /// The capacity cannot be multiplied by the growth factor without
    /// overflowing `usize`. Raised by `push`; the sequence is left unchanged.
    CapacityOverflow {
        /// The capacity that could not grow.
        capacity: usize,
    },
    /// A checked access named an index outside the live range.
    OutOfBounds {
        /// The requested index.
        index: usize,
        /// The sequence length at the time of the access.
        len: usize,
    },
}

impl fmt::Display for SeqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(err) => write!(f, "allocation failed: {err}"),
            Self::CapacityOverflow { capacity } => {
                write!(f, "capacity {capacity} cannot grow without overflowing usize")
            }
            Self::OutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
        }
    }
}

impl Error for SeqError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            Self::CapacityOverflow { .. } | Self::OutOfBounds { .. } => None,
        }
    }
}

impl From<AllocError> for SeqError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_error_is_exposed_as_source() {
        let err = SeqError::from(AllocError::CapacityOverflow { count: 9 });
        let source = err.source().unwrap();
        assert_eq!(
            source.to_string(),
            "capacity overflow: 9 slots do not fit in a layout"
        );
    }

    #[test]
    fn out_of_bounds_display() {
        let err = SeqError::OutOfBounds { index: 4, len: 2 };
        assert_eq!(err.to_string(), "index 4 out of bounds for length 2");
        assert!(err.source().is_none());
    }

    #[test]
    fn capacity_overflow_display() {
        let err = SeqError::CapacityOverflow { capacity: 12 };
        assert_eq!(
            err.to_string(),
            "capacity 12 cannot grow without overflowing usize"
        );
        assert!(err.source().is_none());
    }
}

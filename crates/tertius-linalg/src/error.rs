//! Error types for sparse linear algebra.

use thiserror::Error;

use tertius_rings::RingError;

/// Coarse classification of a [`LinalgError`].
///
/// Callers decide whether to retry from the kind alone: `Unable` failures
/// come from unlucky randomness or a ring that could not answer and are worth
/// retrying with fresh randomness, `Domain` failures never are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A precondition was violated.
    Domain,
    /// The computation could not produce an answer this time.
    Unable,
    /// An internally verified postcondition failed.
    TestFail,
}

/// Errors raised by matrix and vector operations and by the solvers.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LinalgError {
    /// Operand dimensions do not agree.
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Expected (rows, cols).
        expected: (usize, usize),
        /// Actual (rows, cols).
        found: (usize, usize),
    },

    /// An index lies outside the ambient dimension.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The dimension it was checked against.
        len: usize,
    },

    /// A square matrix was required.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// The ring could not perform an operation.
    #[error("ring operation failed: {0}")]
    Ring(#[from] RingError),

    /// A randomized method broke down.
    #[error("breakdown: {0}")]
    Breakdown(&'static str),

    /// A computed result failed its check.
    #[error("verification failed: {0}")]
    VerificationFailed(&'static str),

    /// An argument is outside the supported range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl LinalgError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ShapeMismatch { .. }
            | Self::IndexOutOfRange { .. }
            | Self::NotSquare { .. }
            | Self::InvalidArgument(_) => ErrorKind::Domain,
            Self::Ring(_) | Self::Breakdown(_) => ErrorKind::Unable,
            Self::VerificationFailed(_) => ErrorKind::TestFail,
        }
    }

    /// Returns true if retrying with fresh randomness may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unable)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LinalgError>;

/// Checks that `index < len`.
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(LinalgError::IndexOutOfRange { index, len })
    }
}

/// Checks that two shapes agree.
pub(crate) fn check_shape(expected: (usize, usize), found: (usize, usize)) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(LinalgError::ShapeMismatch { expected, found })
    }
}

//! Error types for simdlane.
//!
//! Only precondition violations and configuration problems are errors.
//! NaN, infinities and out-of-range conversions are ordinary lane values.

use thiserror::Error;

use crate::simd_native::SimdLevel;

/// Errors surfaced by the vector façade, the kernel registry and configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimdError {
    /// A load or store buffer is shorter than one full vector.
    #[error("Buffer too short: need {needed} lanes, got {available}")]
    InsufficientLength {
        /// Lanes required by the operation.
        needed: usize,
        /// Lanes the caller provided.
        available: usize,
    },

    /// Two slices passed to one slice-level operation differ in length.
    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first operand.
        left: usize,
        /// Length of the mismatching operand.
        right: usize,
    },

    /// A gather/scatter index points outside the base slice.
    #[error("Index {index} out of bounds for slice of length {len}")]
    IndexOutOfBounds {
        /// Offending lane index value (negative indices are reported as-is).
        index: i64,
        /// Length of the base slice.
        len: usize,
    },

    /// The requested dispatch level cannot run on this host.
    #[error("SIMD level {0} is not supported on this CPU")]
    UnsupportedLevel(SimdLevel),

    /// Configuration could not be extracted.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for SimdError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for simdlane operations.
pub type Result<T> = std::result::Result<T, SimdError>;

/// Checks that a buffer holds at least `needed` lanes.
#[inline]
pub(crate) fn ensure_len(needed: usize, available: usize) -> Result<()> {
    if available < needed {
        return Err(SimdError::InsufficientLength { needed, available });
    }
    Ok(())
}

/// Checks that two operands have the same length.
#[inline]
pub(crate) fn ensure_same_len(left: usize, right: usize) -> Result<()> {
    if left != right {
        return Err(SimdError::LengthMismatch { left, right });
    }
    Ok(())
}

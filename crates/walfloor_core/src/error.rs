//! Error types for walfloor core.
//!
//! The floor computation itself is total and never fails. Errors only
//! surface where raw configuration or operator input is validated.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while validating retention inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Segment size is zero, not a power of two, or out of range.
    #[error("invalid segment size {bytes}: {reason}")]
    InvalidSegmentSize {
        /// The rejected size in bytes.
        bytes: u64,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A log position string could not be parsed.
    #[error("invalid log position {input:?}: expected HI/LO in hexadecimal")]
    InvalidPosition {
        /// The rejected input.
        input: String,
    },
}

impl CoreError {
    /// Creates an invalid segment size error.
    pub fn invalid_segment_size(bytes: u64, reason: &'static str) -> Self {
        Self::InvalidSegmentSize { bytes, reason }
    }

    /// Creates an invalid position error.
    pub fn invalid_position(input: impl Into<String>) -> Self {
        Self::InvalidPosition {
            input: input.into(),
        }
    }
}

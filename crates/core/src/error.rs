//! # Error Types
//!
//! Errors in the axis algebra are first-class: they describe containers
//! that cannot be addressed or combined. A shared axis with two different
//! cardinalities is not a "bug" in the data, it is an undefined combination.

use thiserror::Error;

/// Errors raised by named containers and the axis algebra.
///
/// Every variant carries the offending axis or kind names.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AxisError {
    /// A shared axis has a different cardinality on each side.
    #[error("Shape mismatch on axis '{axis}': expected {expected}, got {got}")]
    ShapeMismatch {
        axis: String,
        expected: usize,
        got: usize,
    },

    /// Containers that must be aligned carry different axis lists.
    #[error("Axes mismatch: expected {expected:?}, got {got:?}")]
    AxesMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    /// A leaf had the wrong kind (e.g. a value where a function was required).
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    /// A coordinate or projection named an axis the container does not have.
    #[error("Unknown axis '{axis}' (available: {available:?})")]
    UnknownAxis {
        axis: String,
        available: Vec<String>,
    },

    /// A coordinate did not supply an index for one of the container's axes.
    #[error("Missing coordinate for axis '{axis}'")]
    MissingCoordinate { axis: String },

    /// An index is past the end of its axis.
    #[error("Coordinate {index} out of range for axis '{axis}' of size {size}")]
    CoordinateOutOfRange {
        axis: String,
        index: usize,
        size: usize,
    },

    /// Construction would violate the container invariant.
    #[error("Invalid container: {reason}")]
    InvalidContainer { reason: String },

    /// A function leaf failed while being applied.
    #[error("Action failed: {reason}")]
    ActionFailed { reason: String },
}

impl AxisError {
    /// Shorthand for [`AxisError::InvalidContainer`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidContainer {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`AxisError::ActionFailed`], for use inside function leaves.
    pub fn action_failed(reason: impl Into<String>) -> Self {
        Self::ActionFailed {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`AxisError::TypeMismatch`].
    pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }
}

//! Tuple Error Types
//!
//! Failures of positional tuple access and of element serialization.

use codec::CodecError;
use thiserror::Error;
use types::RuntimeType;

/// Result type for tuple operations
pub type Result<T> = std::result::Result<T, TupleError>;

/// Tuple access and serialization errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TupleError {
    /// Position past the end of the tuple
    #[error("Position {pos} out of range for tuple of size {size}")]
    OutOfRange { pos: usize, size: usize },

    /// Typed access with a type other than the stored one
    #[error("Type mismatch at position {pos}: expected {expected}, found {actual}")]
    TypeMismatch {
        pos: usize,
        expected: RuntimeType,
        actual: RuntimeType,
    },

    /// An element failed to write or read itself
    #[error("Element serialization failed: {0}")]
    Serialization(#[from] CodecError),
}

impl TupleError {
    pub fn out_of_range(pos: usize, size: usize) -> Self {
        Self::OutOfRange { pos, size }
    }

    pub fn type_mismatch(pos: usize, expected: RuntimeType, actual: RuntimeType) -> Self {
        Self::TypeMismatch {
            pos,
            expected,
            actual,
        }
    }

    /// Error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "range",
            Self::TypeMismatch { .. } => "type",
            Self::Serialization(_) => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TupleError::out_of_range(3, 2);
        assert_eq!(err.to_string(), "Position 3 out of range for tuple of size 2");
        assert_eq!(err.category(), "range");

        let err = TupleError::type_mismatch(
            0,
            RuntimeType::of::<String>(),
            RuntimeType::of::<i32>(),
        );
        assert!(err.to_string().contains("expected alloc::string::String, found i32"));
    }
}

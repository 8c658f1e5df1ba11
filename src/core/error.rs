// Core Layer: error types
//
// All fallible public operations surface one of these variants. The mutation
// discipline is "no write on error": dimension checks run before any kernel
// touches its output.

use thiserror::Error;

use crate::types::IndexType;

/// Crate-wide error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphBlasError {
    /// Operand shapes violate the operation's dimension contract.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    /// Access outside the declared dimensions.
    #[error("index {index} out of bounds for dimension {bound}")]
    IndexOutOfBounds { index: IndexType, bound: IndexType },
    /// No stored value at the requested position.
    #[error("no stored value at the requested position")]
    NoValue,
    /// Malformed algebraic object or internal postcondition breach.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result type for all operations.
pub type Result<T> = std::result::Result<T, GraphBlasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_value_distinct_from_out_of_bounds() {
        let a = GraphBlasError::NoValue;
        let b = GraphBlasError::IndexOutOfBounds { index: 3, bound: 3 };
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_carries_context() {
        let e = GraphBlasError::DimensionMismatch("mxm: A is 2x3, B is 4x2".to_string());
        assert!(e.to_string().contains("2x3"));
    }
}

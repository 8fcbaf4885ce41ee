//! Errors reported by the skip list and its value-kind surface.
//!
//! Every failing call reports synchronously and leaves the structure exactly
//! as it was before the call.

use thiserror::Error;

use crate::value::ValueKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure raised by a comparison predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    /// The predicate was handed operands it can not accept.
    #[error("comparison predicate expects operands of type {expected}")]
    Incomparable { expected: &'static str },
    /// Two values of different kinds were compared.
    #[error("can not compare a value of kind \"{left}\" with a value of kind \"{right}\"")]
    KindMismatch { left: ValueKind, right: ValueKind },
    /// Object values were compared without a predicate.
    #[error("no comparison predicate for object values")]
    NoPredicate,
    /// The predicate itself failed.
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // --- Construction ---
    #[error("unsupported value kind \"{0}\", expected int, float, bytes or object")]
    UnsupportedKind(String),
    #[error("can not specify a comparison predicate with value kind \"{0}\"")]
    ComparatorWithBuiltinKind(ValueKind),
    #[error("value kind \"object\" requires a comparison predicate")]
    MissingComparator,
    #[error("invalid option: {0}")]
    InvalidOption(String),

    // --- Value domain ---
    #[error("can not order something that does not compare equal to itself")]
    Unorderable,
    #[error("integer {0} out of range {min} <= value <= {max}", min = i64::MIN, max = i64::MAX)]
    IntegerOverflow(i128),

    // --- Type ---
    #[error("expected a value of kind \"{expected}\" not \"{found}\"")]
    TypeMismatch { expected: ValueKind, found: ValueKind },
    #[error("comparison failed: {0}")]
    Compare(#[from] CompareError),

    // --- Lookup ---
    #[error("value not found")]
    NotFound,

    // --- Range ---
    #[error(
        "index {index} out of range, valid range is -{size} <= index <= -1 or 0 <= index < {size}"
    )]
    IndexOutOfRange { index: i64, size: usize },
    #[error("count {length} from index {start} exceeds size {size}")]
    SequenceOutOfRange { start: usize, length: usize, size: usize },
    #[error("level {level} out of range 0 <= level < {height}")]
    LevelOutOfRange { level: usize, height: usize },

    // --- Resources ---
    #[error("rolling median window length must be at least 1")]
    WindowLength,
    #[error("node arena is full ({0} slots)")]
    CapacityExceeded(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_message_carries_bounds() {
        let err = Error::IndexOutOfRange { index: 4, size: 4 };
        assert_eq!(
            err.to_string(),
            "index 4 out of range, valid range is -4 <= index <= -1 or 0 <= index < 4"
        );
    }

    #[test]
    fn overflow_message_carries_bounds() {
        let err = Error::IntegerOverflow(i64::MAX as i128 + 1);
        assert_eq!(
            err.to_string(),
            "integer 9223372036854775808 out of range \
             -9223372036854775808 <= value <= 9223372036854775807"
        );
    }

    #[test]
    fn compare_error_converts() {
        let err: Error = CompareError::NoPredicate.into();
        assert_eq!(err, Error::Compare(CompareError::NoPredicate));
    }
}

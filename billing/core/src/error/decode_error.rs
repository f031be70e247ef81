//! Structural decoding errors.

use serde_json::Value;
use thiserror::Error;

/// A JSON node whose shape does not match the type it is decoded into.
///
/// These errors describe a single value. The property or list position the
/// value came from is attached by [`ModelError`](super::ModelError) context
/// wrappers, not here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The node is of a different JSON kind than expected.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// The JSON kind the target type needs.
        expected: &'static str,
        /// The JSON kind that was present.
        found: &'static str,
    },

    /// An integer that does not fit in a signed 64-bit value.
    #[error("integer {value} does not fit in a signed 64-bit integer")]
    NumericOverflow {
        /// Textual form of the number.
        value: String,
    },

    /// A string that is not an RFC 3339 timestamp.
    #[error("invalid timestamp `{value}`: {message}")]
    InvalidTimestamp {
        /// The rejected text.
        value: String,
        /// Parser diagnostic.
        message: String,
    },

    /// A monetary amount that is not a plain decimal number.
    #[error("invalid decimal amount `{value}`")]
    InvalidAmount {
        /// The rejected text.
        value: String,
    },
}

impl DecodeError {
    /// Creates a type mismatch error for `found`.
    pub fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            expected,
            found: json_kind(found),
        }
    }

    /// Returns `true` if this is a JSON kind mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

/// Returns the JSON kind of a node, as used in diagnostics.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "fractional number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

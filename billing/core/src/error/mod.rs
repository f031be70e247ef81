//! Layered error types for the model layer.
//!
//! - [`ModelError`] - Top-level error for decoding and validation
//! - [`DecodeError`] - Structural mismatch of a single JSON value

mod decode_error;
mod model_error;

pub use decode_error::{json_kind, DecodeError};
pub use model_error::{ModelError, ModelErrorKind};

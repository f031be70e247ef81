//! Byte-level entry points for transports.
//!
//! A transport moves bytes; this module turns response bodies into models and
//! models into request bodies.

mod format;

pub use format::{encode_body, JsonFormat, ResponseFormat, ValidatedJsonFormat, JSON_CONTENT_TYPE};

//! Wire format trait and implementations.
//!
//! The [`ResponseFormat`] trait defines how a transport hands response bytes
//! to the model layer. [`encode_body`] is the reverse direction for outgoing
//! request bodies.

use std::any::type_name;
use std::marker::PhantomData;

use bytes::Bytes;
use tracing::instrument;

use crate::codec::PropertyValue;
use crate::error::ModelError;

/// Content type of every body this layer produces or accepts.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Trait for response parsing strategies.
///
/// ## Examples
///
/// ```rust,ignore
/// use billing_core::wire::{JsonFormat, ResponseFormat};
///
/// // The format type encodes both the parsing strategy and output type
/// let invoice = JsonFormat::<Invoice>::parse(body)?;
/// ```
pub trait ResponseFormat {
    /// The output type after parsing.
    type Output;

    /// Parse a response body into the output type.
    fn parse(body: Bytes) -> Result<Self::Output, ModelError>;

    /// Returns the expected Content-Type for this format.
    fn content_type() -> &'static str {
        JSON_CONTENT_TYPE
    }
}

/// JSON response format with lazy decoding.
///
/// The body is parsed and its top-level shape checked, but properties are
/// only decoded when read. Use [`ValidatedJsonFormat`] when the caller needs
/// a fully validated value.
///
/// ## Type Parameters
///
/// - `T`: The model, union or list type to decode into.
#[derive(Debug, Clone, Copy)]
pub struct JsonFormat<T>(PhantomData<T>);

impl<T: PropertyValue> ResponseFormat for JsonFormat<T> {
    type Output = T;

    #[instrument(level = "trace", skip(body), fields(target_type = type_name::<T>(), bytes = body.len()))]
    fn parse(body: Bytes) -> Result<Self::Output, ModelError> {
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        T::decode(&value)
    }
}

/// JSON response format that validates the decoded value.
///
/// ## Type Parameters
///
/// - `T`: The model, union or list type to decode into.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJsonFormat<T>(PhantomData<T>);

impl<T: PropertyValue> ResponseFormat for ValidatedJsonFormat<T> {
    type Output = T;

    #[instrument(level = "trace", skip(body), fields(target_type = type_name::<T>(), bytes = body.len()))]
    fn parse(body: Bytes) -> Result<Self::Output, ModelError> {
        let value = JsonFormat::<T>::parse(body)?;
        value.validate_value()?;
        Ok(value)
    }
}

/// Encodes a value as a JSON request body.
///
/// ## Errors
///
/// Returns [`ModelError::Json`] if serialization fails.
pub fn encode_body<T: PropertyValue>(value: &T) -> Result<Bytes, ModelError> {
    let bytes = serde_json::to_vec(&value.encode())?;
    Ok(Bytes::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Amount, ModelErrorKind};
    use serde_json::json;

    #[test]
    fn test_json_format_parse() {
        let body = Bytes::from(r#"["1.50", "2"]"#);
        let amounts = JsonFormat::<Vec<Amount>>::parse(body).unwrap();
        assert_eq!(amounts, vec![Amount::new("1.50"), Amount::new("2")]);
    }

    #[test]
    fn test_json_format_invalid() {
        let body = Bytes::from("not json");
        let err = JsonFormat::<Vec<Amount>>::parse(body).unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::Json);
    }

    #[test]
    fn test_json_format_is_lazy_about_validation() {
        let body = Bytes::from(r#"["abc"]"#);
        assert!(JsonFormat::<Vec<Amount>>::parse(body.clone()).is_ok());

        let err = ValidatedJsonFormat::<Vec<Amount>>::parse(body).unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::Decode);
        assert_eq!(err.path(), "[0]");
    }

    #[test]
    fn test_encode_body() {
        let body = encode_body(&vec![Amount::new("19.99")]).unwrap();
        assert_eq!(body, Bytes::from(r#"["19.99"]"#));
        let round: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(round, json!(["19.99"]));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(JsonFormat::<String>::content_type(), "application/json");
        assert_eq!(ValidatedJsonFormat::<String>::content_type(), "application/json");
    }
}

//! Conversion between JSON nodes and typed property values.
//!
//! [`PropertyValue`] is the scalar codec every typed accessor goes through.
//! Decoding is fallible and checks the node's shape; encoding is total.
//! [`PropertyValue::validate_value`] is the recursive validation hook: plain
//! scalars are always valid, while models, open enums, unions and amounts
//! run their own checks.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};

use crate::error::{DecodeError, ModelError};

/// A type that can be stored in a model property.
///
/// ## Examples
///
/// ```rust
/// use billing_core::PropertyValue;
/// use serde_json::json;
///
/// let ids = Vec::<String>::decode(&json!(["price_1", "price_2"])).unwrap();
/// assert_eq!(ids, vec!["price_1", "price_2"]);
/// assert_eq!(ids.encode(), json!(["price_1", "price_2"]));
///
/// assert!(i64::decode(&json!("3")).is_err());
/// ```
pub trait PropertyValue: Sized {
    /// Decodes a node into this type.
    ///
    /// ## Errors
    ///
    /// Returns an error when the node's shape does not match.
    fn decode(value: &Value) -> Result<Self, ModelError>;

    /// Encodes this value into a node.
    fn encode(&self) -> Value;

    /// Recursively validates a decoded value.
    fn validate_value(&self) -> Result<(), ModelError> {
        Ok(())
    }
}

impl PropertyValue for String {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(DecodeError::type_mismatch("string", other).into()),
        }
    }

    fn encode(&self) -> Value {
        Value::String(self.clone())
    }
}

impl PropertyValue for bool {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(DecodeError::type_mismatch("boolean", other).into()),
        }
    }

    fn encode(&self) -> Value {
        Value::Bool(*self)
    }
}

impl PropertyValue for i64 {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        let Value::Number(n) = value else {
            return Err(DecodeError::type_mismatch("integer", value).into());
        };
        if let Some(i) = n.as_i64() {
            return Ok(i);
        }
        if n.is_u64() {
            return Err(DecodeError::NumericOverflow {
                value: n.to_string(),
            }
            .into());
        }
        // Integral floats such as `3.0` are accepted.
        match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Ok(f as i64)
            }
            Some(f) if f.fract() == 0.0 => Err(DecodeError::NumericOverflow {
                value: n.to_string(),
            }
            .into()),
            _ => Err(DecodeError::type_mismatch("integer", value).into()),
        }
    }

    fn encode(&self) -> Value {
        Value::Number(Number::from(*self))
    }
}

impl PropertyValue for f64 {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        value
            .as_f64()
            .ok_or_else(|| DecodeError::type_mismatch("number", value).into())
    }

    fn encode(&self) -> Value {
        // Non-finite floats have no JSON representation.
        Number::from_f64(*self).map_or(Value::Null, Value::Number)
    }
}

impl PropertyValue for Value {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        Ok(value.clone())
    }

    fn encode(&self) -> Value {
        self.clone()
    }
}

impl PropertyValue for DateTime<Utc> {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        let Value::String(text) = value else {
            return Err(DecodeError::type_mismatch("timestamp string", value).into());
        };
        DateTime::parse_from_rfc3339(text)
            .map(|ts| ts.with_timezone(&Utc))
            .or_else(|e| {
                // ISO-8601 without an offset is read as UTC.
                text.parse::<NaiveDateTime>()
                    .map(|naive| naive.and_utc())
                    .map_err(|_| e)
            })
            .map_err(|e| {
                DecodeError::InvalidTimestamp {
                    value: text.clone(),
                    message: e.to_string(),
                }
                .into()
            })
    }

    fn encode(&self) -> Value {
        Value::String(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl<T: PropertyValue> PropertyValue for Option<T> {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }

    fn encode(&self) -> Value {
        self.as_ref().map_or(Value::Null, PropertyValue::encode)
    }

    fn validate_value(&self) -> Result<(), ModelError> {
        match self {
            Some(value) => value.validate_value(),
            None => Ok(()),
        }
    }
}

impl<T: PropertyValue> PropertyValue for Vec<T> {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        let Value::Array(items) = value else {
            return Err(DecodeError::type_mismatch("array", value).into());
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| T::decode(item).map_err(|e| e.at_index(index)))
            .collect()
    }

    fn encode(&self) -> Value {
        Value::Array(self.iter().map(PropertyValue::encode).collect())
    }

    fn validate_value(&self) -> Result<(), ModelError> {
        self.iter()
            .enumerate()
            .try_for_each(|(index, item)| item.validate_value().map_err(|e| e.at_index(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelErrorKind;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_string_rejects_number() {
        let err = String::decode(&json!(12)).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Decode(DecodeError::TypeMismatch {
                expected: "string",
                found: "integer"
            })
        ));
    }

    #[test]
    fn test_integer_accepts_integral_float() {
        assert_eq!(i64::decode(&json!(3.0)).unwrap(), 3);
        assert_eq!(i64::decode(&json!(-42)).unwrap(), -42);
        assert!(i64::decode(&json!(3.5)).is_err());
    }

    #[test]
    fn test_integer_overflow() {
        let err = i64::decode(&json!(u64::MAX)).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Decode(DecodeError::NumericOverflow { .. })
        ));

        let err = i64::decode(&json!(1e300)).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Decode(DecodeError::NumericOverflow { .. })
        ));
    }

    #[test]
    fn test_float_accepts_integers() {
        assert_eq!(f64::decode(&json!(1)).unwrap(), 1.0);
        assert_eq!(f64::decode(&json!(0.25)).unwrap(), 0.25);
        assert!(f64::decode(&json!("0.25")).is_err());
    }

    #[test]
    fn test_timestamp_decode_and_encode() {
        let ts = DateTime::<Utc>::decode(&json!("2024-03-01T10:30:00+02:00")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap());
        assert_eq!(ts.encode(), json!("2024-03-01T08:30:00Z"));
    }

    #[test]
    fn test_timestamp_without_offset_is_utc() {
        let ts = DateTime::<Utc>::decode(&json!("2024-03-01T10:30:00")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap());

        let ts = DateTime::<Utc>::decode(&json!("2024-03-01T10:30:00.250")).unwrap();
        assert_eq!(ts.encode(), json!("2024-03-01T10:30:00.250Z"));
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        let err = DateTime::<Utc>::decode(&json!("yesterday")).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Decode(DecodeError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_option_null_is_none() {
        assert_eq!(Option::<String>::decode(&json!(null)).unwrap(), None);
        assert_eq!(
            Option::<String>::decode(&json!("x")).unwrap(),
            Some("x".to_string())
        );
        assert_eq!(Option::<String>::None.encode(), Value::Null);
    }

    #[test]
    fn test_list_error_carries_index() {
        let err = Vec::<String>::decode(&json!(["a", "b", 3])).unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::Decode);
        assert_eq!(err.path(), "[2]");
    }

    #[test]
    fn test_raw_value_passthrough() {
        let raw = json!({"nested": [1, {"x": null}]});
        assert_eq!(Value::decode(&raw).unwrap().encode(), raw);
    }
}

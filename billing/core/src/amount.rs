//! Decimal-preserving monetary amounts.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::PropertyValue;
use crate::error::{DecodeError, ModelError};

/// A monetary amount carried as its exact decimal text.
///
/// Amounts never pass through binary floating point: `"19.99"` decodes and
/// re-encodes as the string `"19.99"`. Use [`Amount::to_decimal`] for
/// arithmetic.
///
/// ## Examples
///
/// ```rust
/// use billing_core::{Amount, PropertyValue};
/// use serde_json::json;
///
/// let amount = Amount::decode(&json!("19.99")).unwrap();
/// assert_eq!(amount.as_str(), "19.99");
/// assert_eq!(amount.encode(), json!("19.99"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(String);

impl Amount {
    /// Wraps decimal text without checking it.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the exact decimal text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the amount into its text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` if the text is a plain decimal number
    /// (optional sign, digits, optional fraction).
    pub fn is_well_formed(&self) -> bool {
        is_decimal_text(&self.0)
    }

    /// Parses the amount for arithmetic.
    ///
    /// ## Errors
    ///
    /// Returns [`DecodeError::InvalidAmount`] if the text is not a decimal
    /// number or exceeds the range of [`Decimal`].
    pub fn to_decimal(&self) -> Result<Decimal, DecodeError> {
        if !self.is_well_formed() {
            return Err(self.invalid());
        }
        Decimal::from_str_exact(&self.0).map_err(|_| self.invalid())
    }

    fn invalid(&self) -> DecodeError {
        DecodeError::InvalidAmount {
            value: self.0.clone(),
        }
    }
}

fn is_decimal_text(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && fraction.is_none_or(digits)
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Amount {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Self::new(s);
        if amount.is_well_formed() {
            Ok(amount)
        } else {
            Err(amount.invalid())
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value.to_string())
    }
}

impl PropertyValue for Amount {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::String(text) => Ok(Self(text.clone())),
            // Numbers are accepted in their textual form.
            Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(DecodeError::type_mismatch("decimal string", other).into()),
        }
    }

    fn encode(&self) -> Value {
        Value::String(self.0.clone())
    }

    fn validate_value(&self) -> Result<(), ModelError> {
        if self.is_well_formed() {
            Ok(())
        } else {
            Err(self.invalid().into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_fidelity() {
        let amount = Amount::decode(&json!("19.99")).unwrap();
        assert_eq!(amount.encode(), json!("19.99"));
        assert_eq!(serde_json::to_string(&amount).unwrap(), r#""19.99""#);
        assert_ne!(amount.encode(), json!(19.99));
    }

    #[test]
    fn test_trailing_zeros_kept() {
        let amount = Amount::decode(&json!("10.00")).unwrap();
        assert_eq!(amount.as_str(), "10.00");
        assert_eq!(amount.to_decimal().unwrap().to_string(), "10.00");
    }

    #[test]
    fn test_number_input_becomes_string() {
        let amount = Amount::decode(&json!(5)).unwrap();
        assert_eq!(amount.encode(), json!("5"));
    }

    #[test]
    fn test_rejects_non_scalar() {
        assert!(Amount::decode(&json!({"value": "1"})).is_err());
        assert!(Amount::decode(&json!(null)).is_err());
    }

    #[test]
    fn test_well_formed() {
        for ok in ["0", "19.99", "-3.5", "1000000.000001"] {
            assert!(Amount::new(ok).is_well_formed(), "{ok}");
        }
        for bad in ["", "abc", "1.", ".5", "1e5", "--1", "1.2.3", " 1"] {
            assert!(!Amount::new(bad).is_well_formed(), "{bad}");
        }
    }

    #[test]
    fn test_validate_rejects_malformed_text() {
        let amount = Amount::decode(&json!("twelve")).unwrap();
        let err = amount.validate_value().unwrap_err();
        assert!(matches!(
            err,
            ModelError::Decode(DecodeError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_decimal_arithmetic() {
        let a: Amount = "19.99".parse().unwrap();
        let b: Amount = "0.01".parse().unwrap();
        let sum = a.to_decimal().unwrap() + b.to_decimal().unwrap();
        assert_eq!(Amount::from(sum).as_str(), "20.00");
    }
}

//! Open enumerations that tolerate values added by the API later.
//!
//! An [`OpenEnum`] pairs the raw JSON value with the known case it matched,
//! if any. Decoding never fails; an unrecognized value is kept verbatim so it
//! re-encodes unchanged, and is only rejected when `validate()` is called.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::codec::PropertyValue;
use crate::error::ModelError;

/// The known cases of an enumeration.
///
/// String-backed enums get this through [`StringEnum`]. Bool-backed or other
/// enums implement it directly.
pub trait EnumCase: Copy + Eq + fmt::Debug + 'static {
    /// Name used in diagnostics.
    const ENUM_NAME: &'static str;

    /// Maps a raw value to a known case.
    fn from_raw(raw: &Value) -> Option<Self>;

    /// Returns the raw value of a known case.
    fn to_raw(self) -> Value;
}

/// A string-backed enumeration whose literals are declared with `strum`.
///
/// ## Examples
///
/// ```rust
/// use billing_core::{OpenEnum, StringEnum};
/// use strum::{EnumString, IntoStaticStr};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
/// #[strum(serialize_all = "snake_case")]
/// enum Status { Active, Archived }
///
/// impl StringEnum for Status {
///     const ENUM_NAME: &'static str = "Status";
/// }
///
/// let status: OpenEnum<Status> = OpenEnum::from_raw(serde_json::json!("active"));
/// assert_eq!(status.case(), Some(Status::Active));
/// ```
pub trait StringEnum: Copy + Eq + fmt::Debug + FromStr + Into<&'static str> + 'static {
    /// Name used in diagnostics.
    const ENUM_NAME: &'static str;
}

impl<E: StringEnum> EnumCase for E {
    const ENUM_NAME: &'static str = <E as StringEnum>::ENUM_NAME;

    fn from_raw(raw: &Value) -> Option<Self> {
        raw.as_str().and_then(|s| s.parse().ok())
    }

    fn to_raw(self) -> Value {
        let literal: &'static str = self.into();
        Value::String(literal.to_string())
    }
}

/// An enumeration value that may hold a case this client does not know.
///
/// ## Examples
///
/// ```rust
/// use billing_core::{EnumCase, OpenEnum, PropertyValue};
/// use serde_json::{json, Value};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Enabled { Yes, No }
///
/// impl EnumCase for Enabled {
///     const ENUM_NAME: &'static str = "Enabled";
///     fn from_raw(raw: &Value) -> Option<Self> {
///         raw.as_bool().map(|b| if b { Self::Yes } else { Self::No })
///     }
///     fn to_raw(self) -> Value {
///         Value::Bool(self == Self::Yes)
///     }
/// }
///
/// let value = OpenEnum::<Enabled>::decode(&json!("sometimes")).unwrap();
/// assert!(!value.is_known());
/// assert!(value.validate().is_err());
/// assert_eq!(value.encode(), json!("sometimes"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OpenEnum<E> {
    raw: Value,
    case: Option<E>,
}

impl<E: EnumCase> OpenEnum<E> {
    /// Creates a value for a known case.
    pub fn known(case: E) -> Self {
        Self {
            raw: case.to_raw(),
            case: Some(case),
        }
    }

    /// Wraps a raw value, matching it against the known cases.
    pub fn from_raw(raw: Value) -> Self {
        let case = E::from_raw(&raw);
        Self { raw, case }
    }

    /// Returns the matched case, or `None` if the value is unrecognized.
    pub fn case(&self) -> Option<E> {
        self.case
    }

    /// Returns `true` if the value matched a known case.
    pub fn is_known(&self) -> bool {
        self.case.is_some()
    }

    /// Returns the raw value exactly as received or constructed.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Returns the raw value as text, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        self.raw.as_str()
    }

    /// Returns the known case.
    ///
    /// ## Errors
    ///
    /// Returns [`ModelError::InvalidEnumValue`] if the value is unrecognized.
    pub fn validate(&self) -> Result<E, ModelError> {
        self.case
            .ok_or_else(|| ModelError::invalid_enum(E::ENUM_NAME, &self.raw))
    }
}

impl<E: EnumCase> From<E> for OpenEnum<E> {
    fn from(case: E) -> Self {
        Self::known(case)
    }
}

impl<E: EnumCase> PartialEq<E> for OpenEnum<E> {
    fn eq(&self, other: &E) -> bool {
        self.case == Some(*other)
    }
}

impl<E> fmt::Display for OpenEnum<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl<E: EnumCase> PropertyValue for OpenEnum<E> {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        Ok(Self::from_raw(value.clone()))
    }

    fn encode(&self) -> Value {
        self.raw.clone()
    }

    fn validate_value(&self) -> Result<(), ModelError> {
        self.validate().map(|_| ())
    }
}

impl<E> Serialize for OpenEnum<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de, E: EnumCase> Deserialize<'de> for OpenEnum<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelErrorKind;
    use serde_json::json;
    use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, EnumIter)]
    #[strum(serialize_all = "snake_case")]
    enum Cadence {
        OneTime,
        Monthly,
        SemiAnnual,
    }

    impl StringEnum for Cadence {
        const ENUM_NAME: &'static str = "Cadence";
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Toggle {
        On,
        Off,
    }

    impl EnumCase for Toggle {
        const ENUM_NAME: &'static str = "Toggle";

        fn from_raw(raw: &Value) -> Option<Self> {
            raw.as_bool().map(|b| if b { Self::On } else { Self::Off })
        }

        fn to_raw(self) -> Value {
            Value::Bool(matches!(self, Self::On))
        }
    }

    #[test]
    fn test_known_string_case() {
        let cadence = OpenEnum::<Cadence>::decode(&json!("semi_annual")).unwrap();
        assert_eq!(cadence.case(), Some(Cadence::SemiAnnual));
        assert_eq!(cadence, Cadence::SemiAnnual);
        assert!(cadence.validate_value().is_ok());
    }

    #[test]
    fn test_every_case_round_trips() {
        for case in Cadence::iter() {
            let value = OpenEnum::known(case);
            let decoded = OpenEnum::<Cadence>::decode(&value.encode()).unwrap();
            assert_eq!(decoded.case(), Some(case));
        }
    }

    #[test]
    fn test_unknown_value_decodes_and_fails_validation() {
        let cadence = OpenEnum::<Cadence>::decode(&json!("hourly")).unwrap();
        assert!(!cadence.is_known());
        assert_eq!(cadence.as_str(), Some("hourly"));

        let err = cadence.validate().unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::InvalidEnumValue);
        assert_eq!(err.to_string(), "invalid Cadence value \"hourly\"");
    }

    #[test]
    fn test_unknown_value_reencodes_verbatim() {
        let raw = json!({"not": "an enum"});
        let cadence = OpenEnum::<Cadence>::decode(&raw).unwrap();
        assert_eq!(cadence.encode(), raw);
    }

    #[test]
    fn test_bool_backed_enum() {
        let on = OpenEnum::<Toggle>::decode(&json!(true)).unwrap();
        assert_eq!(on, Toggle::On);
        assert_eq!(OpenEnum::known(Toggle::Off).encode(), json!(false));

        let weird = OpenEnum::<Toggle>::decode(&json!("yes")).unwrap();
        assert!(weird.validate().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let cadence: OpenEnum<Cadence> = serde_json::from_str(r#""monthly""#).unwrap();
        assert_eq!(cadence, Cadence::Monthly);
        assert_eq!(serde_json::to_string(&cadence).unwrap(), r#""monthly""#);
        assert_eq!(cadence.to_string(), "monthly");
    }
}

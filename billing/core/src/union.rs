//! Discriminator-driven decoding of tagged unions.
//!
//! A tagged union is a closed Rust enum with one arm per known variant model
//! plus an `Unknown` arm. The variant is chosen by looking the discriminator
//! property's literal up in a static [`Variant`] table; the candidate is then
//! validated. What happens when no variant matches, or when the matched
//! variant fails validation, is decided by the union's [`UnionPolicy`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;
use tracing::{debug, trace};

use crate::error::{DecodeError, ModelError};
use crate::model::Model;
use crate::store::PropertyStore;

/// What a union does with input it cannot decode as a known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum UnionPolicy {
    /// Unmatched or invalid input is an error.
    Strict,
    /// Unmatched or invalid input becomes the `Unknown` arm.
    Lenient,
}

/// One entry of a union's discriminator table.
#[derive(Debug)]
pub struct Variant<U> {
    tag: &'static str,
    build: fn(PropertyStore) -> U,
}

impl<U> Variant<U> {
    /// Registers model `M` under discriminator literal `tag`.
    pub const fn of<M>(tag: &'static str) -> Self
    where
        M: Model,
        U: From<M>,
    {
        Self {
            tag,
            build: build_variant::<M, U>,
        }
    }

    /// Returns the discriminator literal.
    pub fn tag(&self) -> &'static str {
        self.tag
    }
}

fn build_variant<M: Model, U: From<M>>(store: PropertyStore) -> U {
    U::from(M::from_raw_unchecked(store))
}

/// A JSON object that matched no known variant, kept verbatim.
///
/// ## Examples
///
/// ```rust
/// use billing_core::UnknownVariant;
/// use serde_json::json;
///
/// let unknown = UnknownVariant::new(json!({"discount_type": "future_kind", "x": 1}));
/// assert_eq!(unknown.discriminator("discount_type"), Some("future_kind"));
/// assert_eq!(unknown.raw(), &json!({"discount_type": "future_kind", "x": 1}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnknownVariant(Value);

impl UnknownVariant {
    /// Wraps a raw node.
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Returns the raw node.
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Consumes the wrapper into the raw node.
    pub fn into_raw(self) -> Value {
        self.0
    }

    /// Returns the string value of `field`, if the node is an object that has one.
    pub fn discriminator(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }
}

/// A closed set of variant models selected by a discriminator property.
///
/// Implementors are enums with one arm per variant and an `Unknown` arm.
/// `VARIANTS` is matched in order, so the first entry registered for a
/// literal wins.
pub trait TaggedUnion: Clone + Sized + 'static {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// The JSON property whose literal selects the variant.
    const DISCRIMINATOR: &'static str;

    /// Failure policy applied by [`TaggedUnion::from_json`].
    const POLICY: UnionPolicy;

    /// The discriminator table.
    const VARIANTS: &'static [Variant<Self>];

    /// Wraps input that matched no variant.
    fn from_unknown(unknown: UnknownVariant) -> Self;

    /// Returns the unknown arm, if populated.
    fn as_unknown(&self) -> Option<&UnknownVariant>;

    /// Re-serializes whichever arm is populated.
    fn to_json(&self) -> Value;

    /// Validates the populated variant. The unknown arm is checked with
    /// [`TaggedUnion::validate_unknown`].
    fn validate(&self) -> Result<(), ModelError>;

    /// Accepts the unknown arm under a lenient policy. A strict union rejects
    /// it with [`ModelError::NoMatchingVariant`], however it was built.
    fn validate_unknown(unknown: &UnknownVariant) -> Result<(), ModelError> {
        match Self::POLICY {
            UnionPolicy::Lenient => Ok(()),
            UnionPolicy::Strict => Err(no_match::<Self>(unknown.discriminator(Self::DISCRIMINATOR))),
        }
    }

    /// Decodes a node using this union's policy.
    fn from_json(value: &Value) -> Result<Self, ModelError> {
        decode_union_with(value, Self::POLICY)
    }

    /// Parses JSON bytes using this union's policy.
    fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_json(&value)
    }

    /// Returns `true` if the unknown arm is populated.
    fn is_unknown(&self) -> bool {
        self.as_unknown().is_some()
    }

    /// Returns the discriminator literal of the populated arm.
    fn tag(&self) -> Option<String> {
        self.to_json()
            .get(Self::DISCRIMINATOR)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Returns the discriminator literals this union knows about.
    fn known_tags() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(Variant::tag).collect()
    }
}

/// Decodes a node into `U` using the union's own policy.
pub fn decode_union<U: TaggedUnion>(value: &Value) -> Result<U, ModelError> {
    decode_union_with(value, U::POLICY)
}

/// Decodes a node into `U`, overriding the union's policy for this call.
///
/// ## Errors
///
/// Under [`UnionPolicy::Strict`]:
/// - a type mismatch for non-object input;
/// - [`ModelError::NoMatchingVariant`] for an absent, non-string or unknown
///   discriminator;
/// - [`ModelError::AggregateDecodeFailure`] when the selected variant fails
///   validation.
///
/// Under [`UnionPolicy::Lenient`] all of these yield the unknown arm instead.
pub fn decode_union_with<U: TaggedUnion>(value: &Value, policy: UnionPolicy) -> Result<U, ModelError> {
    let Value::Object(object) = value else {
        return fallback(value, policy, || {
            DecodeError::type_mismatch("object", value).into()
        });
    };

    let Some(tag) = object.get(U::DISCRIMINATOR).and_then(Value::as_str) else {
        return fallback(value, policy, || no_match::<U>(None));
    };

    let Some(variant) = U::VARIANTS.iter().find(|v| v.tag == tag) else {
        return fallback(value, policy, || no_match::<U>(Some(tag)));
    };

    trace!(union = U::NAME, tag, "dispatching tagged union");
    let candidate = (variant.build)(PropertyStore::from_map(object.clone()));
    match candidate.validate() {
        Ok(()) => Ok(candidate),
        Err(cause) => fallback(value, policy, || ModelError::AggregateDecodeFailure {
            union: U::NAME,
            variant: tag.to_string(),
            causes: vec![cause],
        }),
    }
}

fn no_match<U: TaggedUnion>(tag: Option<&str>) -> ModelError {
    ModelError::NoMatchingVariant {
        union: U::NAME,
        discriminator: U::DISCRIMINATOR,
        value: tag.map(str::to_string),
    }
}

fn fallback<U: TaggedUnion>(
    value: &Value,
    policy: UnionPolicy,
    error: impl FnOnce() -> ModelError,
) -> Result<U, ModelError> {
    let error = error();
    match policy {
        UnionPolicy::Strict => {
            debug!(union = U::NAME, %error, "rejecting tagged union input");
            Err(error)
        }
        UnionPolicy::Lenient => {
            debug!(union = U::NAME, reason = %error, "decoded tagged union as unknown variant");
            Ok(U::from_unknown(UnknownVariant::new(value.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModelErrorKind, PropertySpec};
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Minimum {
        store: PropertyStore,
    }

    impl Model for Minimum {
        const NAME: &'static str = "Minimum";
        const PROPERTIES: &'static [PropertySpec] = &[
            PropertySpec::required::<String>("kind"),
            PropertySpec::required::<crate::Amount>("minimum_amount"),
        ];

        fn from_raw_unchecked(store: PropertyStore) -> Self {
            Self { store }
        }
        fn store(&self) -> &PropertyStore {
            &self.store
        }
        fn store_mut(&mut self) -> &mut PropertyStore {
            &mut self.store
        }
        fn into_store(self) -> PropertyStore {
            self.store
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Maximum {
        store: PropertyStore,
    }

    impl Model for Maximum {
        const NAME: &'static str = "Maximum";
        const PROPERTIES: &'static [PropertySpec] = &[
            PropertySpec::required::<String>("kind"),
            PropertySpec::required::<crate::Amount>("maximum_amount"),
        ];

        fn from_raw_unchecked(store: PropertyStore) -> Self {
            Self { store }
        }
        fn store(&self) -> &PropertyStore {
            &self.store
        }
        fn store_mut(&mut self) -> &mut PropertyStore {
            &mut self.store
        }
        fn into_store(self) -> PropertyStore {
            self.store
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Limit {
        Minimum(Minimum),
        Maximum(Maximum),
        Unknown(UnknownVariant),
    }

    impl From<Minimum> for Limit {
        fn from(value: Minimum) -> Self {
            Self::Minimum(value)
        }
    }

    impl From<Maximum> for Limit {
        fn from(value: Maximum) -> Self {
            Self::Maximum(value)
        }
    }

    impl TaggedUnion for Limit {
        const NAME: &'static str = "Limit";
        const DISCRIMINATOR: &'static str = "kind";
        const POLICY: UnionPolicy = UnionPolicy::Strict;
        const VARIANTS: &'static [Variant<Self>] = &[
            Variant::of::<Minimum>("minimum"),
            Variant::of::<Maximum>("maximum"),
            // Shadowed by the first entry.
            Variant::of::<Maximum>("minimum"),
        ];

        fn from_unknown(unknown: UnknownVariant) -> Self {
            Self::Unknown(unknown)
        }

        fn as_unknown(&self) -> Option<&UnknownVariant> {
            match self {
                Self::Unknown(unknown) => Some(unknown),
                _ => None,
            }
        }

        fn to_json(&self) -> Value {
            match self {
                Self::Minimum(m) => m.to_json(),
                Self::Maximum(m) => m.to_json(),
                Self::Unknown(u) => u.raw().clone(),
            }
        }

        fn validate(&self) -> Result<(), ModelError> {
            match self {
                Self::Minimum(m) => m.validate(),
                Self::Maximum(m) => m.validate(),
                Self::Unknown(u) => Self::validate_unknown(u),
            }
        }
    }

    #[test]
    fn test_dispatch_selects_variant() {
        let limit = Limit::from_json(&json!({"kind": "maximum", "maximum_amount": "10"})).unwrap();
        assert!(matches!(limit, Limit::Maximum(_)));
        assert_eq!(limit.tag().as_deref(), Some("maximum"));
    }

    #[test]
    fn test_first_registered_wins() {
        let limit = Limit::from_json(&json!({"kind": "minimum", "minimum_amount": "1"})).unwrap();
        assert!(matches!(limit, Limit::Minimum(_)));
    }

    #[test]
    fn test_strict_unknown_tag() {
        let err = Limit::from_json(&json!({"kind": "ceiling"})).unwrap_err();
        assert!(matches!(
            err,
            ModelError::NoMatchingVariant { value: Some(ref v), .. } if v == "ceiling"
        ));
    }

    #[test]
    fn test_strict_absent_or_non_string_tag() {
        let err = Limit::from_json(&json!({"minimum_amount": "1"})).unwrap_err();
        assert!(matches!(err, ModelError::NoMatchingVariant { value: None, .. }));

        let err = Limit::from_json(&json!({"kind": 3})).unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::NoMatchingVariant);
    }

    #[test]
    fn test_strict_non_object() {
        let err = Limit::from_json(&json!("minimum")).unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::Decode);
    }

    #[test]
    fn test_strict_variant_failure_is_aggregated() {
        let err = Limit::from_json(&json!({"kind": "minimum"})).unwrap_err();
        let ModelError::AggregateDecodeFailure { variant, causes, .. } = err else {
            panic!("expected aggregate failure");
        };
        assert_eq!(variant, "minimum");
        assert_eq!(causes.len(), 1);
        assert!(causes[0].is_missing_property());
    }

    #[test]
    fn test_lenient_override_keeps_raw_node() {
        let raw = json!({"kind": "ceiling", "ceiling_amount": "5"});
        let limit: Limit = decode_union_with(&raw, UnionPolicy::Lenient).unwrap();
        assert!(limit.is_unknown());
        assert_eq!(limit.to_json(), raw);
    }

    #[test]
    fn test_strict_union_rejects_unknown_arm_on_validate() {
        let raw = json!({"kind": "ceiling", "ceiling_amount": "5"});
        let limit: Limit = decode_union_with(&raw, UnionPolicy::Lenient).unwrap();

        let err = limit.validate().unwrap_err();
        assert!(matches!(
            err,
            ModelError::NoMatchingVariant { value: Some(ref v), .. } if v == "ceiling"
        ));

        let err = Limit::Unknown(UnknownVariant::new(json!([1, 2]))).validate().unwrap_err();
        assert!(matches!(err, ModelError::NoMatchingVariant { value: None, .. }));
    }

    #[test]
    fn test_lenient_override_on_invalid_variant() {
        let raw = json!({"kind": "minimum", "minimum_amount": []});
        let limit: Limit = decode_union_with(&raw, UnionPolicy::Lenient).unwrap();
        assert_eq!(limit.as_unknown().unwrap().raw(), &raw);
    }

    #[test]
    fn test_known_tags() {
        assert_eq!(Limit::known_tags(), vec!["minimum", "maximum", "minimum"]);
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_fallback_is_logged() {
        let _: Limit = decode_union_with(&json!({"kind": "ceiling"}), UnionPolicy::Lenient).unwrap();
        assert!(logs_contain("decoded tagged union as unknown variant"));
        assert!(logs_contain("ceiling"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_strict_rejection_is_logged() {
        let _ = Limit::from_json(&json!({"kind": "ceiling"}));
        assert!(logs_contain("rejecting tagged union input"));
    }
}

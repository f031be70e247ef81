//! The base contract shared by every record type.
//!
//! A model is a [`PropertyStore`] plus typed accessors. Construction never
//! validates, so partially-specified instances can exist while a request body
//! is being assembled or while only a few properties of a response are read.
//! [`Model::validate`] is the single authoritative check: it walks the
//! model's [`PropertySpec`] table, decodes every declared property and
//! recursively validates nested models, enums and unions.

use serde_json::Value;
use strum::Display;

use crate::codec::PropertyValue;
use crate::error::{DecodeError, ModelError};
use crate::store::PropertyStore;

/// How a declared property treats absent and `null` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Requirement {
    /// Must be present; the value is decoded as-is.
    Required,
    /// Must be present; `null` resolves to `None`.
    Nullable,
    /// Documented as required, but resolves to `None` when absent or `null`.
    NullWhenAbsent,
    /// May be absent or `null`.
    Optional,
}

impl Requirement {
    /// Returns `true` if absence of the key is an error.
    pub fn rejects_absent(self) -> bool {
        matches!(self, Self::Required | Self::Nullable)
    }
}

type CheckFn = fn(&PropertyStore, &str) -> Result<(), ModelError>;

/// A declared property of a model: its JSON name, requirement and type.
///
/// Tables of these are built in `const` context, one per model type.
#[derive(Debug, Clone, Copy)]
pub struct PropertySpec {
    name: &'static str,
    requirement: Requirement,
    check: CheckFn,
}

impl PropertySpec {
    /// Declares a required property of type `T`.
    pub const fn required<T: PropertyValue>(name: &'static str) -> Self {
        Self {
            name,
            requirement: Requirement::Required,
            check: PropertyStore::validate_required::<T>,
        }
    }

    /// Declares a required, nullable property of type `T`.
    pub const fn nullable<T: PropertyValue>(name: &'static str) -> Self {
        Self {
            name,
            requirement: Requirement::Nullable,
            check: PropertyStore::validate_nullable::<T>,
        }
    }

    /// Declares a property that is documented as required but resolves to
    /// `None` when absent.
    pub const fn null_when_absent<T: PropertyValue>(name: &'static str) -> Self {
        Self {
            name,
            requirement: Requirement::NullWhenAbsent,
            check: PropertyStore::validate_optional::<T>,
        }
    }

    /// Declares an optional property of type `T`.
    pub const fn optional<T: PropertyValue>(name: &'static str) -> Self {
        Self {
            name,
            requirement: Requirement::Optional,
            check: PropertyStore::validate_optional::<T>,
        }
    }

    /// Returns the JSON property name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns how absence and `null` are treated.
    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// Decodes and validates this property within `store`.
    pub fn check(&self, store: &PropertyStore) -> Result<(), ModelError> {
        (self.check)(store, self.name)
    }
}

/// A named record backed by a [`PropertyStore`].
///
/// Implementors supply the store plumbing and the property table; decoding,
/// encoding and validation come from provided methods. Every `Model` is also
/// a [`PropertyValue`], so models nest inside other models and lists.
///
/// ## Examples
///
/// ```rust
/// use billing_core::{Model, ModelError, PropertySpec, PropertyStore};
/// use serde_json::json;
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Item {
///     store: PropertyStore,
/// }
///
/// impl Item {
///     fn id(&self) -> Result<String, ModelError> {
///         self.store.required("id")
///     }
/// }
///
/// impl Model for Item {
///     const NAME: &'static str = "Item";
///     const PROPERTIES: &'static [PropertySpec] = &[PropertySpec::required::<String>("id")];
///
///     fn from_raw_unchecked(store: PropertyStore) -> Self {
///         Self { store }
///     }
///     fn store(&self) -> &PropertyStore {
///         &self.store
///     }
///     fn store_mut(&mut self) -> &mut PropertyStore {
///         &mut self.store
///     }
///     fn into_store(self) -> PropertyStore {
///         self.store
///     }
/// }
///
/// let item = Item::from_json(json!({"id": "item_1"})).unwrap();
/// assert_eq!(item.id().unwrap(), "item_1");
/// assert!(item.validate().is_ok());
///
/// let empty = Item::from_json(json!({})).unwrap();
/// assert!(empty.validate().is_err());
/// ```
pub trait Model: Clone + Sized {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// The declared properties, in documentation order.
    const PROPERTIES: &'static [PropertySpec];

    /// Wraps a store without validating it.
    fn from_raw_unchecked(store: PropertyStore) -> Self;

    /// Returns the backing store.
    fn store(&self) -> &PropertyStore;

    /// Returns the backing store for mutation.
    fn store_mut(&mut self) -> &mut PropertyStore;

    /// Consumes the model into its store.
    fn into_store(self) -> PropertyStore;

    /// Forces evaluation of every declared property.
    ///
    /// Required properties must be present and decodable; optional ones are
    /// decoded when present. Decoded values are validated recursively.
    ///
    /// ## Errors
    ///
    /// Returns the first problem found, wrapped with its property path.
    fn validate(&self) -> Result<(), ModelError> {
        Self::PROPERTIES
            .iter()
            .try_for_each(|spec| spec.check(self.store()))
    }

    /// Returns `true` if [`Model::validate`] succeeds.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Wraps a JSON value without validating it.
    ///
    /// ## Errors
    ///
    /// Returns a type mismatch if `value` is not an object.
    fn from_json(value: Value) -> Result<Self, ModelError> {
        Ok(Self::from_raw_unchecked(PropertyStore::from_value(value)?))
    }

    /// Wraps a JSON value and validates it.
    fn from_json_validated(value: Value) -> Result<Self, ModelError> {
        let model = Self::from_json(value)?;
        model.validate()?;
        Ok(model)
    }

    /// Parses JSON bytes without validating the result.
    ///
    /// ## Errors
    ///
    /// Returns [`ModelError::Json`] for malformed input and a type mismatch
    /// for non-object input.
    fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_json(value)
    }

    /// Returns the current JSON representation.
    fn to_json(&self) -> Value {
        self.store().to_value()
    }

    /// Returns the properties that are not declared by this model.
    fn additional_properties(&self) -> Vec<(&str, &Value)> {
        self.store()
            .iter()
            .filter(|(name, _)| !Self::PROPERTIES.iter().any(|spec| spec.name == *name))
            .collect()
    }

    /// Looks up a declared property by JSON name.
    fn property_spec(name: &str) -> Option<&'static PropertySpec> {
        Self::PROPERTIES.iter().find(|spec| spec.name == name)
    }
}

impl<M: Model> PropertyValue for M {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::Object(map) => Ok(M::from_raw_unchecked(PropertyStore::from_map(map.clone()))),
            other => Err(DecodeError::type_mismatch("object", other).into()),
        }
    }

    fn encode(&self) -> Value {
        self.to_json()
    }

    fn validate_value(&self) -> Result<(), ModelError> {
        self.validate()
    }
}

//! Raw property store backing every model.
//!
//! A [`PropertyStore`] is the authoritative, insertion-ordered set of
//! `name -> JSON node` pairs for one model instance. Typed accessors are
//! projections over the store: reads decode on demand, writes encode and
//! overwrite. Keys the model does not declare are kept untouched, so a
//! decoded object re-encodes with every property it arrived with.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::codec::PropertyValue;
use crate::error::{DecodeError, ModelError};

/// Insertion-ordered map of property names to opaque JSON nodes.
///
/// Equality is JSON deep equality and ignores key order.
///
/// ## Examples
///
/// ```rust
/// use billing_core::PropertyStore;
/// use serde_json::json;
///
/// let mut store = PropertyStore::new();
/// store.set("id", json!("cust_123"));
/// store.set("name", json!("Acme"));
///
/// assert_eq!(store.get("id"), Some(&json!("cust_123")));
/// assert_eq!(store.get("email"), None);
/// assert_eq!(store.required::<String>("name").unwrap(), "Acme");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyStore {
    properties: Map<String, Value>,
}

impl PropertyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-parsed JSON object.
    pub fn from_map(properties: Map<String, Value>) -> Self {
        Self { properties }
    }

    /// Wraps a JSON value, which must be an object.
    ///
    /// ## Errors
    ///
    /// Returns a type mismatch if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(properties) => Ok(Self { properties }),
            other => Err(DecodeError::type_mismatch("object", &other)),
        }
    }

    /// Returns the node stored under `name`.
    ///
    /// `None` means the key is absent, which is distinct from a present
    /// `null` node.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Returns `true` if `name` is present, including as `null`.
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Inserts or overwrites a node.
    ///
    /// Overwriting keeps the key's original position.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }

    /// Removes a property, returning its node if it was present.
    ///
    /// The remaining keys keep their relative order.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let removed = self.properties.get(name).cloned();
        if removed.is_some() {
            self.properties.retain(|key, _| key != name);
        }
        removed
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the store holds no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterates over the properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the property names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Copies the current contents in insertion order.
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns the store as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.properties.clone())
    }

    /// Consumes the store into a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.properties)
    }

    /// Consumes the store into its underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.properties
    }

    // -------------------------------------------------------------------------
    // Typed access
    // -------------------------------------------------------------------------

    /// Decodes a property that must be present.
    ///
    /// ## Errors
    ///
    /// - [`ModelError::MissingRequiredProperty`] if the key is absent.
    /// - The decode error of `T`, wrapped with the property name.
    pub fn required<T: PropertyValue>(&self, name: &str) -> Result<T, ModelError> {
        let value = self.get(name).ok_or_else(|| ModelError::missing(name))?;
        T::decode(value).map_err(|e| e.in_property(name))
    }

    /// Decodes a property that must be present but may be `null`.
    pub fn nullable<T: PropertyValue>(&self, name: &str) -> Result<Option<T>, ModelError> {
        self.required::<Option<T>>(name)
    }

    /// Decodes a property that resolves to `None` when absent or `null`.
    pub fn optional<T: PropertyValue>(&self, name: &str) -> Result<Option<T>, ModelError> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::decode(value).map(Some).map_err(|e| e.in_property(name)),
        }
    }

    /// Encodes `value` into the store under `name`.
    pub fn put<T: PropertyValue>(&mut self, name: &str, value: &T) {
        self.set(name, value.encode());
    }

    /// Encodes `value` under `name`, or removes the key when `value` is `None`.
    pub fn put_optional<T: PropertyValue>(&mut self, name: &str, value: Option<&T>) {
        match value {
            Some(value) => self.put(name, value),
            None => {
                self.remove(name);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Decodes and recursively validates a required property.
    pub fn validate_required<T: PropertyValue>(&self, name: &str) -> Result<(), ModelError> {
        self.required::<T>(name)?
            .validate_value()
            .map_err(|e| e.in_property(name))
    }

    /// Decodes and recursively validates a required, nullable property.
    pub fn validate_nullable<T: PropertyValue>(&self, name: &str) -> Result<(), ModelError> {
        match self.nullable::<T>(name)? {
            Some(value) => value.validate_value().map_err(|e| e.in_property(name)),
            None => Ok(()),
        }
    }

    /// Decodes and recursively validates a property when it is present.
    pub fn validate_optional<T: PropertyValue>(&self, name: &str) -> Result<(), ModelError> {
        match self.optional::<T>(name)? {
            Some(value) => value.validate_value().map_err(|e| e.in_property(name)),
            None => Ok(()),
        }
    }
}

impl From<Map<String, Value>> for PropertyStore {
    fn from(properties: Map<String, Value>) -> Self {
        Self::from_map(properties)
    }
}

impl From<PropertyStore> for Value {
    fn from(store: PropertyStore) -> Self {
        store.into_value()
    }
}

impl FromIterator<(String, Value)> for PropertyStore {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelErrorKind;
    use serde_json::json;

    fn store(value: Value) -> PropertyStore {
        PropertyStore::from_value(value).unwrap()
    }

    #[test]
    fn test_absent_is_not_null() {
        let store = store(json!({"memo": null}));
        assert_eq!(store.get("memo"), Some(&Value::Null));
        assert_eq!(store.get("reason"), None);
        assert!(store.contains("memo"));
        assert!(!store.contains("reason"));
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let err = PropertyStore::from_value(json!([1])).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                expected: "object",
                found: "array"
            }
        );
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut store = store(json!({"a": 1, "b": 2, "c": 3}));
        store.set("b", json!("two"));
        store.set("d", json!(4));

        let names: Vec<_> = store.names().collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert_eq!(store.get("b"), Some(&json!("two")));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut store = store(json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(store.remove("a"), Some(json!(1)));
        assert_eq!(store.remove("zzz"), None);

        let snapshot = store.snapshot();
        assert_eq!(
            snapshot,
            vec![("b".to_string(), json!(2)), ("c".to_string(), json!(3))]
        );
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let mut store = PropertyStore::new();
        store.set("zeta", json!(1));
        store.set("alpha", json!(2));
        store.set("mid", json!(3));

        let keys: Vec<_> = store.snapshot().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            serde_json::to_string(&store).unwrap(),
            r#"{"zeta":1,"alpha":2,"mid":3}"#
        );
    }

    #[test]
    fn test_required_missing() {
        let err = store(json!({})).required::<String>("id").unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::MissingRequiredProperty);
        assert_eq!(err.path(), "id");
    }

    #[test]
    fn test_required_wrong_shape_carries_property() {
        let err = store(json!({"id": 7})).required::<String>("id").unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::Decode);
        assert_eq!(err.path(), "id");
    }

    #[test]
    fn test_nullable_distinguishes_absent_and_null() {
        let present = store(json!({"end_date": null}));
        assert_eq!(present.nullable::<String>("end_date").unwrap(), None);

        let absent = store(json!({}));
        assert!(absent.nullable::<String>("end_date").unwrap_err().is_missing_property());
    }

    #[test]
    fn test_optional_absent_and_null_are_none() {
        let s = store(json!({"memo": null, "name": "x"}));
        assert_eq!(s.optional::<String>("memo").unwrap(), None);
        assert_eq!(s.optional::<String>("reason").unwrap(), None);
        assert_eq!(s.optional::<String>("name").unwrap(), Some("x".to_string()));
    }

    #[test]
    fn test_put_optional_removes_on_none() {
        let mut s = store(json!({"memo": "hello"}));
        s.put_optional::<String>("memo", None);
        assert!(!s.contains("memo"));

        s.put_optional("memo", Some(&"again".to_string()));
        assert_eq!(s.get("memo"), Some(&json!("again")));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = store(json!({"a": 1, "b": [1, 2]}));
        let b = store(json!({"b": [1, 2], "a": 1}));
        assert_eq!(a, b);
    }
}

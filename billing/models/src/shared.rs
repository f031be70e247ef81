//! Records shared across resources.
//!
//! References to other resources (`ItemRef`, `CustomerRef`, ...), free-form
//! metadata, and the minimum/maximum spend limits that prices, plans and
//! invoices all carry.

use billing_core::{Amount, DecodeError, Model, ModelError, PropertySpec, PropertyStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Metadata
// =============================================================================

/// User-defined string key/value pairs attached to a resource.
///
/// Keys are free-form, so every key is an additional property. Validation
/// checks that every value is a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    store: PropertyStore,
}

impl Metadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`, if it is a string.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.store.get(key).and_then(Value::as_str)
    }

    /// Sets `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.store.set(key, Value::String(value.into()));
    }

    /// Builder form of [`Metadata::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Removes `key`, returning its raw value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.store.remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.store.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |metadata, (k, v)| metadata.with(k, v))
    }
}

impl Model for Metadata {
    const NAME: &'static str = "Metadata";
    const PROPERTIES: &'static [PropertySpec] = &[];

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

    fn validate(&self) -> Result<(), ModelError> {
        match self.store.iter().find(|(_, value)| !value.is_string()) {
            Some((key, value)) => {
                Err(ModelError::from(DecodeError::type_mismatch("string", value)).in_property(key))
            }
            None => Ok(()),
        }
    }
}

// =============================================================================
// References
// =============================================================================

/// The item a price bills for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemRef {
    store: PropertyStore,
}

impl ItemRef {
    /// Item identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// Item name.
    pub fn name(&self) -> Result<String, ModelError> {
        self.store.required("name")
    }
}

impl Model for ItemRef {
    const NAME: &'static str = "ItemRef";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<String>("name"),
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

/// The metric a usage price is metered against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillableMetricRef {
    store: PropertyStore,
}

impl BillableMetricRef {
    /// Metric identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }
}

impl Model for BillableMetricRef {
    const NAME: &'static str = "BillableMetricRef";
    const PROPERTIES: &'static [PropertySpec] = &[PropertySpec::required::<String>("id")];

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

/// A customer as referenced from invoices and credit notes.
///
/// ## Examples
///
/// ```rust
/// use billing_core::Model;
/// use billing_models::CustomerRef;
/// use serde_json::json;
///
/// let customer = CustomerRef::from_json(json!({"id": "cust_123"})).unwrap();
/// assert!(customer.validate().is_ok());
/// assert_eq!(customer.external_customer_id().unwrap(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerRef {
    store: PropertyStore,
}

impl CustomerRef {
    /// Creates a reference to `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self::default().with_id(id)
    }

    /// Customer identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// The caller-assigned identifier. Older payloads omit the key.
    pub fn external_customer_id(&self) -> Result<Option<String>, ModelError> {
        self.store.optional("external_customer_id")
    }

    /// Sets the customer identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.store.put("id", &id.into());
        self
    }

    /// Sets the identifier from the caller's own system.
    pub fn with_external_customer_id(mut self, id: impl Into<String>) -> Self {
        self.store.put("external_customer_id", &id.into());
        self
    }
}

impl Model for CustomerRef {
    const NAME: &'static str = "CustomerRef";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::null_when_absent::<String>("external_customer_id"),
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

/// A subscription as referenced from invoices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionRef {
    store: PropertyStore,
}

impl SubscriptionRef {
    /// Subscription identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }
}

impl Model for SubscriptionRef {
    const NAME: &'static str = "SubscriptionRef";
    const PROPERTIES: &'static [PropertySpec] = &[PropertySpec::required::<String>("id")];

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

// =============================================================================
// Spend limits
// =============================================================================

/// A minimum spend applied to a set of prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Minimum {
    store: PropertyStore,
}

impl Minimum {
    /// Creates a minimum of `amount` over `price_ids`.
    pub fn new(price_ids: Vec<String>, amount: Amount) -> Self {
        let mut minimum = Self::default();
        minimum.set_applies_to_price_ids(price_ids);
        minimum.set_minimum_amount(amount);
        minimum
    }

    /// Prices the minimum is applied to.
    pub fn applies_to_price_ids(&self) -> Result<Vec<String>, ModelError> {
        self.store.required("applies_to_price_ids")
    }

    /// The floor amount.
    pub fn minimum_amount(&self) -> Result<Amount, ModelError> {
        self.store.required("minimum_amount")
    }

    /// Replaces the prices the minimum is applied to.
    pub fn set_applies_to_price_ids(&mut self, price_ids: Vec<String>) {
        self.store.put("applies_to_price_ids", &price_ids);
    }

    /// Replaces the floor amount.
    pub fn set_minimum_amount(&mut self, amount: Amount) {
        self.store.put("minimum_amount", &amount);
    }
}

impl Model for Minimum {
    const NAME: &'static str = "Minimum";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<Amount>("minimum_amount"),
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

/// A maximum spend applied to a set of prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Maximum {
    store: PropertyStore,
}

impl Maximum {
    /// Creates a maximum of `amount` over `price_ids`.
    pub fn new(price_ids: Vec<String>, amount: Amount) -> Self {
        let mut maximum = Self::default();
        maximum.set_applies_to_price_ids(price_ids);
        maximum.set_maximum_amount(amount);
        maximum
    }

    /// Prices the maximum is applied to.
    pub fn applies_to_price_ids(&self) -> Result<Vec<String>, ModelError> {
        self.store.required("applies_to_price_ids")
    }

    /// The ceiling amount.
    pub fn maximum_amount(&self) -> Result<Amount, ModelError> {
        self.store.required("maximum_amount")
    }

    /// Replaces the prices the maximum is applied to.
    pub fn set_applies_to_price_ids(&mut self, price_ids: Vec<String>) {
        self.store.put("applies_to_price_ids", &price_ids);
    }

    /// Replaces the ceiling amount.
    pub fn set_maximum_amount(&mut self, amount: Amount) {
        self.store.put("maximum_amount", &amount);
    }
}

impl Model for Maximum {
    const NAME: &'static str = "Maximum";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<Amount>("maximum_amount"),
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

#[cfg(test)]
mod tests {
    use super::*;
    use billing_core::ModelErrorKind;
    use serde_json::json;

    #[test]
    fn metadata_validates_string_values() {
        let metadata = Metadata::from_json(json!({"team": "growth", "tier": 3})).unwrap();
        assert_eq!(metadata.get("team"), Some("growth"));
        assert_eq!(metadata.get("tier"), None);

        let err = metadata.validate().unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::Decode);
        assert_eq!(err.path(), "tier");
    }

    #[test]
    fn metadata_keeps_insertion_order() {
        let metadata: Metadata = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(serde_json::to_string(&metadata).unwrap(), r#"{"b":"2","a":"1"}"#);
        assert!(metadata.validate().is_ok());
    }

    #[test]
    fn metadata_every_key_is_additional() {
        let metadata = Metadata::new().with("source", "import");
        assert_eq!(metadata.additional_properties().len(), 1);
    }

    #[test]
    fn minimal_customer_ref_is_valid() {
        let customer = CustomerRef::from_json(json!({"id": "cust_123"})).unwrap();
        assert!(customer.validate().is_ok());
        assert_eq!(customer.id().unwrap(), "cust_123");
        assert_eq!(customer.to_json(), json!({"id": "cust_123"}));
    }

    #[test]
    fn customer_ref_builder() {
        let customer = CustomerRef::new("cust_1").with_external_customer_id("acme-1");
        assert_eq!(customer.external_customer_id().unwrap().as_deref(), Some("acme-1"));
    }

    #[test]
    fn minimum_builder_encodes_amount_as_string() {
        let minimum = Minimum::new(vec!["price_1".to_string()], Amount::new("10.00"));
        assert_eq!(
            minimum.to_json(),
            json!({"applies_to_price_ids": ["price_1"], "minimum_amount": "10.00"})
        );
        assert!(minimum.validate().is_ok());
    }

    #[test]
    fn maximum_reports_missing_amount() {
        let maximum = Maximum::from_json(json!({"applies_to_price_ids": []})).unwrap();
        let err = maximum.validate().unwrap_err();
        assert_eq!(err.path(), "maximum_amount");
    }
}

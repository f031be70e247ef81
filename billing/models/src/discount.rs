//! Discounts and the `discount_type` tagged union.
//!
//! A [`Discount`] is one of four concrete kinds chosen by its
//! `discount_type` property. The union is lenient: a kind added by the API
//! later, or a known kind that fails validation, decodes to
//! [`Discount::Unknown`] and re-encodes unchanged.

use billing_core::{
    Amount, Model, ModelError, OpenEnum, PropertySpec, PropertyStore, PropertyValue, StringEnum,
    TaggedUnion, UnionPolicy, UnknownVariant, Variant,
};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The `discount_type` literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DiscountType {
    /// A fraction of the price.
    Percentage,
    /// A free or reduced trial.
    Trial,
    /// A number of free usage units.
    Usage,
    /// A fixed amount off.
    Amount,
}

impl StringEnum for DiscountType {
    const ENUM_NAME: &'static str = "DiscountType";
}

// =============================================================================
// Variants
// =============================================================================

/// Takes a percentage off the listed prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentageDiscount {
    store: PropertyStore,
}

impl PercentageDiscount {
    /// Creates a discount of `percentage` (a fraction in `0.0..=1.0`).
    pub fn new(price_ids: Vec<String>, percentage: f64) -> Self {
        let mut store = PropertyStore::new();
        store.put("discount_type", &OpenEnum::known(DiscountType::Percentage));
        store.put("applies_to_price_ids", &price_ids);
        store.put("percentage_discount", &percentage);
        Self { store }
    }

    /// Always `percentage` for a well-formed value.
    pub fn discount_type(&self) -> Result<OpenEnum<DiscountType>, ModelError> {
        self.store.required("discount_type")
    }

    /// Prices the discount applies to.
    pub fn applies_to_price_ids(&self) -> Result<Vec<String>, ModelError> {
        self.store.required("applies_to_price_ids")
    }

    /// Fraction of the price removed, between `0.0` and `1.0`.
    pub fn percentage_discount(&self) -> Result<f64, ModelError> {
        self.store.required("percentage_discount")
    }

    /// Optional note attached to the discount.
    pub fn reason(&self) -> Result<Option<String>, ModelError> {
        self.store.optional("reason")
    }

    /// Sets the note attached to the discount.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.store.put("reason", &reason.into());
        self
    }
}

impl Model for PercentageDiscount {
    const NAME: &'static str = "PercentageDiscount";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<OpenEnum<DiscountType>>("discount_type"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<f64>("percentage_discount"),
        PropertySpec::null_when_absent::<String>("reason"),
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

/// Waives the listed prices for a trial, fully or partially.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrialDiscount {
    store: PropertyStore,
}

impl TrialDiscount {
    /// Creates a trial discount that waives the listed prices entirely.
    pub fn new(price_ids: Vec<String>) -> Self {
        let mut store = PropertyStore::new();
        store.put("discount_type", &OpenEnum::known(DiscountType::Trial));
        store.put("applies_to_price_ids", &price_ids);
        Self { store }
    }

    /// Always `trial` for a well-formed value.
    pub fn discount_type(&self) -> Result<OpenEnum<DiscountType>, ModelError> {
        self.store.required("discount_type")
    }

    /// Prices covered by the trial.
    pub fn applies_to_price_ids(&self) -> Result<Vec<String>, ModelError> {
        self.store.required("applies_to_price_ids")
    }

    /// Fixed amount waived during the trial, if limited.
    pub fn trial_amount_discount(&self) -> Result<Option<Amount>, ModelError> {
        self.store.optional("trial_amount_discount")
    }

    /// Fraction waived during the trial, if limited.
    pub fn trial_percentage_discount(&self) -> Result<Option<f64>, ModelError> {
        self.store.optional("trial_percentage_discount")
    }

    /// Optional note attached to the discount.
    pub fn reason(&self) -> Result<Option<String>, ModelError> {
        self.store.optional("reason")
    }

    /// Limits the trial to a fixed amount off.
    pub fn with_trial_amount_discount(mut self, amount: Amount) -> Self {
        self.store.put("trial_amount_discount", &amount);
        self
    }

    /// Limits the trial to a fraction of the price.
    pub fn with_trial_percentage_discount(mut self, percentage: f64) -> Self {
        self.store.put("trial_percentage_discount", &percentage);
        self
    }
}

impl Model for TrialDiscount {
    const NAME: &'static str = "TrialDiscount";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<OpenEnum<DiscountType>>("discount_type"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::null_when_absent::<Amount>("trial_amount_discount"),
        PropertySpec::null_when_absent::<f64>("trial_percentage_discount"),
        PropertySpec::null_when_absent::<String>("reason"),
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

/// Waives a number of usage units on the listed prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageDiscount {
    store: PropertyStore,
}

impl UsageDiscount {
    /// Creates a `usage` discount of `units` on the given prices.
    pub fn new(price_ids: Vec<String>, units: f64) -> Self {
        let mut store = PropertyStore::new();
        store.put("discount_type", &OpenEnum::known(DiscountType::Usage));
        store.put("applies_to_price_ids", &price_ids);
        store.put("usage_discount", &units);
        Self { store }
    }

    /// Always `usage` for a well-formed value.
    pub fn discount_type(&self) -> Result<OpenEnum<DiscountType>, ModelError> {
        self.store.required("discount_type")
    }

    /// Prices the free units apply to.
    pub fn applies_to_price_ids(&self) -> Result<Vec<String>, ModelError> {
        self.store.required("applies_to_price_ids")
    }

    /// Number of free usage units.
    pub fn usage_discount(&self) -> Result<f64, ModelError> {
        self.store.required("usage_discount")
    }

    /// Optional note attached to the discount.
    pub fn reason(&self) -> Result<Option<String>, ModelError> {
        self.store.optional("reason")
    }
}

impl Model for UsageDiscount {
    const NAME: &'static str = "UsageDiscount";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<OpenEnum<DiscountType>>("discount_type"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<f64>("usage_discount"),
        PropertySpec::null_when_absent::<String>("reason"),
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

/// Takes a fixed amount off the listed prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountDiscount {
    store: PropertyStore,
}

impl AmountDiscount {
    /// Creates an `amount` discount on the given prices.
    pub fn new(price_ids: Vec<String>, amount: Amount) -> Self {
        let mut store = PropertyStore::new();
        store.put("discount_type", &OpenEnum::known(DiscountType::Amount));
        store.put("applies_to_price_ids", &price_ids);
        store.put("amount_discount", &amount);
        Self { store }
    }

    /// Always `amount` for a well-formed value.
    pub fn discount_type(&self) -> Result<OpenEnum<DiscountType>, ModelError> {
        self.store.required("discount_type")
    }

    /// Prices the discount applies to.
    pub fn applies_to_price_ids(&self) -> Result<Vec<String>, ModelError> {
        self.store.required("applies_to_price_ids")
    }

    /// Amount removed, as decimal text.
    pub fn amount_discount(&self) -> Result<Amount, ModelError> {
        self.store.required("amount_discount")
    }

    /// Optional note attached to the discount.
    pub fn reason(&self) -> Result<Option<String>, ModelError> {
        self.store.optional("reason")
    }

    /// Sets the note attached to the discount.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.store.put("reason", &reason.into());
        self
    }
}

impl Model for AmountDiscount {
    const NAME: &'static str = "AmountDiscount";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<OpenEnum<DiscountType>>("discount_type"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<Amount>("amount_discount"),
        PropertySpec::null_when_absent::<String>("reason"),
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

// =============================================================================
// Union
// =============================================================================

/// A discount of any kind.
///
/// ## Examples
///
/// ```rust
/// use billing_core::TaggedUnion;
/// use billing_models::Discount;
/// use serde_json::json;
///
/// let raw = json!({"discount_type": "future_kind", "x": 1});
/// let discount = Discount::from_json(&raw).unwrap();
/// assert!(discount.is_unknown());
/// assert_eq!(discount.to_json(), raw);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Discount {
    Percentage(PercentageDiscount),
    Trial(TrialDiscount),
    Usage(UsageDiscount),
    Amount(AmountDiscount),
    Unknown(UnknownVariant),
}

impl Discount {
    /// Returns the `discount_type` of the populated arm.
    pub fn discount_type(&self) -> OpenEnum<DiscountType> {
        OpenEnum::from_raw(
            self.to_json()
                .get(Self::DISCRIMINATOR)
                .cloned()
                .unwrap_or(Value::Null),
        )
    }
}

impl From<PercentageDiscount> for Discount {
    fn from(value: PercentageDiscount) -> Self {
        Self::Percentage(value)
    }
}

impl From<TrialDiscount> for Discount {
    fn from(value: TrialDiscount) -> Self {
        Self::Trial(value)
    }
}

impl From<UsageDiscount> for Discount {
    fn from(value: UsageDiscount) -> Self {
        Self::Usage(value)
    }
}

impl From<AmountDiscount> for Discount {
    fn from(value: AmountDiscount) -> Self {
        Self::Amount(value)
    }
}

impl TaggedUnion for Discount {
    const NAME: &'static str = "Discount";
    const DISCRIMINATOR: &'static str = "discount_type";
    const POLICY: UnionPolicy = UnionPolicy::Lenient;
    const VARIANTS: &'static [Variant<Self>] = &[
        Variant::of::<PercentageDiscount>("percentage"),
        Variant::of::<TrialDiscount>("trial"),
        Variant::of::<UsageDiscount>("usage"),
        Variant::of::<AmountDiscount>("amount"),
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
            Self::Percentage(d) => d.to_json(),
            Self::Trial(d) => d.to_json(),
            Self::Usage(d) => d.to_json(),
            Self::Amount(d) => d.to_json(),
            Self::Unknown(u) => u.raw().clone(),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Percentage(d) => d.validate(),
            Self::Trial(d) => d.validate(),
            Self::Usage(d) => d.validate(),
            Self::Amount(d) => d.validate(),
            Self::Unknown(u) => Self::validate_unknown(u),
        }
    }
}

impl PropertyValue for Discount {
    fn decode(value: &Value) -> Result<Self, ModelError> {
        Self::from_json(value)
    }

    fn encode(&self) -> Value {
        self.to_json()
    }

    fn validate_value(&self) -> Result<(), ModelError> {
        self.validate()
    }
}

impl Serialize for Discount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Discount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn percentage_dispatch() {
        let discount = Discount::from_json(&json!({
            "discount_type": "percentage",
            "applies_to_price_ids": ["price_1"],
            "percentage_discount": 0.15
        }))
        .unwrap();

        let Discount::Percentage(percentage) = &discount else {
            panic!("expected percentage discount, got {discount:?}");
        };
        assert_eq!(percentage.percentage_discount().unwrap(), 0.15);
        assert_eq!(percentage.reason().unwrap(), None);
        assert_eq!(discount.discount_type(), DiscountType::Percentage);
    }

    #[test]
    fn amount_dispatch_keeps_decimal_text() {
        let raw = json!({
            "discount_type": "amount",
            "applies_to_price_ids": [],
            "amount_discount": "19.99",
            "reason": "loyalty"
        });
        let discount = Discount::from_json(&raw).unwrap();

        let Discount::Amount(amount) = &discount else {
            panic!("expected amount discount, got {discount:?}");
        };
        assert_eq!(amount.amount_discount().unwrap().as_str(), "19.99");
        assert_eq!(discount.to_json(), raw);
    }

    #[test]
    fn unknown_kind_round_trips() {
        let raw = json!({"discount_type": "future_kind", "x": 1});
        let discount = Discount::from_json(&raw).unwrap();

        assert!(discount.is_unknown());
        assert!(discount.validate().is_ok());
        assert_eq!(serde_json::to_value(&discount).unwrap(), raw);
        assert!(!discount.discount_type().is_known());
    }

    #[test]
    fn invalid_known_kind_falls_back() {
        let raw = json!({"discount_type": "usage", "applies_to_price_ids": []});
        let discount = Discount::from_json(&raw).unwrap();
        assert_eq!(discount.as_unknown().unwrap().raw(), &raw);
    }

    #[test]
    fn builders_produce_valid_variants() {
        let discounts: Vec<Discount> = vec![
            PercentageDiscount::new(vec!["price_1".into()], 0.5).into(),
            TrialDiscount::new(vec!["price_1".into()])
                .with_trial_percentage_discount(1.0)
                .into(),
            UsageDiscount::new(vec![], 100.0).into(),
            AmountDiscount::new(vec![], Amount::new("5.00")).into(),
        ];

        for discount in &discounts {
            discount.validate().unwrap();
            let decoded = Discount::from_json(&discount.to_json()).unwrap();
            assert_eq!(&decoded, discount);
        }
    }

    #[test]
    fn serde_deserialize_uses_dispatch() {
        let discount: Discount = serde_json::from_str(
            r#"{"discount_type":"trial","applies_to_price_ids":["p"],"reason":null}"#,
        )
        .unwrap();
        assert!(matches!(discount, Discount::Trial(_)));
        assert_eq!(Discount::known_tags(), vec!["percentage", "trial", "usage", "amount"]);
    }
}

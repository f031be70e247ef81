//! Price adjustments and the `adjustment_type` tagged union.
//!
//! Unlike discounts, the [`Adjustment`] union is strict: an adjustment the
//! client cannot decode is an error rather than an opaque value, because
//! invoice totals depend on every adjustment being understood.

use billing_core::{
    Amount, Model, ModelError, OpenEnum, PropertySpec, PropertyStore, PropertyValue, StringEnum,
    TaggedUnion, UnionPolicy, UnknownVariant, Variant,
};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The `adjustment_type` literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AdjustmentType {
    /// Removes a number of usage units from the total.
    UsageDiscount,
    /// Subtracts a fixed amount.
    AmountDiscount,
    /// Subtracts a fraction of the total.
    PercentageDiscount,
    /// Raises the total to a floor.
    Minimum,
    /// Caps the total at a ceiling.
    Maximum,
}

impl StringEnum for AdjustmentType {
    const ENUM_NAME: &'static str = "AdjustmentType";
}

/// Properties every adjustment variant carries.
pub trait AdjustmentFields: Model {
    /// Adjustment identifier.
    fn id(&self) -> Result<String, ModelError> {
        self.store().required("id")
    }

    /// The discriminator literal, kept open for values added later.
    fn adjustment_type(&self) -> Result<OpenEnum<AdjustmentType>, ModelError> {
        self.store().required("adjustment_type")
    }

    /// Prices the adjustment is applied to.
    fn applies_to_price_ids(&self) -> Result<Vec<String>, ModelError> {
        self.store().required("applies_to_price_ids")
    }

    /// `true` when the adjustment applies to the invoice as a whole.
    fn is_invoice_level(&self) -> Result<bool, ModelError> {
        self.store().required("is_invoice_level")
    }

    /// The plan phase the adjustment belongs to, if any.
    fn plan_phase_order(&self) -> Result<Option<i64>, ModelError> {
        self.store().nullable("plan_phase_order")
    }

    /// Free-text reason shown on invoices, if any.
    fn reason(&self) -> Result<Option<String>, ModelError> {
        self.store().nullable("reason")
    }
}

// =============================================================================
// Variants
// =============================================================================

/// Waives usage units on the listed prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageDiscountAdjustment {
    store: PropertyStore,
}

impl UsageDiscountAdjustment {
    /// Number of usage units discounted.
    pub fn usage_discount(&self) -> Result<f64, ModelError> {
        self.store.required("usage_discount")
    }
}

impl AdjustmentFields for UsageDiscountAdjustment {}

impl Model for UsageDiscountAdjustment {
    const NAME: &'static str = "UsageDiscountAdjustment";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<OpenEnum<AdjustmentType>>("adjustment_type"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<bool>("is_invoice_level"),
        PropertySpec::nullable::<i64>("plan_phase_order"),
        PropertySpec::nullable::<String>("reason"),
        PropertySpec::required::<f64>("usage_discount"),
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
pub struct AmountDiscountAdjustment {
    store: PropertyStore,
}

impl AmountDiscountAdjustment {
    /// Amount subtracted, as decimal text.
    pub fn amount_discount(&self) -> Result<Amount, ModelError> {
        self.store.required("amount_discount")
    }
}

impl AdjustmentFields for AmountDiscountAdjustment {}

impl Model for AmountDiscountAdjustment {
    const NAME: &'static str = "AmountDiscountAdjustment";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<OpenEnum<AdjustmentType>>("adjustment_type"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<bool>("is_invoice_level"),
        PropertySpec::nullable::<i64>("plan_phase_order"),
        PropertySpec::nullable::<String>("reason"),
        PropertySpec::required::<Amount>("amount_discount"),
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

/// Takes a percentage off the listed prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentageDiscountAdjustment {
    store: PropertyStore,
}

impl PercentageDiscountAdjustment {
    /// Fraction in `0.0..=1.0` subtracted from the total.
    pub fn percentage_discount(&self) -> Result<f64, ModelError> {
        self.store.required("percentage_discount")
    }
}

impl AdjustmentFields for PercentageDiscountAdjustment {}

impl Model for PercentageDiscountAdjustment {
    const NAME: &'static str = "PercentageDiscountAdjustment";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<OpenEnum<AdjustmentType>>("adjustment_type"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<bool>("is_invoice_level"),
        PropertySpec::nullable::<i64>("plan_phase_order"),
        PropertySpec::nullable::<String>("reason"),
        PropertySpec::required::<f64>("percentage_discount"),
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

/// Raises the charge for the listed prices to a floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinimumAdjustment {
    store: PropertyStore,
}

impl MinimumAdjustment {
    /// The floor applied to the adjusted prices.
    pub fn minimum_amount(&self) -> Result<Amount, ModelError> {
        self.store.required("minimum_amount")
    }

    /// The item the true-up line is billed under.
    pub fn item_id(&self) -> Result<String, ModelError> {
        self.store.required("item_id")
    }
}

impl AdjustmentFields for MinimumAdjustment {}

impl Model for MinimumAdjustment {
    const NAME: &'static str = "MinimumAdjustment";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<OpenEnum<AdjustmentType>>("adjustment_type"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<bool>("is_invoice_level"),
        PropertySpec::nullable::<i64>("plan_phase_order"),
        PropertySpec::nullable::<String>("reason"),
        PropertySpec::required::<Amount>("minimum_amount"),
        PropertySpec::required::<String>("item_id"),
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

/// Caps the charge for the listed prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaximumAdjustment {
    store: PropertyStore,
}

impl MaximumAdjustment {
    /// The ceiling applied to the adjusted prices.
    pub fn maximum_amount(&self) -> Result<Amount, ModelError> {
        self.store.required("maximum_amount")
    }
}

impl AdjustmentFields for MaximumAdjustment {}

impl Model for MaximumAdjustment {
    const NAME: &'static str = "MaximumAdjustment";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<OpenEnum<AdjustmentType>>("adjustment_type"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<bool>("is_invoice_level"),
        PropertySpec::nullable::<i64>("plan_phase_order"),
        PropertySpec::nullable::<String>("reason"),
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

// =============================================================================
// Union
// =============================================================================

/// An adjustment of any kind.
///
/// `Unknown` is only populated when a caller decodes with
/// [`billing_core::decode_union_with`] and a lenient policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Adjustment {
    UsageDiscount(UsageDiscountAdjustment),
    AmountDiscount(AmountDiscountAdjustment),
    PercentageDiscount(PercentageDiscountAdjustment),
    Minimum(MinimumAdjustment),
    Maximum(MaximumAdjustment),
    Unknown(UnknownVariant),
}

impl From<UsageDiscountAdjustment> for Adjustment {
    fn from(value: UsageDiscountAdjustment) -> Self {
        Self::UsageDiscount(value)
    }
}

impl From<AmountDiscountAdjustment> for Adjustment {
    fn from(value: AmountDiscountAdjustment) -> Self {
        Self::AmountDiscount(value)
    }
}

impl From<PercentageDiscountAdjustment> for Adjustment {
    fn from(value: PercentageDiscountAdjustment) -> Self {
        Self::PercentageDiscount(value)
    }
}

impl From<MinimumAdjustment> for Adjustment {
    fn from(value: MinimumAdjustment) -> Self {
        Self::Minimum(value)
    }
}

impl From<MaximumAdjustment> for Adjustment {
    fn from(value: MaximumAdjustment) -> Self {
        Self::Maximum(value)
    }
}

impl TaggedUnion for Adjustment {
    const NAME: &'static str = "Adjustment";
    const DISCRIMINATOR: &'static str = "adjustment_type";
    const POLICY: UnionPolicy = UnionPolicy::Strict;
    const VARIANTS: &'static [Variant<Self>] = &[
        Variant::of::<UsageDiscountAdjustment>("usage_discount"),
        Variant::of::<AmountDiscountAdjustment>("amount_discount"),
        Variant::of::<PercentageDiscountAdjustment>("percentage_discount"),
        Variant::of::<MinimumAdjustment>("minimum"),
        Variant::of::<MaximumAdjustment>("maximum"),
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
            Self::UsageDiscount(a) => a.to_json(),
            Self::AmountDiscount(a) => a.to_json(),
            Self::PercentageDiscount(a) => a.to_json(),
            Self::Minimum(a) => a.to_json(),
            Self::Maximum(a) => a.to_json(),
            Self::Unknown(u) => u.raw().clone(),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::UsageDiscount(a) => a.validate(),
            Self::AmountDiscount(a) => a.validate(),
            Self::PercentageDiscount(a) => a.validate(),
            Self::Minimum(a) => a.validate(),
            Self::Maximum(a) => a.validate(),
            Self::Unknown(u) => Self::validate_unknown(u),
        }
    }
}

impl PropertyValue for Adjustment {
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

impl Serialize for Adjustment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Adjustment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}

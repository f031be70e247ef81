//! Prices and the `model_type` tagged union.
//!
//! Every price variant shares a common set of properties (see
//! [`PriceFields`]) and adds a model-specific configuration object.

use billing_core::{
    Amount, Model, ModelError, OpenEnum, PropertySpec, PropertyStore, PropertyValue, StringEnum,
    TaggedUnion, UnionPolicy, UnknownVariant, Variant,
};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::discount::Discount;
use crate::shared::{BillableMetricRef, ItemRef, Maximum, Metadata, Minimum};

// =============================================================================
// Enums
// =============================================================================

/// How often a price is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Cadence {
    /// Billed once.
    OneTime,
    /// Billed every month.
    Monthly,
    /// Billed every three months.
    Quarterly,
    /// Billed every six months.
    SemiAnnual,
    /// Billed every year.
    Annual,
    /// Billed on a schedule defined elsewhere.
    Custom,
}

impl StringEnum for Cadence {
    const ENUM_NAME: &'static str = "Cadence";
}

/// Whether a price bills usage or a fixed fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PriceType {
    /// Charged from metered usage.
    UsagePrice,
    /// Charged per fixed quantity.
    FixedPrice,
}

impl StringEnum for PriceType {
    const ENUM_NAME: &'static str = "PriceType";
}

/// The `model_type` literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PriceModelType {
    /// A flat amount per unit.
    Unit,
    /// A flat amount per package of units.
    Package,
    /// Per-unit amounts that change across tiers.
    Tiered,
}

impl StringEnum for PriceModelType {
    const ENUM_NAME: &'static str = "PriceModelType";
}

// =============================================================================
// Configurations
// =============================================================================

/// Configuration of a [`UnitPrice`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitConfig {
    store: PropertyStore,
}

impl UnitConfig {
    /// Creates a config charging `unit_amount` per unit.
    pub fn new(unit_amount: Amount) -> Self {
        let mut config = Self::default();
        config.store.put("unit_amount", &unit_amount);
        config
    }

    /// Rate per unit of usage.
    pub fn unit_amount(&self) -> Result<Amount, ModelError> {
        self.store.required("unit_amount")
    }
}

impl Model for UnitConfig {
    const NAME: &'static str = "UnitConfig";
    const PROPERTIES: &'static [PropertySpec] = &[PropertySpec::required::<Amount>("unit_amount")];

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

/// Configuration of a [`PackagePrice`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageConfig {
    store: PropertyStore,
}

impl PackageConfig {
    /// Creates a config charging `package_amount` per `package_size` units.
    pub fn new(package_amount: Amount, package_size: i64) -> Self {
        let mut config = Self::default();
        config.store.put("package_amount", &package_amount);
        config.store.put("package_size", &package_size);
        config
    }

    /// Price of one package.
    pub fn package_amount(&self) -> Result<Amount, ModelError> {
        self.store.required("package_amount")
    }

    /// Units per package. Usage is rounded up to whole packages.
    pub fn package_size(&self) -> Result<i64, ModelError> {
        self.store.required("package_size")
    }
}

impl Model for PackageConfig {
    const NAME: &'static str = "PackageConfig";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<Amount>("package_amount"),
        PropertySpec::required::<i64>("package_size"),
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

/// One band of a tiered price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tier {
    store: PropertyStore,
}

impl Tier {
    /// Creates a tier starting at `first_unit`; `last_unit` of `None` is unbounded.
    pub fn new(first_unit: f64, last_unit: Option<f64>, unit_amount: Amount) -> Self {
        let mut tier = Self::default();
        tier.store.put("first_unit", &first_unit);
        tier.store.put("last_unit", &last_unit);
        tier.store.put("unit_amount", &unit_amount);
        tier
    }

    /// First unit of the tier, inclusive.
    pub fn first_unit(&self) -> Result<f64, ModelError> {
        self.store.required("first_unit")
    }

    /// Last unit of the tier. `None` marks the open-ended final tier.
    pub fn last_unit(&self) -> Result<Option<f64>, ModelError> {
        self.store.nullable("last_unit")
    }

    /// Amount charged per unit inside the tier.
    pub fn unit_amount(&self) -> Result<Amount, ModelError> {
        self.store.required("unit_amount")
    }
}

impl Model for Tier {
    const NAME: &'static str = "Tier";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<f64>("first_unit"),
        PropertySpec::nullable::<f64>("last_unit"),
        PropertySpec::required::<Amount>("unit_amount"),
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

/// Configuration of a [`TieredPrice`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TieredConfig {
    store: PropertyStore,
}

impl TieredConfig {
    /// Creates a config from tiers ordered by `first_unit`.
    pub fn new(tiers: Vec<Tier>) -> Self {
        let mut config = Self::default();
        config.store.put("tiers", &tiers);
        config
    }

    /// The tiers, in the order the API returned them.
    pub fn tiers(&self) -> Result<Vec<Tier>, ModelError> {
        self.store.required("tiers")
    }
}

impl Model for TieredConfig {
    const NAME: &'static str = "TieredConfig";
    const PROPERTIES: &'static [PropertySpec] = &[PropertySpec::required::<Vec<Tier>>("tiers")];

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
// Variants
// =============================================================================

/// Properties every price variant carries.
pub trait PriceFields: Model {
    /// Price identifier.
    fn id(&self) -> Result<String, ModelError> {
        self.store().required("id")
    }

    /// Display name.
    fn name(&self) -> Result<String, ModelError> {
        self.store().required("name")
    }

    /// Identifier in the caller's own system, if set.
    fn external_price_id(&self) -> Result<Option<String>, ModelError> {
        self.store().nullable("external_price_id")
    }

    /// The discriminator literal.
    fn model_type(&self) -> Result<OpenEnum<PriceModelType>, ModelError> {
        self.store().required("model_type")
    }

    /// Whether the price is usage-based or fixed.
    fn price_type(&self) -> Result<OpenEnum<PriceType>, ModelError> {
        self.store().required("price_type")
    }

    /// How often the price is billed.
    fn cadence(&self) -> Result<OpenEnum<Cadence>, ModelError> {
        self.store().required("cadence")
    }

    /// ISO 4217 currency code.
    fn currency(&self) -> Result<String, ModelError> {
        self.store().required("currency")
    }

    /// Creation time.
    fn created_at(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store().required("created_at")
    }

    /// The item being priced.
    fn item(&self) -> Result<ItemRef, ModelError> {
        self.store().required("item")
    }

    /// Metric that drives usage prices.
    fn billable_metric(&self) -> Result<Option<BillableMetricRef>, ModelError> {
        self.store().nullable("billable_metric")
    }

    /// Quantity billed for fixed prices.
    fn fixed_price_quantity(&self) -> Result<Option<f64>, ModelError> {
        self.store().nullable("fixed_price_quantity")
    }

    /// Phase of the plan this price belongs to.
    fn plan_phase_order(&self) -> Result<Option<i64>, ModelError> {
        self.store().nullable("plan_phase_order")
    }

    /// Price-level minimum, if configured.
    fn minimum(&self) -> Result<Option<Minimum>, ModelError> {
        self.store().nullable("minimum")
    }

    /// Price-level maximum, if configured.
    fn maximum(&self) -> Result<Option<Maximum>, ModelError> {
        self.store().nullable("maximum")
    }

    /// Price-level discount, if configured.
    fn discount(&self) -> Result<Option<Discount>, ModelError> {
        self.store().nullable("discount")
    }

    /// Caller-defined string metadata.
    fn metadata(&self) -> Result<Metadata, ModelError> {
        self.store().required("metadata")
    }
}

/// A fixed rate per unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitPrice {
    store: PropertyStore,
}

impl UnitPrice {
    /// The per-unit amount.
    pub fn unit_config(&self) -> Result<UnitConfig, ModelError> {
        self.store.required("unit_config")
    }

    /// Replaces the per-unit amount.
    pub fn set_unit_config(&mut self, config: UnitConfig) {
        self.store.put("unit_config", &config);
    }
}

impl PriceFields for UnitPrice {}

impl Model for UnitPrice {
    const NAME: &'static str = "UnitPrice";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<String>("name"),
        PropertySpec::nullable::<String>("external_price_id"),
        PropertySpec::required::<OpenEnum<PriceModelType>>("model_type"),
        PropertySpec::required::<OpenEnum<PriceType>>("price_type"),
        PropertySpec::required::<OpenEnum<Cadence>>("cadence"),
        PropertySpec::required::<String>("currency"),
        PropertySpec::required::<DateTime<Utc>>("created_at"),
        PropertySpec::required::<ItemRef>("item"),
        PropertySpec::nullable::<BillableMetricRef>("billable_metric"),
        PropertySpec::nullable::<f64>("fixed_price_quantity"),
        PropertySpec::nullable::<i64>("plan_phase_order"),
        PropertySpec::nullable::<Minimum>("minimum"),
        PropertySpec::nullable::<Maximum>("maximum"),
        PropertySpec::nullable::<Discount>("discount"),
        PropertySpec::required::<Metadata>("metadata"),
        PropertySpec::required::<UnitConfig>("unit_config"),
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

/// A fixed price per package of units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackagePrice {
    store: PropertyStore,
}

impl PackagePrice {
    /// The package amount and size.
    pub fn package_config(&self) -> Result<PackageConfig, ModelError> {
        self.store.required("package_config")
    }

    /// Replaces the package amount and size.
    pub fn set_package_config(&mut self, config: PackageConfig) {
        self.store.put("package_config", &config);
    }
}

impl PriceFields for PackagePrice {}

impl Model for PackagePrice {
    const NAME: &'static str = "PackagePrice";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<String>("name"),
        PropertySpec::nullable::<String>("external_price_id"),
        PropertySpec::required::<OpenEnum<PriceModelType>>("model_type"),
        PropertySpec::required::<OpenEnum<PriceType>>("price_type"),
        PropertySpec::required::<OpenEnum<Cadence>>("cadence"),
        PropertySpec::required::<String>("currency"),
        PropertySpec::required::<DateTime<Utc>>("created_at"),
        PropertySpec::required::<ItemRef>("item"),
        PropertySpec::nullable::<BillableMetricRef>("billable_metric"),
        PropertySpec::nullable::<f64>("fixed_price_quantity"),
        PropertySpec::nullable::<i64>("plan_phase_order"),
        PropertySpec::nullable::<Minimum>("minimum"),
        PropertySpec::nullable::<Maximum>("maximum"),
        PropertySpec::nullable::<Discount>("discount"),
        PropertySpec::required::<Metadata>("metadata"),
        PropertySpec::required::<PackageConfig>("package_config"),
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

/// A rate that changes with volume, band by band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TieredPrice {
    store: PropertyStore,
}

impl TieredPrice {
    /// The tier table.
    pub fn tiered_config(&self) -> Result<TieredConfig, ModelError> {
        self.store.required("tiered_config")
    }

    /// Replaces the tier table.
    pub fn set_tiered_config(&mut self, config: TieredConfig) {
        self.store.put("tiered_config", &config);
    }
}

impl PriceFields for TieredPrice {}

impl Model for TieredPrice {
    const NAME: &'static str = "TieredPrice";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<String>("name"),
        PropertySpec::nullable::<String>("external_price_id"),
        PropertySpec::required::<OpenEnum<PriceModelType>>("model_type"),
        PropertySpec::required::<OpenEnum<PriceType>>("price_type"),
        PropertySpec::required::<OpenEnum<Cadence>>("cadence"),
        PropertySpec::required::<String>("currency"),
        PropertySpec::required::<DateTime<Utc>>("created_at"),
        PropertySpec::required::<ItemRef>("item"),
        PropertySpec::nullable::<BillableMetricRef>("billable_metric"),
        PropertySpec::nullable::<f64>("fixed_price_quantity"),
        PropertySpec::nullable::<i64>("plan_phase_order"),
        PropertySpec::nullable::<Minimum>("minimum"),
        PropertySpec::nullable::<Maximum>("maximum"),
        PropertySpec::nullable::<Discount>("discount"),
        PropertySpec::required::<Metadata>("metadata"),
        PropertySpec::required::<TieredConfig>("tiered_config"),
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

/// A price of any pricing model.
#[derive(Debug, Clone, PartialEq)]
pub enum Price {
    Unit(UnitPrice),
    Package(PackagePrice),
    Tiered(TieredPrice),
    Unknown(UnknownVariant),
}

impl Price {
    /// Returns the price id, reading it from the raw node for unknown models.
    pub fn id(&self) -> Result<String, ModelError> {
        match self {
            Self::Unit(p) => p.id(),
            Self::Package(p) => p.id(),
            Self::Tiered(p) => p.id(),
            Self::Unknown(u) => {
                let value = u.raw().get("id").ok_or_else(|| ModelError::missing("id"))?;
                String::decode(value).map_err(|e| e.in_property("id"))
            }
        }
    }
}

impl From<UnitPrice> for Price {
    fn from(value: UnitPrice) -> Self {
        Self::Unit(value)
    }
}

impl From<PackagePrice> for Price {
    fn from(value: PackagePrice) -> Self {
        Self::Package(value)
    }
}

impl From<TieredPrice> for Price {
    fn from(value: TieredPrice) -> Self {
        Self::Tiered(value)
    }
}

impl TaggedUnion for Price {
    const NAME: &'static str = "Price";
    const DISCRIMINATOR: &'static str = "model_type";
    const POLICY: UnionPolicy = UnionPolicy::Lenient;
    const VARIANTS: &'static [Variant<Self>] = &[
        Variant::of::<UnitPrice>("unit"),
        Variant::of::<PackagePrice>("package"),
        Variant::of::<TieredPrice>("tiered"),
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
            Self::Unit(p) => p.to_json(),
            Self::Package(p) => p.to_json(),
            Self::Tiered(p) => p.to_json(),
            Self::Unknown(u) => u.raw().clone(),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Unit(p) => p.validate(),
            Self::Package(p) => p.validate(),
            Self::Tiered(p) => p.validate(),
            Self::Unknown(u) => Self::validate_unknown(u),
        }
    }
}

impl PropertyValue for Price {
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

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_core::{ModelErrorKind, UnionPolicy, decode_union_with};
    use serde_json::json;

    fn tiered_json() -> Value {
        json!({
            "id": "price_tiered",
            "name": "API calls",
            "external_price_id": null,
            "model_type": "tiered",
            "price_type": "usage_price",
            "cadence": "monthly",
            "currency": "USD",
            "created_at": "2024-01-01T00:00:00Z",
            "item": {"id": "item_1", "name": "API calls"},
            "billable_metric": {"id": "bm_1"},
            "fixed_price_quantity": null,
            "plan_phase_order": null,
            "minimum": null,
            "maximum": null,
            "discount": null,
            "metadata": {},
            "tiered_config": {
                "tiers": [
                    {"first_unit": 0, "last_unit": 1000, "unit_amount": "0.00"},
                    {"first_unit": 1000, "last_unit": null, "unit_amount": "0.002"}
                ]
            }
        })
    }

    #[test]
    fn tiered_price_dispatch() {
        let price = Price::from_json(&tiered_json()).unwrap();
        let Price::Tiered(tiered) = &price else {
            panic!("expected tiered price, got {price:?}");
        };

        let tiers = tiered.tiered_config().unwrap().tiers().unwrap();
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[1].last_unit().unwrap(), None);
        assert_eq!(tiers[1].unit_amount().unwrap().as_str(), "0.002");
        assert_eq!(tiered.cadence().unwrap(), Cadence::Monthly);
        assert_eq!(price.id().unwrap(), "price_tiered");
    }

    #[test]
    fn invalid_tier_falls_back_to_unknown() {
        let mut raw = tiered_json();
        raw["tiered_config"]["tiers"][1]
            .as_object_mut()
            .unwrap()
            .remove("unit_amount");

        let price = Price::from_json(&raw).unwrap();
        assert!(price.is_unknown());
        assert_eq!(price.id().unwrap(), "price_tiered");

        let err = decode_union_with::<Price>(&raw, UnionPolicy::Strict).unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::AggregateDecodeFailure);
        assert_eq!(err.path(), "tiered_config.tiers[1].unit_amount");
    }

    #[test]
    fn unknown_cadence_invalidates_variant() {
        let mut raw = tiered_json();
        raw["cadence"] = json!("fortnightly");

        let err = decode_union_with::<Price>(&raw, UnionPolicy::Strict).unwrap_err();
        assert_eq!(err.path(), "cadence");
        assert!(Price::from_json(&raw).unwrap().is_unknown());
    }

    #[test]
    fn config_builders() {
        let mut price = UnitPrice::default();
        price.set_unit_config(UnitConfig::new(Amount::new("1.25")));
        assert_eq!(price.to_json(), json!({"unit_config": {"unit_amount": "1.25"}}));

        let config = TieredConfig::new(vec![Tier::new(0.0, None, Amount::new("3"))]);
        assert!(config.validate().is_ok());
        assert_eq!(config.to_json()["tiers"][0]["last_unit"], Value::Null);

        let package = PackageConfig::new(Amount::new("10"), 100);
        assert_eq!(package.package_size().unwrap(), 100);
    }

    #[test]
    fn cadence_literals() {
        assert_eq!(Cadence::SemiAnnual.to_string(), "semi_annual");
        assert_eq!("one_time".parse::<Cadence>().unwrap(), Cadence::OneTime);
    }
}

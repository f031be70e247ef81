//! Subscriptions and their time-bounded discount and adjustment intervals.

use billing_core::{
    Amount, Model, ModelError, OpenEnum, PropertySpec, PropertyStore, PropertyValue, StringEnum,
    TaggedUnion, UnionPolicy, UnknownVariant, Variant,
};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::adjustment::Adjustment;
use crate::customer::Customer;
use crate::discount::DiscountType;
use crate::plan::Plan;
use crate::shared::Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Currently billing.
    Active,
    /// Past its end date or cancelled.
    Ended,
    /// Starts in the future.
    Upcoming,
}

impl StringEnum for SubscriptionStatus {
    const ENUM_NAME: &'static str = "SubscriptionStatus";
}

// =============================================================================
// Discount intervals
// =============================================================================

/// A fixed-amount discount active between two dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountDiscountInterval {
    store: PropertyStore,
}

impl AmountDiscountInterval {
    /// Always `amount` for a well-formed value.
    pub fn discount_type(&self) -> Result<OpenEnum<DiscountType>, ModelError> {
        self.store.required("discount_type")
    }

    /// Amount removed, as decimal text.
    pub fn amount_discount(&self) -> Result<Amount, ModelError> {
        self.store.required("amount_discount")
    }

    /// Prices the discount applies to.
    pub fn applies_to_price_ids(&self) -> Result<Vec<String>, ModelError> {
        self.store.required("applies_to_price_ids")
    }

    /// Start of the interval.
    pub fn start_date(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("start_date")
    }

    /// End of the interval. `None` means open-ended.
    pub fn end_date(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("end_date")
    }
}

impl Model for AmountDiscountInterval {
    const NAME: &'static str = "AmountDiscountInterval";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<OpenEnum<DiscountType>>("discount_type"),
        PropertySpec::required::<Amount>("amount_discount"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<DateTime<Utc>>("start_date"),
        PropertySpec::nullable::<DateTime<Utc>>("end_date"),
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

/// A percentage discount active between two dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentageDiscountInterval {
    store: PropertyStore,
}

impl PercentageDiscountInterval {
    /// Always `percentage` for a well-formed value.
    pub fn discount_type(&self) -> Result<OpenEnum<DiscountType>, ModelError> {
        self.store.required("discount_type")
    }

    /// Fraction removed.
    pub fn percentage_discount(&self) -> Result<f64, ModelError> {
        self.store.required("percentage_discount")
    }

    /// Prices the discount applies to.
    pub fn applies_to_price_ids(&self) -> Result<Vec<String>, ModelError> {
        self.store.required("applies_to_price_ids")
    }

    /// Start of the interval.
    pub fn start_date(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("start_date")
    }

    /// End of the interval. `None` means open-ended.
    pub fn end_date(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("end_date")
    }
}

impl Model for PercentageDiscountInterval {
    const NAME: &'static str = "PercentageDiscountInterval";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<OpenEnum<DiscountType>>("discount_type"),
        PropertySpec::required::<f64>("percentage_discount"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<DateTime<Utc>>("start_date"),
        PropertySpec::nullable::<DateTime<Utc>>("end_date"),
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

/// A usage discount active between two dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageDiscountInterval {
    store: PropertyStore,
}

impl UsageDiscountInterval {
    /// Always `usage` for a well-formed value.
    pub fn discount_type(&self) -> Result<OpenEnum<DiscountType>, ModelError> {
        self.store.required("discount_type")
    }

    /// Free usage units per billing period.
    pub fn usage_discount(&self) -> Result<f64, ModelError> {
        self.store.required("usage_discount")
    }

    /// Prices the free units apply to.
    pub fn applies_to_price_ids(&self) -> Result<Vec<String>, ModelError> {
        self.store.required("applies_to_price_ids")
    }

    /// Start of the interval.
    pub fn start_date(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("start_date")
    }

    /// End of the interval. `None` means open-ended.
    pub fn end_date(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("end_date")
    }
}

impl Model for UsageDiscountInterval {
    const NAME: &'static str = "UsageDiscountInterval";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<OpenEnum<DiscountType>>("discount_type"),
        PropertySpec::required::<f64>("usage_discount"),
        PropertySpec::required::<Vec<String>>("applies_to_price_ids"),
        PropertySpec::required::<DateTime<Utc>>("start_date"),
        PropertySpec::nullable::<DateTime<Utc>>("end_date"),
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

/// A discount interval of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountInterval {
    Amount(AmountDiscountInterval),
    Percentage(PercentageDiscountInterval),
    Usage(UsageDiscountInterval),
    Unknown(UnknownVariant),
}

impl From<AmountDiscountInterval> for DiscountInterval {
    fn from(value: AmountDiscountInterval) -> Self {
        Self::Amount(value)
    }
}

impl From<PercentageDiscountInterval> for DiscountInterval {
    fn from(value: PercentageDiscountInterval) -> Self {
        Self::Percentage(value)
    }
}

impl From<UsageDiscountInterval> for DiscountInterval {
    fn from(value: UsageDiscountInterval) -> Self {
        Self::Usage(value)
    }
}

impl TaggedUnion for DiscountInterval {
    const NAME: &'static str = "DiscountInterval";
    const DISCRIMINATOR: &'static str = "discount_type";
    const POLICY: UnionPolicy = UnionPolicy::Lenient;
    const VARIANTS: &'static [Variant<Self>] = &[
        Variant::of::<AmountDiscountInterval>("amount"),
        Variant::of::<PercentageDiscountInterval>("percentage"),
        Variant::of::<UsageDiscountInterval>("usage"),
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
            Self::Amount(i) => i.to_json(),
            Self::Percentage(i) => i.to_json(),
            Self::Usage(i) => i.to_json(),
            Self::Unknown(u) => u.raw().clone(),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Amount(i) => i.validate(),
            Self::Percentage(i) => i.validate(),
            Self::Usage(i) => i.validate(),
            Self::Unknown(u) => Self::validate_unknown(u),
        }
    }
}

impl PropertyValue for DiscountInterval {
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

impl Serialize for DiscountInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DiscountInterval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}

// =============================================================================
// Other intervals and schedules
// =============================================================================

/// An adjustment active between two dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjustmentInterval {
    store: PropertyStore,
}

impl AdjustmentInterval {
    /// Interval identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// The adjustment. Decoding fails if it is not recognized.
    pub fn adjustment(&self) -> Result<Adjustment, ModelError> {
        self.store.required("adjustment")
    }

    /// Price intervals the adjustment applies to.
    pub fn applies_to_price_interval_ids(&self) -> Result<Vec<String>, ModelError> {
        self.store.required("applies_to_price_interval_ids")
    }

    /// Start of the interval.
    pub fn start_date(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("start_date")
    }

    /// End of the interval. `None` means open-ended.
    pub fn end_date(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("end_date")
    }
}

impl Model for AdjustmentInterval {
    const NAME: &'static str = "AdjustmentInterval";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<Adjustment>("adjustment"),
        PropertySpec::required::<Vec<String>>("applies_to_price_interval_ids"),
        PropertySpec::required::<DateTime<Utc>>("start_date"),
        PropertySpec::nullable::<DateTime<Utc>>("end_date"),
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

/// A scheduled change to a fixed fee's quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedFeeQuantityTransition {
    store: PropertyStore,
}

impl FixedFeeQuantityTransition {
    /// The fixed-fee price whose quantity changes.
    pub fn price_id(&self) -> Result<String, ModelError> {
        self.store.required("price_id")
    }

    /// When the new quantity takes effect.
    pub fn effective_date(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("effective_date")
    }

    /// The new quantity.
    pub fn quantity(&self) -> Result<i64, ModelError> {
        self.store.required("quantity")
    }
}

impl Model for FixedFeeQuantityTransition {
    const NAME: &'static str = "FixedFeeQuantityTransition";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("price_id"),
        PropertySpec::required::<DateTime<Utc>>("effective_date"),
        PropertySpec::required::<i64>("quantity"),
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrialInfo {
    store: PropertyStore,
}

impl TrialInfo {
    /// End of the trial; `None` when the subscription has no trial.
    pub fn end_date(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("end_date")
    }
}

impl Model for TrialInfo {
    const NAME: &'static str = "TrialInfo";
    const PROPERTIES: &'static [PropertySpec] =
        &[PropertySpec::nullable::<DateTime<Utc>>("end_date")];

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
// Subscription
// =============================================================================

/// A customer's subscription to a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subscription {
    store: PropertyStore,
}

impl Subscription {
    /// Subscription identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// Lifecycle state.
    pub fn status(&self) -> Result<OpenEnum<SubscriptionStatus>, ModelError> {
        self.store.required("status")
    }

    /// Creation time.
    pub fn created_at(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("created_at")
    }

    /// When billing starts.
    pub fn start_date(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("start_date")
    }

    /// When billing stops, if scheduled.
    pub fn end_date(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("end_date")
    }

    /// Start of the current billing period.
    pub fn current_billing_period_start_date(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("current_billing_period_start_date")
    }

    /// End of the current billing period.
    pub fn current_billing_period_end_date(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("current_billing_period_end_date")
    }

    /// The subscribed customer.
    pub fn customer(&self) -> Result<Customer, ModelError> {
        self.store.required("customer")
    }

    /// The subscribed plan.
    pub fn plan(&self) -> Result<Option<Plan>, ModelError> {
        self.store.nullable("plan")
    }

    /// Day of the month invoices are issued on.
    pub fn billing_cycle_day(&self) -> Result<i64, ModelError> {
        self.store.required("billing_cycle_day")
    }

    /// Days between invoice date and due date.
    pub fn net_terms(&self) -> Result<i64, ModelError> {
        self.store.required("net_terms")
    }

    /// Overrides the customer's setting when present.
    pub fn auto_collection(&self) -> Result<Option<bool>, ModelError> {
        self.store.nullable("auto_collection")
    }

    /// Memo copied onto invoices.
    pub fn default_invoice_memo(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("default_invoice_memo")
    }

    /// Usage amount that triggers an early invoice.
    pub fn invoicing_threshold(&self) -> Result<Option<Amount>, ModelError> {
        self.store.nullable("invoicing_threshold")
    }

    /// Time-bounded discounts. Unrecognized kinds come back as the unknown arm.
    pub fn discount_intervals(&self) -> Result<Vec<DiscountInterval>, ModelError> {
        self.store.required("discount_intervals")
    }

    /// Time-bounded adjustments.
    pub fn adjustment_intervals(&self) -> Result<Vec<AdjustmentInterval>, ModelError> {
        self.store.required("adjustment_intervals")
    }

    /// Scheduled quantity changes for fixed fees.
    pub fn fixed_fee_quantity_schedule(&self) -> Result<Vec<FixedFeeQuantityTransition>, ModelError> {
        self.store.required("fixed_fee_quantity_schedule")
    }

    /// Trial state.
    pub fn trial_info(&self) -> Result<TrialInfo, ModelError> {
        self.store.required("trial_info")
    }

    /// Caller-defined string metadata.
    pub fn metadata(&self) -> Result<Metadata, ModelError> {
        self.store.required("metadata")
    }

    /// Replaces the metadata.
    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.store.put("metadata", &metadata);
    }

    /// Replaces the memo. `None` writes an explicit `null`.
    pub fn set_default_invoice_memo(&mut self, memo: Option<String>) {
        self.store.put("default_invoice_memo", &memo);
    }
}

impl Model for Subscription {
    const NAME: &'static str = "Subscription";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<OpenEnum<SubscriptionStatus>>("status"),
        PropertySpec::required::<DateTime<Utc>>("created_at"),
        PropertySpec::required::<DateTime<Utc>>("start_date"),
        PropertySpec::nullable::<DateTime<Utc>>("end_date"),
        PropertySpec::nullable::<DateTime<Utc>>("current_billing_period_start_date"),
        PropertySpec::nullable::<DateTime<Utc>>("current_billing_period_end_date"),
        PropertySpec::required::<Customer>("customer"),
        PropertySpec::nullable::<Plan>("plan"),
        PropertySpec::required::<i64>("billing_cycle_day"),
        PropertySpec::required::<i64>("net_terms"),
        PropertySpec::nullable::<bool>("auto_collection"),
        PropertySpec::nullable::<String>("default_invoice_memo"),
        PropertySpec::nullable::<Amount>("invoicing_threshold"),
        PropertySpec::required::<Vec<DiscountInterval>>("discount_intervals"),
        PropertySpec::required::<Vec<AdjustmentInterval>>("adjustment_intervals"),
        PropertySpec::required::<Vec<FixedFeeQuantityTransition>>("fixed_fee_quantity_schedule"),
        PropertySpec::required::<TrialInfo>("trial_info"),
        PropertySpec::required::<Metadata>("metadata"),
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
    use chrono::TimeZone;
    use serde_json::{Value, json};

    fn subscription_json() -> Value {
        json!({
            "id": "sub_1",
            "status": "active",
            "created_at": "2024-05-01T00:00:00Z",
            "start_date": "2024-05-01T00:00:00Z",
            "end_date": null,
            "current_billing_period_start_date": "2024-05-01T00:00:00Z",
            "current_billing_period_end_date": "2024-06-01T00:00:00Z",
            "customer": {
                "id": "cust_123",
                "external_customer_id": "acme",
                "name": "Acme",
                "email": "billing@acme.test",
                "additional_emails": [],
                "currency": "USD",
                "balance": "0.00",
                "created_at": "2024-03-01T12:00:00Z",
                "timezone": "Etc/UTC",
                "auto_collection": true,
                "email_delivery": true,
                "payment_provider": null,
                "payment_provider_id": null,
                "billing_address": null,
                "shipping_address": null,
                "metadata": {}
            },
            "plan": {
                "id": "plan_1",
                "external_plan_id": null,
                "name": "Startup",
                "description": "",
                "status": "active",
                "currency": "USD",
                "invoicing_currency": "USD",
                "created_at": "2024-01-01T00:00:00Z",
                "version": 1,
                "net_terms": null,
                "default_invoice_memo": null,
                "prices": [],
                "adjustments": [],
                "plan_phases": null,
                "product": {"id": "prod_1", "name": "Core", "created_at": "2023-06-01T00:00:00Z"},
                "trial_config": {"trial_period": 14, "trial_period_unit": "days"},
                "minimum": null,
                "maximum": null,
                "discount": null,
                "metadata": {}
            },
            "billing_cycle_day": 1,
            "net_terms": 30,
            "auto_collection": null,
            "default_invoice_memo": null,
            "invoicing_threshold": "500.00",
            "discount_intervals": [
                {
                    "discount_type": "amount",
                    "amount_discount": "10.00",
                    "applies_to_price_ids": ["price_seats"],
                    "start_date": "2024-05-01T00:00:00Z",
                    "end_date": "2024-08-01T00:00:00Z"
                },
                {"discount_type": "loyalty", "points": 40}
            ],
            "adjustment_intervals": [{
                "id": "ai_1",
                "adjustment": {
                    "id": "adj_1",
                    "adjustment_type": "minimum",
                    "applies_to_price_ids": ["price_seats"],
                    "is_invoice_level": true,
                    "plan_phase_order": null,
                    "reason": null,
                    "minimum_amount": "25.00",
                    "item_id": "item_seats"
                },
                "applies_to_price_interval_ids": ["pi_1"],
                "start_date": "2024-05-01T00:00:00Z",
                "end_date": null
            }],
            "fixed_fee_quantity_schedule": [
                {"price_id": "price_seats", "effective_date": "2024-05-01T00:00:00Z", "quantity": 5}
            ],
            "trial_info": {"end_date": null},
            "metadata": {"region": "eu"},
            "extra": {"rollout": [1, 2]}
        })
    }

    #[test]
    fn subscription_round_trip() {
        let raw = subscription_json();
        let subscription = Subscription::from_json(raw.clone()).unwrap();
        subscription.validate().unwrap();

        assert_eq!(subscription.to_json(), raw);
        assert_eq!(Subscription::from_json(subscription.to_json()).unwrap(), subscription);
        assert_eq!(subscription.additional_properties(), vec![("extra", &raw["extra"])]);

        let arms: Vec<bool> = subscription
            .discount_intervals()
            .unwrap()
            .iter()
            .map(DiscountInterval::is_unknown)
            .collect();
        assert_eq!(arms, vec![false, true]);
        assert_eq!(subscription.status().unwrap(), SubscriptionStatus::Active);
        assert_eq!(subscription.customer().unwrap().name().unwrap(), "Acme");
        assert_eq!(subscription.plan().unwrap().unwrap().version().unwrap(), 1);
        assert_eq!(subscription.invoicing_threshold().unwrap().unwrap().as_str(), "500.00");
        assert!(matches!(
            subscription.adjustment_intervals().unwrap()[0].adjustment().unwrap(),
            Adjustment::Minimum(_)
        ));
        assert_eq!(subscription.metadata().unwrap().get("region"), Some("eu"));
    }

    #[test]
    fn subscription_setters_keep_layout() {
        let mut subscription = Subscription::from_json(subscription_json()).unwrap();
        subscription.set_default_invoice_memo(Some("Thanks".to_string()));
        subscription.set_default_invoice_memo(None);

        let mut expected = subscription_json();
        expected["default_invoice_memo"] = Value::Null;
        assert_eq!(subscription.to_json(), expected);
        subscription.validate().unwrap();
    }

    #[test]
    fn subscription_error_path_reaches_adjustment() {
        let mut raw = subscription_json();
        raw["adjustment_intervals"][0]["adjustment"]["minimum_amount"] = json!([]);
        let subscription = Subscription::from_json(raw).unwrap();

        let err = subscription.validate().unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::AggregateDecodeFailure);
        assert_eq!(err.path(), "adjustment_intervals[0].adjustment.minimum_amount");
    }

    #[test]
    fn discount_interval_dispatch() {
        let interval = DiscountInterval::from_json(&json!({
            "discount_type": "usage",
            "usage_discount": 250.0,
            "applies_to_price_ids": ["price_api"],
            "start_date": "2024-05-01T00:00:00Z",
            "end_date": null
        }))
        .unwrap();

        let DiscountInterval::Usage(usage) = &interval else {
            panic!("expected usage interval, got {interval:?}");
        };
        assert_eq!(usage.usage_discount().unwrap(), 250.0);
        assert_eq!(
            usage.start_date().unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(usage.end_date().unwrap(), None);
    }

    #[test]
    fn trial_interval_is_unknown_here() {
        let raw = json!({"discount_type": "trial", "applies_to_price_ids": []});
        let interval = DiscountInterval::from_json(&raw).unwrap();
        assert!(interval.is_unknown());
        assert_eq!(interval.encode(), raw);
    }

    #[test]
    fn adjustment_interval_uses_strict_union() {
        let interval = AdjustmentInterval::from_json(json!({
            "id": "ai_1",
            "adjustment": {"adjustment_type": "rebate"},
            "applies_to_price_interval_ids": [],
            "start_date": "2024-05-01T00:00:00Z",
            "end_date": null
        }))
        .unwrap();

        assert_eq!(interval.id().unwrap(), "ai_1");
        let err = interval.validate().unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::NoMatchingVariant);
        assert_eq!(err.path(), "adjustment");
    }

    #[test]
    fn fixed_fee_quantity_accepts_integral_float() {
        let transition = FixedFeeQuantityTransition::from_json(json!({
            "price_id": "price_seats",
            "effective_date": "2024-06-01T00:00:00Z",
            "quantity": 12.0
        }))
        .unwrap();
        assert_eq!(transition.quantity().unwrap(), 12);

        let fractional = FixedFeeQuantityTransition::from_json(json!({"quantity": 1.5})).unwrap();
        assert_eq!(fractional.quantity().unwrap_err().path(), "quantity");
    }
}

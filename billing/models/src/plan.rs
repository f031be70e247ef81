//! Plans, their phases and trial configuration.

use billing_core::{Model, ModelError, OpenEnum, PropertySpec, PropertyStore, StringEnum};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::adjustment::Adjustment;
use crate::discount::Discount;
use crate::price::Price;
use crate::shared::{Maximum, Metadata, Minimum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PlanStatus {
    /// Open to new subscriptions.
    Active,
    /// Retired. Existing subscriptions continue.
    Archived,
    /// Not yet published.
    Draft,
}

impl StringEnum for PlanStatus {
    const ENUM_NAME: &'static str = "PlanStatus";
}

/// Unit of a plan phase's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DurationUnit {
    /// Days.
    Daily,
    /// Months.
    Monthly,
    /// Quarters.
    Quarterly,
    /// Half years.
    SemiAnnual,
    /// Years.
    Annual,
}

impl StringEnum for DurationUnit {
    const ENUM_NAME: &'static str = "DurationUnit";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum TrialPeriodUnit {
    /// Trial length is counted in days.
    Days,
}

impl StringEnum for TrialPeriodUnit {
    const ENUM_NAME: &'static str = "TrialPeriodUnit";
}

// =============================================================================
// Nested records
// =============================================================================

/// The product a plan belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRef {
    store: PropertyStore,
}

impl ProductRef {
    /// Product identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// Product name.
    pub fn name(&self) -> Result<String, ModelError> {
        self.store.required("name")
    }

    /// Creation time.
    pub fn created_at(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("created_at")
    }
}

impl Model for ProductRef {
    const NAME: &'static str = "ProductRef";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<String>("name"),
        PropertySpec::required::<DateTime<Utc>>("created_at"),
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

/// Free trial granted to new subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrialConfig {
    store: PropertyStore,
}

impl TrialConfig {
    /// Length of the trial; `None` when the plan has no trial.
    pub fn trial_period(&self) -> Result<Option<i64>, ModelError> {
        self.store.nullable("trial_period")
    }

    /// Unit of `trial_period`.
    pub fn trial_period_unit(&self) -> Result<OpenEnum<TrialPeriodUnit>, ModelError> {
        self.store.required("trial_period_unit")
    }
}

impl Model for TrialConfig {
    const NAME: &'static str = "TrialConfig";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::nullable::<i64>("trial_period"),
        PropertySpec::required::<OpenEnum<TrialPeriodUnit>>("trial_period_unit"),
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

/// One phase of a multi-phase plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanPhase {
    store: PropertyStore,
}

impl PlanPhase {
    /// Phase identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// Phase name.
    pub fn name(&self) -> Result<String, ModelError> {
        self.store.required("name")
    }

    /// Optional description.
    pub fn description(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("description")
    }

    /// Position of the phase, starting at 1.
    pub fn order(&self) -> Result<i64, ModelError> {
        self.store.required("order")
    }

    /// Length of the phase; `None` for the final, open-ended phase.
    pub fn duration(&self) -> Result<Option<i64>, ModelError> {
        self.store.nullable("duration")
    }

    /// Unit of `duration`.
    pub fn duration_unit(&self) -> Result<Option<OpenEnum<DurationUnit>>, ModelError> {
        self.store.nullable("duration_unit")
    }

    /// Discount applied during the phase.
    pub fn discount(&self) -> Result<Option<Discount>, ModelError> {
        self.store.nullable("discount")
    }

    /// Minimum applied during the phase.
    pub fn minimum(&self) -> Result<Option<Minimum>, ModelError> {
        self.store.nullable("minimum")
    }

    /// Maximum applied during the phase.
    pub fn maximum(&self) -> Result<Option<Maximum>, ModelError> {
        self.store.nullable("maximum")
    }
}

impl Model for PlanPhase {
    const NAME: &'static str = "PlanPhase";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<String>("name"),
        PropertySpec::nullable::<String>("description"),
        PropertySpec::required::<i64>("order"),
        PropertySpec::nullable::<i64>("duration"),
        PropertySpec::nullable::<OpenEnum<DurationUnit>>("duration_unit"),
        PropertySpec::nullable::<Discount>("discount"),
        PropertySpec::nullable::<Minimum>("minimum"),
        PropertySpec::nullable::<Maximum>("maximum"),
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
// Plan
// =============================================================================

/// A plan: the set of prices and adjustments a subscription bills.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    store: PropertyStore,
}

impl Plan {
    /// Plan identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// Identifier in the caller's own system, if set.
    pub fn external_plan_id(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("external_plan_id")
    }

    /// Display name.
    pub fn name(&self) -> Result<String, ModelError> {
        self.store.required("name")
    }

    /// Description. May be empty.
    pub fn description(&self) -> Result<String, ModelError> {
        self.store.required("description")
    }

    /// Publication state.
    pub fn status(&self) -> Result<OpenEnum<PlanStatus>, ModelError> {
        self.store.required("status")
    }

    /// Currency prices are defined in.
    pub fn currency(&self) -> Result<String, ModelError> {
        self.store.required("currency")
    }

    /// Currency invoices are issued in.
    pub fn invoicing_currency(&self) -> Result<String, ModelError> {
        self.store.required("invoicing_currency")
    }

    /// Creation time.
    pub fn created_at(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("created_at")
    }

    /// Plan version, incremented on each published change.
    pub fn version(&self) -> Result<i64, ModelError> {
        self.store.required("version")
    }

    /// Days between invoice date and due date.
    pub fn net_terms(&self) -> Result<Option<i64>, ModelError> {
        self.store.nullable("net_terms")
    }

    /// Memo copied onto invoices.
    pub fn default_invoice_memo(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("default_invoice_memo")
    }

    /// Prices in the plan. Unrecognized price models come back as the unknown arm.
    pub fn prices(&self) -> Result<Vec<Price>, ModelError> {
        self.store.required("prices")
    }

    /// Plan-level adjustments. Decoding fails if any is not recognized.
    pub fn adjustments(&self) -> Result<Vec<Adjustment>, ModelError> {
        self.store.required("adjustments")
    }

    /// Ordered phases, for plans that change over time.
    pub fn plan_phases(&self) -> Result<Option<Vec<PlanPhase>>, ModelError> {
        self.store.nullable("plan_phases")
    }

    /// The product the plan sells.
    pub fn product(&self) -> Result<ProductRef, ModelError> {
        self.store.required("product")
    }

    /// Trial settings.
    pub fn trial_config(&self) -> Result<TrialConfig, ModelError> {
        self.store.required("trial_config")
    }

    /// Plan-level minimum.
    pub fn minimum(&self) -> Result<Option<Minimum>, ModelError> {
        self.store.nullable("minimum")
    }

    /// Plan-level maximum.
    pub fn maximum(&self) -> Result<Option<Maximum>, ModelError> {
        self.store.nullable("maximum")
    }

    /// Plan-level discount.
    pub fn discount(&self) -> Result<Option<Discount>, ModelError> {
        self.store.nullable("discount")
    }

    /// Caller-defined string metadata.
    pub fn metadata(&self) -> Result<Metadata, ModelError> {
        self.store.required("metadata")
    }
}

impl Model for Plan {
    const NAME: &'static str = "Plan";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::nullable::<String>("external_plan_id"),
        PropertySpec::required::<String>("name"),
        PropertySpec::required::<String>("description"),
        PropertySpec::required::<OpenEnum<PlanStatus>>("status"),
        PropertySpec::required::<String>("currency"),
        PropertySpec::required::<String>("invoicing_currency"),
        PropertySpec::required::<DateTime<Utc>>("created_at"),
        PropertySpec::required::<i64>("version"),
        PropertySpec::nullable::<i64>("net_terms"),
        PropertySpec::nullable::<String>("default_invoice_memo"),
        PropertySpec::required::<Vec<Price>>("prices"),
        PropertySpec::required::<Vec<Adjustment>>("adjustments"),
        PropertySpec::nullable::<Vec<PlanPhase>>("plan_phases"),
        PropertySpec::required::<ProductRef>("product"),
        PropertySpec::required::<TrialConfig>("trial_config"),
        PropertySpec::nullable::<Minimum>("minimum"),
        PropertySpec::nullable::<Maximum>("maximum"),
        PropertySpec::nullable::<Discount>("discount"),
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

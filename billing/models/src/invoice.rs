//! Invoices and their line items.

use billing_core::{
    Amount, EnumCase, Model, ModelError, OpenEnum, PropertySpec, PropertyStore, StringEnum,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::adjustment::Adjustment;
use crate::customer::Address;
use crate::discount::Discount;
use crate::price::Price;
use crate::shared::{CustomerRef, Maximum, Metadata, Minimum, SubscriptionRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum InvoiceStatus {
    /// Finalized and sent.
    Issued,
    /// Fully paid.
    Paid,
    /// Handed to an external accounting system.
    Synced,
    /// Cancelled after issue.
    Void,
    /// Still accumulating charges.
    Draft,
}

impl StringEnum for InvoiceStatus {
    const ENUM_NAME: &'static str = "InvoiceStatus";
}

/// Whether automatic collection is switched on, carried as a JSON boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CollectionState {
    /// Encoded as `true`.
    Enabled,
    /// Encoded as `false`.
    Disabled,
}

impl EnumCase for CollectionState {
    const ENUM_NAME: &'static str = "CollectionState";

    fn from_raw(raw: &Value) -> Option<Self> {
        raw.as_bool()
            .map(|enabled| if enabled { Self::Enabled } else { Self::Disabled })
    }

    fn to_raw(self) -> Value {
        Value::Bool(self == Self::Enabled)
    }
}

// =============================================================================
// Nested records
// =============================================================================

/// Automatic payment collection status of an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutoCollection {
    store: PropertyStore,
}

impl AutoCollection {
    /// Collection switch. `None` when the API leaves it unset.
    pub fn enabled(&self) -> Result<Option<OpenEnum<CollectionState>>, ModelError> {
        self.store.nullable("enabled")
    }

    /// When the next charge attempt is scheduled.
    pub fn next_attempt_at(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("next_attempt_at")
    }

    /// When the last charge attempt ran.
    pub fn previously_attempted_at(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("previously_attempted_at")
    }

    /// Charge attempts made so far.
    pub fn num_attempts(&self) -> Result<Option<i64>, ModelError> {
        self.store.nullable("num_attempts")
    }
}

impl Model for AutoCollection {
    const NAME: &'static str = "AutoCollection";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::nullable::<OpenEnum<CollectionState>>("enabled"),
        PropertySpec::nullable::<DateTime<Utc>>("next_attempt_at"),
        PropertySpec::nullable::<DateTime<Utc>>("previously_attempted_at"),
        PropertySpec::nullable::<i64>("num_attempts"),
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

/// A credit note issued against an invoice, as listed on the invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceCreditNote {
    store: PropertyStore,
}

impl InvoiceCreditNote {
    /// Credit note identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// Human-readable credit note number.
    pub fn credit_note_number(&self) -> Result<String, ModelError> {
        self.store.required("credit_note_number")
    }

    /// Reason text, as recorded on the note.
    pub fn reason(&self) -> Result<String, ModelError> {
        self.store.required("reason")
    }

    /// Credited total.
    pub fn total(&self) -> Result<Amount, ModelError> {
        self.store.required("total")
    }

    /// Free-text memo.
    pub fn memo(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("memo")
    }

    /// When the note was voided, if it was.
    pub fn voided_at(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("voided_at")
    }
}

impl Model for InvoiceCreditNote {
    const NAME: &'static str = "InvoiceCreditNote";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<String>("credit_note_number"),
        PropertySpec::required::<String>("reason"),
        PropertySpec::required::<Amount>("total"),
        PropertySpec::nullable::<String>("memo"),
        PropertySpec::nullable::<DateTime<Utc>>("voided_at"),
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

/// One charge on an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceLineItem {
    store: PropertyStore,
}

impl InvoiceLineItem {
    /// Line identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// Line description.
    pub fn name(&self) -> Result<String, ModelError> {
        self.store.required("name")
    }

    /// Billed quantity.
    pub fn quantity(&self) -> Result<f64, ModelError> {
        self.store.required("quantity")
    }

    /// Total after adjustments.
    pub fn amount(&self) -> Result<Amount, ModelError> {
        self.store.required("amount")
    }

    /// Total before adjustments.
    pub fn subtotal(&self) -> Result<Amount, ModelError> {
        self.store.required("subtotal")
    }

    /// Start of the service period.
    pub fn start_date(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("start_date")
    }

    /// End of the service period.
    pub fn end_date(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("end_date")
    }

    /// Group label used when the line is split by a metric dimension.
    pub fn grouping(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("grouping")
    }

    /// The price that produced the line. Unrecognized price models come back as the unknown arm.
    pub fn price(&self) -> Result<Option<Price>, ModelError> {
        self.store.nullable("price")
    }

    /// Adjustments applied to the line.
    pub fn adjustments(&self) -> Result<Vec<Adjustment>, ModelError> {
        self.store.required("adjustments")
    }

    /// Line-level minimum.
    pub fn minimum(&self) -> Result<Option<Minimum>, ModelError> {
        self.store.nullable("minimum")
    }

    /// Line-level maximum.
    pub fn maximum(&self) -> Result<Option<Maximum>, ModelError> {
        self.store.nullable("maximum")
    }
}

impl Model for InvoiceLineItem {
    const NAME: &'static str = "InvoiceLineItem";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<String>("name"),
        PropertySpec::required::<f64>("quantity"),
        PropertySpec::required::<Amount>("amount"),
        PropertySpec::required::<Amount>("subtotal"),
        PropertySpec::required::<DateTime<Utc>>("start_date"),
        PropertySpec::required::<DateTime<Utc>>("end_date"),
        PropertySpec::nullable::<String>("grouping"),
        PropertySpec::nullable::<Price>("price"),
        PropertySpec::required::<Vec<Adjustment>>("adjustments"),
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
// Invoice
// =============================================================================

/// An invoice issued to a customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Invoice {
    store: PropertyStore,
}

impl Invoice {
    /// Invoice identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// Human-readable invoice number.
    pub fn invoice_number(&self) -> Result<String, ModelError> {
        self.store.required("invoice_number")
    }

    /// Lifecycle state.
    pub fn status(&self) -> Result<OpenEnum<InvoiceStatus>, ModelError> {
        self.store.required("status")
    }

    /// ISO 4217 currency code.
    pub fn currency(&self) -> Result<String, ModelError> {
        self.store.required("currency")
    }

    /// Amount still owed.
    pub fn amount_due(&self) -> Result<Amount, ModelError> {
        self.store.required("amount_due")
    }

    /// Total before tax and invoice-level adjustments.
    pub fn subtotal(&self) -> Result<Amount, ModelError> {
        self.store.required("subtotal")
    }

    /// Final total.
    pub fn total(&self) -> Result<Amount, ModelError> {
        self.store.required("total")
    }

    /// Creation time.
    pub fn created_at(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("created_at")
    }

    /// Date printed on the invoice.
    pub fn invoice_date(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("invoice_date")
    }

    /// Payment deadline, if any.
    pub fn due_date(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("due_date")
    }

    /// When the invoice was issued.
    pub fn issued_at(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("issued_at")
    }

    /// When the invoice was paid.
    pub fn paid_at(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("paid_at")
    }

    /// When the invoice was voided.
    pub fn voided_at(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("voided_at")
    }

    /// The billed customer.
    pub fn customer(&self) -> Result<CustomerRef, ModelError> {
        self.store.required("customer")
    }

    /// Subscription that generated the invoice, if any.
    pub fn subscription(&self) -> Result<Option<SubscriptionRef>, ModelError> {
        self.store.nullable("subscription")
    }

    /// Billed lines.
    pub fn line_items(&self) -> Result<Vec<InvoiceLineItem>, ModelError> {
        self.store.required("line_items")
    }

    /// Invoice-level discounts.
    pub fn discounts(&self) -> Result<Vec<Discount>, ModelError> {
        self.store.required("discounts")
    }

    /// Credit notes issued against this invoice.
    pub fn credit_notes(&self) -> Result<Vec<InvoiceCreditNote>, ModelError> {
        self.store.required("credit_notes")
    }

    /// Automatic collection state.
    pub fn auto_collection(&self) -> Result<AutoCollection, ModelError> {
        self.store.required("auto_collection")
    }

    /// Billing address at issue time.
    pub fn billing_address(&self) -> Result<Option<Address>, ModelError> {
        self.store.nullable("billing_address")
    }

    /// Free-text memo.
    pub fn memo(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("memo")
    }

    /// Link to the hosted payment page.
    pub fn hosted_invoice_url(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("hosted_invoice_url")
    }

    /// Link to the rendered PDF.
    pub fn invoice_pdf(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("invoice_pdf")
    }

    /// Whether a draft will be issued without manual action.
    pub fn will_auto_issue(&self) -> Result<bool, ModelError> {
        self.store.required("will_auto_issue")
    }

    /// Invoice-level minimum.
    pub fn minimum(&self) -> Result<Option<Minimum>, ModelError> {
        self.store.nullable("minimum")
    }

    /// Invoice-level maximum.
    pub fn maximum(&self) -> Result<Option<Maximum>, ModelError> {
        self.store.nullable("maximum")
    }

    /// Caller-defined string metadata.
    pub fn metadata(&self) -> Result<Metadata, ModelError> {
        self.store.required("metadata")
    }

    /// Replaces the memo. `None` writes an explicit `null`.
    pub fn set_memo(&mut self, memo: Option<String>) {
        self.store.put("memo", &memo);
    }

    /// Replaces the metadata.
    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.store.put("metadata", &metadata);
    }
}

impl Model for Invoice {
    const NAME: &'static str = "Invoice";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<String>("invoice_number"),
        PropertySpec::required::<OpenEnum<InvoiceStatus>>("status"),
        PropertySpec::required::<String>("currency"),
        PropertySpec::required::<Amount>("amount_due"),
        PropertySpec::required::<Amount>("subtotal"),
        PropertySpec::required::<Amount>("total"),
        PropertySpec::required::<DateTime<Utc>>("created_at"),
        PropertySpec::required::<DateTime<Utc>>("invoice_date"),
        PropertySpec::nullable::<DateTime<Utc>>("due_date"),
        PropertySpec::nullable::<DateTime<Utc>>("issued_at"),
        PropertySpec::nullable::<DateTime<Utc>>("paid_at"),
        PropertySpec::nullable::<DateTime<Utc>>("voided_at"),
        PropertySpec::required::<CustomerRef>("customer"),
        PropertySpec::nullable::<SubscriptionRef>("subscription"),
        PropertySpec::required::<Vec<InvoiceLineItem>>("line_items"),
        PropertySpec::required::<Vec<Discount>>("discounts"),
        PropertySpec::required::<Vec<InvoiceCreditNote>>("credit_notes"),
        PropertySpec::required::<AutoCollection>("auto_collection"),
        PropertySpec::nullable::<Address>("billing_address"),
        PropertySpec::nullable::<String>("memo"),
        PropertySpec::nullable::<String>("hosted_invoice_url"),
        PropertySpec::nullable::<String>("invoice_pdf"),
        PropertySpec::required::<bool>("will_auto_issue"),
        PropertySpec::nullable::<Minimum>("minimum"),
        PropertySpec::nullable::<Maximum>("maximum"),
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

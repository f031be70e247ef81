//! Credit notes and the credit note creation request body.

use billing_core::{Amount, Model, ModelError, OpenEnum, PropertySpec, PropertyStore, StringEnum};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::discount::DiscountType;
use crate::shared::CustomerRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum CreditNoteType {
    /// Money is returned to the customer.
    Refund,
    /// The invoice balance is reduced.
    Adjustment,
}

impl StringEnum for CreditNoteType {
    const ENUM_NAME: &'static str = "CreditNoteType";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum CreditNoteReason {
    /// The invoice was issued twice.
    Duplicate,
    /// The charge was fraudulent.
    Fraudulent,
    /// The order changed after invoicing.
    OrderChange,
    /// The customer was not satisfied.
    ProductUnsatisfactory,
}

impl StringEnum for CreditNoteReason {
    const ENUM_NAME: &'static str = "CreditNoteReason";
}

// =============================================================================
// Nested records
// =============================================================================

/// Tax charged on a credit note line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxAmount {
    store: PropertyStore,
}

impl TaxAmount {
    /// Tax charged, as decimal text.
    pub fn amount(&self) -> Result<Amount, ModelError> {
        self.store.required("amount")
    }

    /// Human-readable name of the tax rate.
    pub fn tax_rate_description(&self) -> Result<String, ModelError> {
        self.store.required("tax_rate_description")
    }

    /// Rate as decimal text, e.g. `"0.0825"`.
    pub fn tax_rate_percentage(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("tax_rate_percentage")
    }
}

impl Model for TaxAmount {
    const NAME: &'static str = "TaxAmount";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<Amount>("amount"),
        PropertySpec::required::<String>("tax_rate_description"),
        PropertySpec::nullable::<String>("tax_rate_percentage"),
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

/// A discount applied to a credit note or one of its lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditNoteDiscount {
    store: PropertyStore,
}

impl CreditNoteDiscount {
    /// Amount of the discount applied to the credit.
    pub fn amount_applied(&self) -> Result<Amount, ModelError> {
        self.store.required("amount_applied")
    }

    /// Kind of discount applied.
    pub fn discount_type(&self) -> Result<OpenEnum<DiscountType>, ModelError> {
        self.store.required("discount_type")
    }

    /// Fraction removed, for percentage discounts.
    pub fn percentage_discount(&self) -> Result<Option<f64>, ModelError> {
        self.store.nullable("percentage_discount")
    }

    /// Optional note. Absent reads as `None`.
    pub fn reason(&self) -> Result<Option<String>, ModelError> {
        self.store.optional("reason")
    }
}

impl Model for CreditNoteDiscount {
    const NAME: &'static str = "CreditNoteDiscount";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<Amount>("amount_applied"),
        PropertySpec::required::<OpenEnum<DiscountType>>("discount_type"),
        PropertySpec::nullable::<f64>("percentage_discount"),
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

/// One credited line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditNoteLineItem {
    store: PropertyStore,
}

impl CreditNoteLineItem {
    /// Line identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// Line description.
    pub fn name(&self) -> Result<String, ModelError> {
        self.store.required("name")
    }

    /// Item the line credits.
    pub fn item_id(&self) -> Result<String, ModelError> {
        self.store.required("item_id")
    }

    /// Credited amount after discounts.
    pub fn amount(&self) -> Result<Amount, ModelError> {
        self.store.required("amount")
    }

    /// Credited amount before discounts.
    pub fn subtotal(&self) -> Result<Amount, ModelError> {
        self.store.required("subtotal")
    }

    /// Quantity credited, when the line is quantity-based.
    pub fn quantity(&self) -> Result<Option<f64>, ModelError> {
        self.store.nullable("quantity")
    }

    /// Tax credited per rate.
    pub fn tax_amounts(&self) -> Result<Vec<TaxAmount>, ModelError> {
        self.store.required("tax_amounts")
    }

    /// Line-level discounts. Absent on older credit notes.
    pub fn discounts(&self) -> Result<Option<Vec<CreditNoteDiscount>>, ModelError> {
        self.store.optional("discounts")
    }
}

impl Model for CreditNoteLineItem {
    const NAME: &'static str = "CreditNoteLineItem";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<String>("name"),
        PropertySpec::required::<String>("item_id"),
        PropertySpec::required::<Amount>("amount"),
        PropertySpec::required::<Amount>("subtotal"),
        PropertySpec::nullable::<f64>("quantity"),
        PropertySpec::required::<Vec<TaxAmount>>("tax_amounts"),
        PropertySpec::optional::<Vec<CreditNoteDiscount>>("discounts"),
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
// Credit note
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditNote {
    store: PropertyStore,
}

impl CreditNote {
    /// Credit note identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// Creation time.
    pub fn created_at(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("created_at")
    }

    /// Human-readable number printed on the note.
    pub fn credit_note_number(&self) -> Result<String, ModelError> {
        self.store.required("credit_note_number")
    }

    /// Link to the rendered PDF, once available.
    pub fn credit_note_pdf(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("credit_note_pdf")
    }

    /// The credited customer.
    pub fn customer(&self) -> Result<CustomerRef, ModelError> {
        self.store.required("customer")
    }

    /// Invoice the note was issued against.
    pub fn invoice_id(&self) -> Result<String, ModelError> {
        self.store.required("invoice_id")
    }

    /// Credited lines.
    pub fn line_items(&self) -> Result<Vec<CreditNoteLineItem>, ModelError> {
        self.store.required("line_items")
    }

    /// Discount applied when the note reverses a maximum.
    pub fn maximum_amount_adjustment(&self) -> Result<Option<CreditNoteDiscount>, ModelError> {
        self.store.nullable("maximum_amount_adjustment")
    }

    /// Free-text memo.
    pub fn memo(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("memo")
    }

    /// Amount refunded because of a minimum.
    pub fn minimum_amount_refunded(&self) -> Result<Option<Amount>, ModelError> {
        self.store.nullable("minimum_amount_refunded")
    }

    /// Why the note was issued.
    pub fn reason(&self) -> Result<Option<OpenEnum<CreditNoteReason>>, ModelError> {
        self.store.nullable("reason")
    }

    /// Total before tax.
    pub fn subtotal(&self) -> Result<Amount, ModelError> {
        self.store.required("subtotal")
    }

    /// Total including tax.
    pub fn total(&self) -> Result<Amount, ModelError> {
        self.store.required("total")
    }

    /// The `type` property.
    pub fn credit_note_type(&self) -> Result<OpenEnum<CreditNoteType>, ModelError> {
        self.store.required("type")
    }

    /// When the note was voided, if it was.
    pub fn voided_at(&self) -> Result<Option<DateTime<Utc>>, ModelError> {
        self.store.nullable("voided_at")
    }

    /// Discounts applied to the whole note. Only present on newer payloads.
    pub fn discounts(&self) -> Result<Option<Vec<CreditNoteDiscount>>, ModelError> {
        self.store.optional("discounts")
    }
}

impl Model for CreditNote {
    const NAME: &'static str = "CreditNote";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::required::<DateTime<Utc>>("created_at"),
        PropertySpec::required::<String>("credit_note_number"),
        PropertySpec::nullable::<String>("credit_note_pdf"),
        PropertySpec::required::<CustomerRef>("customer"),
        PropertySpec::required::<String>("invoice_id"),
        PropertySpec::required::<Vec<CreditNoteLineItem>>("line_items"),
        PropertySpec::nullable::<CreditNoteDiscount>("maximum_amount_adjustment"),
        PropertySpec::nullable::<String>("memo"),
        PropertySpec::nullable::<Amount>("minimum_amount_refunded"),
        PropertySpec::nullable::<OpenEnum<CreditNoteReason>>("reason"),
        PropertySpec::required::<Amount>("subtotal"),
        PropertySpec::required::<Amount>("total"),
        PropertySpec::required::<OpenEnum<CreditNoteType>>("type"),
        PropertySpec::nullable::<DateTime<Utc>>("voided_at"),
        PropertySpec::optional::<Vec<CreditNoteDiscount>>("discounts"),
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
// Request bodies
// =============================================================================

/// One line of a credit note creation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditNoteLineItemParams {
    store: PropertyStore,
}

impl CreditNoteLineItemParams {
    /// Credits `amount` against one invoice line.
    pub fn new(invoice_line_item_id: impl Into<String>, amount: Amount) -> Self {
        let mut store = PropertyStore::new();
        store.put("invoice_line_item_id", &invoice_line_item_id.into());
        store.put("amount", &amount);
        Self { store }
    }

    /// Invoice line being credited.
    pub fn invoice_line_item_id(&self) -> Result<String, ModelError> {
        self.store.required("invoice_line_item_id")
    }

    /// Amount to credit.
    pub fn amount(&self) -> Result<Amount, ModelError> {
        self.store.required("amount")
    }
}

impl Model for CreditNoteLineItemParams {
    const NAME: &'static str = "CreditNoteLineItemParams";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("invoice_line_item_id"),
        PropertySpec::required::<Amount>("amount"),
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

/// Body of a credit note creation request.
///
/// ## Examples
///
/// ```rust
/// use billing_core::{Amount, Model};
/// use billing_models::{CreditNoteCreateParams, CreditNoteLineItemParams, CreditNoteReason};
///
/// let params = CreditNoteCreateParams::new(
///     vec![CreditNoteLineItemParams::new("li_1", Amount::new("19.99"))],
///     CreditNoteReason::OrderChange,
/// )
/// .with_memo("Downgrade");
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditNoteCreateParams {
    store: PropertyStore,
}

impl CreditNoteCreateParams {
    /// Creates a request crediting `line_items` for `reason`.
    pub fn new(line_items: Vec<CreditNoteLineItemParams>, reason: CreditNoteReason) -> Self {
        let mut store = PropertyStore::new();
        store.put("line_items", &line_items);
        store.put("reason", &OpenEnum::known(reason));
        Self { store }
    }

    /// Lines to credit.
    pub fn line_items(&self) -> Result<Vec<CreditNoteLineItemParams>, ModelError> {
        self.store.required("line_items")
    }

    /// Why the note is issued.
    pub fn reason(&self) -> Result<OpenEnum<CreditNoteReason>, ModelError> {
        self.store.required("reason")
    }

    /// Memo, if one was set.
    pub fn memo(&self) -> Result<Option<String>, ModelError> {
        self.store.optional("memo")
    }

    /// Sets the memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.store.put("memo", &memo.into());
        self
    }

    /// Sets or clears the memo. `None` leaves the key out of the body.
    pub fn set_memo(&mut self, memo: Option<String>) {
        self.store.put_optional("memo", memo.as_ref());
    }
}

impl Model for CreditNoteCreateParams {
    const NAME: &'static str = "CreditNoteCreateParams";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<Vec<CreditNoteLineItemParams>>("line_items"),
        PropertySpec::required::<OpenEnum<CreditNoteReason>>("reason"),
        PropertySpec::optional::<String>("memo"),
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
    use serde_json::{Value, json};

    fn credit_note_json() -> Value {
        json!({
            "id": "cn_1",
            "created_at": "2024-04-02T10:30:00Z",
            "credit_note_number": "CN-0001",
            "credit_note_pdf": null,
            "customer": {"id": "cust_123"},
            "invoice_id": "inv_1",
            "line_items": [{
                "id": "cnli_1",
                "name": "Seats",
                "item_id": "item_seats",
                "amount": "19.99",
                "subtotal": "19.99",
                "quantity": null,
                "tax_amounts": [
                    {"amount": "1.65", "tax_rate_description": "Sales tax", "tax_rate_percentage": "0.0825"}
                ]
            }],
            "maximum_amount_adjustment": null,
            "memo": null,
            "minimum_amount_refunded": null,
            "reason": "order_change",
            "subtotal": "19.99",
            "total": "21.64",
            "type": "refund",
            "voided_at": null
        })
    }

    #[test]
    fn credit_note_decodes() {
        let note = CreditNote::from_json(credit_note_json()).unwrap();
        note.validate().unwrap();

        assert_eq!(note.credit_note_type().unwrap(), CreditNoteType::Refund);
        assert_eq!(note.reason().unwrap().unwrap(), CreditNoteReason::OrderChange);
        assert_eq!(note.discounts().unwrap(), None);

        let line = &note.line_items().unwrap()[0];
        assert_eq!(line.tax_amounts().unwrap()[0].amount().unwrap().as_str(), "1.65");
        assert_eq!(line.discounts().unwrap(), None);
    }

    #[test]
    fn credit_note_round_trip() {
        let mut raw = credit_note_json();
        raw["discounts"] = json!([{
            "amount_applied": "2.00",
            "discount_type": "amount",
            "percentage_discount": null,
            "reason": null
        }]);
        raw["refund_channel"] = json!("card");
        let note = CreditNote::from_json(raw.clone()).unwrap();
        note.validate().unwrap();

        assert_eq!(note.to_json(), raw);
        assert_eq!(CreditNote::from_json(note.to_json()).unwrap(), note);
        assert_eq!(note.additional_properties(), vec![("refund_channel", &raw["refund_channel"])]);

        let discounts = note.discounts().unwrap().unwrap();
        assert_eq!(discounts[0].amount_applied().unwrap().as_str(), "2.00");
        assert_eq!(discounts[0].discount_type().unwrap(), DiscountType::Amount);
    }

    #[test]
    fn credit_note_total_arithmetic() {
        let note = CreditNote::from_json(credit_note_json()).unwrap();
        let line = &note.line_items().unwrap()[0];
        let tax = line.tax_amounts().unwrap()[0].amount().unwrap().to_decimal().unwrap();
        let subtotal = note.subtotal().unwrap().to_decimal().unwrap();

        assert_eq!(subtotal + tax, note.total().unwrap().to_decimal().unwrap());
    }

    #[test]
    fn nested_tax_amount_error_path() {
        let mut raw = credit_note_json();
        raw["line_items"][0]["tax_amounts"][0]["amount"] = json!(true);
        let note = CreditNote::from_json(raw).unwrap();

        let err = note.validate().unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::Decode);
        assert_eq!(err.path(), "line_items[0].tax_amounts[0].amount");
    }

    #[test]
    fn create_params_shape() {
        let mut params = CreditNoteCreateParams::new(
            vec![CreditNoteLineItemParams::new("li_1", Amount::new("5.00"))],
            CreditNoteReason::Duplicate,
        );
        params.set_memo(Some("dup".to_string()));
        params.set_memo(None);

        assert_eq!(
            params.to_json(),
            json!({
                "line_items": [{"invoice_line_item_id": "li_1", "amount": "5.00"}],
                "reason": "duplicate"
            })
        );
        assert!(params.validate().is_ok());
    }
}

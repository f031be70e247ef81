//! Customer records and the customer creation request body.

use billing_core::{Amount, Model, ModelError, OpenEnum, PropertySpec, PropertyStore, StringEnum};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::shared::Metadata;

/// External system that collects payment for a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PaymentProvider {
    /// QuickBooks invoicing.
    Quickbooks,
    /// Bill.com, serialized as `bill.com`.
    #[strum(serialize = "bill.com")]
    BillCom,
    /// Stripe charges against a saved payment method.
    StripeCharge,
    /// Stripe-hosted invoices.
    StripeInvoice,
    /// NetSuite invoicing.
    Netsuite,
}

impl StringEnum for PaymentProvider {
    const ENUM_NAME: &'static str = "PaymentProvider";
}

// =============================================================================
// Address
// =============================================================================

/// A postal address. Every line may be `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address {
    store: PropertyStore,
}

impl Address {
    /// First street line.
    pub fn line1(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("line1")
    }

    /// Second street line.
    pub fn line2(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("line2")
    }

    /// City.
    pub fn city(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("city")
    }

    /// State, province or region.
    pub fn state(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("state")
    }

    /// Postal or ZIP code.
    pub fn postal_code(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("postal_code")
    }

    /// ISO 3166 alpha-2 country code.
    pub fn country(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("country")
    }

    /// Sets the first street line.
    pub fn with_line1(mut self, line1: impl Into<String>) -> Self {
        self.store.put("line1", &line1.into());
        self
    }

    /// Sets the second street line.
    pub fn with_line2(mut self, line2: Option<String>) -> Self {
        self.store.put("line2", &line2);
        self
    }

    /// Sets the city.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.store.put("city", &city.into());
        self
    }

    /// Sets the state, province or region.
    pub fn with_state(mut self, state: Option<String>) -> Self {
        self.store.put("state", &state);
        self
    }

    /// Sets the postal code.
    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.store.put("postal_code", &postal_code.into());
        self
    }

    /// Sets the country code.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.store.put("country", &country.into());
        self
    }
}

impl Model for Address {
    const NAME: &'static str = "Address";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::nullable::<String>("line1"),
        PropertySpec::nullable::<String>("line2"),
        PropertySpec::nullable::<String>("city"),
        PropertySpec::nullable::<String>("state"),
        PropertySpec::nullable::<String>("postal_code"),
        PropertySpec::nullable::<String>("country"),
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
// Customer
// =============================================================================

/// A customer as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Customer {
    store: PropertyStore,
}

impl Customer {
    /// Customer identifier.
    pub fn id(&self) -> Result<String, ModelError> {
        self.store.required("id")
    }

    /// Identifier in the caller's own system, if set.
    pub fn external_customer_id(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("external_customer_id")
    }

    /// Display name.
    pub fn name(&self) -> Result<String, ModelError> {
        self.store.required("name")
    }

    /// Primary billing email.
    pub fn email(&self) -> Result<String, ModelError> {
        self.store.required("email")
    }

    /// Extra addresses copied on invoices.
    pub fn additional_emails(&self) -> Result<Vec<String>, ModelError> {
        self.store.required("additional_emails")
    }

    /// Currency the customer is billed in, if set.
    pub fn currency(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("currency")
    }

    /// Current balance, negative when the customer holds credit.
    pub fn balance(&self) -> Result<Amount, ModelError> {
        self.store.required("balance")
    }

    /// Creation time.
    pub fn created_at(&self) -> Result<DateTime<Utc>, ModelError> {
        self.store.required("created_at")
    }

    /// IANA timezone used for billing periods.
    pub fn timezone(&self) -> Result<String, ModelError> {
        self.store.required("timezone")
    }

    /// Whether invoices are charged automatically.
    pub fn auto_collection(&self) -> Result<bool, ModelError> {
        self.store.required("auto_collection")
    }

    /// Whether invoices are emailed.
    pub fn email_delivery(&self) -> Result<bool, ModelError> {
        self.store.required("email_delivery")
    }

    /// Provider that collects payment. Unrecognized providers are kept and fail validation.
    pub fn payment_provider(&self) -> Result<Option<OpenEnum<PaymentProvider>>, ModelError> {
        self.store.nullable("payment_provider")
    }

    /// The customer's identifier at the payment provider.
    pub fn payment_provider_id(&self) -> Result<Option<String>, ModelError> {
        self.store.nullable("payment_provider_id")
    }

    /// Billing address.
    pub fn billing_address(&self) -> Result<Option<Address>, ModelError> {
        self.store.nullable("billing_address")
    }

    /// Shipping address.
    pub fn shipping_address(&self) -> Result<Option<Address>, ModelError> {
        self.store.nullable("shipping_address")
    }

    /// Self-service portal link. Absent and `null` both read as `None`.
    pub fn portal_url(&self) -> Result<Option<String>, ModelError> {
        self.store.optional("portal_url")
    }

    /// Caller-defined string metadata.
    pub fn metadata(&self) -> Result<Metadata, ModelError> {
        self.store.required("metadata")
    }

    /// Replaces the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.store.put("name", &name.into());
    }

    /// Replaces the primary billing email.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.store.put("email", &email.into());
    }

    /// Replaces the metadata.
    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.store.put("metadata", &metadata);
    }
}

impl Model for Customer {
    const NAME: &'static str = "Customer";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("id"),
        PropertySpec::nullable::<String>("external_customer_id"),
        PropertySpec::required::<String>("name"),
        PropertySpec::required::<String>("email"),
        PropertySpec::required::<Vec<String>>("additional_emails"),
        PropertySpec::nullable::<String>("currency"),
        PropertySpec::required::<Amount>("balance"),
        PropertySpec::required::<DateTime<Utc>>("created_at"),
        PropertySpec::required::<String>("timezone"),
        PropertySpec::required::<bool>("auto_collection"),
        PropertySpec::required::<bool>("email_delivery"),
        PropertySpec::nullable::<OpenEnum<PaymentProvider>>("payment_provider"),
        PropertySpec::nullable::<String>("payment_provider_id"),
        PropertySpec::nullable::<Address>("billing_address"),
        PropertySpec::nullable::<Address>("shipping_address"),
        PropertySpec::null_when_absent::<String>("portal_url"),
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

// =============================================================================
// Request bodies
// =============================================================================

/// Body of a customer creation request.
///
/// ## Examples
///
/// ```rust
/// use billing_core::Model;
/// use billing_models::{CustomerCreateParams, PaymentProvider};
/// use serde_json::json;
///
/// let params = CustomerCreateParams::new("billing@acme.test", "Acme")
///     .with_payment_provider(PaymentProvider::StripeCharge);
/// assert!(params.validate().is_ok());
/// assert_eq!(params.to_json()["payment_provider"], json!("stripe_charge"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerCreateParams {
    store: PropertyStore,
}

impl CustomerCreateParams {
    /// Creates a request with the two required fields.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        let mut store = PropertyStore::new();
        store.put("email", &email.into());
        store.put("name", &name.into());
        Self { store }
    }

    /// Primary billing email.
    pub fn email(&self) -> Result<String, ModelError> {
        self.store.required("email")
    }

    /// Display name.
    pub fn name(&self) -> Result<String, ModelError> {
        self.store.required("name")
    }

    /// External identifier, if one was set.
    pub fn external_customer_id(&self) -> Result<Option<String>, ModelError> {
        self.store.optional("external_customer_id")
    }

    /// Billing currency, if one was set.
    pub fn currency(&self) -> Result<Option<String>, ModelError> {
        self.store.optional("currency")
    }

    /// Payment provider, if one was set.
    pub fn payment_provider(&self) -> Result<Option<OpenEnum<PaymentProvider>>, ModelError> {
        self.store.optional("payment_provider")
    }

    /// Links the customer to an identifier in the caller's system.
    pub fn with_external_customer_id(mut self, id: impl Into<String>) -> Self {
        self.store.put("external_customer_id", &id.into());
        self
    }

    /// Sets the billing currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.store.put("currency", &currency.into());
        self
    }

    /// Sets the IANA timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.store.put("timezone", &timezone.into());
        self
    }

    /// Sets the payment provider.
    pub fn with_payment_provider(mut self, provider: PaymentProvider) -> Self {
        self.store.put("payment_provider", &OpenEnum::known(provider));
        self
    }

    /// Sets the identifier at the payment provider.
    pub fn with_payment_provider_id(mut self, id: impl Into<String>) -> Self {
        self.store.put("payment_provider_id", &id.into());
        self
    }

    /// Sets the billing address.
    pub fn with_billing_address(mut self, address: Address) -> Self {
        self.store.put("billing_address", &address);
        self
    }

    /// Turns automatic collection on or off.
    pub fn with_auto_collection(mut self, enabled: bool) -> Self {
        self.store.put("auto_collection", &enabled);
        self
    }

    /// Sets or clears the metadata. `None` leaves the key out of the body.
    pub fn set_metadata(&mut self, metadata: Option<Metadata>) {
        self.store.put_optional("metadata", metadata.as_ref());
    }
}

impl Model for CustomerCreateParams {
    const NAME: &'static str = "CustomerCreateParams";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required::<String>("email"),
        PropertySpec::required::<String>("name"),
        PropertySpec::optional::<String>("external_customer_id"),
        PropertySpec::optional::<String>("currency"),
        PropertySpec::optional::<String>("timezone"),
        PropertySpec::optional::<OpenEnum<PaymentProvider>>("payment_provider"),
        PropertySpec::optional::<String>("payment_provider_id"),
        PropertySpec::optional::<Address>("billing_address"),
        PropertySpec::optional::<bool>("auto_collection"),
        PropertySpec::optional::<Metadata>("metadata"),
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

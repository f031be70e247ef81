//! Billing API records.
//!
//! Concrete models built on the primitives from `billing-core`. Each
//! resource lives in its own module; the tagged unions ([`Discount`],
//! [`Adjustment`], [`Price`], [`DiscountInterval`]) dispatch on their
//! discriminator property.
//!
//! ## Examples
//!
//! ```
//! use billing_core::{Model, TaggedUnion};
//! use billing_models::{Discount, Invoice};
//! use serde_json::json;
//!
//! let discount = Discount::from_json(&json!({
//!     "discount_type": "percentage",
//!     "applies_to_price_ids": ["price_1"],
//!     "percentage_discount": 0.1
//! }))
//! .unwrap();
//! assert!(matches!(discount, Discount::Percentage(_)));
//!
//! // Construction is lazy; only validation requires every property.
//! let invoice = Invoice::from_json(json!({"id": "inv_1"})).unwrap();
//! assert_eq!(invoice.id().unwrap(), "inv_1");
//! assert!(invoice.validate().is_err());
//! ```

pub mod adjustment;
pub mod credit_note;
pub mod customer;
pub mod discount;
pub mod invoice;
pub mod plan;
pub mod prelude;
pub mod price;
pub mod shared;
pub mod subscription;

pub use adjustment::{
    Adjustment, AdjustmentFields, AdjustmentType, AmountDiscountAdjustment, MaximumAdjustment,
    MinimumAdjustment, PercentageDiscountAdjustment, UsageDiscountAdjustment,
};
pub use credit_note::{
    CreditNote, CreditNoteCreateParams, CreditNoteDiscount, CreditNoteLineItem,
    CreditNoteLineItemParams, CreditNoteReason, CreditNoteType, TaxAmount,
};
pub use customer::{Address, Customer, CustomerCreateParams, PaymentProvider};
pub use discount::{
    AmountDiscount, Discount, DiscountType, PercentageDiscount, TrialDiscount, UsageDiscount,
};
pub use invoice::{
    AutoCollection, CollectionState, Invoice, InvoiceCreditNote, InvoiceLineItem, InvoiceStatus,
};
pub use plan::{DurationUnit, Plan, PlanPhase, PlanStatus, ProductRef, TrialConfig, TrialPeriodUnit};
pub use price::{
    Cadence, PackageConfig, PackagePrice, Price, PriceFields, PriceModelType, PriceType, Tier,
    TieredConfig, TieredPrice, UnitConfig, UnitPrice,
};
pub use shared::{BillableMetricRef, CustomerRef, ItemRef, Maximum, Metadata, Minimum, SubscriptionRef};
pub use subscription::{
    AdjustmentInterval, AmountDiscountInterval, DiscountInterval, FixedFeeQuantityTransition,
    PercentageDiscountInterval, Subscription, SubscriptionStatus, TrialInfo, UsageDiscountInterval,
};

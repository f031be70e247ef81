//! Convenient re-exports for working with billing records.
//!
//! Brings the record types and the core traits needed to call their
//! provided methods into scope.
//!
//! ## Examples
//!
//! ```
//! use billing_models::prelude::*;
//! use serde_json::json;
//!
//! let customer = CustomerRef::from_json(json!({"id": "cust_123"})).unwrap();
//! assert!(customer.is_valid());
//! ```

// Core traits and primitives
pub use billing_core::{Amount, Model, ModelError, OpenEnum, PropertyValue, TaggedUnion};

// Records
pub use crate::{
    Adjustment, AdjustmentFields, CreditNote, CreditNoteCreateParams, Customer,
    CustomerCreateParams, CustomerRef, Discount, DiscountInterval, Invoice, Metadata, Plan, Price,
    PriceFields, Subscription,
};

//! Typed JSON model layer for the billing API client.
//!
//! Every record exchanged with the API is a [`Model`]: a [`PropertyStore`]
//! holding the raw JSON properties, with typed accessors that decode on read
//! and encode on write. Nothing is checked at construction time;
//! [`Model::validate`] walks the declared properties on demand.
//!
//! ## Building blocks
//!
//! | Type | Role |
//! |------|------|
//! | [`PropertyStore`] | Insertion-ordered raw properties, including undeclared ones |
//! | [`PropertyValue`] | Scalar codec between JSON nodes and Rust values |
//! | [`Amount`] | Monetary value carried as exact decimal text |
//! | [`OpenEnum`] | Enumeration that tolerates values added later |
//! | [`Model`] | Base contract with lazy validation |
//! | [`TaggedUnion`] | Discriminator-driven variant selection with a fallback arm |
//! | [`wire`] | Body parsing and encoding for transports |
//!
//! ## Example
//!
//! ```rust
//! use billing_core::{PropertyStore, PropertyValue};
//! use serde_json::json;
//!
//! let store = PropertyStore::from_value(json!({"id": "cust_123", "future_field": [1, 2]})).unwrap();
//! assert_eq!(store.required::<String>("id").unwrap(), "cust_123");
//! assert_eq!(store.to_value(), json!({"id": "cust_123", "future_field": [1, 2]}));
//! assert_eq!(String::decode(&json!("x")).unwrap().encode(), json!("x"));
//! ```

pub mod amount;
pub mod codec;
pub mod enums;
pub mod error;
pub mod model;
pub mod store;
pub mod union;
pub mod wire;

pub use amount::Amount;
pub use codec::PropertyValue;
pub use enums::{EnumCase, OpenEnum, StringEnum};
pub use error::{json_kind, DecodeError, ModelError, ModelErrorKind};
pub use model::{Model, PropertySpec, Requirement};
pub use store::PropertyStore;
pub use union::{decode_union, decode_union_with, TaggedUnion, UnionPolicy, UnknownVariant, Variant};
pub use wire::{encode_body, JsonFormat, ResponseFormat, ValidatedJsonFormat};

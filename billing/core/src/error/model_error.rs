//! Top-level model error type.

use serde_json::Value;
use strum::Display;
use thiserror::Error;

use super::DecodeError;

/// Error raised while decoding or validating a model, enum or union.
///
/// Property-level failures are lazy: they surface when the property is read
/// or when `validate()` walks the model. Failures inside nested values are
/// wrapped in [`ModelError::Property`] and [`ModelError::Element`] so the
/// location can be reported with [`ModelError::path`], while
/// [`ModelError::kind`] and [`ModelError::root_cause`] look through the
/// wrappers.
///
/// ## Examples
///
/// ```rust
/// use billing_core::{ModelError, ModelErrorKind};
///
/// let err = ModelError::missing("id").in_property("customer");
/// assert_eq!(err.kind(), ModelErrorKind::MissingRequiredProperty);
/// assert_eq!(err.path(), "customer.id");
/// ```
#[derive(Debug, Error)]
pub enum ModelError {
    /// A required property's key is absent from the store.
    #[error("missing required property `{property}`")]
    MissingRequiredProperty {
        /// The JSON name of the property.
        property: String,
    },

    /// A present value has the wrong shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An open enum holds a value outside its known cases.
    #[error("invalid {enum_name} value {value}")]
    InvalidEnumValue {
        /// Name of the enum type.
        enum_name: &'static str,
        /// The raw value, rendered as JSON.
        value: String,
    },

    /// A strict union could not select a variant.
    #[error("no {union} variant for {discriminator} = {}", describe_tag(.value))]
    NoMatchingVariant {
        /// Name of the union type.
        union: &'static str,
        /// The discriminator property.
        discriminator: &'static str,
        /// The discriminator literal, if one was present.
        value: Option<String>,
    },

    /// A strict union selected a variant that then failed to decode.
    #[error("{union} variant `{variant}` failed: {}", join_causes(.causes))]
    AggregateDecodeFailure {
        /// Name of the union type.
        union: &'static str,
        /// The selected discriminator literal.
        variant: String,
        /// The variant's own errors.
        causes: Vec<ModelError>,
    },

    /// Context wrapper: the error occurred inside a named property.
    #[error("in `{name}`: {source}")]
    Property {
        /// The JSON name of the property.
        name: String,
        /// The underlying error.
        source: Box<ModelError>,
    },

    /// Context wrapper: the error occurred inside a list element.
    #[error("at index {index}: {source}")]
    Element {
        /// Position in the list.
        index: usize,
        /// The underlying error.
        source: Box<ModelError>,
    },

    /// The input bytes were not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Classification of a [`ModelError`], ignoring context wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ModelErrorKind {
    /// See [`ModelError::MissingRequiredProperty`].
    MissingRequiredProperty,
    /// See [`ModelError::Decode`].
    Decode,
    /// See [`ModelError::InvalidEnumValue`].
    InvalidEnumValue,
    /// See [`ModelError::NoMatchingVariant`].
    NoMatchingVariant,
    /// See [`ModelError::AggregateDecodeFailure`].
    AggregateDecodeFailure,
    /// See [`ModelError::Json`].
    Json,
}

impl ModelError {
    /// Creates a missing property error.
    pub fn missing(property: impl Into<String>) -> Self {
        Self::MissingRequiredProperty {
            property: property.into(),
        }
    }

    /// Creates an invalid enum value error for a raw node.
    pub fn invalid_enum(enum_name: &'static str, raw: &Value) -> Self {
        Self::InvalidEnumValue {
            enum_name,
            value: raw.to_string(),
        }
    }

    /// Wraps this error with the property it occurred in.
    pub fn in_property(self, name: impl Into<String>) -> Self {
        Self::Property {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Wraps this error with the list position it occurred at.
    pub fn at_index(self, index: usize) -> Self {
        Self::Element {
            index,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping context wrappers.
    pub fn root_cause(&self) -> &ModelError {
        let mut current = self;
        while let Self::Property { source, .. } | Self::Element { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// Returns the classification of the innermost error.
    pub fn kind(&self) -> ModelErrorKind {
        match self.root_cause() {
            Self::MissingRequiredProperty { .. } => ModelErrorKind::MissingRequiredProperty,
            Self::Decode(_) => ModelErrorKind::Decode,
            Self::InvalidEnumValue { .. } => ModelErrorKind::InvalidEnumValue,
            Self::NoMatchingVariant { .. } => ModelErrorKind::NoMatchingVariant,
            Self::AggregateDecodeFailure { .. } => ModelErrorKind::AggregateDecodeFailure,
            Self::Json(_) => ModelErrorKind::Json,
            Self::Property { .. } | Self::Element { .. } => {
                unreachable!("root_cause skips context wrappers")
            }
        }
    }

    /// Renders the location of the error as a property path.
    ///
    /// A missing property contributes its own name, so a missing
    /// `percentage_discount` inside `discount` renders as
    /// `discount.percentage_discount`. A union failure with a single cause
    /// continues into that cause. Returns an empty string for errors without
    /// location.
    pub fn path(&self) -> String {
        let mut path = String::new();
        let mut current = self;
        loop {
            match current {
                Self::Property { name, source } => {
                    push_segment(&mut path, name);
                    current = source.as_ref();
                }
                Self::Element { index, source } => {
                    path.push_str(&format!("[{index}]"));
                    current = source.as_ref();
                }
                Self::AggregateDecodeFailure { causes, .. } if causes.len() == 1 => {
                    current = &causes[0];
                }
                Self::MissingRequiredProperty { property } => {
                    push_segment(&mut path, property);
                    break;
                }
                _ => break,
            }
        }
        path
    }

    /// Returns `true` if the innermost error is a missing property.
    pub fn is_missing_property(&self) -> bool {
        self.kind() == ModelErrorKind::MissingRequiredProperty
    }
}

fn push_segment(path: &mut String, name: &str) {
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(name);
}

fn describe_tag(value: &Option<String>) -> String {
    match value {
        Some(tag) => format!("`{tag}`"),
        None => "<absent>".to_string(),
    }
}

fn join_causes(causes: &[ModelError]) -> String {
    causes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

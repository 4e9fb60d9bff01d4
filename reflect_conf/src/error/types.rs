//! Error enums for each stage of a population pass.

use thiserror::Error;

use super::FieldContext;
use crate::kind::{FieldType, ScalarKind};

/// Result alias used by the population entry points.
pub type ReflectConfResult<T> = Result<T, ReflectConfError>;

/// Failure of a population call.
///
/// Every variant aborts the call. Fields written before the failing field
/// keep their new values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReflectConfError {
    /// No conversion function could be selected for the field.
    #[error("failed to resolve rule for {context}: {source}")]
    Resolve {
        /// Field being populated.
        context: Box<FieldContext>,
        /// Reason the rule was rejected.
        #[source]
        source: ResolveError,
    },

    /// The selected conversion function rejected the raw value.
    #[error("failed to convert value for {context}: {source}")]
    Convert {
        /// Field being populated.
        context: Box<FieldContext>,
        /// Error reported by the conversion function.
        #[source]
        source: ConvertError,
    },

    /// The converted value does not fit the field.
    #[error("converted value does not fit {context}: {source}")]
    Shape {
        /// Field being populated.
        context: Box<FieldContext>,
        /// Expected and actual shapes.
        #[source]
        source: ShapeError,
    },
}

impl ReflectConfError {
    /// Context of the field that failed.
    #[must_use]
    pub fn context(&self) -> &FieldContext {
        match self {
            Self::Resolve { context, .. }
            | Self::Convert { context, .. }
            | Self::Shape { context, .. } => context,
        }
    }
}

/// Reasons a rule name cannot be matched to a field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    /// The rule name is neither built in nor registered.
    #[error("no such rule: `{0}`")]
    UnknownRule(String),

    /// The rule's result type cannot populate the field.
    #[error("rule is not compatible with field type `{field_type}`")]
    Incompatible {
        /// Declared type of the field.
        field_type: FieldType,
    },

    /// A shape-parametric rule cannot specialise to the field's element kind.
    #[error("`{found}` is not supported by rule `{rule}`")]
    UnsupportedKind {
        /// Canonical rule name.
        rule: String,
        /// Declared type or element kind that was rejected.
        found: String,
    },
}

/// Failure of a conversion function on a raw value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConvertError {
    /// The raw text is not a valid scalar of the target kind.
    #[error("invalid {kind} value `{raw}`")]
    InvalidScalar {
        /// Target scalar kind.
        kind: ScalarKind,
        /// Rejected text.
        raw: String,
    },

    /// Error raised by a caller-registered rule.
    #[error("{0}")]
    Custom(String),
}

impl ConvertError {
    /// Construct a [`ConvertError::Custom`] from any displayable message.
    #[must_use]
    pub fn custom(message: impl std::fmt::Display) -> Self {
        Self::Custom(message.to_string())
    }
}

/// A converted value whose shape or kinds differ from the destination.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("expected `{expected}`, found `{found}`")]
pub struct ShapeError {
    /// Declared type of the destination.
    pub expected: FieldType,
    /// Description of the value that was produced.
    pub found: String,
}

/// Failures registering custom rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// The name belongs to the built-in catalogue.
    #[error("rule name `{0}` is reserved by the built-in catalogue")]
    Reserved(String),

    /// Rule names must be non-empty and free of surrounding whitespace.
    #[error("invalid rule name `{0}`")]
    InvalidName(String),
}

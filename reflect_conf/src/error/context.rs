//! Diagnostic context attached to field-level failures.

use std::fmt;

use crate::kind::FieldType;
use crate::layer::SourceOrigin;

/// Everything known about the field whose population failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldContext {
    /// Name of the record type.
    pub record: &'static str,
    /// Name of the field.
    pub field: &'static str,
    /// Raw annotation attached to the field.
    pub tag: String,
    /// Rule name taken from the annotation.
    pub rule: String,
    /// Trimmed raw value handed to the conversion function.
    pub raw: String,
    /// Declared type of the field.
    pub field_type: FieldType,
    /// Layer that supplied the raw value. `None` when the value came from
    /// the annotation's default or the sources carry no provenance.
    pub origin: Option<SourceOrigin>,
}

impl fmt::Display for FieldContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}.{}` (type `{}`, rule `{}`, value `{}`, tag `{}`)",
            self.record, self.field, self.field_type, self.rule, self.raw, self.tag
        )?;
        match &self.origin {
            Some(origin) => write!(f, " from {origin}"),
            None => Ok(()),
        }
    }
}

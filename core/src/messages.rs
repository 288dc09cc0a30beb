//! Error kinds and message templates.
//!
//! Every validation failure has an [`ErrorKind`] whose [`key`](ErrorKind::key)
//! (e.g. `any.required`, `boolean.base`) selects a custom template when the
//! field rule declares one. Templates may reference `{{#label}}` (the quoted
//! field name) and `{{#key}}` (the bare name).

use std::fmt;

use crate::FieldType;

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required field is absent.
    Required,
    /// A forbidden field is present.
    Forbidden,
    /// A value has the wrong type.
    InvalidType(FieldType),
    /// The input carries a key the schema does not declare.
    UnknownKey,
    /// An external check failed or timed out.
    External,
}

impl ErrorKind {
    /// Returns the key used to look up custom message templates.
    ///
    /// # Examples
    ///
    /// ```
    /// use option_schema_core::{ErrorKind, FieldType};
    ///
    /// assert_eq!(ErrorKind::Required.key(), "any.required");
    /// assert_eq!(ErrorKind::InvalidType(FieldType::Boolean).key(), "boolean.base");
    /// ```
    pub fn key(&self) -> String {
        match self {
            Self::Required => "any.required".to_string(),
            Self::Forbidden => "any.unknown".to_string(),
            Self::InvalidType(ty) => format!("{ty}.base"),
            Self::UnknownKey => "object.unknown".to_string(),
            Self::External => "any.external".to_string(),
        }
    }

    /// Built-in template for this kind.
    pub(crate) fn default_template(&self) -> &'static str {
        match self {
            Self::Required => "{{#label}} is required",
            Self::Forbidden => "{{#label}} is no longer supported",
            Self::InvalidType(FieldType::Boolean) => "{{#label}} must be a boolean",
            Self::InvalidType(FieldType::String) => "{{#label}} must be a string",
            Self::InvalidType(FieldType::Number) => "{{#label}} must be a number",
            Self::InvalidType(FieldType::Object) => "{{#label}} must be of type object",
            Self::InvalidType(FieldType::Array) => "{{#label}} must be an array",
            Self::UnknownKey => "{{#label}} is not allowed",
            Self::External => "{{#label}} failed external validation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Substitutes `{{#label}}` and `{{#key}}` in `template`.
pub(crate) fn render(template: &str, field: &str) -> String {
    template
        .replace("{{#label}}", &format!("\"{field}\""))
        .replace("{{#key}}", field)
}

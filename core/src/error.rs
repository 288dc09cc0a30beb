//! Schema construction errors.
//!
//! A [`ConfigError`] means the schema itself is malformed. It is raised when
//! the schema is built, never while validating input; bad input is reported
//! through [`ValidationResult`](crate::ValidationResult) instead.

use thiserror::Error;

use crate::FieldType;

/// Errors raised while defining field rules or assembling a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `required` was combined with a default value.
    #[error("a required field cannot declare a default value")]
    RequiredWithDefault,
    /// `required` was combined with `forbidden`.
    #[error("a field cannot be both required and forbidden")]
    RequiredAndForbidden,
    /// `forbidden` was combined with a default value.
    #[error("a forbidden field cannot declare a default value")]
    ForbiddenWithDefault,
    /// The default value is not of the declared type.
    #[error("default value must be a {expected}")]
    DefaultTypeMismatch { expected: FieldType },
    /// A field name is empty or whitespace-only.
    #[error("field name cannot be empty")]
    EmptyFieldName,
    /// Two fields in the same schema share a name.
    #[error("duplicate field in schema: {0}")]
    DuplicateField(String),
    /// A rule error, attributed to the field it was declared for.
    #[error("invalid field \"{name}\": {source}")]
    Field {
        name: String,
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attributes this error to `name` unless it already names a field.
    pub(crate) fn for_field(self, name: &str) -> Self {
        match self {
            Self::Field { .. } | Self::DuplicateField(_) | Self::EmptyFieldName => self,
            other => Self::Field {
                name: name.to_string(),
                source: Box::new(other),
            },
        }
    }
}

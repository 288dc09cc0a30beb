//! Declarative option schemas and validation for plugin configuration.
//!
//! Plugins describe the options they accept; the host validates whatever the
//! user configured against that description before running the plugin.
//!
//! - [`FieldRule`] — one option: type, required/optional, default, forbidden
//!   (deprecated), custom messages, and an optional asynchronous
//!   [`ExternalCheck`].
//! - [`ObjectSchema`] — ordered field rules plus an [`UnknownFieldPolicy`].
//! - [`validate`] / [`validate_with`] — evaluate a schema against an input
//!   record, producing a [`ValidationResult`] with either the normalized
//!   record or the ordered error messages.
//! - [`test_schema`] — the helper plugin test suites call.
//!
//! Construction mistakes (e.g. a field that is both required and has a
//! default) surface immediately as [`ConfigError`]; bad input never does.
//!
//! # Example
//!
//! ```
//! use option_schema_core::*;
//! use serde_json::json;
//!
//! let schema = ObjectSchema::builder()
//!     .field("optionA", FieldType::Boolean, FieldOptions::default().required())
//!     .field("message", FieldType::String, FieldOptions::default().required())
//!     .field("optionB", FieldType::Boolean, FieldOptions::default())
//!     .build()
//!     .unwrap();
//!
//! let input = json!({ "message": 123, "optionB": "not a boolean" });
//! let result = resolve(&schema, input.as_object().unwrap());
//! assert_eq!(
//!     result.errors(),
//!     [
//!         "\"optionA\" is required",
//!         "\"message\" must be a string",
//!         "\"optionB\" must be a boolean",
//!     ]
//! );
//! ```

mod builder;
mod describe;
mod error;
mod external;
mod harness;
mod merge;
mod messages;
mod types;
mod validate;

pub use builder::{ObjectSchemaBuilder, SchemaPrimitives, define_field, define_object};
pub use describe::{DESCRIPTION_FORMAT_VERSION, FieldDescription, SchemaDescription};
pub use error::ConfigError;
pub use external::{CheckContext, CheckFuture, ExternalCheck};
pub use harness::{TestOutcome, test_schema, test_schema_with};
pub use merge::{MergeStrategy, merge_schemas};
pub use messages::ErrorKind;
pub use types::*;
pub use validate::{
    ValidateOptions, ValidationIssue, ValidationResult, resolve, validate, validate_with,
};

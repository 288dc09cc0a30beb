//! Test helper for plugin option schemas.
//!
//! [`test_schema`] is the entry point plugin test suites depend on: it
//! injects [`SchemaPrimitives`] into the plugin's schema function, validates
//! the given options, and exposes only the validity flag and error strings.
//!
//! ```
//! use option_schema_core::*;
//! use serde_json::json;
//!
//! fn plugin_options_schema(s: &SchemaPrimitives) -> Result<ObjectSchema, ConfigError> {
//!     s.schema([
//!         ("optionA", s.boolean(FieldOptions::default().required())?),
//!         ("message", s.string(FieldOptions::default().required())?),
//!         ("optionB", s.boolean(FieldOptions::default())?),
//!     ])
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let outcome = test_schema(plugin_options_schema, json!({
//!     "optionA": false,
//!     "message": "string",
//!     "optionB": true,
//! }))
//! .await
//! .unwrap();
//! assert!(outcome.is_valid);
//! assert!(outcome.errors.is_empty());
//! # });
//! ```

use serde_json::Value;

use crate::{ConfigError, ObjectSchema, SchemaPrimitives, ValidateOptions, validate_with};

/// What [`test_schema`] reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Builds the schema with `factory` and validates `input` against it.
///
/// A non-object `input` is reported as a validation error, not a panic.
///
/// # Errors
///
/// Returns the factory's [`ConfigError`] if the schema itself is malformed.
pub async fn test_schema<F>(factory: F, input: Value) -> Result<TestOutcome, ConfigError>
where
    F: FnOnce(&SchemaPrimitives) -> Result<ObjectSchema, ConfigError>,
{
    test_schema_with(factory, input, &ValidateOptions::default()).await
}

/// Like [`test_schema`], with explicit [`ValidateOptions`].
pub async fn test_schema_with<F>(
    factory: F,
    input: Value,
    options: &ValidateOptions,
) -> Result<TestOutcome, ConfigError>
where
    F: FnOnce(&SchemaPrimitives) -> Result<ObjectSchema, ConfigError>,
{
    let schema = factory(&SchemaPrimitives)?;

    let Value::Object(record) = input else {
        return Ok(TestOutcome {
            is_valid: false,
            errors: vec!["\"value\" must be of type object".to_string()],
        });
    };

    let result = validate_with(&schema, &record, options).await;
    Ok(TestOutcome {
        is_valid: result.is_valid(),
        errors: result.errors().into_iter().map(String::from).collect(),
    })
}

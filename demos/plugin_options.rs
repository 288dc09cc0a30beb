//! Plugin options schema example.
//!
//! Declares the options of a fictional plugin the way a plugin author would,
//! then runs the test helper against a valid and an invalid configuration.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p option-schema-demos --example plugin_options
//! ```

use option_schema_core::{
    ConfigError, FieldOptions, ObjectSchema, SchemaPrimitives, test_schema,
};
use serde_json::json;

fn plugin_options_schema(s: &SchemaPrimitives) -> Result<ObjectSchema, ConfigError> {
    s.schema([
        (
            "optionA",
            s.boolean(
                FieldOptions::default()
                    .required()
                    .with_description("Enables the optionA behaviour"),
            )?,
        ),
        (
            "message",
            s.string(
                FieldOptions::default()
                    .with_default("default message")
                    .with_description("Message printed during the build"),
            )?,
        ),
        ("optionB", s.boolean(FieldOptions::default())?),
        (
            "legacyMode",
            s.boolean(
                FieldOptions::default()
                    .forbidden()
                    .with_message("any.unknown", "legacyMode was removed, use optionB instead"),
            )?,
        ),
    ])
}

#[tokio::main]
async fn main() -> Result<(), ConfigError> {
    let cases = [
        json!({ "optionA": true }),
        json!({ "optionA": false, "message": "hello", "optionB": true }),
        json!({ "message": 123, "optionB": "yes", "legacyMode": true }),
    ];

    for input in cases {
        println!("options: {input}");
        let outcome = test_schema(plugin_options_schema, input).await?;
        if outcome.is_valid {
            println!("  valid");
        } else {
            for error in &outcome.errors {
                println!("  error: {error}");
            }
        }
    }

    let schema = plugin_options_schema(&SchemaPrimitives)?;
    let description = schema.describe();
    println!("\ndeclared options:");
    for field in &description.fields {
        println!(
            "  {:<12} {:<8} {}",
            field.name,
            field.field_type,
            field.description.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

//! External check example.
//!
//! Attaches an asynchronous credential check to an `apiKey` option. The
//! check only runs once every synchronous rule has passed, and a per-check
//! timeout turns a hung endpoint into an ordinary validation error.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p option-schema-demos --example external_check
//! ```

use std::time::Duration;

use option_schema_core::{
    CheckContext, FieldOptions, FieldType, ObjectSchema, Record, ValidateOptions, validate_with,
};
use serde_json::json;

/// Pretend remote lookup: keys starting with `live_` are accepted, `slow_`
/// keys never answer in time.
async fn verify_api_key(ctx: CheckContext) -> Result<(), String> {
    let key = ctx.value().and_then(|v| v.as_str()).unwrap_or_default();
    if key.starts_with("slow_") {
        tokio::time::sleep(Duration::from_secs(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    if key.starts_with("live_") {
        Ok(())
    } else {
        Err(format!("\"{}\" was rejected by the credential service", ctx.field()))
    }
}

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::main]
async fn main() {
    let schema = ObjectSchema::builder()
        .field(
            "apiKey",
            FieldType::String,
            FieldOptions::default().required().with_external(verify_api_key),
        )
        .field("region", FieldType::String, FieldOptions::default().with_default("eu"))
        .build()
        .expect("schema is well-formed");

    let options = ValidateOptions::default().with_external_timeout(Duration::from_millis(500));

    let cases = [
        json!({ "apiKey": 42 }),
        json!({ "apiKey": "test_123" }),
        json!({ "apiKey": "slow_123" }),
        json!({ "apiKey": "live_123" }),
    ];

    for input in cases {
        let result = validate_with(&schema, &record(input.clone()), &options).await;
        println!("options: {input}");
        match result.value() {
            Some(value) => println!("  valid: {}", serde_json::Value::Object(value.clone())),
            None => {
                for error in result.errors() {
                    println!("  error: {error}");
                }
            }
        }
    }
}

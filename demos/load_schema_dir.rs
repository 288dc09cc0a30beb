//! Schema directory loading example.
//!
//! Writes a few plugin schema documents to a temporary directory, loads them
//! with `SchemaRegistry`, and validates an options file for each plugin.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p option-schema-demos --example load_schema_dir
//! ```

use option_schema_core::validate;
use option_schema_loader::{DocumentFormat, SchemaRegistry, parse_record};

const SITEMAP: &str = r#"
fields:
  - name: output
    type: string
    default: /sitemap.xml
  - name: exclude
    type: array
"#;

const MANIFEST: &str = r#"
unknown_fields: warn
fields:
  - name: name
    type: string
    required: true
  - name: icon
    type: string
"#;

#[tokio::main]
async fn main() {
    let dir = std::env::temp_dir().join("option_schema_example_registry");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("plugin-sitemap.yaml"), SITEMAP).unwrap();
    std::fs::write(dir.join("plugin-manifest.yaml"), MANIFEST).unwrap();

    let registry = SchemaRegistry::from_dir(&dir).unwrap();
    println!("Loaded {} plugin schema(s) from {}", registry.len(), registry.root().display());

    let site_options = [
        ("plugin-sitemap", "exclude: [/admin]\n"),
        ("plugin-manifest", "icon: src/icon.png\nthemeColor: '#fff'\n"),
    ];

    for (plugin, raw) in site_options {
        let Some(document) = registry.get(plugin) else {
            continue;
        };
        let schema = document.schema().unwrap();
        let options = parse_record(raw, DocumentFormat::Yaml).unwrap();
        let result = validate(&schema, &options).await;

        println!("{plugin} (fingerprint {})", document.fingerprint().unwrap());
        for warning in result.warnings() {
            println!("  warning: {warning}");
        }
        for error in result.errors() {
            println!("  error: {error}");
        }
        if result.is_valid() {
            println!("  ok");
        }
    }

    let _ = std::fs::remove_dir_all(&dir);
}

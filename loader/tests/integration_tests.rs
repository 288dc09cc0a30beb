use std::path::{Path, PathBuf};

use option_schema_core::validate_with;
use option_schema_loader::{
    DocumentError, SchemaRegistry, ValidatorConfig, load_record, load_schema, plugin_name,
    schema_files,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

const SITEMAP_SCHEMA: &str = r#"
fields:
  - name: output
    type: string
    default: /sitemap.xml
  - name: exclude
    type: array
  - name: createLinkInHead
    type: boolean
    forbidden: true
    messages:
      any.unknown: createLinkInHead was removed, the link is always added
"#;

const ANALYTICS_SCHEMA: &str = r#"{
  "unknown_fields": "warn",
  "fields": [
    { "name": "trackingId", "type": "string", "required": true },
    { "name": "anonymize", "type": "boolean", "default": true }
  ]
}"#;

// ---------------------------------------------------------------------------
// Registry loading
// ---------------------------------------------------------------------------

#[test]
fn test_registry_indexes_by_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "plugin-sitemap.yaml", SITEMAP_SCHEMA);
    write(dir.path(), "plugin-analytics.json", ANALYTICS_SCHEMA);
    write(dir.path(), "README.md", "# not a schema");

    let registry = SchemaRegistry::from_dir(dir.path()).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.plugins(), ["plugin-analytics", "plugin-sitemap"]);
    assert!(!registry.contains("README"));

    let sitemap = registry.get("plugin-sitemap").unwrap();
    assert_eq!(
        sitemap.path().unwrap(),
        dir.path().join("plugin-sitemap.yaml")
    );
    assert_eq!(sitemap.description().fields.len(), 3);
}

#[test]
fn test_registry_fails_on_broken_document() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.json", "{ not json");

    let err = SchemaRegistry::from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, DocumentError::JsonError(_)));
}

#[test]
fn test_registry_rejects_same_stem_documents() {
    let dir = tempfile::tempdir().unwrap();
    let first_doc = write(
        dir.path(),
        "plugin.json",
        r#"{ "fields": [
            { "name": "path", "type": "string", "required": true, "default": "/" }
        ] }"#,
    );
    let second_doc = write(dir.path(), "plugin.yaml", SITEMAP_SCHEMA);

    match SchemaRegistry::from_dir(dir.path()) {
        Err(DocumentError::DuplicatePlugin {
            name,
            first,
            second,
        }) => {
            assert_eq!(name, "plugin");
            assert_eq!(first, first_doc);
            assert_eq!(second, second_doc);
        }
        other => panic!("expected DuplicatePlugin, got {other:?}"),
    }
}

#[test]
fn test_schema_files_lists_documents_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b.yml", SITEMAP_SCHEMA);
    write(dir.path(), "a.json", ANALYTICS_SCHEMA);
    write(dir.path(), "notes.txt", "ignored");

    let files = schema_files(dir.path()).unwrap();
    let names: Vec<_> = files.iter().filter_map(|p| plugin_name(p)).collect();
    assert_eq!(names, ["a", "b"]);
}

// ---------------------------------------------------------------------------
// Options files
// ---------------------------------------------------------------------------

#[test]
fn test_load_record_reports_path_for_non_objects() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "options.json", "[true]");

    match load_record(&path) {
        Err(DocumentError::NotAnObject(reported)) => assert_eq!(reported, path),
        other => panic!("expected NotAnObject, got {other:?}"),
    }
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "options.toml", "a = 1");

    assert!(matches!(
        load_record(&path),
        Err(DocumentError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        load_schema(&path),
        Err(DocumentError::UnsupportedFormat(_))
    ));
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_validate_loaded_documents() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = write(dir.path(), "plugin-sitemap.yaml", SITEMAP_SCHEMA);
    let options_path = write(
        dir.path(),
        "options.yaml",
        "exclude:\n  - /admin\ncreateLinkInHead: true\n",
    );

    let schema = load_schema(&schema_path).unwrap().schema().unwrap();
    let options = load_record(&options_path).unwrap();
    let config = ValidatorConfig::default();

    let result = validate_with(&schema, &options, &config.validate_options()).await;
    assert_eq!(
        result.errors(),
        ["createLinkInHead was removed, the link is always added"]
    );

    let fixed = write(dir.path(), "fixed.yaml", "exclude:\n  - /admin\n");
    let result = validate_with(
        &schema,
        &load_record(&fixed).unwrap(),
        &config.validate_options(),
    )
    .await;
    assert!(result.is_valid());
    assert_eq!(result.value().unwrap()["output"], "/sitemap.xml");
}

#[tokio::test]
async fn test_warn_policy_from_document() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = write(dir.path(), "plugin-analytics.json", ANALYTICS_SCHEMA);
    let options_path = write(
        dir.path(),
        "options.json",
        r#"{ "trackingId": "UA-1", "respectDNT": true }"#,
    );

    let schema = load_schema(&schema_path).unwrap().schema().unwrap();
    let options = load_record(&options_path).unwrap();
    let result = option_schema_core::validate(&schema, &options).await;

    assert!(result.is_valid());
    assert_eq!(result.warnings(), ["\"respectDNT\" is not allowed"]);
    let value = result.value().unwrap();
    assert_eq!(value["anonymize"], true);
    assert_eq!(value["respectDNT"], true);
}

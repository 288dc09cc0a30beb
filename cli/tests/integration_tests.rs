use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

fn optcheck(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_optcheck"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run optcheck")
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

/// Schema from the plugin authoring guide: two required options and one
/// optional flag.
fn write_plugin_schema(dir: &Path) -> PathBuf {
    write(
        dir,
        "plugin.yaml",
        r#"
fields:
  - name: optionA
    type: boolean
    required: true
  - name: message
    type: string
    required: true
  - name: optionB
    type: boolean
"#,
    )
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn test_validate_reports_errors_in_schema_order() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_plugin_schema(dir.path());
    let options = write(
        dir.path(),
        "options.json",
        r#"{ "message": 123, "optionB": "not a boolean" }"#,
    );

    let out = optcheck(&[
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        "--options",
        options.to_str().unwrap(),
        "--format",
        "json",
    ]);

    assert!(!out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["is_valid"], false);
    assert_eq!(
        report["errors"],
        serde_json::json!([
            "\"optionA\" is required",
            "\"message\" must be a string",
            "\"optionB\" must be a boolean",
        ])
    );
}

#[test]
fn test_validate_accepts_valid_options() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_plugin_schema(dir.path());
    let options = write(
        dir.path(),
        "options.yaml",
        "optionA: false\nmessage: string\noptionB: true\n",
    );

    let out = optcheck(&[
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        "--options",
        options.to_str().unwrap(),
        "--print-value",
    ]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "optionA": false, "message": "string", "optionB": true })
    );
}

#[test]
fn test_validate_rejects_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_plugin_schema(dir.path());
    let options = write(dir.path(), "options.json", "{}");

    let out = optcheck(&[
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        "--options",
        options.to_str().unwrap(),
        "--config",
        dir.path().join("missing.yaml").to_str().unwrap(),
    ]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to load config"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn test_check_accepts_directory_of_schemas() {
    let dir = tempfile::tempdir().unwrap();
    write_plugin_schema(dir.path());
    write(
        dir.path(),
        "other.json",
        r#"{ "fields": [{ "name": "path", "type": "string", "default": "/" }] }"#,
    );

    let out = optcheck(&["check", dir.path().to_str().unwrap()]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Checked 2 schema document(s)."));
}

#[test]
fn test_check_reports_contradictory_rules() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write(
        dir.path(),
        "bad.yaml",
        "fields:\n  - name: message\n    type: string\n    required: true\n    default: hi\n",
    );

    let out = optcheck(&["check", bad.to_str().unwrap()]);

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("a required field cannot declare a default value"));
}

#[test]
fn test_check_reports_every_broken_document_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a-broken.json", "{ not json");
    write(
        dir.path(),
        "b-contradictory.yaml",
        "fields:\n  - name: message\n    type: string\n    required: true\n    default: hi\n",
    );
    write_plugin_schema(dir.path());

    let out = optcheck(&["check", dir.path().to_str().unwrap()]);

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("a-broken.json"), "{stderr}");
    assert!(stderr.contains("b-contradictory.yaml"), "{stderr}");
    assert!(stderr.contains("2 problem(s) found in 3 schema document(s)"), "{stderr}");
}

#[test]
fn test_check_flags_same_stem_documents() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "plugin.json",
        r#"{ "fields": [
            { "name": "path", "type": "string", "required": true, "default": "/" }
        ] }"#,
    );
    write_plugin_schema(dir.path());

    let out = optcheck(&["check", dir.path().to_str().unwrap()]);

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("duplicate schema for plugin \"plugin\""), "{stderr}");
    assert!(stderr.contains("a required field cannot declare a default value"), "{stderr}");
}

// ---------------------------------------------------------------------------
// describe
// ---------------------------------------------------------------------------

#[test]
fn test_describe_includes_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_plugin_schema(dir.path());

    let out = optcheck(&["describe", "--schema", schema.to_str().unwrap()]);

    assert!(out.status.success());
    let described: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(described["fingerprint"].as_str().unwrap().len(), 64);
    assert_eq!(described["fields"][0]["name"], "optionA");
    assert_eq!(described["unknown_fields"], "reject");
}

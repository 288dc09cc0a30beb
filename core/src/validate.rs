//! Options validation.
//!
//! [`validate`] evaluates an [`ObjectSchema`] against an input record in two
//! phases:
//!
//! 1. A synchronous pass over the declared fields in declaration order
//!    (forbidden, required, default, type), followed by the unknown-key
//!    policy.
//! 2. If and only if the first phase produced no errors, every field's
//!    external check runs concurrently against an immutable snapshot of the
//!    resolved record.
//!
//! Bad input never aborts the caller: every failure ends up as a message in
//! the returned [`ValidationResult`].
//!
//! # Examples
//!
//! ```
//! use option_schema_core::*;
//! use serde_json::json;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let schema = ObjectSchema::builder()
//!     .field("optionA", FieldType::Boolean, FieldOptions::default().required())
//!     .field("message", FieldType::String, FieldOptions::default().with_default("hi"))
//!     .build()
//!     .unwrap();
//!
//! let input = json!({ "optionA": true });
//! let result = validate(&schema, input.as_object().unwrap()).await;
//! assert!(result.is_valid());
//! assert_eq!(result.value().unwrap()["message"], "hi");
//! # });
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::external::CheckContext;
use crate::messages::render;
use crate::{ErrorKind, FieldRule, ObjectSchema, Record, UnknownFieldPolicy};

/// One validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Field (or unknown key) the failure is attributed to.
    pub field: String,
    pub kind: ErrorKind,
    /// Final, user-facing message.
    pub message: String,
}

/// Outcome of a validation call.
///
/// Holds either the normalized record (when valid) or the ordered list of
/// failures. Warnings never affect validity.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
    warnings: Vec<String>,
    value: Option<Record>,
}

impl ValidationResult {
    fn invalid(issues: Vec<ValidationIssue>, warnings: Vec<String>) -> Self {
        Self {
            issues,
            warnings,
            value: None,
        }
    }

    fn valid(value: Record, warnings: Vec<String>) -> Self {
        Self {
            issues: Vec::new(),
            warnings,
            value: Some(value),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Error messages in report order.
    pub fn errors(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.message.as_str()).collect()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The normalized record; `None` when invalid.
    pub fn value(&self) -> Option<&Record> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Record> {
        self.value
    }
}

/// Knobs for [`validate_with`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use option_schema_core::ValidateOptions;
///
/// let opts = ValidateOptions::default().with_external_timeout(Duration::from_secs(5));
/// assert!(opts.run_external);
/// assert_eq!(opts.external_timeout, Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Run external checks after a clean synchronous pass.
    pub run_external: bool,
    /// Per-check time limit. Requires a Tokio runtime with the time driver.
    pub external_timeout: Option<Duration>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            run_external: true,
            external_timeout: None,
        }
    }
}

impl ValidateOptions {
    /// Skips external checks entirely.
    pub fn without_external(mut self) -> Self {
        self.run_external = false;
        self
    }

    pub fn with_external_timeout(mut self, limit: Duration) -> Self {
        self.external_timeout = Some(limit);
        self
    }
}

/// Validates `input` against `schema` with default options.
pub async fn validate(schema: &ObjectSchema, input: &Record) -> ValidationResult {
    validate_with(schema, input, &ValidateOptions::default()).await
}

/// Validates `input` against `schema`.
///
/// External checks are skipped when the synchronous phase reports any error,
/// or when [`ValidateOptions::run_external`] is `false`.
pub async fn validate_with(
    schema: &ObjectSchema,
    input: &Record,
    options: &ValidateOptions,
) -> ValidationResult {
    let Resolved {
        record,
        issues,
        warnings,
    } = resolve_record(schema, input);

    if !issues.is_empty() {
        debug!(
            errors = issues.len(),
            "synchronous checks failed, skipping external checks"
        );
        return ValidationResult::invalid(issues, warnings);
    }

    let check_count = schema.external_check_count();
    if !options.run_external || check_count == 0 {
        return ValidationResult::valid(record, warnings);
    }

    debug!(checks = check_count, "running external checks");
    let (record, issues) = run_external_checks(schema, record, options.external_timeout).await;
    if issues.is_empty() {
        ValidationResult::valid(record, warnings)
    } else {
        debug!(errors = issues.len(), "external checks failed");
        ValidationResult::invalid(issues, warnings)
    }
}

/// Runs only the synchronous phase.
///
/// Useful for hosts that cannot await; external checks are never executed.
///
/// # Examples
///
/// ```
/// use option_schema_core::*;
/// use serde_json::json;
///
/// let schema = ObjectSchema::builder()
///     .field("optionA", FieldType::Boolean, FieldOptions::default().required())
///     .build()
///     .unwrap();
/// let input = json!({});
/// let result = resolve(&schema, input.as_object().unwrap());
/// assert_eq!(result.errors(), ["\"optionA\" is required"]);
/// ```
pub fn resolve(schema: &ObjectSchema, input: &Record) -> ValidationResult {
    let Resolved {
        record,
        issues,
        warnings,
    } = resolve_record(schema, input);
    if issues.is_empty() {
        ValidationResult::valid(record, warnings)
    } else {
        ValidationResult::invalid(issues, warnings)
    }
}

struct Resolved {
    record: Record,
    issues: Vec<ValidationIssue>,
    warnings: Vec<String>,
}

fn resolve_record(schema: &ObjectSchema, input: &Record) -> Resolved {
    let mut record = Record::new();
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    debug!(
        fields = schema.len(),
        keys = input.len(),
        "resolving options record"
    );

    for (name, rule) in schema.fields() {
        // `null` stands in for an absent value.
        let supplied = input.get(name).filter(|value| !value.is_null());

        if rule.is_forbidden() {
            if supplied.is_some() {
                issues.push(issue(name, ErrorKind::Forbidden, rule.message("any.unknown")));
            }
            continue;
        }

        match supplied {
            None if rule.is_required() => {
                issues.push(issue(name, ErrorKind::Required, rule.message("any.required")));
            }
            None => {
                if let Some(default) = rule.default_value() {
                    record.insert(name.to_string(), default.clone());
                }
            }
            Some(value) if rule.field_type().matches(value) => {
                record.insert(name.to_string(), value.clone());
            }
            Some(_) => {
                let kind = ErrorKind::InvalidType(rule.field_type());
                issues.push(issue(name, kind, rule.message(&kind.key())));
            }
        }
    }

    let policy = schema.unknown_fields();
    for (key, value) in input.iter().filter(|(key, _)| !schema.contains(key)) {
        let template = schema.messages().get("object.unknown").map(String::as_str);
        match policy {
            UnknownFieldPolicy::Reject => {
                issues.push(issue(key, ErrorKind::UnknownKey, template));
            }
            UnknownFieldPolicy::Strip => {
                debug!(key = %key, "stripping unknown key");
            }
            UnknownFieldPolicy::Allow => {
                record.insert(key.clone(), value.clone());
            }
            UnknownFieldPolicy::Warn => {
                warnings.push(issue(key, ErrorKind::UnknownKey, template).message);
                record.insert(key.clone(), value.clone());
            }
        }
    }

    Resolved {
        record,
        issues,
        warnings,
    }
}

fn issue(field: &str, kind: ErrorKind, custom: Option<&str>) -> ValidationIssue {
    let template = custom.unwrap_or_else(|| kind.default_template());
    ValidationIssue {
        field: field.to_string(),
        kind,
        message: render(template, field),
    }
}

enum ExternalFailure {
    Rejected(String),
    TimedOut(Duration),
}

async fn run_external_checks(
    schema: &ObjectSchema,
    record: Record,
    timeout: Option<Duration>,
) -> (Record, Vec<ValidationIssue>) {
    let snapshot = Arc::new(record);

    let pending = schema
        .fields()
        .filter_map(|(name, rule)| rule.external().map(|check| (name, rule, check)))
        .map(|(name, rule, check)| {
            let fut = check.check(CheckContext::new(name, Arc::clone(&snapshot)));
            async move {
                let outcome = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, fut).await {
                        Ok(result) => result.map_err(ExternalFailure::Rejected),
                        Err(_) => Err(ExternalFailure::TimedOut(limit)),
                    },
                    None => fut.await.map_err(ExternalFailure::Rejected),
                };
                (name, rule, outcome)
            }
        });

    // join_all yields outcomes in schema order regardless of completion order.
    let issues = join_all(pending)
        .await
        .into_iter()
        .filter_map(|(name, rule, outcome)| {
            outcome.err().map(|failure| external_issue(name, rule, failure))
        })
        .collect();

    let record = Arc::try_unwrap(snapshot).unwrap_or_else(|shared| (*shared).clone());
    (record, issues)
}

fn external_issue(field: &str, rule: &FieldRule, failure: ExternalFailure) -> ValidationIssue {
    if let ExternalFailure::TimedOut(limit) = &failure {
        warn!(field, timeout_ms = limit.as_millis() as u64, "external check timed out");
    }
    let message = match (rule.message("any.external"), failure) {
        (Some(template), _) => render(template, field),
        (None, ExternalFailure::Rejected(message)) => message,
        (None, ExternalFailure::TimedOut(limit)) => format!(
            "\"{field}\" external check timed out after {}ms",
            limit.as_millis()
        ),
    };
    ValidationIssue {
        field: field.to_string(),
        kind: ErrorKind::External,
        message,
    }
}

//! Option schema type definitions.
//!
//! This module defines the declarative model plugin authors use to describe
//! the options their plugin accepts: a [`FieldRule`] per option, collected
//! into an ordered [`ObjectSchema`]. Rules are immutable once constructed;
//! use [`define_field`](crate::define_field) and
//! [`ObjectSchema::builder`] to create them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::ObjectSchemaBuilder;
use crate::external::ExternalCheck;

/// An options record: string keys mapped to JSON values, in insertion order.
pub type Record = serde_json::Map<String, Value>;

/// Expected type of an option value.
///
/// # Examples
///
/// ```
/// use option_schema_core::FieldType;
/// use serde_json::json;
///
/// assert!(FieldType::Boolean.matches(&json!(true)));
/// assert!(!FieldType::String.matches(&json!(123)));
/// assert_eq!(FieldType::Array.to_string(), "array");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Boolean,
    String,
    Number,
    Object,
    Array,
}

impl FieldType {
    /// Returns the lowercase type name used in messages and error kinds.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Number => "number",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Returns `true` if `value` is of this type. `null` matches nothing.
    pub fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Boolean, Value::Bool(_))
                | (Self::String, Value::String(_))
                | (Self::Number, Value::Number(_))
                | (Self::Object, Value::Object(_))
                | (Self::Array, Value::Array(_))
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// What to do with input keys the schema does not declare.
///
/// # Examples
///
/// ```
/// use option_schema_core::UnknownFieldPolicy;
///
/// assert_eq!(UnknownFieldPolicy::default(), UnknownFieldPolicy::Reject);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Report one error per unknown key (the default).
    #[default]
    Reject,
    /// Pass unknown keys through unchanged.
    Allow,
    /// Silently drop unknown keys from the resolved record.
    Strip,
    /// Pass unknown keys through and report each one as a warning.
    Warn,
}

/// Options accepted by [`define_field`](crate::define_field).
///
/// Build one with [`Default::default()`] and the chainable `with_*` methods.
///
/// # Examples
///
/// ```
/// use option_schema_core::FieldOptions;
///
/// let opts = FieldOptions::default()
///     .required()
///     .with_description("Enables the A behaviour")
///     .with_message("any.required", "optionA must be set");
/// assert!(opts.required);
/// assert_eq!(opts.messages.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct FieldOptions {
    /// The field must be present in the input.
    pub required: bool,
    /// Value used when the field is absent.
    pub default: Option<Value>,
    /// Presence of the field is itself an error.
    pub forbidden: bool,
    /// Human-readable documentation, no runtime effect.
    pub description: Option<String>,
    /// Message template overrides keyed by error kind (e.g. `any.required`).
    pub messages: BTreeMap<String, String>,
    /// Asynchronous check run after all synchronous checks pass.
    pub external: Option<Arc<dyn ExternalCheck>>,
}

impl FieldOptions {
    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as forbidden (deprecated).
    pub fn forbidden(mut self) -> Self {
        self.forbidden = true;
        self
    }

    /// Sets the value used when the field is absent.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Overrides the message template for one error kind.
    pub fn with_message(mut self, kind: &str, template: &str) -> Self {
        self.messages.insert(kind.to_string(), template.to_string());
        self
    }

    /// Attaches an external check.
    pub fn with_external(mut self, check: impl ExternalCheck + 'static) -> Self {
        self.external = Some(Arc::new(check));
        self
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("required", &self.required)
            .field("default", &self.default)
            .field("forbidden", &self.forbidden)
            .field("description", &self.description)
            .field("messages", &self.messages)
            .field("external", &self.external.is_some())
            .finish()
    }
}

/// Validation rule for one named option.
///
/// Construct with [`define_field`](crate::define_field), which rejects
/// contradictory option combinations.
#[derive(Clone)]
pub struct FieldRule {
    pub(crate) field_type: FieldType,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) forbidden: bool,
    pub(crate) description: Option<String>,
    pub(crate) messages: BTreeMap<String, String>,
    pub(crate) external: Option<Arc<dyn ExternalCheck>>,
}

impl FieldRule {
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_forbidden(&self) -> bool {
        self.forbidden
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the custom template for `kind`, if one was declared.
    pub fn message(&self, kind: &str) -> Option<&str> {
        self.messages.get(kind).map(String::as_str)
    }

    pub fn messages(&self) -> &BTreeMap<String, String> {
        &self.messages
    }

    pub fn external(&self) -> Option<&Arc<dyn ExternalCheck>> {
        self.external.as_ref()
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("field_type", &self.field_type)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("forbidden", &self.forbidden)
            .field("description", &self.description)
            .field("messages", &self.messages)
            .field("external", &self.external.is_some())
            .finish()
    }
}

/// Ordered set of field rules for one options record.
///
/// Declaration order is the order in which errors are reported and in which
/// declared fields appear in the resolved record.
///
/// # Examples
///
/// ```
/// use option_schema_core::*;
///
/// let schema = ObjectSchema::builder()
///     .field("optionA", FieldType::Boolean, FieldOptions::default().required())
///     .field("message", FieldType::String, FieldOptions::default())
///     .unknown_fields(UnknownFieldPolicy::Strip)
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.field_names().collect::<Vec<_>>(), ["optionA", "message"]);
/// assert!(schema.field("optionA").unwrap().is_required());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub(crate) fields: Vec<(String, FieldRule)>,
    pub(crate) unknown_fields: UnknownFieldPolicy,
    pub(crate) messages: BTreeMap<String, String>,
}

impl ObjectSchema {
    /// Returns a new [`ObjectSchemaBuilder`].
    pub fn builder() -> ObjectSchemaBuilder {
        ObjectSchemaBuilder::default()
    }

    /// Iterates over `(name, rule)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Iterates over field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Looks up the rule for `name`.
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, rule)| rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn unknown_fields(&self) -> UnknownFieldPolicy {
        self.unknown_fields
    }

    /// Schema-level message overrides (used for `object.unknown`).
    pub fn messages(&self) -> &BTreeMap<String, String> {
        &self.messages
    }

    /// Number of fields that carry an external check.
    pub fn external_check_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|(_, rule)| rule.external.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_field_type_rejects_null() {
        for ty in [
            FieldType::Boolean,
            FieldType::String,
            FieldType::Number,
            FieldType::Object,
            FieldType::Array,
        ] {
            assert!(!ty.matches(&Value::Null), "{ty} matched null");
        }
    }

    #[test]
    fn test_field_type_matches_structured_values() {
        assert!(FieldType::Object.matches(&json!({"a": 1})));
        assert!(FieldType::Array.matches(&json!([1, 2])));
        assert!(FieldType::Number.matches(&json!(1.5)));
        assert!(!FieldType::Object.matches(&json!([])));
    }

    #[test]
    fn test_policy_serializes_lowercase() {
        let raw = serde_json::to_string(&UnknownFieldPolicy::Strip).unwrap();
        assert_eq!(raw, "\"strip\"");
        let parsed: UnknownFieldPolicy = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(parsed, UnknownFieldPolicy::Warn);
    }

    #[test]
    fn test_options_debug_hides_check_body() {
        let opts = FieldOptions::default()
            .with_external(|_ctx: crate::CheckContext| async { Ok::<(), String>(()) });
        let rendered = format!("{opts:?}");
        assert!(rendered.contains("external: true"));
    }
}

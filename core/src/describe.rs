use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ConfigError, FieldOptions, FieldType, ObjectSchema, UnknownFieldPolicy};

/// Version of the schema description format (semver).
pub const DESCRIPTION_FORMAT_VERSION: &str = "1.0.0";

/// Serializable view of an [`ObjectSchema`].
///
/// Produced by [`ObjectSchema::describe`] for documentation and tooling, and
/// used as the on-disk schema document format. External checks cannot be
/// serialized; their presence is recorded in
/// [`FieldDescription::has_external`].
///
/// # Examples
///
/// ```
/// use option_schema_core::*;
///
/// let schema = ObjectSchema::builder()
///     .field("optionA", FieldType::Boolean, FieldOptions::default().required())
///     .build()
///     .unwrap();
///
/// let description = schema.describe();
/// assert_eq!(description.fields[0].name, "optionA");
/// assert!(description.fields[0].required);
///
/// let rebuilt = description.build().unwrap();
/// assert!(rebuilt.field("optionA").unwrap().is_required());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescription {
    /// Description format version (populated from
    /// [`DESCRIPTION_FORMAT_VERSION`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,
    /// Schema-level message overrides.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub messages: BTreeMap<String, String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescription>,
}

/// Serializable view of one field rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub forbidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub messages: BTreeMap<String, String>,
    /// Informational; ignored by [`SchemaDescription::build`].
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_external: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SchemaDescription {
    /// Rebuilds an [`ObjectSchema`] from this description.
    ///
    /// The result has no external checks; attach them afterwards with
    /// [`merge_schemas`](crate::merge_schemas) if needed.
    ///
    /// # Errors
    ///
    /// Returns the same [`ConfigError`]s as
    /// [`ObjectSchemaBuilder::build`](crate::ObjectSchemaBuilder::build).
    pub fn build(&self) -> Result<ObjectSchema, ConfigError> {
        let builder = self
            .fields
            .iter()
            .fold(ObjectSchema::builder(), |builder, field| {
                builder.field(field.name.clone(), field.field_type, field.options())
            });

        self.messages
            .iter()
            .fold(builder.unknown_fields(self.unknown_fields), |builder, (kind, template)| {
                builder.message(kind, template)
            })
            .build()
    }

    /// Number of fields that carried an external check when described.
    pub fn external_check_count(&self) -> usize {
        self.fields.iter().filter(|f| f.has_external).count()
    }
}

impl FieldDescription {
    fn options(&self) -> FieldOptions {
        FieldOptions {
            required: self.required,
            default: self.default.clone(),
            forbidden: self.forbidden,
            description: self.description.clone(),
            messages: self.messages.clone(),
            external: None,
        }
    }
}

impl ObjectSchema {
    /// Returns a serializable description of this schema.
    pub fn describe(&self) -> SchemaDescription {
        SchemaDescription {
            format_version: Some(DESCRIPTION_FORMAT_VERSION.to_string()),
            unknown_fields: self.unknown_fields,
            messages: self.messages.clone(),
            fields: self
                .fields()
                .map(|(name, rule)| FieldDescription {
                    name: name.to_string(),
                    field_type: rule.field_type(),
                    required: rule.is_required(),
                    default: rule.default_value().cloned(),
                    forbidden: rule.is_forbidden(),
                    description: rule.description().map(String::from),
                    messages: rule.messages().clone(),
                    has_external: rule.external().is_some(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::CheckContext;

    #[test]
    fn test_description_omits_unset_flags() {
        let schema = ObjectSchema::builder()
            .field("optionB", FieldType::Boolean, FieldOptions::default())
            .build()
            .unwrap();
        let raw = serde_json::to_value(schema.describe()).unwrap();
        assert_eq!(
            raw,
            json!({
                "format_version": "1.0.0",
                "unknown_fields": "reject",
                "fields": [{ "name": "optionB", "type": "boolean" }]
            })
        );
    }

    #[test]
    fn test_description_records_external_presence() {
        let schema = ObjectSchema::builder()
            .field(
                "apiKey",
                FieldType::String,
                FieldOptions::default()
                    .required()
                    .with_external(|_ctx: CheckContext| async { Ok::<_, String>(()) }),
            )
            .build()
            .unwrap();
        let description = schema.describe();
        assert!(description.fields[0].has_external);
        assert_eq!(description.external_check_count(), 1);

        let rebuilt = description.build().unwrap();
        assert!(rebuilt.field("apiKey").unwrap().external().is_none());
    }

    #[test]
    fn test_build_from_document_json() {
        let description: SchemaDescription = serde_json::from_value(json!({
            "unknown_fields": "strip",
            "messages": { "object.unknown": "{{#key}} is unknown" },
            "fields": [
                { "name": "message", "type": "string", "default": "default message" },
                { "name": "legacy", "type": "boolean", "forbidden": true,
                  "messages": { "any.unknown": "legacy was removed" } }
            ]
        }))
        .unwrap();

        let schema = description.build().unwrap();
        assert_eq!(schema.unknown_fields(), UnknownFieldPolicy::Strip);
        assert_eq!(schema.messages()["object.unknown"], "{{#key}} is unknown");
        assert!(schema.field("legacy").unwrap().is_forbidden());
        assert_eq!(schema.describe().fields, description.fields);
    }

    #[test]
    fn test_build_surfaces_config_errors() {
        let description: SchemaDescription = serde_json::from_value(json!({
            "fields": [{ "name": "count", "type": "number", "required": true, "default": 3 }]
        }))
        .unwrap();
        let err = description.build().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Field {
                name: "count".into(),
                source: Box::new(ConfigError::RequiredWithDefault),
            }
        );
    }
}

//! Schema construction.
//!
//! [`define_field`] turns a [`FieldOptions`] value into an immutable
//! [`FieldRule`], rejecting contradictory combinations up front.
//! [`define_object`] and [`ObjectSchemaBuilder`] assemble rules into an
//! ordered [`ObjectSchema`], guarding against empty and duplicate names.
//!
//! [`SchemaPrimitives`] bundles the same operations so schema-defining
//! functions can receive them as an argument instead of reaching for
//! free functions.

use std::collections::{BTreeMap, HashSet};

use crate::{ConfigError, FieldOptions, FieldRule, FieldType, ObjectSchema, UnknownFieldPolicy};

/// Defines a rule for a single field.
///
/// # Errors
///
/// - [`ConfigError::RequiredWithDefault`] if `required` and `default` are both set.
/// - [`ConfigError::RequiredAndForbidden`] if `required` and `forbidden` are both set.
/// - [`ConfigError::ForbiddenWithDefault`] if `forbidden` and `default` are both set.
/// - [`ConfigError::DefaultTypeMismatch`] if the default is not of `field_type`.
///
/// # Examples
///
/// ```
/// use option_schema_core::*;
///
/// let rule = define_field(
///     FieldType::String,
///     FieldOptions::default().with_default("default message"),
/// )
/// .unwrap();
/// assert_eq!(rule.default_value().unwrap(), "default message");
///
/// let err = define_field(
///     FieldType::String,
///     FieldOptions::default().required().with_default("x"),
/// )
/// .unwrap_err();
/// assert_eq!(err, ConfigError::RequiredWithDefault);
/// ```
pub fn define_field(
    field_type: FieldType,
    options: FieldOptions,
) -> Result<FieldRule, ConfigError> {
    if options.required && options.forbidden {
        return Err(ConfigError::RequiredAndForbidden);
    }
    if let Some(default) = &options.default {
        if options.required {
            return Err(ConfigError::RequiredWithDefault);
        }
        if options.forbidden {
            return Err(ConfigError::ForbiddenWithDefault);
        }
        if !field_type.matches(default) {
            return Err(ConfigError::DefaultTypeMismatch {
                expected: field_type,
            });
        }
    }

    Ok(FieldRule {
        field_type,
        required: options.required,
        default: options.default,
        forbidden: options.forbidden,
        description: options.description,
        messages: options.messages,
        external: options.external,
    })
}

/// Assembles named rules into a schema, preserving iteration order.
///
/// # Errors
///
/// Returns [`ConfigError::EmptyFieldName`] or [`ConfigError::DuplicateField`]
/// for the first offending name.
///
/// # Examples
///
/// ```
/// use option_schema_core::*;
///
/// let flag = define_field(FieldType::Boolean, FieldOptions::default()).unwrap();
/// let schema = define_object([("optionA", flag.clone()), ("optionB", flag.clone())]).unwrap();
/// assert_eq!(schema.len(), 2);
///
/// let err = define_object([("optionA", flag.clone()), ("optionA", flag)]).unwrap_err();
/// assert_eq!(err, ConfigError::DuplicateField("optionA".into()));
/// ```
pub fn define_object<I, K>(fields: I) -> Result<ObjectSchema, ConfigError>
where
    I: IntoIterator<Item = (K, FieldRule)>,
    K: Into<String>,
{
    fields
        .into_iter()
        .fold(ObjectSchema::builder(), |builder, (name, rule)| {
            builder.rule(name, rule)
        })
        .build()
}

/// Incremental [`ObjectSchema`] construction.
///
/// Errors from individual fields are deferred and reported by
/// [`build`](Self::build), so a chain of calls stays readable.
///
/// # Examples
///
/// ```
/// use option_schema_core::*;
///
/// let schema = ObjectSchema::builder()
///     .field("optionA", FieldType::Boolean, FieldOptions::default().required())
///     .field("legacy", FieldType::Boolean, FieldOptions::default().forbidden())
///     .unknown_fields(UnknownFieldPolicy::Allow)
///     .message("object.unknown", "{{#label}} is not a known option")
///     .build()
///     .unwrap();
/// assert_eq!(schema.unknown_fields(), UnknownFieldPolicy::Allow);
///
/// let err = ObjectSchema::builder()
///     .field("bad", FieldType::Number, FieldOptions::default().with_default("one"))
///     .build()
///     .unwrap_err();
/// assert!(matches!(err, ConfigError::Field { .. }));
/// ```
#[derive(Debug, Default)]
pub struct ObjectSchemaBuilder {
    fields: Vec<(String, Result<FieldRule, ConfigError>)>,
    unknown_fields: UnknownFieldPolicy,
    messages: BTreeMap<String, String>,
}

impl ObjectSchemaBuilder {
    /// Defines and appends a field.
    pub fn field(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        options: FieldOptions,
    ) -> Self {
        self.fields.push((name.into(), define_field(field_type, options)));
        self
    }

    /// Appends an already-defined rule.
    pub fn rule(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.push((name.into(), Ok(rule)));
        self
    }

    /// Sets the unknown-key policy (defaults to [`UnknownFieldPolicy::Reject`]).
    pub fn unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Sets a schema-level message template (e.g. for `object.unknown`).
    pub fn message(mut self, kind: &str, template: &str) -> Self {
        self.messages.insert(kind.to_string(), template.to_string());
        self
    }

    /// Validates names and rules and returns the schema.
    ///
    /// # Errors
    ///
    /// Returns the first construction error in declaration order.
    pub fn build(self) -> Result<ObjectSchema, ConfigError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut fields = Vec::with_capacity(self.fields.len());

        for (name, rule) in self.fields {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyFieldName);
            }
            if !seen.insert(name.clone()) {
                return Err(ConfigError::DuplicateField(name));
            }
            let rule = rule.map_err(|err| err.for_field(&name))?;
            fields.push((name, rule));
        }

        Ok(ObjectSchema {
            fields,
            unknown_fields: self.unknown_fields,
            messages: self.messages,
        })
    }
}

/// Builder primitives handed to schema-defining functions.
///
/// Plugins declare their options in a function that receives a
/// `&SchemaPrimitives`, so hosts and tests decide which primitives are in
/// play.
///
/// # Examples
///
/// ```
/// use option_schema_core::*;
///
/// fn plugin_options_schema(s: &SchemaPrimitives) -> Result<ObjectSchema, ConfigError> {
///     s.schema([
///         ("optionA", s.boolean(FieldOptions::default().required())?),
///         ("message", s.string(FieldOptions::default().with_default("default message"))?),
///     ])
/// }
///
/// let schema = plugin_options_schema(&SchemaPrimitives).unwrap();
/// assert!(schema.contains("message"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaPrimitives;

impl SchemaPrimitives {
    /// Same as [`define_field`].
    pub fn field(
        &self,
        field_type: FieldType,
        options: FieldOptions,
    ) -> Result<FieldRule, ConfigError> {
        define_field(field_type, options)
    }

    pub fn boolean(&self, options: FieldOptions) -> Result<FieldRule, ConfigError> {
        define_field(FieldType::Boolean, options)
    }

    pub fn string(&self, options: FieldOptions) -> Result<FieldRule, ConfigError> {
        define_field(FieldType::String, options)
    }

    pub fn number(&self, options: FieldOptions) -> Result<FieldRule, ConfigError> {
        define_field(FieldType::Number, options)
    }

    pub fn object(&self, options: FieldOptions) -> Result<FieldRule, ConfigError> {
        define_field(FieldType::Object, options)
    }

    pub fn array(&self, options: FieldOptions) -> Result<FieldRule, ConfigError> {
        define_field(FieldType::Array, options)
    }

    /// Same as [`define_object`].
    pub fn schema<I, K>(&self, fields: I) -> Result<ObjectSchema, ConfigError>
    where
        I: IntoIterator<Item = (K, FieldRule)>,
        K: Into<String>,
    {
        define_object(fields)
    }

    /// Same as [`ObjectSchema::builder`].
    pub fn builder(&self) -> ObjectSchemaBuilder {
        ObjectSchema::builder()
    }
}

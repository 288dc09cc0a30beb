//! Schema merging with configurable conflict resolution.
//!
//! Hosts use [`merge_schemas`] to combine a plugin's own schema with fields
//! the framework accepts for every plugin, or to re-attach external checks
//! to a schema loaded from a document.
//!
//! # Example
//!
//! ```
//! use option_schema_core::*;
//!
//! let plugin = ObjectSchema::builder()
//!     .field("optionA", FieldType::Boolean, FieldOptions::default().required())
//!     .build()
//!     .unwrap();
//!
//! let framework = ObjectSchema::builder()
//!     .field(
//!         "plugins",
//!         FieldType::Array,
//!         FieldOptions::default().with_default(Vec::<String>::new()),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let merged = merge_schemas(&plugin, &framework, MergeStrategy::Union);
//! assert_eq!(merged.field_names().collect::<Vec<_>>(), ["optionA", "plugins"]);
//! ```

use std::collections::BTreeMap;

use crate::{FieldRule, ObjectSchema};

/// Schema merge behavior.
///
/// Controls how conflicts between a base and overlay schema are resolved.
///
/// # Examples
///
/// ```
/// use option_schema_core::*;
///
/// let base = ObjectSchema::builder()
///     .field("path", FieldType::String, FieldOptions::default().with_description("base desc"))
///     .build()
///     .unwrap();
/// let overlay = ObjectSchema::builder()
///     .field("path", FieldType::String, FieldOptions::default().required())
///     .build()
///     .unwrap();
///
/// let m1 = merge_schemas(&base, &overlay, MergeStrategy::PreferBase);
/// assert!(!m1.field("path").unwrap().is_required());
///
/// let m2 = merge_schemas(&base, &overlay, MergeStrategy::PreferOverlay);
/// assert!(m2.field("path").unwrap().is_required());
/// assert_eq!(m2.field("path").unwrap().description(), None);
///
/// let m3 = merge_schemas(&base, &overlay, MergeStrategy::Union);
/// assert!(m3.field("path").unwrap().is_required());
/// assert_eq!(m3.field("path").unwrap().description(), Some("base desc"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Keep base rules when both schemas declare a field.
    PreferBase,
    /// Keep overlay rules when both schemas declare a field.
    PreferOverlay,
    /// Overlay rules win, but descriptions, messages and external checks
    /// missing from the overlay are taken from the base.
    Union,
}

/// Merges two schemas into one.
///
/// Base fields keep their position; overlay-only fields are appended in
/// overlay order. The unknown-key policy comes from the base under
/// [`MergeStrategy::PreferBase`] and from the overlay otherwise.
pub fn merge_schemas(
    base: &ObjectSchema,
    overlay: &ObjectSchema,
    strategy: MergeStrategy,
) -> ObjectSchema {
    let mut fields: Vec<(String, FieldRule)> = base
        .fields()
        .map(|(name, rule)| {
            let merged = match overlay.field(name) {
                Some(other) => merge_rule(rule, other, strategy),
                None => rule.clone(),
            };
            (name.to_string(), merged)
        })
        .collect();

    fields.extend(
        overlay
            .fields()
            .filter(|(name, _)| !base.contains(name))
            .map(|(name, rule)| (name.to_string(), rule.clone())),
    );

    let (unknown_fields, messages) = match strategy {
        MergeStrategy::PreferBase => (
            base.unknown_fields,
            merge_messages(&overlay.messages, &base.messages),
        ),
        MergeStrategy::PreferOverlay | MergeStrategy::Union => (
            overlay.unknown_fields,
            merge_messages(&base.messages, &overlay.messages),
        ),
    };

    ObjectSchema {
        fields,
        unknown_fields,
        messages,
    }
}

fn merge_rule(base: &FieldRule, overlay: &FieldRule, strategy: MergeStrategy) -> FieldRule {
    match strategy {
        MergeStrategy::PreferBase => base.clone(),
        MergeStrategy::PreferOverlay => overlay.clone(),
        MergeStrategy::Union => {
            let mut merged = overlay.clone();
            if merged.description.is_none() {
                merged.description = base.description.clone();
            }
            if merged.external.is_none() {
                merged.external = base.external.clone();
            }
            merged.messages = merge_messages(&base.messages, &overlay.messages);
            merged
        }
    }
}

/// Combines two message maps; `winner` entries replace `loser` entries.
fn merge_messages(
    loser: &BTreeMap<String, String>,
    winner: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = loser.clone();
    merged.extend(winner.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

//! Schema documents and options files.
//!
//! A schema document is the YAML or JSON serialization of a
//! [`SchemaDescription`]; an options file is a single mapping of option
//! names to values. The format is chosen from the file extension.
//!
//! # Example YAML schema document
//!
//! ```yaml
//! unknown_fields: reject
//! fields:
//!   - name: optionA
//!     type: boolean
//!     required: true
//!   - name: message
//!     type: string
//!     default: default message
//!   - name: legacyMode
//!     type: boolean
//!     forbidden: true
//!     messages:
//!       any.unknown: legacyMode was removed in 2.0
//! ```

use std::path::{Path, PathBuf};

use option_schema_core::{ObjectSchema, Record, SchemaDescription};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{DocumentError, Result};

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] for anything other than
    /// `.json`, `.yaml`, or `.yml`.
    ///
    /// # Examples
    ///
    /// ```
    /// use option_schema_loader::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_path("opts.yml").unwrap(), DocumentFormat::Yaml);
    /// assert!(DocumentFormat::from_path("opts.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(DocumentError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// A parsed schema document.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    description: SchemaDescription,
    path: Option<PathBuf>,
}

impl SchemaDocument {
    /// Parses a document from a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use option_schema_loader::{DocumentFormat, SchemaDocument};
    ///
    /// let raw = "fields:\n  - name: optionA\n    type: boolean\n    required: true\n";
    /// let doc = SchemaDocument::parse(raw, DocumentFormat::Yaml).unwrap();
    /// let schema = doc.schema().unwrap();
    /// assert!(schema.field("optionA").unwrap().is_required());
    /// ```
    pub fn parse(raw: &str, format: DocumentFormat) -> Result<Self> {
        let description = match format {
            DocumentFormat::Json => serde_json::from_str(raw)?,
            DocumentFormat::Yaml => serde_yaml::from_str(raw)?,
        };
        Ok(Self {
            description,
            path: None,
        })
    }

    /// Wraps an in-memory description.
    pub fn from_description(description: SchemaDescription) -> Self {
        Self {
            description,
            path: None,
        }
    }

    pub fn description(&self) -> &SchemaDescription {
        &self.description
    }

    /// Path the document was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Builds the schema the document describes.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidSchema`] if the description is
    /// contradictory (e.g. a required field with a default).
    pub fn schema(&self) -> Result<ObjectSchema> {
        Ok(self.description.build()?)
    }

    /// SHA-256 hex digest of the document's JSON serialization.
    ///
    /// Two documents that parse to the same description share a fingerprint
    /// regardless of source format or whitespace.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(&self.description)?;
        let hash = Sha256::digest(&bytes);
        Ok(format!("{:x}", hash))
    }

    /// Serializes the document in `format`.
    pub fn render(&self, format: DocumentFormat) -> Result<String> {
        let raw = match format {
            DocumentFormat::Json => serde_json::to_string_pretty(&self.description)?,
            DocumentFormat::Yaml => serde_yaml::to_string(&self.description)?,
        };
        Ok(raw)
    }
}

/// Loads a schema document, picking the format from the extension.
///
/// # Errors
///
/// Returns [`DocumentError::UnsupportedFormat`], an I/O error, or a parse
/// error.
pub fn load_schema(path: impl AsRef<Path>) -> Result<SchemaDocument> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let raw = std::fs::read_to_string(path)?;
    let mut document = SchemaDocument::parse(&raw, format)?;
    document.path = Some(path.to_path_buf());
    debug!(
        path = %path.display(),
        fields = document.description.fields.len(),
        "loaded schema document"
    );
    Ok(document)
}

/// Parses an options record from a string.
///
/// # Errors
///
/// Returns a parse error, or [`DocumentError::RecordNotAnObject`] if the top
/// level is not a mapping.
///
/// # Examples
///
/// ```
/// use option_schema_loader::{DocumentFormat, parse_record};
///
/// let record = parse_record("optionA: true\nmessage: hi\n", DocumentFormat::Yaml).unwrap();
/// assert_eq!(record.keys().collect::<Vec<_>>(), ["optionA", "message"]);
///
/// assert!(parse_record("[1, 2]", DocumentFormat::Json).is_err());
/// ```
pub fn parse_record(raw: &str, format: DocumentFormat) -> Result<Record> {
    let value: Value = match format {
        DocumentFormat::Json => serde_json::from_str(raw)?,
        DocumentFormat::Yaml => serde_yaml::from_str(raw)?,
    };
    match value {
        Value::Object(record) => Ok(record),
        // An empty YAML document means "no options".
        Value::Null => Ok(Record::new()),
        _ => Err(DocumentError::RecordNotAnObject),
    }
}

/// Loads an options record, picking the format from the extension.
///
/// # Errors
///
/// Same as [`parse_record`], plus I/O and format errors.
pub fn load_record(path: impl AsRef<Path>) -> Result<Record> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let raw = std::fs::read_to_string(path)?;
    parse_record(&raw, format).map_err(|err| match err {
        DocumentError::RecordNotAnObject => DocumentError::NotAnObject(path.to_path_buf()),
        other => other,
    })
}

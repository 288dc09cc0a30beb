//! Error types for document loading.
//!
//! Provides a unified error type covering all failure modes: I/O, parsing,
//! unsupported file formats, malformed records, and schema construction.

use std::path::PathBuf;

use option_schema_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while loading schema documents, option records, or
/// configuration.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is not `.json`, `.yaml`, or `.yml`.
    #[error("unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An options file whose top level is not a mapping.
    #[error("options document must be an object: {}", .0.display())]
    NotAnObject(PathBuf),

    /// Options parsed from a string whose top level is not a mapping.
    #[error("options document must be an object")]
    RecordNotAnObject,

    /// Two documents in one directory resolve to the same plugin name.
    #[error(
        "duplicate schema for plugin \"{name}\": {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicatePlugin {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The schema document describes an invalid schema.
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] ConfigError),
}

/// Convenience alias for results with [`DocumentError`].
pub type Result<T> = std::result::Result<T, DocumentError>;

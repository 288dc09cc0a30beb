//! File loading for option schemas.
//!
//! This crate reads the on-disk artifacts around
//! [`option_schema_core`]: schema documents (YAML or JSON serializations of
//! a [`SchemaDescription`](option_schema_core::SchemaDescription)), options
//! files to validate, and the validator configuration.
//!
//! # Quick start
//!
//! ```no_run
//! use option_schema_loader::{ValidatorConfig, load_record, load_schema};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let schema = load_schema("plugin-options.yaml").unwrap().schema().unwrap();
//! let options = load_record("site-options.json").unwrap();
//! let config = ValidatorConfig::load("optcheck.yaml").unwrap();
//!
//! let result =
//!     option_schema_core::validate_with(&schema, &options, &config.validate_options()).await;
//! for error in result.errors() {
//!     eprintln!("{error}");
//! }
//! # });
//! ```

mod config;
mod document;
mod error;
mod registry;

pub use config::{ExternalConfig, LoggingConfig, ValidatorConfig};
pub use document::{DocumentFormat, SchemaDocument, load_record, load_schema, parse_record};
pub use error::{DocumentError, Result};
pub use registry::{SchemaRegistry, plugin_name, schema_files};

//! Validator configuration.
//!
//! Defines the YAML-serializable configuration that controls how the host
//! runs validation: whether external checks run, how long each may take, and
//! the default log level. Every section is optional.
//!
//! # Example YAML
//!
//! ```yaml
//! external:
//!   enabled: true
//!   timeout_ms: 5000
//! logging:
//!   level: info
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Duration;

use option_schema_core::ValidateOptions;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for external checks.
///
/// # Examples
///
/// ```
/// # use option_schema_loader::ExternalConfig;
/// let external = ExternalConfig::default();
/// assert!(external.enabled);
/// assert_eq!(external.timeout_ms, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalConfig {
    /// Run external checks after a clean synchronous pass.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Per-check time limit in milliseconds (no limit when absent).
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level filter (`error`, `warn`, `info`, `debug`, `trace`).
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "warn".to_string()
}

/// Top-level validator configuration.
///
/// # Examples
///
/// ```no_run
/// use option_schema_loader::ValidatorConfig;
///
/// let config = ValidatorConfig::load("optcheck.yaml").unwrap();
/// let options = config.validate_options();
/// println!("external checks enabled: {}", options.run_external);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub external: ExternalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ValidatorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DocumentError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::DocumentError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DocumentError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::DocumentError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Translates the configuration into engine options.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::time::Duration;
    /// # let yaml = "external:\n  enabled: false\n  timeout_ms: 250\n";
    /// # let config: option_schema_loader::ValidatorConfig = serde_yaml::from_str(yaml).unwrap();
    /// let options = config.validate_options();
    /// assert!(!options.run_external);
    /// assert_eq!(options.external_timeout, Some(Duration::from_millis(250)));
    /// ```
    pub fn validate_options(&self) -> ValidateOptions {
        ValidateOptions {
            run_external: self.external.enabled,
            external_timeout: self.external.timeout_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
external:
  enabled: true
  timeout_ms: 5000
logging:
  level: debug
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: ValidatorConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert!(config.external.enabled);
        assert_eq!(config.external.timeout_ms, Some(5000));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: ValidatorConfig = serde_yaml::from_str("logging:\n  level: info\n").unwrap();
        assert_eq!(config.external, ExternalConfig::default());
        assert_eq!(config.logging.level, "info");

        let partial: ValidatorConfig =
            serde_yaml::from_str("external:\n  timeout_ms: 10\n").unwrap();
        assert!(partial.external.enabled);
        assert_eq!(partial.logging, LoggingConfig::default());
    }

    #[test]
    fn test_validate_options_default_has_no_timeout() {
        let options = ValidatorConfig::default().validate_options();
        assert_eq!(options, ValidateOptions::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("optcheck.yaml");
        let config: ValidatorConfig = serde_yaml::from_str(sample_yaml()).unwrap();

        config.save(&path).unwrap();
        let loaded = ValidatorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}

//! Directory-backed collection of plugin schema documents.
//!
//! [`SchemaRegistry::from_dir`] loads every `*.json`, `*.yaml`, and `*.yml`
//! file in a directory and indexes it by file stem, which is taken to be the
//! plugin name.
//!
//! ```no_run
//! use option_schema_loader::SchemaRegistry;
//!
//! let registry = SchemaRegistry::from_dir("schemas/").unwrap();
//! if let Some(doc) = registry.get("plugin-sitemap") {
//!     println!("{} declares {} options", "plugin-sitemap", doc.description().fields.len());
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::document::{DocumentFormat, SchemaDocument, load_schema};
use crate::error::{DocumentError, Result};

/// In-memory collection of schema documents keyed by plugin name.
#[derive(Debug)]
pub struct SchemaRegistry {
    documents: HashMap<String, SchemaDocument>,
    root: PathBuf,
}

impl SchemaRegistry {
    /// Loads all schema documents in `path` (non-recursive).
    ///
    /// Files with other extensions are skipped.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be read, the first parse
    /// error encountered, or [`DocumentError::DuplicatePlugin`] when two files
    /// share a stem (e.g. `plugin.json` and `plugin.yaml`).
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut documents: HashMap<String, SchemaDocument> = HashMap::new();

        for file_path in schema_files(path)? {
            let Some(plugin) = plugin_name(&file_path) else {
                continue;
            };
            if let Some(existing) = documents.get(plugin) {
                return Err(DocumentError::DuplicatePlugin {
                    name: plugin.to_string(),
                    first: existing.path().unwrap_or(path).to_path_buf(),
                    second: file_path,
                });
            }
            let document = load_schema(&file_path)?;
            documents.insert(plugin.to_string(), document);
        }

        info!(
            root = %path.display(),
            schemas = documents.len(),
            "loaded schema registry"
        );

        Ok(Self {
            documents,
            root: path.to_path_buf(),
        })
    }

    /// Looks up a document by plugin name.
    pub fn get(&self, plugin: &str) -> Option<&SchemaDocument> {
        self.documents.get(plugin)
    }

    /// Inserts a document, replacing any existing entry for the same plugin.
    pub fn insert(&mut self, plugin: String, document: SchemaDocument) {
        self.documents.insert(plugin, document);
    }

    pub fn contains(&self, plugin: &str) -> bool {
        self.documents.contains_key(plugin)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Plugin names in sorted order.
    pub fn plugins(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Directory the registry was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Lists the schema documents in `path` in sorted order (non-recursive).
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be read.
pub fn schema_files(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(path.as_ref())?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    entries.retain(|file_path| {
        let keep = file_path.is_file() && DocumentFormat::from_path(file_path).is_ok();
        if !keep {
            debug!(path = %file_path.display(), "skipping non-schema file");
        }
        keep
    });
    Ok(entries)
}

/// Plugin name for a schema document: its file stem.
pub fn plugin_name(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

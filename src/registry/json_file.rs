//! Reader for the JSON version registry file.
//!
//! Two document shapes are accepted:
//!
//! ```json
//! { "components": { "Button": { "filePath": "...", "currentVersion": "1.0.0" } } }
//! ```
//!
//! or the same map without the `components` wrapper.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use super::types::{RegistryEntry, RegistrySnapshot};
use super::VersionRegistry;

/// Errors that can occur while reading the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Failed to read the file from disk.
    #[error("Failed to read registry: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse registry JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// An entry is structurally valid JSON but unusable.
    #[error("Invalid registry entry: {0}")]
    InvalidEntry(String),
}

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryDocument {
    Wrapped {
        components: BTreeMap<String, RegistryEntry>,
    },
    Flat(BTreeMap<String, RegistryEntry>),
}

/// Parses a registry document from a string.
///
/// # Example
///
/// ```
/// use docscope::registry::parse_str;
///
/// let json = r#"{"Button": {"filePath": "src/components/ui/button.tsx", "currentVersion": "1.0.0"}}"#;
/// let registry = parse_str(json).unwrap();
/// assert_eq!(registry.find_by_name("Button").unwrap().current_version, "1.0.0");
/// ```
pub fn parse_str(content: &str) -> RegistryResult<RegistrySnapshot> {
    let document: RegistryDocument = serde_json::from_str(content)?;
    let map = match document {
        RegistryDocument::Wrapped { components } => components,
        RegistryDocument::Flat(map) => map,
    };

    let entries: Vec<RegistryEntry> = map
        .into_iter()
        .map(|(key, mut entry)| {
            if entry.name.is_empty() {
                entry.name = key;
            }
            entry
        })
        .collect();

    let snapshot = RegistrySnapshot::new(entries);
    validate(&snapshot)?;
    Ok(snapshot)
}

/// Parses a registry file from a path.
pub fn parse_file(path: &Path) -> RegistryResult<RegistrySnapshot> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Rejects entries without a file path; they could never match a scan.
pub fn validate(snapshot: &RegistrySnapshot) -> RegistryResult<()> {
    if let Some(entry) = snapshot.iter().find(|e| e.file_path.trim().is_empty()) {
        return Err(RegistryError::InvalidEntry(format!(
            "{} has no filePath",
            entry.name
        )));
    }
    Ok(())
}

/// Registry backed by a JSON file that is re-read on every load.
#[derive(Debug, Clone)]
pub struct JsonFileRegistry {
    path: PathBuf,
}

impl JsonFileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VersionRegistry for JsonFileRegistry {
    /// A missing file is an empty registry, not an error.
    fn load(&self) -> RegistryResult<RegistrySnapshot> {
        if !self.path.exists() {
            warn!(path = %self.path.display(), "version registry not found; no components will be published");
            return Ok(RegistrySnapshot::default());
        }
        let snapshot = parse_file(&self.path)?;
        debug!(path = %self.path.display(), entries = snapshot.len(), "loaded version registry");
        Ok(snapshot)
    }
}

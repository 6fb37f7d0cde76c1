//! Static description/category/tag lookup keyed by canonical component name.
//!
//! The table is data, not code: the built-in table is an embedded JSON
//! document parsed once, and callers can supply their own document instead.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::registry::RegistryError;

/// Category used when the catalog has no entry.
pub const DEFAULT_CATEGORY: &str = "general";

const BUILTIN_CATALOG: &str = include_str!("catalog.json");

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_json_str(BUILTIN_CATALOG).expect("built-in catalog is valid JSON")
});

/// Descriptive metadata for one component.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Lookup table from canonical component name to [`CatalogEntry`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, CatalogEntry>,
}

impl Catalog {
    /// The built-in table shipped with the crate.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Parses a JSON object of `name → {description, category, tags}`.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, CatalogEntry> = serde_json::from_str(content)?;
        let entries = raw
            .into_iter()
            .map(|(name, entry)| (canonical_name(&name), entry))
            .collect();
        Ok(Self { entries })
    }

    /// Reads a catalog file.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&content)?)
    }

    /// Looks up a component by any spelling of its name.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(&canonical_name(name))
    }

    /// Description for `name`, or the generic templated one.
    pub fn description_for(&self, name: &str) -> String {
        self.get(name)
            .map(|e| e.description.clone())
            .unwrap_or_else(|| format!("{} component for the UI library", name))
    }

    /// Category for `name`, or [`DEFAULT_CATEGORY`].
    pub fn category_for(&self, name: &str) -> String {
        self.get(name)
            .map(|e| e.category.clone())
            .unwrap_or_else(default_category)
    }

    /// Tags for `name`; empty when unknown.
    pub fn tags_for(&self, name: &str) -> BTreeSet<String> {
        self.get(name).map(|e| e.tags.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical lookup key: lower-case ASCII alphanumerics only, so
/// `AlertDialog`, `alert-dialog` and `alert_dialog` coincide.
pub fn canonical_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

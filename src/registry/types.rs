//! Shared types for the version registry.
//!
//! The registry is the source of truth for which component files are
//! published. Each entry is keyed by component name and points at the
//! component's source file relative to the project root.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One published component as recorded in the version registry.
///
/// # Example
///
/// ```ignore
/// use docscope::registry::RegistryEntry;
///
/// let json = r#"{"filePath": "src/components/ui/button.tsx", "currentVersion": "1.2.0"}"#;
/// let entry: RegistryEntry = serde_json::from_str(json).unwrap();
/// assert_eq!(entry.current_version, "1.2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    /// Component name. Filled from the map key when the document omits it.
    #[serde(default)]
    pub name: String,

    /// Source file, relative to the project root.
    pub file_path: String,

    /// Published version (semver).
    pub current_version: String,

    /// Lifecycle status such as `stable` or `experimental`.
    #[serde(default)]
    pub status: Option<String>,

    /// Exported symbols, in declaration order.
    #[serde(default)]
    pub exports: Option<Vec<String>>,

    /// When the component was last changed.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl RegistryEntry {
    /// Creates an entry with only the required fields.
    pub fn new(
        name: impl Into<String>,
        file_path: impl Into<String>,
        current_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            file_path: file_path.into(),
            current_version: current_version.into(),
            status: None,
            exports: None,
            last_modified: None,
        }
    }

    /// Sets the lifecycle status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the exported symbols.
    pub fn with_exports<I, S>(mut self, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exports = Some(exports.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if `path` refers to this entry's file.
    ///
    /// The scanned path is usually absolute while the registry stores a
    /// root-relative path, so the comparison is on the normalized tail.
    pub fn matches_path(&self, path: &Path) -> bool {
        let wanted = normalize(&self.file_path);
        if wanted.is_empty() {
            return false;
        }
        let scanned = normalize(&path.to_string_lossy());
        scanned == wanted || scanned.ends_with(&format!("/{}", wanted))
    }
}

fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    unified.trim_start_matches("./").to_string()
}

/// A loaded view of the registry.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    entries: Vec<RegistryEntry>,
}

impl RegistrySnapshot {
    /// Creates a snapshot from entries.
    pub fn new(entries: Vec<RegistryEntry>) -> Self {
        Self { entries }
    }

    /// Finds the entry whose file matches `path`.
    pub fn find_by_path(&self, path: &Path) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.matches_path(path))
    }

    /// Finds an entry by exact component name.
    pub fn find_by_name(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_matches_path_by_tail() {
        let entry = RegistryEntry::new("Button", "./src/components/ui/button.tsx", "1.0.0");

        assert!(entry.matches_path(&PathBuf::from("/repo/src/components/ui/button.tsx")));
        assert!(entry.matches_path(&PathBuf::from("src/components/ui/button.tsx")));
        assert!(!entry.matches_path(&PathBuf::from("/repo/src/components/ui/icon-button.tsx")));
        assert!(!entry.matches_path(&PathBuf::from("/repo/src/components/ui/button.ts")));
    }

    #[test]
    fn test_empty_file_path_never_matches() {
        let entry = RegistryEntry::new("Ghost", "", "0.0.1");
        assert!(!entry.matches_path(&PathBuf::from("/repo/ghost.tsx")));
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = RegistrySnapshot::new(vec![
            RegistryEntry::new("Button", "src/components/ui/button.tsx", "1.0.0"),
            RegistryEntry::new("Card", "src/components/ui/card.tsx", "0.3.0").with_status("beta"),
        ]);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot
                .find_by_path(&PathBuf::from("/x/src/components/ui/card.tsx"))
                .map(|e| e.name.as_str()),
            Some("Card")
        );
        assert_eq!(
            snapshot.find_by_name("Card").and_then(|e| e.status.as_deref()),
            Some("beta")
        );
        assert!(snapshot.find_by_name("card").is_none());
    }
}

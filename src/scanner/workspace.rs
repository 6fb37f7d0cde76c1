//! Filesystem traversal for component and sample files.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::DiscoveryConfig;

/// Component source files under the components directory.
pub const COMPONENT_INCLUDE: &[&str] = &["**/*.{tsx,ts,jsx,js}"];

/// Files under the components directory that are never components.
pub const COMPONENT_EXCLUDE: &[&str] = &[
    "**/*.sample.tsx",
    "**/*.test.*",
    "**/*.spec.*",
    "**/*.stories.*",
    "**/*.d.ts",
    "**/index.*",
];

/// Sample usage files.
pub const SAMPLE_INCLUDE: &[&str] = &["**/*.sample.tsx"];

/// Suffix that marks a sample file.
pub const SAMPLE_SUFFIX: &str = ".sample.tsx";

/// Errors that can occur while preparing a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),
}

/// Result type for scanner operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Enumerates component and sample files under fixed patterns.
///
/// Scans are read-only and deterministic for a given filesystem state:
/// directory entries are visited sorted by file name.
#[derive(Debug, Clone)]
pub struct WorkspaceScanner {
    components_root: PathBuf,
    samples_root: PathBuf,
    component_include: GlobSet,
    component_exclude: GlobSet,
    sample_include: GlobSet,
}

impl WorkspaceScanner {
    /// Creates a scanner for the directories named by `config`.
    pub fn new(config: &DiscoveryConfig) -> ScanResult<Self> {
        Self::with_roots(config.components_path(), config.samples_path())
    }

    /// Creates a scanner for explicit component and sample directories.
    pub fn with_roots(
        components_root: impl Into<PathBuf>,
        samples_root: impl Into<PathBuf>,
    ) -> ScanResult<Self> {
        Ok(Self {
            components_root: components_root.into(),
            samples_root: samples_root.into(),
            component_include: build_globset(COMPONENT_INCLUDE)?,
            component_exclude: build_globset(COMPONENT_EXCLUDE)?,
            sample_include: build_globset(SAMPLE_INCLUDE)?,
        })
    }

    pub fn components_root(&self) -> &Path {
        &self.components_root
    }

    pub fn samples_root(&self) -> &Path {
        &self.samples_root
    }

    /// Component source files. A missing directory yields nothing.
    pub fn scan_components(&self) -> Vec<PathBuf> {
        walk(
            &self.components_root,
            &self.component_include,
            Some(&self.component_exclude),
        )
    }

    /// `*.sample.tsx` files. A missing directory yields nothing.
    pub fn scan_samples(&self) -> Vec<PathBuf> {
        walk(&self.samples_root, &self.sample_include, None)
    }
}

fn build_globset(patterns: &[&str]) -> ScanResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

fn walk(root: &Path, include: &GlobSet, exclude: Option<&GlobSet>) -> Vec<PathBuf> {
    if !root.is_dir() {
        debug!(root = %root.display(), "scan root does not exist");
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if !include.is_match(relative) {
            continue;
        }
        if exclude.is_some_and(|set| set.is_match(relative)) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    debug!(root = %root.display(), files = files.len(), "scan complete");
    files
}

/// Check if a directory should be ignored during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    matches!(
        name.as_ref(),
        "node_modules" | ".git" | "dist" | "build" | ".next" | "coverage" | ".turbo"
    )
}

/// Component name encoded in a sample file name (`Button.sample.tsx` → `Button`).
pub fn sample_component_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    file_name
        .strip_suffix(SAMPLE_SUFFIX)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

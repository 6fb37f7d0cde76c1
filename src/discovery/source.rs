//! Per-file read and analysis helpers shared by the facades.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::analysis::{SourceAnalyzer, SourceFacts};
use crate::scanner::{sample_component_name, WorkspaceScanner};

use super::DiscoveryResult;

/// Shared, lockable analyzer.
pub(crate) type SharedAnalyzer = Mutex<Box<dyn SourceAnalyzer>>;

/// A file read from disk.
pub(crate) struct SourceFile {
    pub content: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Reads `path`, logging and returning `None` on failure.
pub(crate) async fn read_source(path: &Path) -> Option<SourceFile> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable file");
            return None;
        }
    };
    let metadata = fs::metadata(path).await.ok();
    let size = metadata
        .as_ref()
        .map(|m| m.len())
        .unwrap_or(content.len() as u64);
    let modified = metadata
        .and_then(|m| m.modified().ok())
        .map(DateTime::<Utc>::from);

    Some(SourceFile {
        content,
        size,
        modified,
    })
}

/// Analyzes `content`, falling back to neutral facts on failure.
pub(crate) async fn analyze_or_neutral(
    analyzer: &SharedAnalyzer,
    path: &Path,
    content: &str,
) -> SourceFacts {
    let mut analyzer = analyzer.lock().await;
    match analyzer.analyze_path(path, content) {
        Ok(facts) => {
            debug!(
                path = %path.display(),
                complexity = %facts.complexity,
                interactivity = %facts.interactivity,
                "analyzed"
            );
            facts
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "analysis failed, using neutral facts");
            SourceFacts::default()
        }
    }
}

/// Runs a component scan off the async threads.
pub(crate) async fn scan_components(scanner: &WorkspaceScanner) -> DiscoveryResult<Vec<PathBuf>> {
    let scanner = scanner.clone();
    Ok(tokio::task::spawn_blocking(move || scanner.scan_components()).await?)
}

/// Runs a sample scan off the async threads.
pub(crate) async fn scan_samples(scanner: &WorkspaceScanner) -> DiscoveryResult<Vec<PathBuf>> {
    let scanner = scanner.clone();
    Ok(tokio::task::spawn_blocking(move || scanner.scan_samples()).await?)
}

/// Sample files keyed by component name, built from one scan.
#[derive(Debug, Default)]
pub(crate) struct SampleIndex {
    by_name: HashMap<String, PathBuf>,
}

impl SampleIndex {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        let mut by_name = HashMap::with_capacity(paths.len());
        for path in paths {
            if let Some(name) = sample_component_name(&path) {
                by_name.entry(name).or_insert(path);
            }
        }
        Self { by_name }
    }

    /// Scans the samples directory once.
    pub async fn scan(scanner: &WorkspaceScanner) -> DiscoveryResult<Self> {
        Ok(Self::new(scan_samples(scanner).await?))
    }

    /// Finds `<name>.sample.tsx`, matching the name exactly first and then
    /// case-insensitively. Ties on the fallback go to the first path in
    /// sorted order.
    pub fn find(&self, name: &str) -> Option<&Path> {
        if let Some(path) = self.by_name.get(name) {
            return Some(path);
        }
        self.by_name
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, p)| p.as_path())
            .min()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }
}

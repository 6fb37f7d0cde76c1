//! Discovery facades.
//!
//! [`ComponentDiscovery`] and [`SampleDiscovery`] are the externally
//! callable surface. Each owns one [`TtlCache`](crate::cache::TtlCache), one
//! scanner and one analyzer; every read first makes sure the cache is fresh
//! and then answers from the cached snapshot.
//!
//! # Example
//!
//! ```ignore
//! use docscope::config::DiscoveryConfig;
//! use docscope::discovery::{ComponentDiscovery, ComponentFilter};
//!
//! let discovery = ComponentDiscovery::new(DiscoveryConfig::for_root("."))?;
//! discovery.initialize().await?;
//! for component in discovery.search_components("button", &ComponentFilter::default()).await? {
//!     println!("{} {}", component.name, component.version);
//! }
//! ```

mod components;
mod samples;
mod source;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::metadata::ComponentRecord;
use crate::registry::RegistryError;
use crate::scanner::ScanError;

pub use components::ComponentDiscovery;
pub use samples::SampleDiscovery;

/// Errors surfaced by discovery operations.
///
/// Per-file read and parse failures never appear here: those files are
/// logged and skipped (or analyzed as neutral) during a refresh.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// No component or sample with the requested name.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The version registry could not be loaded.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The custom catalog could not be loaded.
    #[error("Failed to load catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },

    /// The scanner could not be set up.
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// The analyzer could not be created.
    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalysisError),

    /// A background scan task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type alias for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Narrowing and enrichment options for component listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentFilter {
    /// Case-insensitive category match.
    pub category: Option<String>,
    /// Case-insensitive status match.
    pub status: Option<String>,
    pub limit: Option<usize>,
    /// Fill in observed props before returning.
    pub include_props: bool,
    /// Fill in observed variants before returning.
    pub include_variants: bool,
}

impl ComponentFilter {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_props(mut self) -> Self {
        self.include_props = true;
        self
    }

    pub fn with_variants(mut self) -> Self {
        self.include_variants = true;
        self
    }

    /// True if `record` passes the category and status constraints.
    pub fn matches(&self, record: &ComponentRecord) -> bool {
        let category_ok = self
            .category
            .as_ref()
            .map_or(true, |c| record.category.eq_ignore_ascii_case(c));
        let status_ok = self
            .status
            .as_ref()
            .map_or(true, |s| record.status.eq_ignore_ascii_case(s));
        category_ok && status_ok
    }

    fn needs_usages(&self) -> bool {
        self.include_props || self.include_variants
    }
}

/// Summary of the component cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStatistics {
    pub total: usize,
    pub counts_by_category: BTreeMap<String, usize>,
    pub counts_by_status: BTreeMap<String, usize>,
    /// Mean number of distinct prop names observed per component.
    pub average_props_per_component: f64,
    pub components_with_variants: usize,
}

/// Summary of the sample cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleStatistics {
    pub total_samples: usize,
    pub total_size: u64,
    pub average_size: f64,
    pub counts_by_complexity: BTreeMap<String, usize>,
    pub counts_by_interactivity: BTreeMap<String, usize>,
    /// Pattern names with the number of samples showing them, most common first.
    pub most_common_patterns: Vec<(String, usize)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn record(category: &str, status: &str) -> ComponentRecord {
        ComponentRecord {
            name: "Button".to_string(),
            description: String::new(),
            version: "1.0.0".to_string(),
            status: status.to_string(),
            category: category.to_string(),
            file_path: PathBuf::from("button.tsx"),
            exports: Vec::new(),
            tags: Default::default(),
            props: None,
            variants: None,
            last_modified: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_filter_matches() {
        let r = record("form", "stable");
        assert!(ComponentFilter::default().matches(&r));
        assert!(ComponentFilter::default().with_category("Form").matches(&r));
        assert!(!ComponentFilter::default().with_status("beta").matches(&r));
        assert!(!ComponentFilter::default()
            .with_category("form")
            .with_status("beta")
            .matches(&r));
    }

    #[test]
    fn test_filter_deserializes_partial() {
        let filter: ComponentFilter =
            serde_json::from_str(r#"{"category": "form", "includeProps": true}"#).unwrap();
        assert_eq!(filter.category.as_deref(), Some("form"));
        assert!(filter.include_props);
        assert!(!filter.include_variants);
        assert!(filter.limit.is_none());
    }
}

//! Canonical per-entity records stored in the discovery caches.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{PropUsage, SampleAnalysis, VariantUsage};
use crate::cache::Keyed;

/// A published UI component, joined from its source file and registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    pub name: String,
    pub description: String,
    pub version: String,
    pub status: String,
    pub category: String,
    pub file_path: PathBuf,
    pub exports: Vec<String>,
    pub tags: BTreeSet<String>,
    /// Observed prop usages; `None` until first requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<PropUsage>>,
    /// Observed variant usages; `None` until first requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<VariantUsage>>,
    pub last_modified: DateTime<Utc>,
}

impl ComponentRecord {
    /// True if `tag` is this component's name or one of its exports.
    pub fn answers_to(&self, tag: &str) -> bool {
        self.name == tag || self.exports.iter().any(|e| e == tag)
    }
}

impl Keyed for ComponentRecord {
    fn key(&self) -> &str {
        &self.name
    }
}

/// A `<Component>.sample.tsx` usage file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRecord {
    pub file_name: String,
    pub component_name: String,
    pub file_path: PathBuf,
    pub content: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub description: String,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub tags: BTreeSet<String>,
    /// Analysis from the refresh pass; `None` for records built elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<SampleAnalysis>,
}

impl Keyed for SampleRecord {
    fn key(&self) -> &str {
        &self.file_name
    }
}

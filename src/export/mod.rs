//! Export functionality for the discovered component catalog.
//!
//! This module provides exporters for writing the component catalog,
//! its statistics and the sample usage patterns in various formats:
//! JSON, CSV, and Markdown.

pub mod csv;
pub mod json;
pub mod markdown;

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use crate::discovery::ComponentStatistics;
use crate::metadata::ComponentRecord;
use crate::ranking::PatternAggregate;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - one row per component
    Csv,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Data container for export operations.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Workspace name shown in report headers
    pub project_name: String,
    pub generated_at: DateTime<Utc>,
    pub components: Vec<ComponentRecord>,
    pub statistics: ComponentStatistics,
    /// Usage patterns aggregated over the sample corpus
    pub patterns: Vec<PatternAggregate>,
}

impl ExportData {
    /// Create new export data from discovery results.
    pub fn new(
        project_name: impl Into<String>,
        components: Vec<ComponentRecord>,
        statistics: ComponentStatistics,
        patterns: Vec<PatternAggregate>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            generated_at: Utc::now(),
            components,
            statistics,
            patterns,
        }
    }

    /// Number of distinct prop names observed on `component`.
    pub fn prop_count(component: &ComponentRecord) -> usize {
        let mut names: Vec<&str> = component
            .props
            .iter()
            .flatten()
            .map(|p| p.name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }

    /// Distinct `name=value` variant pairs observed on `component`.
    pub fn variant_labels(component: &ComponentRecord) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for usage in component.variants.iter().flatten() {
            let label = format!("{}={}", usage.variant_name, usage.value);
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Csv => csv::CsvExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::analysis::{PropUsage, SampleAnalysis, ValueKind, VariantUsage};
    use std::collections::{BTreeMap, BTreeSet};
    use std::path::PathBuf;

    pub fn component(name: &str, category: &str, with_usages: bool) -> ComponentRecord {
        let (props, variants) = if with_usages {
            (
                Some(vec![
                    PropUsage {
                        component: name.to_string(),
                        name: "variant".to_string(),
                        value: "outline".to_string(),
                        value_kind: ValueKind::Literal,
                    },
                    PropUsage {
                        component: name.to_string(),
                        name: "onClick".to_string(),
                        value: "save".to_string(),
                        value_kind: ValueKind::Variable,
                    },
                ]),
                Some(vec![VariantUsage {
                    variant_name: "variant".to_string(),
                    value: "outline".to_string(),
                    component: name.to_string(),
                }]),
            )
        } else {
            (None, None)
        };

        ComponentRecord {
            name: name.to_string(),
            description: format!("{}, for testing", name),
            version: "1.0.0".to_string(),
            status: "stable".to_string(),
            category: category.to_string(),
            file_path: PathBuf::from(format!("src/components/ui/{}.tsx", name.to_lowercase())),
            exports: vec![name.to_string()],
            tags: BTreeSet::new(),
            props,
            variants,
            last_modified: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn export_data() -> ExportData {
        let components = vec![
            component("Button", "form", true),
            component("Card", "layout", false),
        ];
        let statistics = ComponentStatistics {
            total: 2,
            counts_by_category: BTreeMap::from([
                ("form".to_string(), 1),
                ("layout".to_string(), 1),
            ]),
            counts_by_status: BTreeMap::from([("stable".to_string(), 2)]),
            average_props_per_component: 1.0,
            components_with_variants: 1,
        };
        let analysis = SampleAnalysis {
            patterns: BTreeSet::from(["click-handling".to_string()]),
            ..SampleAnalysis::default()
        };
        let patterns = crate::ranking::aggregate(vec![("Button", &analysis)]);
        ExportData::new("test-workspace", components, statistics, patterns)
    }
}

//! JSON export implementation.
//!
//! Exports the component catalog in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use crate::discovery::ComponentStatistics;
use crate::metadata::ComponentRecord;
use crate::ranking::PatternAggregate;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Project info for JSON output.
#[derive(Serialize)]
struct JsonProject<'a> {
    name: &'a str,
    generated_at: DateTime<Utc>,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    project: JsonProject<'a>,
    summary: &'a ComponentStatistics,
    components: &'a [ComponentRecord],
    #[serde(skip_serializing_if = "no_patterns")]
    patterns: &'a [PatternAggregate],
}

fn no_patterns(patterns: &&[PatternAggregate]) -> bool {
    patterns.is_empty()
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let export = JsonExport {
            project: JsonProject {
                name: &data.project_name,
                generated_at: data.generated_at,
            },
            summary: &data.statistics,
            components: &data.components,
            patterns: &data.patterns,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

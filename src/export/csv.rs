//! CSV export implementation.
//!
//! Exports one row per component for spreadsheet use.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "name,version,status,category,file_path,exports,tags,props,variants"
        )?;

        for component in &data.components {
            let exports = component.exports.join(";");
            let tags = component
                .tags
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(";");
            let variants = ExportData::variant_labels(component).join(";");

            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{}",
                Self::escape_field(&component.name),
                Self::escape_field(&component.version),
                Self::escape_field(&component.status),
                Self::escape_field(&component.category),
                Self::escape_field(&component.file_path.to_string_lossy()),
                Self::escape_field(&exports),
                Self::escape_field(&tags),
                ExportData::prop_count(component),
                Self::escape_field(&variants),
            )?;
        }

        Ok(())
    }
}

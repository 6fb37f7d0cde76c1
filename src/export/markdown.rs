//! Markdown export implementation.
//!
//! Exports the component catalog in Markdown format for documentation.

use super::{ExportData, Exporter};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl MarkdownExporter {
    /// Escape pipes so a value stays inside its table cell.
    fn cell(value: &str) -> String {
        value.replace('|', "\\|").replace('\n', " ")
    }
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let stats = &data.statistics;

        // Title
        writeln!(writer, "# Component Catalog")?;
        writeln!(writer)?;
        writeln!(writer, "**Workspace:** {}", data.project_name)?;
        writeln!(
            writer,
            "**Generated:** {}",
            data.generated_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Value |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Total Components | {} |", stats.total)?;
        writeln!(
            writer,
            "| Average Props per Component | {:.1} |",
            stats.average_props_per_component
        )?;
        writeln!(
            writer,
            "| Components with Variants | {} |",
            stats.components_with_variants
        )?;
        for (status, count) in &stats.counts_by_status {
            writeln!(writer, "| Status: {} | {} |", Self::cell(status), count)?;
        }
        writeln!(writer)?;

        // Components grouped by category
        writeln!(writer, "## Components")?;
        writeln!(writer)?;

        let mut by_category: BTreeMap<&str, Vec<_>> = BTreeMap::new();
        for component in &data.components {
            by_category
                .entry(component.category.as_str())
                .or_default()
                .push(component);
        }

        for (category, components) in &by_category {
            writeln!(writer, "### {} ({})", category, components.len())?;
            writeln!(writer)?;
            writeln!(writer, "| Component | Version | Status | Description |")?;
            writeln!(writer, "|-----------|---------|--------|-------------|")?;
            for component in components {
                writeln!(
                    writer,
                    "| {} | {} | {} | {} |",
                    Self::cell(&component.name),
                    Self::cell(&component.version),
                    Self::cell(&component.status),
                    Self::cell(&component.description)
                )?;
            }
            writeln!(writer)?;

            for component in components {
                let variants = ExportData::variant_labels(component);
                if variants.is_empty() {
                    continue;
                }
                writeln!(
                    writer,
                    "- **{}** variants: {}",
                    component.name,
                    variants
                        .iter()
                        .map(|v| format!("`{}`", v))
                        .collect::<Vec<_>>()
                        .join(", ")
                )?;
            }
        }

        // Usage patterns
        if !data.patterns.is_empty() {
            writeln!(writer, "## Usage Patterns")?;
            writeln!(writer)?;
            writeln!(writer, "| Pattern | Samples | Components |")?;
            writeln!(writer, "|---------|---------|------------|")?;
            for pattern in &data.patterns {
                let components: Vec<&str> =
                    pattern.components.iter().map(String::as_str).collect();
                writeln!(
                    writer,
                    "| {} | {} | {} |",
                    Self::cell(&pattern.pattern_name),
                    pattern.frequency,
                    Self::cell(&components.join(", "))
                )?;
            }
            writeln!(writer)?;

            for pattern in &data.patterns {
                if pattern.best_practices.is_empty() {
                    continue;
                }
                writeln!(writer, "### {}", pattern.pattern_name)?;
                writeln!(writer)?;
                writeln!(writer, "{}", pattern.description)?;
                writeln!(writer)?;
                for practice in &pattern.best_practices {
                    writeln!(writer, "- {}", practice)?;
                }
                writeln!(writer)?;
            }
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by docscope*")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    fn render(data: &ExportData) -> String {
        let mut output = Vec::new();
        MarkdownExporter.export(data, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_markdown_export_basic() {
        let md = render(&fixtures::export_data());

        assert!(md.contains("# Component Catalog"));
        assert!(md.contains("**Workspace:** test-workspace"));
        assert!(md.contains("| Total Components | 2 |"));
        assert!(md.contains("| Average Props per Component | 1.0 |"));
        assert!(md.contains("*Generated by docscope*"));
    }

    #[test]
    fn test_markdown_groups_by_category() {
        let md = render(&fixtures::export_data());

        assert!(md.contains("### form (1)"));
        assert!(md.contains("### layout (1)"));
        assert!(md.contains("| Button | 1.0.0 | stable | Button, for testing |"));
        assert!(md.contains("- **Button** variants: `variant=outline`"));
        assert!(md.find("### form").unwrap() < md.find("### layout").unwrap());
    }

    #[test]
    fn test_markdown_patterns_section() {
        let md = render(&fixtures::export_data());
        assert!(md.contains("## Usage Patterns"));
        assert!(md.contains("| click-handling | 1 | Button |"));
        assert!(md.contains("### click-handling"));
    }

    #[test]
    fn test_markdown_no_patterns_section_when_empty() {
        let mut data = fixtures::export_data();
        data.patterns.clear();
        let md = render(&data);
        assert!(!md.contains("## Usage Patterns"));
    }

    #[test]
    fn test_markdown_cell_escaping() {
        assert_eq!(MarkdownExporter::cell("a|b"), "a\\|b");
        assert_eq!(MarkdownExporter::cell("a\nb"), "a b");
    }
}

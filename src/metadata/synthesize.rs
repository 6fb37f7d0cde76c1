//! Joins analyzer output with registry data into canonical records.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::{DependencyKind, SourceFacts};
use crate::registry::RegistryEntry;
use crate::scanner::sample_component_name;

use super::catalog::Catalog;
use super::records::{ComponentRecord, SampleRecord};

/// Status assumed when the registry does not name one.
pub const DEFAULT_STATUS: &str = "stable";

static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*+(.*?)\*/").expect("valid regex"));

static LINE_COMMENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:^[ \t]*//[^\n]*\n?)+").expect("valid regex"));

/// Builds the record for a component file that the registry publishes.
///
/// Registry exports win over exports found in the source. The modification
/// time comes from the registry, then from the file, then the epoch.
pub fn synthesize_component(
    path: &Path,
    facts: &SourceFacts,
    entry: &RegistryEntry,
    catalog: &Catalog,
    file_modified: Option<DateTime<Utc>>,
) -> ComponentRecord {
    let name = entry.name.clone();
    let status = entry
        .status
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_STATUS.to_string());
    let exports = match &entry.exports {
        Some(exports) if !exports.is_empty() => exports.clone(),
        _ => facts.exports.clone(),
    };

    let mut tags = catalog.tags_for(&name);
    tags.insert(name.to_lowercase());
    tags.insert(status.to_lowercase());

    ComponentRecord {
        description: catalog.description_for(&name),
        version: entry.current_version.clone(),
        category: catalog.category_for(&name),
        file_path: path.to_path_buf(),
        exports,
        tags,
        props: None,
        variants: None,
        last_modified: entry
            .last_modified
            .or(file_modified)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        status,
        name,
    }
}

/// Builds the record for a sample file. Returns `None` if the file name
/// does not follow the `<Component>.sample.tsx` convention.
pub fn synthesize_sample(
    path: &Path,
    content: &str,
    size: u64,
    modified: DateTime<Utc>,
    facts: &SourceFacts,
) -> Option<SampleRecord> {
    let component_name = sample_component_name(path)?;
    let file_name = path.file_name()?.to_string_lossy().into_owned();

    let description = leading_comment(content)
        .unwrap_or_else(|| format!("Usage examples for {}", component_name));

    let mut tags: BTreeSet<String> = BTreeSet::new();
    tags.insert("sample".to_string());
    tags.insert(component_name.to_lowercase());
    for dep in &facts.dependencies {
        if dep.kind == DependencyKind::UiKit {
            tags.insert(dep.name.to_lowercase());
        }
    }

    Some(SampleRecord {
        file_name,
        component_name,
        file_path: path.to_path_buf(),
        content: content.to_string(),
        size,
        last_modified: modified,
        description,
        imports: facts.import_sources(),
        exports: facts.exports.clone(),
        tags,
        analysis: None,
    })
}

/// Text of the first comment in `content`, without comment markers.
///
/// Whichever of a block comment or a run of line comments starts first is
/// used. Blank comments yield `None`.
pub fn leading_comment(content: &str) -> Option<String> {
    let block = BLOCK_COMMENT
        .captures(content)
        .and_then(|c| c.get(0).zip(c.get(1)))
        .map(|(whole, body)| (whole.start(), clean_block(body.as_str())));
    let lines = LINE_COMMENTS
        .find(content)
        .map(|m| (m.start(), clean_lines(m.as_str())));

    let first = match (block, lines) {
        (Some(b), Some(l)) => Some(if b.0 <= l.0 { b } else { l }),
        (b, l) => b.or(l),
    };
    first.map(|(_, text)| text).filter(|text| !text.is_empty())
}

fn clean_block(body: &str) -> String {
    body.lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty() && !line.starts_with('@'))
        .collect::<Vec<_>>()
        .join(" ")
}

fn clean_lines(run: &str) -> String {
    run.lines()
        .map(|line| line.trim().trim_start_matches('/').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Dependency, Import, ImportSpecifier};
    use std::path::PathBuf;

    fn button_entry() -> RegistryEntry {
        RegistryEntry::new("Button", "src/components/ui/button.tsx", "1.2.0")
    }

    #[test]
    fn test_component_defaults() {
        let facts = SourceFacts {
            exports: vec!["Button".to_string(), "buttonVariants".to_string()],
            ..SourceFacts::default()
        };
        let record = synthesize_component(
            Path::new("/repo/src/components/ui/button.tsx"),
            &facts,
            &button_entry(),
            &Catalog::builtin(),
            None,
        );

        assert_eq!(record.name, "Button");
        assert_eq!(record.version, "1.2.0");
        assert_eq!(record.status, DEFAULT_STATUS);
        assert_eq!(record.category, "form");
        assert_eq!(record.exports, vec!["Button", "buttonVariants"]);
        assert!(record.tags.contains("button"));
        assert!(record.tags.contains("stable"));
        assert!(record.tags.contains("clickable"));
        assert_eq!(record.last_modified, DateTime::<Utc>::UNIX_EPOCH);
        assert!(record.props.is_none());
    }

    #[test]
    fn test_component_registry_overrides() {
        let entry = button_entry()
            .with_status("experimental")
            .with_exports(["Button"]);
        let facts = SourceFacts {
            exports: vec!["Other".to_string()],
            ..SourceFacts::default()
        };
        let record = synthesize_component(
            Path::new("button.tsx"),
            &facts,
            &entry,
            &Catalog::builtin(),
            None,
        );
        assert_eq!(record.status, "experimental");
        assert_eq!(record.exports, vec!["Button"]);
        assert!(record.tags.contains("experimental"));
    }

    #[test]
    fn test_unknown_component_uses_template() {
        let entry = RegistryEntry::new("Flux", "flux.tsx", "0.1.0");
        let record = synthesize_component(
            Path::new("flux.tsx"),
            &SourceFacts::default(),
            &entry,
            &Catalog::builtin(),
            None,
        );
        assert_eq!(record.description, "Flux component for the UI library");
        assert_eq!(record.category, "general");
        assert_eq!(
            record.tags,
            ["flux", "stable"].iter().map(|s| s.to_string()).collect()
        );
    }

    #[test]
    fn test_sample_record() {
        let content = "/**\n * Shows every button variant.\n */\nimport { Button } from '@/components/ui/button';\n";
        let facts = SourceFacts {
            imports: vec![Import {
                source: "@/components/ui/button".to_string(),
                specifiers: vec![ImportSpecifier::Named {
                    imported: "Button".to_string(),
                    local: "Button".to_string(),
                }],
                line: 4,
            }],
            dependencies: vec![Dependency {
                name: "Button".to_string(),
                source: "@/components/ui/button".to_string(),
                kind: DependencyKind::UiKit,
            }],
            ..SourceFacts::default()
        };

        let record = synthesize_sample(
            &PathBuf::from("/samples/Button.sample.tsx"),
            content,
            content.len() as u64,
            DateTime::<Utc>::UNIX_EPOCH,
            &facts,
        )
        .unwrap();

        assert_eq!(record.file_name, "Button.sample.tsx");
        assert_eq!(record.component_name, "Button");
        assert_eq!(record.description, "Shows every button variant.");
        assert_eq!(record.imports, vec!["@/components/ui/button"]);
        assert_eq!(
            record.tags,
            ["button", "sample"].iter().map(|s| s.to_string()).collect()
        );
    }

    #[test]
    fn test_sample_default_description() {
        let record = synthesize_sample(
            Path::new("Alert.sample.tsx"),
            "export default function A() { return null }",
            0,
            DateTime::<Utc>::UNIX_EPOCH,
            &SourceFacts::default(),
        )
        .unwrap();
        assert_eq!(record.description, "Usage examples for Alert");
    }

    #[test]
    fn test_non_sample_file_is_rejected() {
        let record = synthesize_sample(
            Path::new("Alert.tsx"),
            "",
            0,
            DateTime::<Utc>::UNIX_EPOCH,
            &SourceFacts::default(),
        );
        assert!(record.is_none());
    }

    #[test]
    fn test_leading_comment_variants() {
        assert_eq!(
            leading_comment("// Form sample\n// with validation\nconst x = 1;"),
            Some("Form sample with validation".to_string())
        );
        assert_eq!(
            leading_comment("// first\n/* second */"),
            Some("first".to_string())
        );
        assert_eq!(leading_comment("/* */ const a = 1;"), None);
        assert_eq!(leading_comment("const a = 1;"), None);
    }
}

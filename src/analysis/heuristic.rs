//! Text-heuristic analyzer.
//!
//! Works directly on raw source text with regular expressions: import
//! blocks, export declarations, capitalized JSX opening tags, and
//! `name=value` attribute assignments. Less precise than the syntax-tree
//! strategy (value kinds are guessed from string shape) but never fails to
//! parse.

use once_cell::sync::Lazy;
use regex::Regex;

use super::imports::{classify_imports, Import, ImportSpecifier, SourceLanguage};
use super::signals::{self, is_component_tag, Signals};
use super::types::{
    CodeExample, Complexity, PropUsage, SourceFacts, ValueKind, VariantUsage, VARIANT_ATTRIBUTES,
};
use super::{AnalysisResult, AnalyzerStrategy, SourceAnalyzer};

/// Maximum number of examples kept per file.
pub const MAX_EXAMPLES: usize = 5;

static IMPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+(?:type\s+)?([^'";]+?)\s+from\s+['"]([^'"]+)['"]"#)
        .expect("valid import regex")
});
static IMPORT_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+['"]([^'"]+)['"]"#).expect("valid side-effect import regex")
});
static EXPORT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bexport\s+(?:default\s+)?(?:async\s+)?(?:function\*?|const|let|var|class|interface|type|enum)\s+([A-Za-z_$][\w$]*)",
    )
    .expect("valid export regex")
});
static EXPORT_DEFAULT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bexport\s+default\s+([A-Za-z_$][\w$]*)\s*;?\s*$")
        .expect("valid default export regex")
});
static EXPORT_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bexport\s*\{([^}]*)\}").expect("valid export list regex"));
static CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)\s*(?:<[^()<>]*>)?\s*\(")
        .expect("valid call regex")
});
static HOOK_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\buse[A-Z]\w*\s*(?:<[^()<>]*>)?\s*\(").expect("valid hook regex"));
static OPEN_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([A-Za-z][\w.]*)((?:[^<>{}]|\{(?:[^{}]|\{[^{}]*\})*\})*?)(/?)>")
        .expect("valid tag regex")
});
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"([A-Za-z_][\w-]*)(?:=(?:"([^"]*)"|'([^']*)'|\{((?:[^{}]|\{(?:[^{}]|\{[^{}]*\})*\})*)\}))?"#,
    )
    .expect("valid attribute regex")
});
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").expect("valid identifier regex"));
static LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:-?\d+(?:\.\d+)?|true|false|null|undefined|"[^"]*"|'[^']*')$"#)
        .expect("valid literal regex")
});

/// Keywords that can follow `export default` without naming anything.
const NON_NAMES: [&str; 4] = ["function", "class", "async", "new"];

/// Analyzer that matches patterns over raw text.
pub struct HeuristicAnalyzer {
    ui_kit_modules: Vec<String>,
}

impl HeuristicAnalyzer {
    /// Create a new analyzer; `ui_kit_modules` names the design-system modules.
    pub fn new(ui_kit_modules: Vec<String>) -> Self {
        Self { ui_kit_modules }
    }
}

impl SourceAnalyzer for HeuristicAnalyzer {
    fn strategy(&self) -> AnalyzerStrategy {
        AnalyzerStrategy::Heuristic
    }

    fn analyze(&mut self, source: &str, _language: SourceLanguage) -> AnalysisResult<SourceFacts> {
        let imports = extract_imports(source);
        let exports = extract_exports(source);

        let mut signals = Signals::default();
        for caps in CALL.captures_iter(source) {
            if !is_keyword(&caps[1]) {
                signals.record_call(&caps[1]);
            }
        }

        let tags = scan_tags(source);
        let mut prop_usages = Vec::new();
        let mut variant_usages = Vec::new();
        for tag in &tags {
            for (name, value, kind) in &tag.attributes {
                signals.record_attribute(name);
                if !is_component_tag(&tag.name) {
                    continue;
                }
                if VARIANT_ATTRIBUTES.contains(&name.as_str()) {
                    variant_usages.push(VariantUsage {
                        variant_name: name.clone(),
                        value: value.clone(),
                        component: tag.name.clone(),
                    });
                }
                prop_usages.push(PropUsage {
                    component: tag.name.clone(),
                    name: name.clone(),
                    value: value.clone(),
                    value_kind: *kind,
                });
            }
        }

        let dependencies = classify_imports(&imports, &self.ui_kit_modules);

        Ok(SourceFacts {
            patterns: signals.patterns(),
            interactivity: signals.interactivity(),
            complexity: Complexity::from_heuristic_score(heuristic_score(source, tags.len())),
            best_practices: signals::best_practices(source),
            examples: extract_examples(source, &tags),
            imports,
            exports,
            dependencies,
            prop_usages,
            variant_usages,
        })
    }
}

fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "if" | "for" | "while" | "switch" | "catch" | "function" | "return" | "typeof"
    )
}

/// Non-blank lines + 10 per hook call + 5 per JSX tag.
fn heuristic_score(source: &str, tag_count: usize) -> usize {
    let lines = source.lines().filter(|l| !l.trim().is_empty()).count();
    let hooks = HOOK_CALL.find_iter(source).count();
    lines + hooks * 10 + tag_count * 5
}

fn extract_imports(source: &str) -> Vec<Import> {
    let mut imports: Vec<(usize, Import)> = Vec::new();

    for caps in IMPORT_FROM.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        imports.push((
            whole.start(),
            Import {
                source: caps[2].to_string(),
                specifiers: parse_clause(&caps[1]),
                line: line_of(source, whole.start()),
            },
        ));
    }
    for caps in IMPORT_BARE.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        imports.push((
            whole.start(),
            Import {
                source: caps[1].to_string(),
                specifiers: vec![ImportSpecifier::SideEffect],
                line: line_of(source, whole.start()),
            },
        ));
    }

    imports.sort_by_key(|(offset, _)| *offset);
    imports.into_iter().map(|(_, import)| import).collect()
}

/// Parses `Default, { a, b as c }` or `* as ns`.
fn parse_clause(clause: &str) -> Vec<ImportSpecifier> {
    let mut specifiers = Vec::new();
    let (head, named) = match clause.find('{') {
        Some(idx) => (&clause[..idx], Some(&clause[idx + 1..])),
        None => (clause, None),
    };

    for part in head.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(ns) = part.strip_prefix('*') {
            let name = ns.trim().trim_start_matches("as").trim();
            specifiers.push(ImportSpecifier::Namespace(name.to_string()));
        } else {
            specifiers.push(ImportSpecifier::Default(part.to_string()));
        }
    }

    if let Some(named) = named {
        let named = named.split('}').next().unwrap_or_default();
        for part in named.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let part = part.strip_prefix("type ").unwrap_or(part).trim();
            let mut pieces = part.split(" as ").map(str::trim);
            let imported = pieces.next().unwrap_or_default().to_string();
            let local = pieces.next().map(str::to_string).unwrap_or_else(|| imported.clone());
            specifiers.push(ImportSpecifier::Named { imported, local });
        }
    }

    specifiers
}

fn extract_exports(source: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    for caps in EXPORT_DECL.captures_iter(source) {
        if let Some(name) = caps.get(1) {
            found.push((name.start(), name.as_str().to_string()));
        }
    }
    for line in source.lines() {
        if let Some(caps) = EXPORT_DEFAULT_NAME.captures(line) {
            let name = &caps[1];
            if !NON_NAMES.contains(&name) {
                let offset = line.as_ptr() as usize - source.as_ptr() as usize;
                found.push((offset, name.to_string()));
            }
        }
    }
    for caps in EXPORT_LIST.captures_iter(source) {
        let Some(list) = caps.get(1) else { continue };
        for part in list.as_str().split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let name = part.rsplit(" as ").next().unwrap_or(part).trim();
            found.push((list.start(), name.to_string()));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    let mut exports: Vec<String> = Vec::new();
    for (_, name) in found {
        if !exports.contains(&name) {
            exports.push(name);
        }
    }
    exports
}

/// One JSX opening tag found in the text.
struct Tag {
    name: String,
    start: usize,
    end: usize,
    self_closing: bool,
    attributes: Vec<(String, String, ValueKind)>,
}

fn scan_tags(source: &str) -> Vec<Tag> {
    OPEN_TAG
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            // Skip generics like `Array<string>` and comparisons like `a<b`.
            let preceding = source[..whole.start()].chars().next_back();
            if preceding.is_some_and(|c| c.is_alphanumeric() || c == '_') {
                return None;
            }
            Some(Tag {
                name: caps[1].to_string(),
                start: whole.start(),
                end: whole.end(),
                self_closing: &caps[3] == "/",
                attributes: parse_attributes(&caps[2]),
            })
        })
        .collect()
}

fn parse_attributes(body: &str) -> Vec<(String, String, ValueKind)> {
    ATTRIBUTE
        .captures_iter(body)
        .filter_map(|caps| {
            let name_match = caps.get(1)?;
            // `{...props}` spreads are not named attributes.
            if body[..name_match.start()].ends_with('.') {
                return None;
            }
            let name = name_match.as_str().to_string();
            if let Some(v) = caps.get(2).or_else(|| caps.get(3)) {
                return Some((name, v.as_str().to_string(), ValueKind::Literal));
            }
            if let Some(expr) = caps.get(4) {
                let expr = expr.as_str().trim();
                let kind = if IDENTIFIER.is_match(expr) {
                    ValueKind::Variable
                } else if LITERAL.is_match(expr) {
                    ValueKind::Literal
                } else {
                    ValueKind::Expression
                };
                let value = expr.trim_matches(['"', '\'']).to_string();
                return Some((name, value, kind));
            }
            Some((name, "true".to_string(), ValueKind::Literal))
        })
        .collect()
}

/// Snippets rooted at capitalized tags, skipping tags nested in an earlier
/// snippet.
fn extract_examples(source: &str, tags: &[Tag]) -> Vec<CodeExample> {
    let mut examples = Vec::new();
    let mut covered_until = 0;

    for tag in tags {
        if examples.len() >= MAX_EXAMPLES {
            break;
        }
        if tag.start < covered_until || !is_component_tag(&tag.name) {
            continue;
        }

        let end = if tag.self_closing {
            tag.end
        } else {
            let closing = format!("</{}>", tag.name);
            source[tag.end..]
                .find(&closing)
                .map(|idx| tag.end + idx + closing.len())
                .unwrap_or(tag.end)
        };
        let code = &source[tag.start..end];
        let complex = tags
            .iter()
            .filter(|t| t.start >= tag.start && t.end <= end)
            .flat_map(|t| t.attributes.iter())
            .any(|(_, _, kind)| *kind == ValueKind::Expression);

        examples.push(CodeExample::new(
            signals::classify_example(code, complex),
            &tag.name,
            code,
        ));
        covered_until = end;
    }

    examples
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

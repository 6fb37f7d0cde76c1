//! Facts extracted from a single source file.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::imports::{Dependency, Import};

/// Upper bound for syntax-tree complexity classified as simple.
pub const SYNTAX_SIMPLE_MAX: usize = 25;
/// Upper bound for syntax-tree complexity classified as intermediate.
pub const SYNTAX_INTERMEDIATE_MAX: usize = 50;
/// Upper bound for heuristic complexity classified as simple.
pub const HEURISTIC_SIMPLE_MAX: usize = 150;
/// Upper bound for heuristic complexity classified as intermediate.
pub const HEURISTIC_INTERMEDIATE_MAX: usize = 300;

/// How a prop value was written in markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// A quoted string, number, boolean or bare attribute.
    Literal,
    /// A single identifier in braces: `value={name}`
    Variable,
    /// Anything else in braces.
    Expression,
}

/// An observed prop assignment on a component tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropUsage {
    /// Component tag the prop was written on.
    pub component: String,
    pub name: String,
    pub value: String,
    pub value_kind: ValueKind,
}

/// Attributes tracked as stylistic variants.
pub const VARIANT_ATTRIBUTES: [&str; 3] = ["variant", "size", "color"];

/// An observed `variant`/`size`/`color` value on a component tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantUsage {
    pub variant_name: String,
    pub value: String,
    pub component: String,
}

/// Classification of a code example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExampleKind {
    Basic,
    /// References boolean-looking state (`isOpen`, `hasError`, `*State*`).
    Interactive,
    /// Passes a non-trivial expression to an attribute.
    Advanced,
}

impl ExampleKind {
    fn title(&self) -> &'static str {
        match self {
            ExampleKind::Basic => "Basic",
            ExampleKind::Interactive => "Interactive",
            ExampleKind::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for ExampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExampleKind::Basic => "basic",
            ExampleKind::Interactive => "interactive",
            ExampleKind::Advanced => "advanced",
        };
        write!(f, "{}", s)
    }
}

/// A JSX snippet rooted at a component tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExample {
    #[serde(rename = "type")]
    pub kind: ExampleKind,
    pub code: String,
    pub description: String,
}

impl CodeExample {
    /// Creates an example and derives its description from the root tag.
    pub fn new(kind: ExampleKind, tag: &str, code: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            description: format!("{} {} example", kind.title(), tag),
        }
    }
}

/// Complexity bucket of a source file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Simple,
    Intermediate,
    Complex,
}

impl Complexity {
    /// Buckets a weighted syntax-tree score.
    pub fn from_syntax_score(score: usize) -> Self {
        if score <= SYNTAX_SIMPLE_MAX {
            Complexity::Simple
        } else if score <= SYNTAX_INTERMEDIATE_MAX {
            Complexity::Intermediate
        } else {
            Complexity::Complex
        }
    }

    /// Buckets the line-based heuristic score.
    pub fn from_heuristic_score(score: usize) -> Self {
        if score <= HEURISTIC_SIMPLE_MAX {
            Complexity::Simple
        } else if score <= HEURISTIC_INTERMEDIATE_MAX {
            Complexity::Intermediate
        } else {
            Complexity::Complex
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Complexity::Simple => "simple",
            Complexity::Intermediate => "intermediate",
            Complexity::Complex => "complex",
        };
        write!(f, "{}", s)
    }
}

/// How much runtime behavior a sample demonstrates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Interactivity {
    #[default]
    Static,
    Interactive,
    Dynamic,
}

impl fmt::Display for Interactivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Interactivity::Static => "static",
            Interactivity::Interactive => "interactive",
            Interactivity::Dynamic => "dynamic",
        };
        write!(f, "{}", s)
    }
}

/// Everything an analyzer extracts from one file.
///
/// The default value is the neutral result used when a file cannot be
/// analyzed: no patterns, `simple` complexity, `static` interactivity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFacts {
    pub imports: Vec<Import>,
    pub exports: Vec<String>,
    pub patterns: BTreeSet<String>,
    pub examples: Vec<CodeExample>,
    pub best_practices: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub complexity: Complexity,
    pub interactivity: Interactivity,
    pub prop_usages: Vec<PropUsage>,
    pub variant_usages: Vec<VariantUsage>,
}

impl SourceFacts {
    /// Module specifiers imported by the file, in order, without duplicates.
    pub fn import_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for import in &self.imports {
            if !sources.contains(&import.source) {
                sources.push(import.source.clone());
            }
        }
        sources
    }
}

/// Derived analysis of a sample file, memoized per file path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleAnalysis {
    pub patterns: BTreeSet<String>,
    pub examples: Vec<CodeExample>,
    pub best_practices: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub complexity: Complexity,
    pub interactivity: Interactivity,
    pub prop_usages: Vec<PropUsage>,
    pub variant_usages: Vec<VariantUsage>,
}

impl From<SourceFacts> for SampleAnalysis {
    fn from(facts: SourceFacts) -> Self {
        Self {
            patterns: facts.patterns,
            examples: facts.examples,
            best_practices: facts.best_practices,
            dependencies: facts.dependencies,
            complexity: facts.complexity,
            interactivity: facts.interactivity,
            prop_usages: facts.prop_usages,
            variant_usages: facts.variant_usages,
        }
    }
}

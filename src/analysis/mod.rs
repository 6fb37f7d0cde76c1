//! Source analysis for component and sample files.
//!
//! This module extracts semantic facts from JavaScript/TypeScript source
//! text: imports and exports, JSX component usage, observed props and
//! variants, usage-pattern tags, dependency classification, complexity and
//! interactivity.
//!
//! # Strategies
//!
//! - [`SyntaxTreeAnalyzer`] parses the text with tree-sitter and visits the
//!   full tree. This is the default and the more precise of the two.
//! - [`HeuristicAnalyzer`] works on raw text with regular expressions. It is
//!   cheaper, cruder, and kept as a fallback behind the same trait.
//!
//! # Example
//!
//! ```ignore
//! use docscope::analysis::{create_analyzer, AnalyzerStrategy, SourceLanguage};
//!
//! let mut analyzer = create_analyzer(AnalyzerStrategy::SyntaxTree, vec![])?;
//! let facts = analyzer.analyze(source, SourceLanguage::Tsx)?;
//! println!("{} ({})", facts.complexity, facts.interactivity);
//! ```

pub mod heuristic;
pub mod imports;
pub mod signals;
pub mod syntax;
pub mod types;

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use heuristic::HeuristicAnalyzer;
pub use imports::{
    classify_imports, classify_module, Dependency, DependencyKind, Import, ImportSpecifier,
    SourceLanguage,
};
pub use syntax::SyntaxTreeAnalyzer;
pub use types::{
    CodeExample, Complexity, ExampleKind, Interactivity, PropUsage, SampleAnalysis, SourceFacts,
    ValueKind, VariantUsage, VARIANT_ATTRIBUTES,
};

/// Errors that can occur during source analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse file: {path}")]
    ParseError { path: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Which analyzer implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyzerStrategy {
    /// tree-sitter based analysis.
    #[default]
    SyntaxTree,
    /// Regular-expression based analysis.
    Heuristic,
}

impl FromStr for AnalyzerStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "syntax-tree" | "syntax" | "ast" => Ok(AnalyzerStrategy::SyntaxTree),
            "heuristic" | "regex" | "text" => Ok(AnalyzerStrategy::Heuristic),
            _ => Err(format!(
                "Unknown analyzer: '{}'. Valid analyzers: syntax-tree, heuristic",
                s
            )),
        }
    }
}

impl fmt::Display for AnalyzerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerStrategy::SyntaxTree => write!(f, "syntax-tree"),
            AnalyzerStrategy::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Extracts [`SourceFacts`] from one file's text.
///
/// Implementations parse once per call; the capability helpers are thin
/// projections of [`SourceAnalyzer::analyze`] for callers that only need
/// one fact.
pub trait SourceAnalyzer: Send {
    /// The strategy this analyzer implements.
    fn strategy(&self) -> AnalyzerStrategy;

    /// Analyzes source text written in `language`.
    fn analyze(&mut self, source: &str, language: SourceLanguage) -> AnalysisResult<SourceFacts>;

    /// Analyzes source text, choosing the language from `path`'s extension.
    fn analyze_path(&mut self, path: &Path, source: &str) -> AnalysisResult<SourceFacts> {
        let language = SourceLanguage::from_path(path).ok_or_else(|| {
            AnalysisError::UnsupportedFileType(
                path.extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
        })?;
        self.analyze(source, language)
    }

    fn extract_patterns(&mut self, source: &str) -> AnalysisResult<BTreeSet<String>> {
        Ok(self.analyze(source, SourceLanguage::Tsx)?.patterns)
    }

    fn extract_examples(&mut self, source: &str) -> AnalysisResult<Vec<CodeExample>> {
        Ok(self.analyze(source, SourceLanguage::Tsx)?.examples)
    }

    fn extract_dependencies(&mut self, source: &str) -> AnalysisResult<Vec<Dependency>> {
        Ok(self.analyze(source, SourceLanguage::Tsx)?.dependencies)
    }

    fn classify_complexity(&mut self, source: &str) -> AnalysisResult<Complexity> {
        Ok(self.analyze(source, SourceLanguage::Tsx)?.complexity)
    }

    fn classify_interactivity(&mut self, source: &str) -> AnalysisResult<Interactivity> {
        Ok(self.analyze(source, SourceLanguage::Tsx)?.interactivity)
    }

    fn extract_prop_usages(&mut self, source: &str) -> AnalysisResult<Vec<PropUsage>> {
        Ok(self.analyze(source, SourceLanguage::Tsx)?.prop_usages)
    }

    fn extract_variant_usages(&mut self, source: &str) -> AnalysisResult<Vec<VariantUsage>> {
        Ok(self.analyze(source, SourceLanguage::Tsx)?.variant_usages)
    }
}

/// Builds the analyzer for `strategy`.
pub fn create_analyzer(
    strategy: AnalyzerStrategy,
    ui_kit_modules: Vec<String>,
) -> AnalysisResult<Box<dyn SourceAnalyzer>> {
    match strategy {
        AnalyzerStrategy::SyntaxTree => Ok(Box::new(SyntaxTreeAnalyzer::new(ui_kit_modules)?)),
        AnalyzerStrategy::Heuristic => Ok(Box::new(HeuristicAnalyzer::new(ui_kit_modules))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
import React, { useState, useEffect } from 'react';
import { Button } from '@/components/ui/button';

export default function ButtonSample() {
  const [count, setCount] = useState(0);
  useEffect(() => { document.title = `${count}`; }, [count]);
  return <Button variant="outline" onClick={() => setCount(count + 1)}>Clicked {count}</Button>;
}
"#;

    fn ui_modules() -> Vec<String> {
        vec!["@/components/ui".to_string()]
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "syntax-tree".parse::<AnalyzerStrategy>().unwrap(),
            AnalyzerStrategy::SyntaxTree
        );
        assert_eq!(
            "Heuristic".parse::<AnalyzerStrategy>().unwrap(),
            AnalyzerStrategy::Heuristic
        );
        assert!("magic".parse::<AnalyzerStrategy>().is_err());
    }

    #[test]
    fn test_both_strategies_agree_on_core_facts() {
        for strategy in [AnalyzerStrategy::SyntaxTree, AnalyzerStrategy::Heuristic] {
            let mut analyzer = create_analyzer(strategy, ui_modules()).unwrap();
            assert_eq!(analyzer.strategy(), strategy);

            let facts = analyzer.analyze(SAMPLE, SourceLanguage::Tsx).unwrap();
            assert!(facts.patterns.contains("state-management"), "{}", strategy);
            assert!(facts.patterns.contains("useEffect-pattern"), "{}", strategy);
            assert!(facts.patterns.contains("click-handling"), "{}", strategy);
            assert!(facts.patterns.contains("variant-usage"), "{}", strategy);
            assert_eq!(facts.interactivity, Interactivity::Dynamic, "{}", strategy);
            assert_eq!(facts.exports, vec!["ButtonSample".to_string()], "{}", strategy);

            let button = facts
                .dependencies
                .iter()
                .find(|d| d.name == "Button")
                .unwrap();
            assert_eq!(button.kind, DependencyKind::UiKit);

            assert_eq!(facts.variant_usages.len(), 1, "{}", strategy);
            assert_eq!(facts.variant_usages[0].value, "outline");
            assert_eq!(facts.variant_usages[0].component, "Button");
        }
    }

    #[test]
    fn test_analyze_path_rejects_unknown_extension() {
        let mut analyzer = create_analyzer(AnalyzerStrategy::SyntaxTree, ui_modules()).unwrap();
        let result = analyzer.analyze_path(Path::new("styles.css"), "body {}");
        assert!(matches!(result, Err(AnalysisError::UnsupportedFileType(ext)) if ext == "css"));
    }

    #[test]
    fn test_capability_helpers() {
        let mut analyzer = create_analyzer(AnalyzerStrategy::SyntaxTree, ui_modules()).unwrap();
        assert!(analyzer
            .extract_patterns(SAMPLE)
            .unwrap()
            .contains("useState-pattern"));
        assert!(!analyzer.extract_examples(SAMPLE).unwrap().is_empty());
        assert_eq!(
            analyzer.classify_interactivity("export const A = 1;").unwrap(),
            Interactivity::Static
        );
    }
}

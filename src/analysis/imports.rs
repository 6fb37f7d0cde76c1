//! Import model shared by both analyzer strategies.
//!
//! Import statements are normalized into [`Import`] values, and every
//! imported symbol is classified into a [`DependencyKind`] depending on
//! which module it comes from.

use std::fmt;

use serde::{Deserialize, Serialize};
use tree_sitter::Language;

/// An individual import specifier within an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSpecifier {
    /// Default import: `import foo from 'module'`
    Default(String),
    /// Named import: `import { foo } from 'module'` or `import { foo as bar } from 'module'`
    Named { imported: String, local: String },
    /// Namespace import: `import * as foo from 'module'`
    Namespace(String),
    /// Side-effect import: `import 'module'` (no specifiers)
    SideEffect,
}

impl ImportSpecifier {
    /// Returns the local name (the name used in the importing file).
    pub fn local_name(&self) -> Option<&str> {
        match self {
            ImportSpecifier::Default(name) => Some(name),
            ImportSpecifier::Named { local, .. } => Some(local),
            ImportSpecifier::Namespace(name) => Some(name),
            ImportSpecifier::SideEffect => None,
        }
    }
}

/// Represents a single import statement in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The source module (e.g., "react", "./utils", "@/components/ui/button")
    pub source: String,
    /// The specifiers being imported
    pub specifiers: Vec<ImportSpecifier>,
    /// Line number in the source file (1-indexed)
    pub line: usize,
}

impl Import {
    /// Returns true if this is a side-effect only import.
    pub fn is_side_effect_only(&self) -> bool {
        self.specifiers.len() == 1 && matches!(self.specifiers[0], ImportSpecifier::SideEffect)
    }

    /// Local names bound by this import, in declaration order.
    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.specifiers.iter().filter_map(|s| s.local_name())
    }
}

/// Where an imported symbol comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// The design-system package.
    UiKit,
    /// React itself.
    React,
    /// Any other module specifier.
    External,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyKind::UiKit => "ui-kit",
            DependencyKind::React => "react",
            DependencyKind::External => "external",
        };
        write!(f, "{}", s)
    }
}

/// One imported symbol and its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Local name of the imported symbol.
    pub name: String,
    /// Module the symbol was imported from.
    pub source: String,
    pub kind: DependencyKind,
}

/// Classifies a module specifier.
///
/// A specifier belongs to the design system when it equals one of
/// `ui_kit_modules` or lives underneath one of them.
pub fn classify_module(source: &str, ui_kit_modules: &[String]) -> DependencyKind {
    let is_ui_kit = ui_kit_modules.iter().any(|module| {
        let module = module.trim_end_matches('/');
        source == module
            || source
                .strip_prefix(module)
                .is_some_and(|rest| rest.starts_with('/'))
    });

    if is_ui_kit {
        DependencyKind::UiKit
    } else if source == "react" || source.starts_with("react/") {
        DependencyKind::React
    } else {
        DependencyKind::External
    }
}

/// Flattens imports into classified dependencies, one per imported symbol.
///
/// Side-effect imports bind no symbol and are skipped. A symbol imported
/// twice is reported once.
pub fn classify_imports(imports: &[Import], ui_kit_modules: &[String]) -> Vec<Dependency> {
    let mut deps: Vec<Dependency> = Vec::new();

    for import in imports {
        let kind = classify_module(&import.source, ui_kit_modules);
        for name in import.local_names() {
            if deps.iter().any(|d| d.name == name && d.source == import.source) {
                continue;
            }
            deps.push(Dependency {
                name: name.to_string(),
                source: import.source.clone(),
                kind,
            });
        }
    }

    deps
}

/// Language type for file analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
    Jsx,
}

impl SourceLanguage {
    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "jsx" => Some(SourceLanguage::Jsx),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    /// Determine language from a file path.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get tree-sitter language for this source language.
    ///
    /// The JavaScript grammar parses JSX natively; TypeScript needs the TSX
    /// variant to accept markup.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => {
                tree_sitter_javascript::LANGUAGE.into()
            }
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui_modules() -> Vec<String> {
        vec!["@/components/ui".to_string(), "@acme/ui".to_string()]
    }

    #[test]
    fn test_classify_module() {
        let modules = ui_modules();
        assert_eq!(classify_module("@acme/ui", &modules), DependencyKind::UiKit);
        assert_eq!(
            classify_module("@/components/ui/button", &modules),
            DependencyKind::UiKit
        );
        assert_eq!(classify_module("react", &modules), DependencyKind::React);
        assert_eq!(classify_module("react/jsx-runtime", &modules), DependencyKind::React);
        assert_eq!(classify_module("react-dom", &modules), DependencyKind::External);
        assert_eq!(classify_module("@acme/ui-icons", &modules), DependencyKind::External);
        assert_eq!(classify_module("./utils", &modules), DependencyKind::External);
    }

    #[test]
    fn test_classify_imports_skips_side_effects() {
        let imports = vec![
            Import {
                source: "react".to_string(),
                specifiers: vec![
                    ImportSpecifier::Default("React".to_string()),
                    ImportSpecifier::Named {
                        imported: "useState".to_string(),
                        local: "useState".to_string(),
                    },
                ],
                line: 1,
            },
            Import {
                source: "./styles.css".to_string(),
                specifiers: vec![ImportSpecifier::SideEffect],
                line: 2,
            },
            Import {
                source: "@acme/ui".to_string(),
                specifiers: vec![ImportSpecifier::Named {
                    imported: "Button".to_string(),
                    local: "Btn".to_string(),
                }],
                line: 3,
            },
        ];

        let deps = classify_imports(&imports, &ui_modules());
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0].name, "React");
        assert_eq!(deps[1].kind, DependencyKind::React);
        assert_eq!(deps[2].name, "Btn");
        assert_eq!(deps[2].kind, DependencyKind::UiKit);
        assert!(imports[1].is_side_effect_only());
    }

    #[test]
    fn test_language_from_extension() {
        assert_eq!(SourceLanguage::from_extension("tsx"), Some(SourceLanguage::Tsx));
        assert_eq!(SourceLanguage::from_extension("JSX"), Some(SourceLanguage::Jsx));
        assert_eq!(
            SourceLanguage::from_extension("mts"),
            Some(SourceLanguage::TypeScript)
        );
        assert_eq!(SourceLanguage::from_extension("css"), None);
    }

    #[test]
    fn test_dependency_kind_display() {
        assert_eq!(DependencyKind::UiKit.to_string(), "ui-kit");
        assert_eq!(DependencyKind::External.to_string(), "external");
    }
}

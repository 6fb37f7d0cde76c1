//! Syntax-tree analyzer backed by tree-sitter.
//!
//! Parses the file once and performs a full-tree visit, dispatching on node
//! kinds to collect imports, exports, hook calls, JSX attributes and
//! complexity weights. Values are classified by node kind, so `{count}` is
//! a variable and `{count + 1}` an expression regardless of spacing.

use tree_sitter::{Node, Parser, Tree};

use super::imports::{classify_imports, Import, ImportSpecifier, SourceLanguage};
use super::signals::{self, is_component_tag, is_hook_name, Signals};
use super::types::{
    CodeExample, Complexity, PropUsage, SourceFacts, ValueKind, VariantUsage, VARIANT_ATTRIBUTES,
};
use super::{AnalysisError, AnalysisResult, AnalyzerStrategy, SourceAnalyzer};

/// Maximum number of examples kept per file.
pub const MAX_EXAMPLES: usize = 10;

const FUNCTION_WEIGHT: usize = 5;
const HOOK_WEIGHT: usize = 10;
const JSX_WEIGHT: usize = 2;
const CONDITIONAL_WEIGHT: usize = 3;
const LOOP_WEIGHT: usize = 5;

const FUNCTION_KINDS: [&str; 6] = [
    "function_declaration",
    "function_expression",
    "arrow_function",
    "method_definition",
    "generator_function_declaration",
    "generator_function",
];
const CONDITIONAL_KINDS: [&str; 2] = ["ternary_expression", "if_statement"];
const LOOP_KINDS: [&str; 4] = ["for_statement", "for_in_statement", "while_statement", "do_statement"];
const LITERAL_KINDS: [&str; 6] = ["string", "number", "true", "false", "null", "undefined"];

/// Analyzer that walks a tree-sitter syntax tree.
pub struct SyntaxTreeAnalyzer {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
    ui_kit_modules: Vec<String>,
}

impl SyntaxTreeAnalyzer {
    /// Create a new analyzer; `ui_kit_modules` names the design-system modules.
    pub fn new(ui_kit_modules: Vec<String>) -> AnalysisResult<Self> {
        Ok(Self {
            js_parser: parser_for(SourceLanguage::JavaScript)?,
            ts_parser: parser_for(SourceLanguage::TypeScript)?,
            tsx_parser: parser_for(SourceLanguage::Tsx)?,
            ui_kit_modules,
        })
    }

    fn parse(&mut self, source: &str, language: SourceLanguage) -> AnalysisResult<Tree> {
        let parser = match language {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => &mut self.js_parser,
            SourceLanguage::TypeScript => &mut self.ts_parser,
            SourceLanguage::Tsx => &mut self.tsx_parser,
        };

        parser.parse(source, None).ok_or_else(|| AnalysisError::ParseError {
            path: format!("<{:?} source>", language),
        })
    }
}

fn parser_for(language: SourceLanguage) -> AnalysisResult<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|_| AnalysisError::LanguageInit)?;
    Ok(parser)
}

impl SourceAnalyzer for SyntaxTreeAnalyzer {
    fn strategy(&self) -> AnalyzerStrategy {
        AnalyzerStrategy::SyntaxTree
    }

    fn analyze(&mut self, source: &str, language: SourceLanguage) -> AnalysisResult<SourceFacts> {
        let tree = self.parse(source, language)?;
        let root = tree.root_node();

        let visitor = Visitor::run(root, source);
        let examples = collect_examples(root, source);

        let dependencies = classify_imports(&visitor.imports, &self.ui_kit_modules);

        Ok(SourceFacts {
            patterns: visitor.signals.patterns(),
            interactivity: visitor.signals.interactivity(),
            complexity: Complexity::from_syntax_score(visitor.score),
            best_practices: signals::best_practices(source),
            imports: visitor.imports,
            exports: visitor.exports,
            examples,
            dependencies,
            prop_usages: visitor.prop_usages,
            variant_usages: visitor.variant_usages,
        })
    }
}

/// Accumulates facts during the full-tree visit.
struct Visitor<'s> {
    source: &'s str,
    signals: Signals,
    imports: Vec<Import>,
    exports: Vec<String>,
    prop_usages: Vec<PropUsage>,
    variant_usages: Vec<VariantUsage>,
    score: usize,
}

impl<'s> Visitor<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            signals: Signals::default(),
            imports: Vec::new(),
            exports: Vec::new(),
            prop_usages: Vec::new(),
            variant_usages: Vec::new(),
            score: 0,
        }
    }

    /// Visits every node under `root`.
    fn run(root: Node, source: &'s str) -> Self {
        let mut visitor = Self::new(source);
        walk_tree(root, |node| {
            visitor.visit_node(&node);
            Step::Descend
        });
        visitor
    }

    fn visit_node(&mut self, node: &Node) {
        let kind = node.kind();

        match kind {
            "import_statement" => {
                if let Some(import) = parse_import(node, self.source) {
                    self.imports.push(import);
                }
            }
            "export_statement" => self.collect_exports(node),
            "call_expression" => {
                if let Some(callee) = node
                    .child_by_field_name("function")
                    .and_then(|f| node_text(&f, self.source))
                {
                    let last = callee.rsplit('.').next().unwrap_or(callee);
                    if is_hook_name(last) {
                        self.score += HOOK_WEIGHT;
                    }
                    self.signals.record_call(callee);
                }
            }
            "jsx_element" => self.score += JSX_WEIGHT,
            "jsx_self_closing_element" => {
                self.score += JSX_WEIGHT;
                self.collect_attributes(node);
            }
            "jsx_opening_element" => self.collect_attributes(node),
            // Keyword tokens share kind names with constructs (`function`).
            _ if !node.is_named() => {}
            _ if FUNCTION_KINDS.contains(&kind) => self.score += FUNCTION_WEIGHT,
            _ if CONDITIONAL_KINDS.contains(&kind) => self.score += CONDITIONAL_WEIGHT,
            _ if LOOP_KINDS.contains(&kind) => self.score += LOOP_WEIGHT,
            _ => {}
        }
    }

    /// Records attributes of an opening or self-closing tag.
    fn collect_attributes(&mut self, tag: &Node) {
        let tag_name = tag
            .child_by_field_name("name")
            .and_then(|n| node_text(&n, self.source))
            .unwrap_or_default();
        let is_component = is_component_tag(tag_name);

        let mut cursor = tag.walk();
        for child in tag.children(&mut cursor) {
            if child.kind() != "jsx_attribute" {
                continue;
            }
            let Some((name, value, value_kind)) = parse_attribute(&child, self.source) else {
                continue;
            };
            self.signals.record_attribute(&name);

            if !is_component {
                continue;
            }
            if VARIANT_ATTRIBUTES.contains(&name.as_str()) {
                self.variant_usages.push(VariantUsage {
                    variant_name: name.clone(),
                    value: value.clone(),
                    component: tag_name.to_string(),
                });
            }
            self.prop_usages.push(PropUsage {
                component: tag_name.to_string(),
                name,
                value,
                value_kind,
            });
        }
    }

    fn collect_exports(&mut self, node: &Node) {
        let source = self.source;

        if let Some(decl) = node.child_by_field_name("declaration") {
            match decl.kind() {
                "lexical_declaration" | "variable_declaration" => {
                    let mut cursor = decl.walk();
                    for declarator in decl.children(&mut cursor) {
                        if declarator.kind() != "variable_declarator" {
                            continue;
                        }
                        if let Some(name) = declarator
                            .child_by_field_name("name")
                            .filter(|n| n.kind() == "identifier")
                            .and_then(|n| node_text(&n, source))
                        {
                            self.push_export(name);
                        }
                    }
                }
                _ => {
                    if let Some(name) = decl
                        .child_by_field_name("name")
                        .and_then(|n| node_text(&n, source))
                    {
                        self.push_export(name);
                    }
                }
            }
            return;
        }

        if let Some(value) = node.child_by_field_name("value") {
            // export default <expression>
            let name = match value.kind() {
                "identifier" => node_text(&value, source),
                _ => value
                    .child_by_field_name("name")
                    .and_then(|n| node_text(&n, source)),
            };
            self.push_export(name.unwrap_or("default"));
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "export_clause" {
                continue;
            }
            let mut clause_cursor = child.walk();
            for spec in child.children(&mut clause_cursor) {
                if spec.kind() != "export_specifier" {
                    continue;
                }
                if let Some(name) = spec
                    .child_by_field_name("alias")
                    .or_else(|| spec.child_by_field_name("name"))
                    .and_then(|n| node_text(&n, source))
                {
                    self.push_export(name);
                }
            }
        }
    }

    fn push_export(&mut self, name: &str) {
        if !self.exports.iter().any(|e| e == name) {
            self.exports.push(name.to_string());
        }
    }
}

/// Parse an ES6 import statement.
fn parse_import(node: &Node, source: &str) -> Option<Import> {
    let mut source_module = String::new();
    let mut specifiers = Vec::new();
    let line = node.start_position().row + 1;

    let mut cursor = node.walk();

    // Find the source (string after 'from')
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string" => {
                source_module = string_value(&child, source)?;
            }
            "import_clause" => {
                parse_import_clause(&child, source, &mut specifiers);
            }
            _ => {}
        }
    }

    if source_module.is_empty() {
        return None;
    }

    // Side-effect import if no specifiers
    if specifiers.is_empty() {
        specifiers.push(ImportSpecifier::SideEffect);
    }

    Some(Import {
        source: source_module,
        specifiers,
        line,
    })
}

/// Parse the import clause (everything between 'import' and 'from').
fn parse_import_clause(node: &Node, source: &str, specifiers: &mut Vec<ImportSpecifier>) {
    let mut cursor = node.walk();

    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                if let Some(name) = node_text(&child, source) {
                    specifiers.push(ImportSpecifier::Default(name.to_string()));
                }
            }
            "namespace_import" => {
                let mut inner = child.walk();
                let name = child
                    .children(&mut inner)
                    .find(|c| c.kind() == "identifier")
                    .and_then(|c| node_text(&c, source));
                if let Some(name) = name {
                    specifiers.push(ImportSpecifier::Namespace(name.to_string()));
                }
            }
            "named_imports" => {
                let mut inner = child.walk();
                for spec in child.children(&mut inner) {
                    if spec.kind() == "import_specifier" {
                        if let Some(spec) = parse_import_specifier(&spec, source) {
                            specifiers.push(spec);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Parse a single import specifier: foo or foo as bar
fn parse_import_specifier(node: &Node, source: &str) -> Option<ImportSpecifier> {
    let mut cursor = node.walk();
    let mut imported = None;
    let mut local = None;

    for child in node.children(&mut cursor) {
        if child.kind() == "identifier" {
            let name = node_text(&child, source)?;
            if imported.is_none() {
                imported = Some(name.to_string());
            } else {
                local = Some(name.to_string());
            }
        }
    }

    let imported = imported?;
    let local = local.unwrap_or_else(|| imported.clone());

    Some(ImportSpecifier::Named { imported, local })
}

/// Splits a `jsx_attribute` into name, value text and value kind.
///
/// Bare attributes (`disabled`) are literal `true`.
fn parse_attribute(node: &Node, source: &str) -> Option<(String, String, ValueKind)> {
    let name = node_text(&node.named_child(0)?, source)?.to_string();

    let Some(value) = node.named_child(1) else {
        return Some((name, "true".to_string(), ValueKind::Literal));
    };

    let (text, kind) = match value.kind() {
        "string" => (string_value(&value, source)?, ValueKind::Literal),
        "jsx_expression" => match value.named_child(0) {
            Some(inner) => {
                let kind = expression_kind(&inner);
                let text = if inner.kind() == "string" {
                    string_value(&inner, source)?
                } else {
                    node_text(&inner, source)?.to_string()
                };
                (text, kind)
            }
            None => (String::new(), ValueKind::Expression),
        },
        _ => (node_text(&value, source)?.to_string(), ValueKind::Expression),
    };

    Some((name, text, kind))
}

fn expression_kind(node: &Node) -> ValueKind {
    match node.kind() {
        "identifier" => ValueKind::Variable,
        kind if LITERAL_KINDS.contains(&kind) => ValueKind::Literal,
        "template_string" if !has_child_kind(node, "template_substitution") => ValueKind::Literal,
        _ => ValueKind::Expression,
    }
}

fn has_child_kind(node: &Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

/// What [`walk_tree`] does after visiting a node.
enum Step {
    Descend,
    SkipChildren,
    Stop,
}

/// Pre-order walk over `root` and its descendants.
///
/// Iterative on a `TreeCursor`, so nesting depth is bounded by the heap
/// rather than the call stack.
fn walk_tree<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>) -> Step) {
    let mut cursor = root.walk();
    loop {
        match visit(cursor.node()) {
            Step::Stop => return,
            Step::Descend if cursor.goto_first_child() => continue,
            Step::Descend | Step::SkipChildren => {}
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Collects JSX snippets rooted at a capitalized tag, outermost first.
fn collect_examples(root: Node, source: &str) -> Vec<CodeExample> {
    let mut examples = Vec::new();
    walk_tree(root, |node| {
        if examples.len() >= MAX_EXAMPLES {
            return Step::Stop;
        }
        if !matches!(node.kind(), "jsx_element" | "jsx_self_closing_element") {
            return Step::Descend;
        }
        let tag = jsx_tag_name(&node, source).unwrap_or_default();
        if !is_component_tag(tag) {
            return Step::Descend;
        }
        if let Some(code) = node_text(&node, source) {
            let kind = signals::classify_example(code, has_complex_attribute(node, source));
            examples.push(CodeExample::new(kind, tag, code));
        }
        Step::SkipChildren
    });
    examples
}

fn jsx_tag_name<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    let tag = match node.kind() {
        "jsx_element" => node
            .child_by_field_name("open_tag")
            .or_else(|| node.named_child(0))?,
        _ => *node,
    };
    tag.child_by_field_name("name")
        .and_then(|n| node_text(&n, source))
}

/// True when any attribute inside `node` carries a general expression.
fn has_complex_attribute(node: Node, source: &str) -> bool {
    let mut found = false;
    walk_tree(node, |child| {
        if child.kind() == "jsx_attribute"
            && matches!(
                parse_attribute(&child, source),
                Some((_, _, ValueKind::Expression))
            )
        {
            found = true;
            return Step::Stop;
        }
        Step::Descend
    });
    found
}

/// Extract the text content of a node.
fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Extract string value (removes quotes).
fn string_value(node: &Node, source: &str) -> Option<String> {
    let text = node_text(node, source)?;
    let trimmed = text
        .trim_start_matches(['"', '\'', '`'])
        .trim_end_matches(['"', '\'', '`']);
    Some(trimmed.to_string())
}

//! Verbatim source-body extraction over tree-sitter syntax trees.
//!
//! A declaration body is the innermost node, among the grammar's declaration
//! kinds, whose row span contains the requested line. Extraction is best
//! effort: unreadable files and failed parses yield `None`.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};
use tree_sitter::{Language, Node, Parser, Tree};

/// Grammar used when a language tag has no registered grammar.
pub const FALLBACK_LANGUAGE: &str = "go";

pub struct Grammar {
    pub language: Language,
    pub declarations: HashSet<&'static str>,
}

pub struct GrammarRegistry {
    grammars: HashMap<String, Grammar>,
    fallback: String,
}

impl GrammarRegistry {
    pub fn empty(fallback: &str) -> Self {
        Self {
            grammars: HashMap::new(),
            fallback: fallback.to_string(),
        }
    }

    /// Registry with every bundled grammar and its declaration node kinds.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty(FALLBACK_LANGUAGE);
        registry.register(
            "go",
            tree_sitter_go::LANGUAGE.into(),
            &[
                "function_declaration",
                "method_declaration",
                "func_literal",
                "type_declaration",
                "type_spec",
            ],
        );
        registry.register(
            "typescript",
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            TYPESCRIPT_DECLARATIONS,
        );
        registry.register(
            "tsx",
            tree_sitter_typescript::LANGUAGE_TSX.into(),
            TYPESCRIPT_DECLARATIONS,
        );
        registry.register(
            "javascript",
            tree_sitter_javascript::LANGUAGE.into(),
            &[
                "function_declaration",
                "function_expression",
                "arrow_function",
                "method_definition",
                "generator_function",
                "generator_function_declaration",
                "class_declaration",
            ],
        );
        registry.register(
            "python",
            tree_sitter_python::LANGUAGE.into(),
            &["function_definition", "class_definition"],
        );
        registry.register(
            "rust",
            tree_sitter_rust::LANGUAGE.into(),
            &[
                "function_item",
                "struct_item",
                "enum_item",
                "impl_item",
                "trait_item",
            ],
        );
        registry.register(
            "java",
            tree_sitter_java::LANGUAGE.into(),
            &[
                "method_declaration",
                "constructor_declaration",
                "class_declaration",
                "interface_declaration",
                "enum_declaration",
            ],
        );
        registry.register(
            "c",
            tree_sitter_c::LANGUAGE.into(),
            &["function_definition", "struct_specifier", "enum_specifier"],
        );
        registry.register(
            "cpp",
            tree_sitter_cpp::LANGUAGE.into(),
            &[
                "function_definition",
                "struct_specifier",
                "class_specifier",
                "enum_specifier",
                "lambda_expression",
            ],
        );
        registry
    }

    pub fn register(&mut self, tag: &str, language: Language, declarations: &[&'static str]) {
        self.grammars.insert(
            tag.to_string(),
            Grammar {
                language,
                declarations: declarations.iter().copied().collect(),
            },
        );
    }

    /// Adds declaration node kinds to an already registered grammar.
    pub fn extend_declarations(&mut self, tag: &str, declarations: &[&'static str]) -> bool {
        match self.grammars.get_mut(tag) {
            Some(grammar) => {
                grammar.declarations.extend(declarations.iter().copied());
                true
            }
            None => false,
        }
    }

    /// Grammar for a language tag, falling back to the default grammar.
    pub fn resolve(&self, tag: &str) -> Option<&Grammar> {
        self.grammars
            .get(canonical_tag(tag).as_str())
            .or_else(|| self.grammars.get(&self.fallback))
    }
}

const TYPESCRIPT_DECLARATIONS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "arrow_function",
    "method_definition",
    "generator_function",
    "generator_function_declaration",
    "class_declaration",
    "interface_declaration",
    "type_alias_declaration",
];

fn canonical_tag(tag: &str) -> String {
    let lower = tag.to_ascii_lowercase();
    match lower.as_str() {
        "golang" => "go".to_string(),
        "js" | "javascriptreact" | "jsx" => "javascript".to_string(),
        "ts" => "typescript".to_string(),
        "typescriptreact" => "tsx".to_string(),
        "py" => "python".to_string(),
        "rs" => "rust".to_string(),
        "c++" | "cxx" | "cc" => "cpp".to_string(),
        _ => lower,
    }
}

/// A parsed source file ready for repeated body lookups.
pub struct ParsedSource<'g> {
    source: Vec<u8>,
    tree: Tree,
    grammar: &'g Grammar,
}

impl ParsedSource<'_> {
    /// Body of the innermost declaration containing the 1-indexed `line`.
    ///
    /// The text is the node's exact byte range when it is valid UTF-8;
    /// otherwise invalid sequences become U+FFFD and a warning is logged.
    pub fn body_at(&self, line: u32) -> Option<String> {
        let node = innermost_declaration(self.tree.root_node(), line, &self.grammar.declarations)?;
        debug!(
            kind = node.kind(),
            start = node.start_position().row + 1,
            end = node.end_position().row + 1,
            line,
            "matched declaration"
        );
        let bytes = self.source.get(node.start_byte()..node.end_byte())?;
        match std::str::from_utf8(bytes) {
            Ok(text) => Some(text.to_string()),
            Err(e) => {
                warn!(
                    line,
                    offset = node.start_byte() + e.valid_up_to(),
                    "declaration body is not valid UTF-8, replacing invalid bytes"
                );
                Some(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

pub struct BodyExtractor {
    registry: GrammarRegistry,
}

impl Default for BodyExtractor {
    fn default() -> Self {
        Self::new(GrammarRegistry::with_defaults())
    }
}

impl BodyExtractor {
    pub fn new(registry: GrammarRegistry) -> Self {
        Self { registry }
    }

    pub fn registry_mut(&mut self) -> &mut GrammarRegistry {
        &mut self.registry
    }

    pub fn parse(&self, source: Vec<u8>, language: &str) -> Option<ParsedSource<'_>> {
        let grammar = self.registry.resolve(language)?;
        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&grammar.language) {
            debug!("grammar for '{}' rejected: {}", language, e);
            return None;
        }
        let tree = parser.parse(&source, None)?;
        Some(ParsedSource {
            source,
            tree,
            grammar,
        })
    }

    pub fn parse_file(&self, path: &Path, language: &str) -> Option<ParsedSource<'_>> {
        match std::fs::read(path) {
            Ok(source) => {
                debug!("read {} bytes from {}", source.len(), path.display());
                self.parse(source, language)
            }
            Err(e) => {
                debug!("failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// One-shot extraction from in-memory source text.
    pub fn extract(&self, source: &str, line: u32, language: &str) -> Option<String> {
        self.parse(source.as_bytes().to_vec(), language)?
            .body_at(line)
    }
}

/// Pre-order walk keeping the last declaration whose rows contain `line`.
///
/// Subtrees whose span excludes the line are skipped; their descendants
/// cannot contain it either, so the selected node is unchanged.
fn innermost_declaration<'t>(
    root: Node<'t>,
    line: u32,
    declarations: &HashSet<&'static str>,
) -> Option<Node<'t>> {
    let line = line as usize;
    let contains = |node: &Node| {
        let start = node.start_position().row + 1;
        let end = node.end_position().row + 1;
        line >= start && line <= end
    };

    let mut best = None;
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        let inside = contains(&node);
        if inside && declarations.contains(node.kind()) {
            best = Some(node);
        }
        if inside && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return best;
            }
        }
    }
}

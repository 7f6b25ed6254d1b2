//! Relation Symbol Table construction.
//!
//! `RstBuilder` turns the documents of one language partition into an
//! [`Rst`] in two passes:
//!
//! 1. a per-document symbol pass that creates every non-local symbol with its
//!    signature, documentation, definition line, kind and (optionally) body;
//! 2. a cross-reference pass that attributes every occurrence found inside a
//!    scope-defining occurrence's row span to that scope's symbol.
//!
//! Malformed occurrences are skipped silently; only an empty partition fails.

use crate::error::{Result, RstError};
use crate::extract::{BodyExtractor, ParsedSource};
use crate::input::{InputDocument, Occurrence, SymbolInformation, UNKNOWN_LANGUAGE};
use crate::model::{Document, Rst, Symbol, SymbolKind};
use crate::symbol::{extract_name, is_local_symbol};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct RstBuilder<'a> {
    repository: String,
    extraction: Option<Extraction<'a>>,
}

struct Extraction<'a> {
    project_root: PathBuf,
    extractor: &'a BodyExtractor,
}

struct Definition {
    line: u32,
    kind: SymbolKind,
}

impl<'a> RstBuilder<'a> {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            extraction: None,
        }
    }

    /// Enables body extraction for sources found under `project_root`.
    pub fn with_extraction(mut self, project_root: PathBuf, extractor: &'a BodyExtractor) -> Self {
        self.extraction = Some(Extraction {
            project_root,
            extractor,
        });
        self
    }

    /// Builds the table for one language partition.
    pub fn build(&self, language: &str, documents: &[InputDocument]) -> Result<Rst> {
        if documents.is_empty() {
            return Err(RstError::EmptyPartition(language.to_string()));
        }
        let language = if language.is_empty() {
            UNKNOWN_LANGUAGE
        } else {
            language
        };

        let mut rst = Rst::new(self.repository.clone(), language);
        // symbol id -> position of its document in `rst.documents`
        let mut locations: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let table = self.collect_symbols(doc);
            let (index, _) = rst.documents.insert_full(doc.relative_path.clone(), table);
            for id in rst.documents[index].symbols.keys() {
                locations.insert(id.clone(), index);
            }
        }

        for doc in documents {
            link_document(&doc.occurrences, &mut rst, &locations);
        }

        debug!(
            language,
            documents = rst.documents.len(),
            symbols = rst.symbol_count(),
            "built relation symbol table"
        );
        Ok(rst)
    }

    fn collect_symbols(&self, doc: &InputDocument) -> Document {
        let definitions = first_occurrences(&doc.occurrences);
        let mut table = Document::new(doc.relative_path.clone());
        let mut parsed: Option<Option<ParsedSource<'a>>> = None;

        for info in &doc.symbols {
            if info.symbol.is_empty() || is_local_symbol(&info.symbol) {
                continue;
            }

            let mut symbol = Symbol::new(
                info.symbol.clone(),
                info.kind.clone(),
                build_signature(info, &doc.language),
            );
            if !info.documentation.is_empty() {
                symbol.documentation = Some(info.documentation.join("\n"));
            }
            if let Some(def) = definitions.get(info.symbol.as_str()) {
                symbol.line = def.line;
                if symbol.kind.is_unspecified() {
                    symbol.kind = def.kind.clone();
                }
            }
            symbol.code = self.extract_body(doc, &symbol, &mut parsed);

            table.symbols.insert(info.symbol.clone(), symbol);
        }
        table
    }

    fn extract_body(
        &self,
        doc: &InputDocument,
        symbol: &Symbol,
        parsed: &mut Option<Option<ParsedSource<'a>>>,
    ) -> Option<String> {
        let extraction = self.extraction.as_ref()?;
        if symbol.line == 0 || doc.relative_path.is_empty() || !symbol.kind.is_extractable() {
            return None;
        }

        let extractor = extraction.extractor;
        let source = parsed.get_or_insert_with(|| {
            let relative = Path::new(&doc.relative_path);
            let path = if relative.is_absolute() {
                relative.to_path_buf()
            } else {
                extraction.project_root.join(relative)
            };
            debug!(path = %path.display(), "parsing source for body extraction");
            extractor.parse_file(&path, &doc.language)
        });

        source
            .as_ref()?
            .body_at(symbol.line)
            .filter(|code| !code.is_empty())
    }
}

/// First occurrence of every symbol: its 1-indexed line and role-inferred kind.
///
/// The first occurrence in input order wins whether or not it carries a
/// definition role.
fn first_occurrences(occurrences: &[Occurrence]) -> HashMap<&str, Definition> {
    let mut definitions = HashMap::new();
    for occ in occurrences {
        let Some(row) = occ.start_row else {
            continue;
        };
        if occ.symbol.is_empty() {
            continue;
        }
        definitions
            .entry(occ.symbol.as_str())
            .or_insert_with(|| Definition {
                line: row + 1,
                kind: infer_kind(occ),
            });
    }
    definitions
}

fn infer_kind(occ: &Occurrence) -> SymbolKind {
    if occ.roles.is_any_definition() {
        SymbolKind::InferredDefinition
    } else {
        SymbolKind::Unspecified
    }
}

/// Adds dependency/reference edges for every occurrence inside a scope.
///
/// Occurrences are sorted by row once so each scope only visits the
/// occurrences within its span; visiting them in input order keeps the
/// insertion order of the edge sets.
fn link_document(occurrences: &[Occurrence], rst: &mut Rst, locations: &HashMap<String, usize>) {
    let mut by_row: Vec<(u32, usize)> = occurrences
        .iter()
        .enumerate()
        .filter_map(|(i, occ)| occ.start_row.map(|row| (row, i)))
        .collect();
    by_row.sort_unstable();

    for scope in occurrences {
        let Some(span) = scope.scope else {
            continue;
        };
        if scope.symbol.is_empty() || scope.is_local() || span.end < span.start {
            continue;
        }

        let lo = by_row.partition_point(|&(row, _)| row < span.start);
        let hi = by_row.partition_point(|&(row, _)| row <= span.end);
        let mut inner: Vec<usize> = by_row[lo..hi].iter().map(|&(_, i)| i).collect();
        inner.sort_unstable();

        for target in inner.into_iter().map(|i| &occurrences[i]) {
            if target.symbol.is_empty() || target.symbol == scope.symbol || target.is_local() {
                continue;
            }
            if let Some(sym) = symbol_mut(rst, locations, &scope.symbol) {
                sym.add_dependency(&target.symbol);
            }
            if let Some(sym) = symbol_mut(rst, locations, &target.symbol) {
                sym.add_reference(&scope.symbol);
            }
        }
    }
}

fn symbol_mut<'r>(
    rst: &'r mut Rst,
    locations: &HashMap<String, usize>,
    id: &str,
) -> Option<&'r mut Symbol> {
    let &index = locations.get(id)?;
    let (_, doc) = rst.documents.get_index_mut(index)?;
    doc.symbols.get_mut(id)
}

/// Signature precedence: explicit signature documentation, then a fenced
/// code block in the document's language, then `<kind prefix><name>`.
pub fn build_signature(info: &SymbolInformation, language: &str) -> String {
    if let Some(sig) = &info.signature_documentation {
        if !sig.text.is_empty() {
            return sig.text.clone();
        }
    }

    let fence = format!("```{}\n", language.to_ascii_lowercase());
    for doc in &info.documentation {
        if let Some(inner) = doc
            .strip_prefix(fence.as_str())
            .and_then(|rest| rest.strip_suffix("\n```"))
        {
            return inner.to_string();
        }
    }

    let name = if info.display_name.is_empty() {
        extract_name(&info.symbol)
    } else {
        info.display_name.as_str()
    };
    format!("{}{}", info.kind.signature_prefix(), name)
}

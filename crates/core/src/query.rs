//! Stateless navigation queries over the persisted tables of a repository.
//!
//! Every query reads all language partitions of the repository from disk, so
//! results always reflect the latest `parse` run.

use crate::error::{Result, RstError};
use crate::model::{Document, Rst, Symbol, SymbolKind};
use crate::storage::IndexStore;
use crate::symbol::{extract_key, extract_name, matches_name};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Files of a repository grouped by directory (`""` for the root).
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    pub files: BTreeMap<String, Vec<String>>,
}

impl FileTree {
    fn insert(&mut self, path: &str) {
        let (dir, base) = path.rsplit_once('/').unwrap_or(("", path));
        self.files
            .entry(dir.to_string())
            .or_default()
            .push(base.to_string());
    }

    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SymbolSummary {
    pub id: String,
    pub name: String,
    pub kind: SymbolKind,
    pub signature: String,
    pub line: u32,
}

/// Lookup of a symbol by short name, optionally narrowed to a file and line.
#[derive(Debug, Clone, Default)]
pub struct SymbolQuery {
    pub file: Option<String>,
    pub name: String,
    pub line: Option<u32>,
}

impl SymbolQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// One end of a dependency or reference edge.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub id: String,
    pub name: String,
    /// Defining file, when the symbol is part of the repository's tables.
    pub file: Option<String>,
    pub line: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SymbolDetail {
    pub id: String,
    pub name: String,
    pub container: String,
    pub kind: SymbolKind,
    pub signature: String,
    pub documentation: Option<String>,
    pub file: String,
    pub line: u32,
    pub dependencies: Vec<Relation>,
    pub references: Vec<Relation>,
    pub code: Option<String>,
}

/// All language partitions of one repository.
struct RepositoryView {
    tables: Vec<Rst>,
}

impl RepositoryView {
    fn documents(&self) -> impl Iterator<Item = &Document> {
        self.tables.iter().flat_map(|rst| rst.documents.values())
    }

    fn document(&self, path: &str) -> Option<&Document> {
        self.tables.iter().find_map(|rst| rst.document(path))
    }

    fn locate(&self, id: &str) -> Option<(&Document, &Symbol)> {
        self.tables.iter().find_map(|rst| rst.find_symbol(id))
    }

    fn relation(&self, id: &str) -> Relation {
        let located = self.locate(id);
        Relation {
            id: id.to_string(),
            name: extract_name(id).to_string(),
            file: located.map(|(doc, _)| doc.relative_path.clone()),
            line: located.map_or(0, |(_, sym)| sym.line),
        }
    }

    fn detail(&self, doc: &Document, symbol: &Symbol) -> SymbolDetail {
        SymbolDetail {
            id: symbol.id.clone(),
            name: extract_name(&symbol.id).to_string(),
            container: extract_key(&symbol.id).to_string(),
            kind: symbol.kind.clone(),
            signature: symbol.signature.clone(),
            documentation: symbol.documentation.clone(),
            file: doc.relative_path.clone(),
            line: symbol.line,
            dependencies: symbol
                .dependence_on
                .iter()
                .map(|id| self.relation(id))
                .collect(),
            references: symbol
                .reference_by
                .iter()
                .map(|id| self.relation(id))
                .collect(),
            code: symbol.code.clone(),
        }
    }
}

pub struct QueryEngine {
    store: IndexStore,
}

impl QueryEngine {
    pub fn new(store: IndexStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Sanitized ids of every repository present in the index directory.
    pub fn repositories(&self) -> Result<Vec<String>> {
        self.store.repositories()
    }

    fn view(&self, repository: &str) -> Result<RepositoryView> {
        Ok(RepositoryView {
            tables: self.store.load_repository(repository)?,
        })
    }

    pub fn file_tree(&self, repository: &str) -> Result<FileTree> {
        let mut tree = FileTree::default();
        for path in self.list_files(repository)? {
            tree.insert(&path);
        }
        Ok(tree)
    }

    /// Every file of the repository, sorted by path.
    pub fn list_files(&self, repository: &str) -> Result<Vec<String>> {
        let view = self.view(repository)?;
        let files: BTreeSet<&str> = view
            .documents()
            .map(|doc| doc.relative_path.as_str())
            .collect();
        Ok(files.into_iter().map(str::to_string).collect())
    }

    /// Symbols defined in `file`, sorted by line then name.
    pub fn list_symbols(&self, repository: &str, file: &str) -> Result<Vec<SymbolSummary>> {
        let view = self.view(repository)?;
        let doc = view
            .document(file)
            .ok_or_else(|| RstError::NotFound(format!("file '{}'", file)))?;

        let mut symbols: Vec<SymbolSummary> = doc
            .symbols
            .values()
            .map(|sym| SymbolSummary {
                id: sym.id.clone(),
                name: extract_name(&sym.id).to_string(),
                kind: sym.kind.clone(),
                signature: sym.signature.clone(),
                line: sym.line,
            })
            .collect();
        symbols.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.name.cmp(&b.name)));
        Ok(symbols)
    }

    /// Finds a symbol by short name.
    ///
    /// Exact name matches are preferred over dotted-suffix matches; among
    /// equals the first in table order wins.
    pub fn symbol_detail(&self, repository: &str, query: &SymbolQuery) -> Result<SymbolDetail> {
        let view = self.view(repository)?;
        let documents: Vec<&Document> = match &query.file {
            Some(file) => vec![view
                .document(file)
                .ok_or_else(|| RstError::NotFound(format!("file '{}'", file)))?],
            None => view.documents().collect(),
        };

        let best = documents
            .iter()
            .flat_map(|doc| doc.symbols.values().map(move |sym| (*doc, sym)))
            .filter(|(_, sym)| matches_name(&sym.id, &query.name))
            .filter(|(_, sym)| query.line.is_none_or(|line| sym.line == line))
            .min_by_key(|&(_, sym)| {
                (extract_name(&sym.id) != query.name, sym.line, sym.id.as_str())
            });

        match best {
            Some((doc, sym)) => Ok(view.detail(doc, sym)),
            None => Err(RstError::NotFound(match query.line {
                Some(line) => format!("symbol '{}' at line {}", query.name, line),
                None => format!("symbol '{}'", query.name),
            })),
        }
    }

    /// Exact id lookup, used when following an edge.
    pub fn symbol_by_id(&self, repository: &str, id: &str) -> Result<SymbolDetail> {
        let view = self.view(repository)?;
        let (doc, sym) = view
            .locate(id)
            .ok_or_else(|| RstError::NotFound(format!("symbol '{}'", extract_name(id))))?;
        Ok(view.detail(doc, sym))
    }
}

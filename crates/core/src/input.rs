//! Upstream symbol index, as materialized from its JSON rendering.
//!
//! Raw occurrence fields (role bit-sets, integer ranges) are decoded into
//! [`Occurrence`] while deserializing, so the rest of the pipeline never sees
//! the raw encoding.

use crate::config::strip_file_prefix;
use crate::error::{Result, RstError};
use crate::model::SymbolKind;
use crate::symbol::{is_local_symbol, package_of};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Language tag used for documents that do not declare one.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

#[derive(Deserialize, Debug, Clone, Default)]
pub struct IndexInput {
    #[serde(default)]
    pub metadata: Option<IndexMetadata>,
    #[serde(default)]
    pub documents: Vec<InputDocument>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct IndexMetadata {
    #[serde(default, alias = "projectRoot")]
    pub project_root: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct InputDocument {
    #[serde(default, alias = "relativePath")]
    pub relative_path: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub symbols: Vec<SymbolInformation>,
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SymbolInformation {
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "deserialize_kind")]
    pub kind: SymbolKind,
    #[serde(default, alias = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub documentation: Vec<String>,
    #[serde(default, alias = "signatureDocumentation")]
    pub signature_documentation: Option<SignatureDocumentation>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SignatureDocumentation {
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKind {
    Code(i64),
    Name(String),
}

fn deserialize_kind<'de, D>(deserializer: D) -> std::result::Result<SymbolKind, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawKind>::deserialize(deserializer)? {
        Some(RawKind::Code(code)) => SymbolKind::from_code(code),
        Some(RawKind::Name(name)) => SymbolKind::from_name(&name),
        None => SymbolKind::Unspecified,
    })
}

/// Decoded occurrence role flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolRoles {
    pub definition: bool,
    pub import: bool,
    pub write_access: bool,
    pub read_access: bool,
    pub generated: bool,
    pub test: bool,
    pub forward_definition: bool,
}

impl SymbolRoles {
    const DEFINITION: i32 = 0x1;
    const IMPORT: i32 = 0x2;
    const WRITE_ACCESS: i32 = 0x4;
    const READ_ACCESS: i32 = 0x8;
    const GENERATED: i32 = 0x10;
    const TEST: i32 = 0x20;
    const FORWARD_DEFINITION: i32 = 0x40;

    pub fn from_bits(bits: i32) -> Self {
        Self {
            definition: bits & Self::DEFINITION != 0,
            import: bits & Self::IMPORT != 0,
            write_access: bits & Self::WRITE_ACCESS != 0,
            read_access: bits & Self::READ_ACCESS != 0,
            generated: bits & Self::GENERATED != 0,
            test: bits & Self::TEST != 0,
            forward_definition: bits & Self::FORWARD_DEFINITION != 0,
        }
    }

    pub fn definition() -> Self {
        Self {
            definition: true,
            ..Self::default()
        }
    }

    pub fn is_any_definition(&self) -> bool {
        self.definition || self.forward_definition
    }
}

/// Inclusive row span of a scope-defining occurrence (0-indexed rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub start: u32,
    pub end: u32,
}

impl RowSpan {
    pub fn contains(&self, row: u32) -> bool {
        row >= self.start && row <= self.end
    }
}

#[derive(Deserialize)]
struct RawOccurrence {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    range: Vec<i32>,
    #[serde(default, alias = "enclosingRange")]
    enclosing_range: Vec<i32>,
    #[serde(default, alias = "symbolRoles")]
    symbol_roles: i32,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "RawOccurrence")]
pub struct Occurrence {
    pub symbol: String,
    /// First row of `range`; `None` when the range is missing or malformed.
    pub start_row: Option<u32>,
    /// Rows `[enclosing_range[0], enclosing_range[2]]` when at least three values are present.
    pub scope: Option<RowSpan>,
    pub roles: SymbolRoles,
}

impl From<RawOccurrence> for Occurrence {
    fn from(raw: RawOccurrence) -> Self {
        let start_row = raw.range.first().and_then(|&r| u32::try_from(r).ok());
        let scope = if raw.enclosing_range.len() >= 3 {
            match (
                u32::try_from(raw.enclosing_range[0]),
                u32::try_from(raw.enclosing_range[2]),
            ) {
                (Ok(start), Ok(end)) => Some(RowSpan { start, end }),
                _ => None,
            }
        } else {
            None
        };
        Self {
            symbol: raw.symbol,
            start_row,
            scope,
            roles: SymbolRoles::from_bits(raw.symbol_roles),
        }
    }
}

impl Occurrence {
    pub fn new(symbol: impl Into<String>, row: u32) -> Self {
        Self {
            symbol: symbol.into(),
            start_row: Some(row),
            scope: None,
            roles: SymbolRoles::default(),
        }
    }

    pub fn with_scope(mut self, start: u32, end: u32) -> Self {
        self.scope = Some(RowSpan { start, end });
        self
    }

    pub fn with_roles(mut self, roles: SymbolRoles) -> Self {
        self.roles = roles;
        self
    }

    pub fn is_local(&self) -> bool {
        is_local_symbol(&self.symbol)
    }
}

impl IndexInput {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| RstError::input(path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| RstError::input(path, e))
    }

    /// Project root from the index metadata, with any `file://` prefix removed.
    pub fn project_root(&self) -> Option<PathBuf> {
        self.metadata
            .as_ref()
            .map(|m| m.project_root.as_str())
            .filter(|root| !root.is_empty())
            .map(|root| PathBuf::from(strip_file_prefix(root)))
    }

    /// Package field of the first non-local symbol that carries one.
    pub fn detect_repository(&self) -> Option<String> {
        self.documents
            .iter()
            .flat_map(|doc| doc.symbols.iter())
            .find_map(|sym| package_of(&sym.symbol))
            .map(str::to_string)
    }

    /// Splits the documents into language partitions, ordered by language tag.
    pub fn into_partitions(self) -> BTreeMap<String, Vec<InputDocument>> {
        let mut partitions: BTreeMap<String, Vec<InputDocument>> = BTreeMap::new();
        for doc in self.documents {
            let language = if doc.language.is_empty() {
                UNKNOWN_LANGUAGE.to_string()
            } else {
                doc.language.clone()
            };
            partitions.entry(language).or_default().push(doc);
        }
        partitions
    }

    pub fn occurrence_count(&self) -> usize {
        self.documents.iter().map(|d| d.occurrences.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "metadata": { "project_root": "file:///work/widget" },
        "documents": [
            {
                "relative_path": "pkg/a.go",
                "language": "go",
                "symbols": [
                    { "symbol": "local 1", "kind": "Variable" },
                    { "symbol": "scip-go gomod github.com/acme/widget v1 `github.com/acme/widget/pkg`/A().", "kind": 17, "display_name": "A" }
                ],
                "occurrences": [
                    { "symbol": "x", "range": [2, 5, 6], "enclosing_range": [2, 0, 8, 1], "symbol_roles": 1 },
                    { "symbol": "y", "range": [-1], "enclosingRange": [1, 2], "symbolRoles": 64 }
                ]
            },
            { "relative_path": "README" }
        ]
    }"#;

    #[test]
    fn test_decodes_occurrences_on_ingestion() {
        let input: IndexInput = serde_json::from_str(SAMPLE).unwrap();
        let occs = &input.documents[0].occurrences;

        assert_eq!(occs[0].start_row, Some(2));
        assert_eq!(occs[0].scope, Some(RowSpan { start: 2, end: 8 }));
        assert!(occs[0].roles.definition);
        assert!(!occs[0].roles.forward_definition);

        assert_eq!(occs[1].start_row, None);
        assert_eq!(occs[1].scope, None);
        assert!(occs[1].roles.forward_definition);
        assert!(occs[1].roles.is_any_definition());
    }

    #[test]
    fn test_kind_accepts_names_and_codes() {
        let input: IndexInput = serde_json::from_str(SAMPLE).unwrap();
        let syms = &input.documents[0].symbols;
        assert_eq!(syms[0].kind, SymbolKind::Variable);
        assert_eq!(syms[1].kind, SymbolKind::Function);
    }

    #[test]
    fn test_metadata_and_repository_detection() {
        let input: IndexInput = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(input.project_root(), Some(PathBuf::from("/work/widget")));
        assert_eq!(
            input.detect_repository().as_deref(),
            Some("github.com/acme/widget")
        );
    }

    #[test]
    fn test_partitions_by_language() {
        let input: IndexInput = serde_json::from_str(SAMPLE).unwrap();
        let partitions = input.into_partitions();
        let keys: Vec<_> = partitions.keys().cloned().collect();
        assert_eq!(keys, vec!["go".to_string(), UNKNOWN_LANGUAGE.to_string()]);
    }

    #[test]
    fn test_role_bits() {
        let roles = SymbolRoles::from_bits(0x1 | 0x8 | 0x20);
        assert!(roles.definition && roles.read_access && roles.test);
        assert!(!roles.import && !roles.write_access && !roles.generated);
    }
}

//! In-memory Relation Symbol Table.
//!
//! One [`Rst`] holds every document of a single (repository, language)
//! partition. Edges are insertion-ordered sets of upstream symbol ids.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub repository: String,
    pub language: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Rst {
    pub metadata: Metadata,
    pub documents: IndexMap<String, Document>,
}

impl Rst {
    pub fn new(repository: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            metadata: Metadata {
                repository: repository.into(),
                language: language.into(),
            },
            documents: IndexMap::new(),
        }
    }

    pub fn document(&self, path: &str) -> Option<&Document> {
        self.documents.get(path)
    }

    /// Looks a symbol up by exact id across all documents.
    pub fn find_symbol(&self, id: &str) -> Option<(&Document, &Symbol)> {
        self.documents
            .values()
            .find_map(|doc| doc.symbols.get(id).map(|sym| (doc, sym)))
    }

    pub fn symbol_count(&self) -> usize {
        self.documents.values().map(|d| d.symbols.len()).sum()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub relative_path: String,
    pub symbols: IndexMap<String, Symbol>,
}

impl Document {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            symbols: IndexMap::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub id: String,
    pub kind: SymbolKind,
    pub signature: String,
    pub documentation: Option<String>,
    /// 1-indexed definition line, 0 when unknown.
    pub line: u32,
    pub code: Option<String>,
    pub dependence_on: IndexSet<String>,
    pub reference_by: IndexSet<String>,
}

impl Symbol {
    pub fn new(id: impl Into<String>, kind: SymbolKind, signature: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            signature: signature.into(),
            documentation: None,
            line: 0,
            code: None,
            dependence_on: IndexSet::new(),
            reference_by: IndexSet::new(),
        }
    }

    /// Records that this symbol's scope uses `target`. Self edges are ignored.
    pub fn add_dependency(&mut self, target: &str) -> bool {
        target != self.id && self.dependence_on.insert(target.to_string())
    }

    /// Records that `source`'s scope uses this symbol. Self edges are ignored.
    pub fn add_reference(&mut self, source: &str) -> bool {
        source != self.id && self.reference_by.insert(source.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SymbolKind {
    #[default]
    Unspecified,
    Function,
    Method,
    Constructor,
    Destructor,
    Struct,
    Class,
    Interface,
    Trait,
    Enum,
    EnumMember,
    Type,
    TypeAlias,
    TypeParameter,
    Constant,
    Variable,
    Field,
    Property,
    Parameter,
    Module,
    Package,
    Namespace,
    Macro,
    /// Kind inferred from a defining occurrence when none was declared.
    InferredDefinition,
    Other(String),
}

/// SCIP `SymbolInformation.Kind` codes and their names.
const SCIP_KINDS: &[(i64, &str)] = &[
    (0, "UnspecifiedKind"),
    (1, "Array"),
    (2, "Assertion"),
    (3, "AssociatedType"),
    (4, "Attribute"),
    (5, "Axiom"),
    (6, "Boolean"),
    (7, "Class"),
    (8, "Constant"),
    (9, "Constructor"),
    (10, "DataFamily"),
    (11, "Enum"),
    (12, "EnumMember"),
    (13, "Event"),
    (14, "Fact"),
    (15, "Field"),
    (16, "File"),
    (17, "Function"),
    (18, "Getter"),
    (19, "Grammar"),
    (20, "Instance"),
    (21, "Interface"),
    (22, "Key"),
    (23, "Lang"),
    (24, "Lemma"),
    (25, "Macro"),
    (26, "Method"),
    (27, "MethodReceiver"),
    (28, "Message"),
    (29, "Module"),
    (30, "Namespace"),
    (31, "Null"),
    (32, "Number"),
    (33, "Object"),
    (34, "Operator"),
    (35, "Package"),
    (36, "PackageObject"),
    (37, "Parameter"),
    (38, "ParameterLabel"),
    (39, "Pattern"),
    (40, "Predicate"),
    (41, "Property"),
    (42, "Protocol"),
    (43, "Quasiquoter"),
    (44, "SelfParameter"),
    (45, "Setter"),
    (46, "Signature"),
    (47, "Subscript"),
    (48, "String"),
    (49, "Struct"),
    (50, "Tactic"),
    (51, "Theorem"),
    (52, "ThisParameter"),
    (53, "Trait"),
    (54, "Type"),
    (55, "TypeAlias"),
    (56, "TypeClass"),
    (57, "TypeFamily"),
    (58, "TypeParameter"),
    (59, "Union"),
    (60, "Value"),
    (61, "Variable"),
    (62, "Contract"),
    (63, "Error"),
    (64, "Library"),
    (65, "Modifier"),
    (66, "AbstractMethod"),
    (67, "MethodSpecification"),
    (68, "ProtocolMethod"),
    (69, "PureVirtualMethod"),
    (70, "TraitMethod"),
    (71, "TypeClassMethod"),
    (72, "Accessor"),
    (73, "Delegate"),
    (74, "MethodAlias"),
    (75, "SingletonClass"),
    (76, "SingletonMethod"),
    (77, "StaticDataMember"),
    (78, "StaticEvent"),
    (79, "StaticField"),
    (80, "StaticMethod"),
    (81, "StaticProperty"),
    (82, "StaticVariable"),
    (84, "Extension"),
    (85, "Mixin"),
    (86, "Concept"),
];

impl SymbolKind {
    /// Parses an upstream kind name; empty and unspecified names map to `Unspecified`.
    ///
    /// Names without a dedicated variant are kept verbatim in `Other`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "" | "UnspecifiedKind" | "Unspecified" => SymbolKind::Unspecified,
            "Function" => SymbolKind::Function,
            "Method" => SymbolKind::Method,
            "Constructor" => SymbolKind::Constructor,
            "Destructor" => SymbolKind::Destructor,
            "Struct" => SymbolKind::Struct,
            "Class" => SymbolKind::Class,
            "Interface" => SymbolKind::Interface,
            "Trait" => SymbolKind::Trait,
            "Enum" => SymbolKind::Enum,
            "EnumMember" => SymbolKind::EnumMember,
            "Type" => SymbolKind::Type,
            "TypeAlias" => SymbolKind::TypeAlias,
            "TypeParameter" => SymbolKind::TypeParameter,
            "Constant" => SymbolKind::Constant,
            "Variable" => SymbolKind::Variable,
            "Field" => SymbolKind::Field,
            "Property" => SymbolKind::Property,
            "Parameter" => SymbolKind::Parameter,
            "Module" => SymbolKind::Module,
            "Package" => SymbolKind::Package,
            "Namespace" => SymbolKind::Namespace,
            "Macro" => SymbolKind::Macro,
            "FUNC" => SymbolKind::InferredDefinition,
            other => SymbolKind::Other(other.to_string()),
        }
    }

    /// Maps a numeric SCIP `SymbolInformation.Kind` to the same kind its name yields.
    /// Unknown codes are kept as their decimal text.
    pub fn from_code(code: i64) -> Self {
        match SCIP_KINDS.iter().find(|(c, _)| *c == code) {
            Some((_, name)) => SymbolKind::from_name(name),
            None => SymbolKind::Other(code.to_string()),
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, SymbolKind::Unspecified)
    }

    /// Kinds whose source body is extracted during a build.
    pub fn is_extractable(&self) -> bool {
        matches!(
            self,
            SymbolKind::Function
                | SymbolKind::Method
                | SymbolKind::Constructor
                | SymbolKind::Destructor
                | SymbolKind::InferredDefinition
        )
    }

    /// Prefix used when a signature has to be synthesized.
    pub fn signature_prefix(&self) -> &'static str {
        match self {
            SymbolKind::Function | SymbolKind::Method => "func ",
            SymbolKind::Struct => "type ",
            SymbolKind::Class => "class ",
            SymbolKind::Interface => "interface ",
            SymbolKind::Constant => "const ",
            _ => "",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Unspecified => "UnspecifiedKind",
            SymbolKind::Function => "Function",
            SymbolKind::Method => "Method",
            SymbolKind::Constructor => "Constructor",
            SymbolKind::Destructor => "Destructor",
            SymbolKind::Struct => "Struct",
            SymbolKind::Class => "Class",
            SymbolKind::Interface => "Interface",
            SymbolKind::Trait => "Trait",
            SymbolKind::Enum => "Enum",
            SymbolKind::EnumMember => "EnumMember",
            SymbolKind::Type => "Type",
            SymbolKind::TypeAlias => "TypeAlias",
            SymbolKind::TypeParameter => "TypeParameter",
            SymbolKind::Constant => "Constant",
            SymbolKind::Variable => "Variable",
            SymbolKind::Field => "Field",
            SymbolKind::Property => "Property",
            SymbolKind::Parameter => "Parameter",
            SymbolKind::Module => "Module",
            SymbolKind::Package => "Package",
            SymbolKind::Namespace => "Namespace",
            SymbolKind::Macro => "Macro",
            SymbolKind::InferredDefinition => "FUNC",
            SymbolKind::Other(s) => s.as_str(),
        };
        f.write_str(name)
    }
}

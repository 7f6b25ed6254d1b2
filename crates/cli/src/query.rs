//! JSON views for the stateless navigation queries.

use indexmap::IndexMap;
use rstnav_core::config::Config;
use rstnav_core::query::{QueryEngine, Relation, SymbolQuery};
use rstnav_core::storage::IndexStore;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct FileStructure<'a> {
    file_path: &'a str,
    mod_path: &'a str,
    nodes: Vec<StructureNode>,
}

#[derive(Serialize)]
struct StructureNode {
    name: String,
    signature: String,
    line: u32,
}

#[derive(Serialize)]
struct SymbolNodes {
    nodes: Vec<SymbolNode>,
}

#[derive(Serialize)]
struct SymbolNode {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    file: String,
    line: u32,
    signature: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<RelationGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    references: Vec<RelationGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

/// Edge targets defined in one file; symbols outside the repository use `""`.
#[derive(Serialize, Debug, PartialEq, Eq)]
struct RelationGroup {
    file_path: String,
    names: Vec<String>,
}

fn group_by_file(relations: &[Relation]) -> Vec<RelationGroup> {
    let mut groups: IndexMap<&str, Vec<String>> = IndexMap::new();
    for relation in relations {
        groups
            .entry(relation.file.as_deref().unwrap_or(""))
            .or_default()
            .push(relation.name.clone());
    }
    groups
        .into_iter()
        .map(|(file, names)| RelationGroup {
            file_path: file.to_string(),
            names,
        })
        .collect()
}

fn engine(config: &Config) -> QueryEngine {
    QueryEngine::new(IndexStore::new(&config.index_dir))
}

pub fn tree_repo(
    config: &Config,
    repo: &str,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = engine(config).file_tree(repo)?;
    serde_json::to_writer(&mut *out, &tree)?;
    writeln!(out)?;
    Ok(())
}

pub fn file_structure(
    config: &Config,
    repo: &str,
    file: &str,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let symbols = engine(config).list_symbols(repo, file)?;
    let view = FileStructure {
        file_path: file,
        mod_path: repo,
        nodes: symbols
            .into_iter()
            .map(|s| StructureNode {
                name: s.name,
                signature: s.signature,
                line: s.line,
            })
            .collect(),
    };
    serde_json::to_writer(&mut *out, &view)?;
    writeln!(out)?;
    Ok(())
}

pub fn file_symbol(
    config: &Config,
    repo: &str,
    file: &str,
    name: &str,
    line: Option<u32>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut query = SymbolQuery::new(name).in_file(file);
    query.line = line;
    let detail = engine(config).symbol_detail(repo, &query)?;

    let view = SymbolNodes {
        nodes: vec![SymbolNode {
            name: detail.name,
            kind: detail.kind.to_string(),
            file: detail.file,
            line: detail.line,
            signature: detail.signature,
            dependencies: group_by_file(&detail.dependencies),
            references: group_by_file(&detail.references),
            code: detail.code,
        }],
    };
    serde_json::to_writer(&mut *out, &view)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstnav_core::model::{Document, Rst, Symbol, SymbolKind};
    use tempfile::{tempdir, TempDir};

    const MAIN: &str = "scip-go gomod example.com/app v1 `example.com/app`/main().";
    const LOAD: &str = "scip-go gomod example.com/app v1 `example.com/app/cfg`/Load().";
    const PRINTF: &str = "scip-go gomod std go1 `fmt`/Printf().";

    fn fixture() -> (TempDir, Config) {
        let dir = tempdir().unwrap();
        let config = Config::with_index_dir(dir.path().to_path_buf());

        let mut rst = Rst::new("example.com/app", "go");
        let mut main_doc = Document::new("main.go");
        let mut main = Symbol::new(MAIN, SymbolKind::Function, "func main()");
        main.line = 7;
        main.add_dependency(LOAD);
        main.add_dependency(PRINTF);
        main_doc.symbols.insert(MAIN.to_string(), main);

        let mut cfg_doc = Document::new("cfg/load.go");
        let mut load = Symbol::new(LOAD, SymbolKind::Function, "func Load() error");
        load.line = 3;
        load.add_reference(MAIN);
        load.code = Some("func Load() error { return nil }".to_string());
        cfg_doc.symbols.insert(LOAD.to_string(), load);

        rst.documents.insert("main.go".to_string(), main_doc);
        rst.documents.insert("cfg/load.go".to_string(), cfg_doc);
        IndexStore::new(dir.path()).write(&rst).unwrap();
        (dir, config)
    }

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<(), Box<dyn std::error::Error>>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tree_repo_output() {
        let (_dir, config) = fixture();
        let json = output(|out| tree_repo(&config, "example.com/app", out));
        assert_eq!(json, "{\"files\":{\"\":[\"main.go\"],\"cfg\":[\"load.go\"]}}\n");
    }

    #[test]
    fn test_file_structure_output() {
        let (_dir, config) = fixture();
        let json = output(|out| file_structure(&config, "example.com/app", "main.go", out));
        assert_eq!(
            json,
            "{\"file_path\":\"main.go\",\"mod_path\":\"example.com/app\",\
             \"nodes\":[{\"name\":\"main\",\"signature\":\"func main()\",\"line\":7}]}\n"
        );
    }

    #[test]
    fn test_file_symbol_groups_relations_by_file() {
        let (_dir, config) = fixture();
        let json = output(|out| file_symbol(&config, "example.com/app", "main.go", "main", None, out));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let node = &value["nodes"][0];

        assert_eq!(node["name"], "main");
        assert_eq!(node["type"], "Function");
        assert_eq!(node["line"], 7);
        assert_eq!(node["dependencies"][0]["file_path"], "cfg/load.go");
        assert_eq!(node["dependencies"][0]["names"][0], "Load");
        assert_eq!(node["dependencies"][1]["file_path"], "");
        assert_eq!(node["dependencies"][1]["names"][0], "Printf");
        assert!(node.get("references").is_none());
        assert!(node.get("code").is_none());
    }

    #[test]
    fn test_file_symbol_with_line_and_code() {
        let (_dir, config) = fixture();
        let json = output(|out| {
            file_symbol(&config, "example.com/app", "cfg/load.go", "Load", Some(3), out)
        });
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let node = &value["nodes"][0];
        assert_eq!(node["code"], "func Load() error { return nil }");
        assert_eq!(node["references"][0]["file_path"], "main.go");

        let mut out = Vec::new();
        let err = file_symbol(&config, "example.com/app", "cfg/load.go", "Load", Some(4), &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("Not found"));
    }

    #[test]
    fn test_group_by_file_keeps_first_seen_order() {
        let relation = |name: &str, file: Option<&str>| Relation {
            id: name.to_string(),
            name: name.to_string(),
            file: file.map(str::to_string),
            line: 0,
        };
        let groups = group_by_file(&[
            relation("a", Some("x.go")),
            relation("b", None),
            relation("c", Some("x.go")),
        ]);
        assert_eq!(
            groups,
            vec![
                RelationGroup {
                    file_path: "x.go".to_string(),
                    names: vec!["a".to_string(), "c".to_string()],
                },
                RelationGroup {
                    file_path: String::new(),
                    names: vec!["b".to_string()],
                },
            ]
        );
    }
}

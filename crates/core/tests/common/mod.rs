#![allow(dead_code)]

use rstnav_core::input::IndexInput;
use serde_json::json;
use std::fs;
use std::path::Path;

pub const REPO: &str = "example.com/demo";
pub const HELPER: &str = "scip-go gomod example.com/demo v0.1.0 `example.com/demo`/helper().";
pub const RUN: &str = "scip-go gomod example.com/demo v0.1.0 `example.com/demo`/Run().";
pub const PRINTLN: &str = "scip-go gomod github.com/golang/go/src go1.22 `fmt`/Println().";
pub const GEN: &str = "scip-python python demo-tools 0.1 `tools.gen`/generate().";

pub const MAIN_GO: &str = "package main

import \"fmt\"

func helper() int {
\treturn 1
}

func Run() {
\tx := helper()
\tfmt.Println(x)
\tf := func() {
\t\thelper()
\t}
\tf()
}
";

/// Writes `main.go` under `root` and the matching index JSON next to it.
pub fn write_project(root: &Path) -> std::path::PathBuf {
    fs::write(root.join("main.go"), MAIN_GO).unwrap();

    let index = json!({
        "metadata": { "project_root": format!("file://{}", root.display()) },
        "documents": [
            {
                "relative_path": "main.go",
                "language": "go",
                "symbols": [
                    { "symbol": HELPER, "kind": "Function", "display_name": "helper",
                      "documentation": ["```go\nfunc helper() int\n```", "helper returns one."] },
                    { "symbol": RUN, "kind": "Function" },
                    { "symbol": "local 0", "kind": "Variable" },
                    { "symbol": "local 1", "kind": "Variable" }
                ],
                "occurrences": [
                    { "symbol": HELPER, "range": [4, 5, 11], "enclosing_range": [4, 0, 6, 1], "symbol_roles": 1 },
                    { "symbol": RUN, "range": [8, 5, 8], "enclosing_range": [8, 0, 15, 1], "symbol_roles": 1 },
                    { "symbol": "local 0", "range": [9, 1, 2], "symbol_roles": 1 },
                    { "symbol": HELPER, "range": [9, 6, 12] },
                    { "symbol": PRINTLN, "range": [10, 5, 12] },
                    { "symbol": "local 0", "range": [10, 13, 14] },
                    { "symbol": "local 1", "range": [11, 1, 2], "enclosing_range": [11, 6, 13, 2], "symbol_roles": 1 },
                    { "symbol": HELPER, "range": [12, 2, 8] },
                    { "symbol": "local 1", "range": [14, 1, 2] }
                ]
            },
            {
                "relativePath": "tools/gen.py",
                "language": "python",
                "symbols": [
                    { "symbol": GEN, "kind": 17, "signatureDocumentation": { "text": "def generate() -> None" } }
                ],
                "occurrences": [
                    { "symbol": GEN, "range": [0, 4, 12], "enclosingRange": [0, 0, 1, 8], "symbolRoles": 1 }
                ]
            }
        ]
    });

    let path = root.join("index.json");
    fs::write(&path, serde_json::to_vec_pretty(&index).unwrap()).unwrap();
    path
}

pub fn load_input(path: &Path) -> IndexInput {
    IndexInput::load(path).unwrap()
}

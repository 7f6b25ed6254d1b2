//! Debug dumps of RST files and symbol indexes.

use nu_ansi_term::{Color, Style};
use rstnav_core::input::IndexInput;
use rstnav_core::model::{Rst, Symbol};
use rstnav_core::storage::{read_rst, RST_EXTENSION};
use rstnav_core::symbol::extract_name;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tabled::settings::Style as TableStyle;
use tabled::{Table, Tabled};

/// Colors are on unless `--no-color` is given or `NO_COLOR` is set to a
/// value other than `0`, `false` or `off`.
pub fn color_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    match std::env::var("NO_COLOR") {
        Ok(value) if !value.is_empty() => {
            matches!(value.to_ascii_lowercase().as_str(), "0" | "false" | "off")
        }
        _ => true,
    }
}

pub fn run(
    path: &Path,
    json: bool,
    color: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let is_rst = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(RST_EXTENSION));

    if is_rst {
        let rst = read_rst(path)?;
        if json {
            serde_json::to_writer_pretty(&mut *out, &rst)?;
            writeln!(out)?;
        } else {
            write_rst_tree(&rst, &Palette::new(color), out)?;
        }
    } else {
        let input = IndexInput::load(path)?;
        write_input_summary(&input, json, out)?;
    }
    Ok(())
}

struct Palette {
    enabled: bool,
}

impl Palette {
    fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint(Color::LightBlue.bold(), text)
    }

    fn path(&self, text: &str) -> String {
        self.paint(Color::Yellow.normal(), text)
    }

    fn name(&self, text: &str) -> String {
        self.paint(Color::LightGreen.bold(), text)
    }

    fn muted(&self, text: &str) -> String {
        self.paint(Style::new().fg(Color::LightGray).dimmed(), text)
    }
}

fn write_rst_tree(rst: &Rst, palette: &Palette, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "{} {} ({})",
        palette.heading("repository"),
        rst.metadata.repository,
        rst.metadata.language
    )?;
    writeln!(
        out,
        "{}",
        palette.muted(&format!(
            "{} documents, {} symbols",
            rst.documents.len(),
            rst.symbol_count()
        ))
    )?;

    for doc in rst.documents.values() {
        writeln!(out)?;
        writeln!(out, "{}", palette.path(&doc.relative_path))?;
        for symbol in doc.symbols.values() {
            write_symbol(symbol, palette, out)?;
        }
    }
    Ok(())
}

fn write_symbol(symbol: &Symbol, palette: &Palette, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "  {} {} {}",
        palette.name(extract_name(&symbol.id)),
        palette.muted(&format!("[{}]", symbol.kind)),
        palette.muted(&format!("line {}", symbol.line))
    )?;
    writeln!(out, "    id: {}", symbol.id)?;
    writeln!(out, "    signature: {}", symbol.signature)?;
    if let Some(doc) = &symbol.documentation {
        writeln!(out, "    documentation: {}", doc.replace('\n', "\n      "))?;
    }
    write_edges("dependence_on", symbol.dependence_on.iter(), palette, out)?;
    write_edges("reference_by", symbol.reference_by.iter(), palette, out)?;
    if let Some(code) = &symbol.code {
        writeln!(out, "    code:")?;
        for line in code.lines() {
            writeln!(out, "      {}", palette.muted(line))?;
        }
    }
    Ok(())
}

fn write_edges<'a>(
    label: &str,
    edges: impl ExactSizeIterator<Item = &'a String>,
    palette: &Palette,
    out: &mut impl Write,
) -> std::io::Result<()> {
    if edges.len() == 0 {
        return writeln!(out, "    {}: {}", label, palette.muted("-"));
    }
    let names: Vec<&str> = edges.map(|id| extract_name(id)).collect();
    writeln!(out, "    {}: {}", label, names.join(", "))
}

#[derive(Tabled, Serialize)]
struct DocumentRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Language")]
    language: String,
    #[tabled(rename = "Symbols")]
    symbols: usize,
    #[tabled(rename = "Occurrences")]
    occurrences: usize,
}

fn write_input_summary(
    input: &IndexInput,
    json: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<DocumentRow> = input
        .documents
        .iter()
        .map(|doc| DocumentRow {
            path: doc.relative_path.clone(),
            language: doc.language.clone(),
            symbols: doc.symbols.len(),
            occurrences: doc.occurrences.len(),
        })
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }

    if let Some(root) = input.project_root() {
        writeln!(out, "Project root: {}", root.display())?;
    }
    if let Some(repo) = input.detect_repository() {
        writeln!(out, "Repository:   {}", repo)?;
    }
    if rows.is_empty() {
        writeln!(out, "No documents found.")?;
    } else {
        writeln!(out, "{}", Table::new(rows).with(TableStyle::psql()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstnav_core::model::{Document, SymbolKind};
    use rstnav_core::storage::write_rst;
    use tempfile::tempdir;

    const RUN: &str = "scip-go gomod m v `m`/Run().";
    const STEP: &str = "scip-go gomod m v `m`/step().";

    fn sample() -> Rst {
        let mut rst = Rst::new("example.com/m", "go");
        let mut doc = Document::new("run.go");
        let mut run = Symbol::new(RUN, SymbolKind::Function, "func Run()");
        run.line = 4;
        run.add_dependency(STEP);
        run.code = Some("func Run() {\n\tstep()\n}".to_string());
        doc.symbols.insert(RUN.to_string(), run);
        rst.documents.insert("run.go".to_string(), doc);
        rst
    }

    #[test]
    fn test_plain_tree_output() {
        let mut out = Vec::new();
        write_rst_tree(&sample(), &Palette::new(false), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("repository example.com/m (go)\n1 documents, 1 symbols\n"));
        assert!(text.contains("\nrun.go\n  Run [Function] line 4\n"));
        assert!(text.contains("    dependence_on: step\n    reference_by: -\n"));
        assert!(text.contains("    code:\n      func Run() {\n      \tstep()\n      }\n"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_colored_tree_output() {
        let mut out = Vec::new();
        write_rst_tree(&sample(), &Palette::new(true), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains('\u{1b}'));
    }

    #[test]
    fn test_print_rst_as_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("example_com_m.go.rst");
        write_rst(&path, &sample()).unwrap();

        let mut out = Vec::new();
        run(&path, true, false, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["metadata"]["language"], "go");
        assert_eq!(value["documents"]["run.go"]["symbols"][RUN]["dependence_on"][0], STEP);
    }

    #[test]
    fn test_print_input_summary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(
            &path,
            r#"{"documents":[{"relative_path":"a.go","language":"go","symbols":[{"symbol":"local 1"}],"occurrences":[]}]}"#,
        )
        .unwrap();

        let mut out = Vec::new();
        run(&path, false, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Path"));
        assert!(text.contains("a.go"));

        let mut out = Vec::new();
        run(&path, true, false, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["symbols"], 1);
    }
}

mod clear;
mod parse;
mod print;
mod query;
mod tui;

use clap::{Parser, Subcommand};
use rstnav_core::config::Config;
use rstnav_core::logging::{init_logging, LogTarget};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rstnav",
    version,
    about = "Relation Symbol Table builder and code navigator",
    long_about = "rstnav turns a precomputed symbol index into per-language Relation Symbol Tables \
                  (symbols with their dependency and reference edges) and lets you query or browse \
                  them from the terminal."
)]
pub struct Cli {
    /// Directory holding the RST files (default: $RSTNAV_INDEX_DIR or ~/.rsts)
    #[arg(long, global = true, value_name = "DIR")]
    pub output: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build RST files from a symbol index
    #[command(
        long_about = "Reads a JSON symbol index, builds one Relation Symbol Table per language and \
                      writes it to the index directory as {repo}.{language}.rst."
    )]
    Parse {
        /// Path to the JSON symbol index
        #[arg(value_name = "INDEX")]
        input: PathBuf,

        /// Repository id (detected from the first non-local symbol when omitted)
        #[arg(long, value_name = "ID")]
        repo: Option<String>,
    },
    /// Print an RST file or a symbol index for debugging
    #[command(
        long_about = "Prints an RST file (.rst) as JSON or as a readable tree, or summarizes a JSON \
                      symbol index. The tree output may change over time; use --json in scripts."
    )]
    Print {
        /// Path to an .rst file or a JSON symbol index
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,

        /// Disable colors (also honours NO_COLOR)
        #[arg(long)]
        no_color: bool,
    },
    /// List the files of a repository grouped by directory
    #[command(alias = "tree_repo")]
    TreeRepo {
        #[arg(value_name = "REPO")]
        repo: String,
    },
    /// List the symbols defined in a file
    #[command(alias = "get_file_structure")]
    FileStructure {
        #[arg(value_name = "REPO")]
        repo: String,
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Show a symbol with its dependencies and references
    #[command(alias = "get_file_symbol")]
    FileSymbol {
        #[arg(value_name = "REPO")]
        repo: String,
        #[arg(value_name = "FILE")]
        file: String,
        #[arg(value_name = "NAME")]
        name: String,

        /// Definition line, to pick between symbols sharing a name
        #[arg(long)]
        line: Option<u32>,
    },
    /// Browse repositories, files and symbols interactively
    Tui,
    /// Remove RST files
    #[command(
        long_about = "Removes the RST files of one repository. Without a repository, every RST file \
                      in the index directory is removed."
    )]
    Clear {
        #[arg(value_name = "REPO")]
        repo: Option<String>,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.output.as_deref(), cli.verbose);

    let target = match &cli.command {
        Commands::Tui => LogTarget::Tui,
        _ => LogTarget::Cli,
    };
    let _guard = init_logging(&config, target);

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::Parse { input, repo } => parse::run(&config, &input, repo, &mut stdout),
        Commands::Print {
            path,
            json,
            no_color,
        } => print::run(&path, json, print::color_enabled(no_color), &mut stdout),
        Commands::TreeRepo { repo } => query::tree_repo(&config, &repo, &mut stdout),
        Commands::FileStructure { repo, file } => {
            query::file_structure(&config, &repo, &file, &mut stdout)
        }
        Commands::FileSymbol {
            repo,
            file,
            name,
            line,
        } => query::file_symbol(&config, &repo, &file, &name, line, &mut stdout),
        Commands::Tui => {
            drop(stdout);
            tui::run(&config)
        }
        Commands::Clear { repo } => clear::run(&config, repo.as_deref()),
    }
}

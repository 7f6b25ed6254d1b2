//! Tracing setup: one daily log file per front end, echoed to stderr for
//! one-shot commands.

use crate::config::Config;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directive applied by `--verbose`; dependencies stay at `info`.
const VERBOSE_DIRECTIVE: &str = "info,rstnav_core=debug,rstnav_cli=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Cli,
    /// The browser owns the terminal, so it only logs to its file.
    Tui,
}

impl LogTarget {
    fn file_prefix(self) -> &'static str {
        match self {
            LogTarget::Cli => "rstnav-cli",
            LogTarget::Tui => "rstnav-tui",
        }
    }

    fn echoes_to_stderr(self) -> bool {
        matches!(self, LogTarget::Cli)
    }
}

/// `--verbose` wins over `RUST_LOG`, which wins over plain `info`.
fn filter_directive(verbose: bool, env: Option<String>) -> String {
    match env {
        _ if verbose => VERBOSE_DIRECTIVE.to_string(),
        Some(directive) if !directive.trim().is_empty() => directive,
        _ => "info".to_string(),
    }
}

fn file_writer(dir: &Path, target: LogTarget) -> Option<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir).ok()?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(target.file_prefix())
        .filename_suffix("log")
        .build(dir)
        .ok()?;
    Some(tracing_appender::non_blocking(appender))
}

/// Installs the global subscriber. Hold the returned guard until exit so the
/// file writer flushes; `None` means the log directory was unusable.
pub fn init_logging(config: &Config, target: LogTarget) -> Option<WorkerGuard> {
    let directive = filter_directive(config.verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match file_writer(&config.log_dir, target) {
        Some((writer, guard)) => (
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true),
            ),
            Some(guard),
        ),
        None => (None, None),
    };
    let stderr_layer = target.echoes_to_stderr().then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    guard
}

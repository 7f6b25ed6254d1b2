use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RstError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid input {}: {reason}", path.display())]
    Input { path: PathBuf, reason: String },
    #[error("Codec error: {0}")]
    Codec(String),
    #[error("Index version mismatch at {} (found {found}, expected {expected})", path.display())]
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No documents for language partition '{0}'")]
    EmptyPartition(String),
    #[error("Could not auto-detect repository id; please specify --repo")]
    RepositoryUndetected,
    #[error("{} partition(s) failed: {}", .0.len(), summarize(.0))]
    Partitions(Vec<PartitionFailure>),
}

/// A language partition that could not be built or written.
#[derive(Debug)]
pub struct PartitionFailure {
    pub language: String,
    pub error: RstError,
}

fn summarize(failures: &[PartitionFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.language, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

impl RstError {
    pub fn input(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        RstError::Input {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RstError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, RstError>;

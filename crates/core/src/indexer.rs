//! End-to-end indexing: upstream index in, one RST file per language out.

use crate::builder::RstBuilder;
use crate::error::{PartitionFailure, Result, RstError};
use crate::extract::BodyExtractor;
use crate::input::{IndexInput, InputDocument};
use crate::storage::IndexStore;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of one indexing run.
#[derive(Debug)]
pub struct IndexReport {
    pub repository: String,
    /// Files written, in language order.
    pub written: Vec<PathBuf>,
    /// Languages that had no documents to write.
    pub skipped: Vec<String>,
    pub failures: Vec<PartitionFailure>,
}

impl IndexReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Indexer {
    store: IndexStore,
    repository: Option<String>,
    extractor: BodyExtractor,
}

impl Indexer {
    pub fn new(store: IndexStore) -> Self {
        Self {
            store,
            repository: None,
            extractor: BodyExtractor::default(),
        }
    }

    /// Uses an explicit repository id instead of detecting one from the input.
    pub fn with_repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository.filter(|r| !r.is_empty());
        self
    }

    pub fn with_extractor(mut self, extractor: BodyExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Builds and writes every language partition of `input`.
    ///
    /// Partitions are processed in parallel and fail independently; only a
    /// missing repository id or an unusable output directory abort the run.
    pub fn run(&self, input: IndexInput) -> Result<IndexReport> {
        let start = Instant::now();
        let repository = match &self.repository {
            Some(repo) => repo.clone(),
            None => input
                .detect_repository()
                .ok_or(RstError::RepositoryUndetected)?,
        };

        std::fs::create_dir_all(self.store.root()).map_err(|source| RstError::Write {
            path: self.store.root().to_path_buf(),
            source,
        })?;

        let project_root = input.project_root();
        if project_root.is_none() {
            info!("no project root in index metadata, skipping body extraction");
        }
        info!(
            repository = %repository,
            documents = input.documents.len(),
            occurrences = input.occurrence_count(),
            "indexing"
        );

        let partitions: Vec<(String, Vec<InputDocument>)> =
            input.into_partitions().into_iter().collect();

        let outcomes: Vec<(String, Result<PathBuf>)> = partitions
            .par_iter()
            .map(|(language, documents)| {
                let mut builder = RstBuilder::new(repository.clone());
                if let Some(root) = &project_root {
                    builder = builder.with_extraction(root.clone(), &self.extractor);
                }
                let result = builder
                    .build(language, documents)
                    .and_then(|rst| self.store.write(&rst));
                (language.clone(), result)
            })
            .collect();

        let mut report = IndexReport {
            repository,
            written: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        };
        for (language, outcome) in outcomes {
            match outcome {
                Ok(path) => report.written.push(path),
                Err(RstError::EmptyPartition(_)) => {
                    warn!("no documents for language '{}', nothing written", language);
                    report.skipped.push(language);
                }
                Err(error) => {
                    warn!("partition '{}' failed: {}", language, error);
                    report.failures.push(PartitionFailure { language, error });
                }
            }
        }

        info!(
            written = report.written.len(),
            failed = report.failures.len(),
            "indexing finished in {:?}",
            start.elapsed()
        );
        Ok(report)
    }
}

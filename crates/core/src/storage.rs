//! On-disk RST files.
//!
//! Each (repository, language) partition lives in its own
//! `{sanitized-repo}.{language}.rst` file: a zstd-compressed MessagePack
//! envelope carrying [`FORMAT_VERSION`]. Writes go to a `.tmp` sibling and are
//! renamed into place, so readers never see a partially written file.

use crate::error::{Result, RstError};
use crate::model::Rst;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const FORMAT_VERSION: u32 = 1;
pub const RST_EXTENSION: &str = "rst";
const TEMP_SUFFIX: &str = ".tmp";

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    rst: &'a Rst,
}

#[derive(Deserialize)]
struct Envelope {
    rst: Rst,
}

#[derive(Deserialize)]
struct Header {
    version: u32,
}

/// Strips leading `https://`, `http://` and `git@` in that order, then replaces
/// `/ . : -` with `_`.
///
/// Distinct ids may map to the same file name; the later write wins.
pub fn sanitize_repo_id(id: &str) -> String {
    let trimmed = ["https://", "http://", "git@"]
        .iter()
        .fold(id, |rest, prefix| rest.strip_prefix(prefix).unwrap_or(rest));
    trimmed.replace(['/', '.', ':', '-'], "_")
}

pub fn partition_file_name(repository: &str, language: &str) -> String {
    let language = language.replace(['/', '\\'], "_");
    format!("{}.{}.{}", sanitize_repo_id(repository), language, RST_EXTENSION)
}

/// Splits `{repo}.{language}.rst` back into its sanitized repository and language.
pub fn parse_partition_file_name(name: &str) -> Option<(&str, &str)> {
    let stem = name.strip_suffix(RST_EXTENSION)?.strip_suffix('.')?;
    let (repository, language) = stem.split_once('.')?;
    if repository.is_empty() || language.is_empty() {
        return None;
    }
    Some((repository, language))
}

pub fn encode(rst: &Rst) -> Result<Vec<u8>> {
    let envelope = EnvelopeRef {
        version: FORMAT_VERSION,
        rst,
    };
    let bytes = rmp_serde::to_vec_named(&envelope)
        .map_err(|e| RstError::Codec(format!("MSGPACK error: {}", e)))?;
    zstd::encode_all(&bytes[..], 0)
        .map_err(|e| RstError::Codec(format!("Zstd compression failed: {}", e)))
}

pub fn decode(bytes: &[u8], path: &Path) -> Result<Rst> {
    let decompressed = zstd::decode_all(bytes)
        .map_err(|e| RstError::input(path, format!("Zstd decompression failed: {}", e)))?;

    let header: Header = rmp_serde::from_slice(&decompressed)
        .map_err(|e| RstError::input(path, format!("MSGPACK error: {}", e)))?;
    if header.version != FORMAT_VERSION {
        return Err(RstError::VersionMismatch {
            path: path.to_path_buf(),
            found: header.version,
            expected: FORMAT_VERSION,
        });
    }

    let envelope: Envelope = rmp_serde::from_slice(&decompressed)
        .map_err(|e| RstError::input(path, format!("MSGPACK error: {}", e)))?;
    Ok(envelope.rst)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Atomically replaces `path` with the encoded table.
pub fn write_rst(path: &Path, rst: &Rst) -> Result<()> {
    let bytes = encode(rst)?;
    let write_err = |source| RstError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = temp_path(path);
    if let Err(e) = write_synced(&tmp, &bytes).and_then(|_| fs::rename(&tmp, path)) {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            debug!("failed to remove {}: {}", tmp.display(), cleanup);
        }
        return Err(write_err(e));
    }

    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub fn read_rst(path: &Path) -> Result<Rst> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RstError::NotFound(path.display().to_string()),
        _ => RstError::input(path, e),
    })?;
    decode(&bytes, path)
}

/// One persisted partition in the index directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionEntry {
    /// Sanitized repository id taken from the file name.
    pub repository: String,
    pub language: String,
    pub path: PathBuf,
}

/// The index directory holding every persisted partition.
#[derive(Debug, Clone)]
pub struct IndexStore {
    root: PathBuf,
}

impl IndexStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, repository: &str, language: &str) -> PathBuf {
        self.root.join(partition_file_name(repository, language))
    }

    /// Writes the partition named by the table's metadata and returns its path.
    pub fn write(&self, rst: &Rst) -> Result<PathBuf> {
        let path = self.path_for(&rst.metadata.repository, &rst.metadata.language);
        write_rst(&path, rst)?;
        info!(
            repository = %rst.metadata.repository,
            language = %rst.metadata.language,
            "saved {}",
            path.display()
        );
        Ok(path)
    }

    /// Every partition file, sorted by repository then language.
    ///
    /// A missing index directory is treated as empty.
    pub fn partitions(&self) -> Result<Vec<PartitionEntry>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut partitions = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some((repository, language)) = parse_partition_file_name(name) {
                partitions.push(PartitionEntry {
                    repository: repository.to_string(),
                    language: language.to_string(),
                    path: entry.path(),
                });
            }
        }
        partitions.sort_by(|a, b| {
            a.repository
                .cmp(&b.repository)
                .then_with(|| a.language.cmp(&b.language))
        });
        Ok(partitions)
    }

    /// Distinct sanitized repository ids, sorted.
    pub fn repositories(&self) -> Result<Vec<String>> {
        let mut repositories: Vec<String> = self
            .partitions()?
            .into_iter()
            .map(|p| p.repository)
            .collect();
        repositories.dedup();
        Ok(repositories)
    }

    /// Partitions of one repository, given either its raw or sanitized id.
    pub fn partitions_of(&self, repository: &str) -> Result<Vec<PartitionEntry>> {
        let key = sanitize_repo_id(repository);
        Ok(self
            .partitions()?
            .into_iter()
            .filter(|p| p.repository == key)
            .collect())
    }

    pub fn load(&self, repository: &str, language: &str) -> Result<Rst> {
        read_rst(&self.path_for(repository, language))
    }

    /// Loads every language partition of a repository.
    pub fn load_repository(&self, repository: &str) -> Result<Vec<Rst>> {
        let partitions = self.partitions_of(repository)?;
        if partitions.is_empty() {
            return Err(RstError::NotFound(format!("repository '{}'", repository)));
        }
        partitions.iter().map(|p| read_rst(&p.path)).collect()
    }

    /// Removes the files of one repository, or of every repository when `None`.
    ///
    /// Returns the number of partition files removed.
    pub fn remove(&self, repository: Option<&str>) -> Result<usize> {
        let targets = match repository {
            Some(repo) => self.partitions_of(repo)?,
            None => self.partitions()?,
        };
        for partition in &targets {
            fs::remove_file(&partition.path)?;
            let tmp = temp_path(&partition.path);
            if tmp.exists() {
                if let Err(e) = fs::remove_file(&tmp) {
                    warn!("failed to remove stale {}: {}", tmp.display(), e);
                }
            }
        }
        Ok(targets.len())
    }
}

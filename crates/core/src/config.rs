//! Runtime configuration shared by the CLI commands.

use std::path::PathBuf;

/// Environment variable overriding the default index directory.
pub const INDEX_DIR_ENV: &str = "RSTNAV_INDEX_DIR";

/// Index directory used when neither a flag nor the environment names one.
pub const DEFAULT_INDEX_DIR: &str = "~/.rsts";

pub const LOG_DIR_ENV: &str = "RSTNAV_LOG_DIR";
pub const DEFAULT_LOG_DIR: &str = "~/.rstnav/logs";

#[derive(Debug, Clone)]
pub struct Config {
    pub index_dir: PathBuf,
    /// Where the daily log files go.
    pub log_dir: PathBuf,
    pub verbose: bool,
}

impl Config {
    /// Resolves the index directory: explicit flag, then `RSTNAV_INDEX_DIR`, then `~/.rsts`.
    /// The log directory comes from `RSTNAV_LOG_DIR`, else `~/.rstnav/logs`.
    pub fn resolve(index_dir: Option<&str>, verbose: bool) -> Self {
        let raw = match index_dir {
            Some(dir) => dir.to_string(),
            None => env_or(INDEX_DIR_ENV, DEFAULT_INDEX_DIR),
        };
        Self {
            verbose,
            ..Self::with_index_dir(expand_home(&raw))
        }
    }

    pub fn with_index_dir(index_dir: impl Into<PathBuf>) -> Self {
        Self {
            index_dir: index_dir.into(),
            log_dir: expand_home(&env_or(LOG_DIR_ENV, DEFAULT_LOG_DIR)),
            verbose: false,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            let rest = rest.trim_start_matches(['/', '\\']);
            return if rest.is_empty() {
                home
            } else {
                home.join(rest)
            };
        }
    }
    PathBuf::from(path)
}

/// Strips `file://` style URL prefixes from a project root.
pub fn strip_file_prefix(url: &str) -> &str {
    if let Some(rest) = url.strip_prefix("file://localhost/") {
        // keep the leading slash of the absolute path
        return &url[url.len() - rest.len() - 1..];
    }
    if url.starts_with("file:///") {
        return &url[7..];
    }
    if let Some(rest) = url.strip_prefix("file://") {
        return rest;
    }
    if let Some(rest) = url.strip_prefix("file:/") {
        return &url[url.len() - rest.len() - 1..];
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~/.rsts"), home.join(".rsts"));
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("/var/rsts"), PathBuf::from("/var/rsts"));
    }

    #[test]
    fn test_strip_file_prefix() {
        assert_eq!(strip_file_prefix("file:///Users/me/repo"), "/Users/me/repo");
        assert_eq!(strip_file_prefix("file://localhost/Users/me"), "/Users/me");
        assert_eq!(strip_file_prefix("file:/tmp/repo"), "/tmp/repo");
        assert_eq!(strip_file_prefix("/already/plain"), "/already/plain");
    }

    #[test]
    fn test_explicit_dir_wins() {
        let config = Config::resolve(Some("/tmp/idx"), true);
        assert_eq!(config.index_dir, PathBuf::from("/tmp/idx"));
        assert!(config.verbose);
    }

    #[test]
    fn test_log_dir_defaults_under_home() {
        if std::env::var_os(LOG_DIR_ENV).is_some() {
            return;
        }
        let config = Config::with_index_dir("/tmp/idx");
        assert_eq!(config.log_dir, dirs::home_dir().unwrap().join(".rstnav/logs"));
        assert!(!config.verbose);
    }
}

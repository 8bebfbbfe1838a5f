//! # Configuration
//!
//! Settings are loaded with [`confique`], layered in priority order:
//! 1. **Environment variables**: `SMARTSEARCH_DATA_DIR`, `SMARTSEARCH_LOG`,
//!    `SMARTSEARCH_PRETTY_JSON`.
//! 2. **Config file**: a `smartsearch.toml` (the CLI looks in the OS config
//!    directory unless `--config-file` names another file). A missing file is skipped.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Root for stored target specifications |
//! | `log_level` | `warn` | Default log filter when `RUST_LOG` is unset |
//! | `pretty_json` | `true` | Indent stored and printed specifications |

use crate::error::{Result, SmartSearchError};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SmartSearchConfig {
    /// Root directory for stored target specifications.
    #[config(env = "SMARTSEARCH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter directive, e.g. "warn" or "smartsearch=debug".
    #[config(default = "warn", env = "SMARTSEARCH_LOG")]
    pub log_level: String,

    /// Write indented JSON.
    #[config(default = true, env = "SMARTSEARCH_PRETTY_JSON")]
    pub pretty_json: bool,
}

impl Default for SmartSearchConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "warn".to_string(),
            pretty_json: true,
        }
    }
}

impl SmartSearchConfig {
    /// Loads from the environment, then `file` if given, then defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::layered(file, true)
    }

    fn layered(file: Option<&Path>, with_env: bool) -> Result<Self> {
        let mut builder = Self::builder();
        if with_env {
            builder = builder.env();
        }
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| SmartSearchError::Config(e.to_string()))
    }

    /// The configured data directory, or `fallback` when unset.
    pub fn data_dir_or(&self, fallback: impl Into<PathBuf>) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| fallback.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SmartSearchConfig::default();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.log_level, "warn");
        assert!(config.pretty_json);
    }

    #[test]
    fn test_data_dir_fallback() {
        let config = SmartSearchConfig::default();
        assert_eq!(config.data_dir_or("/tmp/ss"), PathBuf::from("/tmp/ss"));

        let config = SmartSearchConfig {
            data_dir: Some(PathBuf::from("/srv/targets")),
            ..Default::default()
        };
        assert_eq!(config.data_dir_or("/tmp/ss"), PathBuf::from("/srv/targets"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartsearch.toml");
        std::fs::write(&path, "log_level = \"debug\"\npretty_json = false\n").unwrap();

        let config = SmartSearchConfig::layered(Some(&path), false).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(!config.pretty_json);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            SmartSearchConfig::layered(Some(&dir.path().join("absent.toml")), false).unwrap();
        assert_eq!(config, SmartSearchConfig::default());
    }
}

// CLI configuration loaded from an optional YAML file

use crate::filter::SortCriterion;
use crate::snapshot::DEFAULT_FILE_NAME;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for the `todolist` binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Snapshot file read before and written after each command
    #[serde(default = "default_file")]
    pub file: PathBuf,

    /// Criterion used by `sort` when none is given
    #[serde(default)]
    pub sort: SortCriterion,
}

fn default_file() -> PathBuf {
    PathBuf::from(DEFAULT_FILE_NAME)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: default_file(),
            sort: SortCriterion::default(),
        }
    }
}

impl Config {
    /// Default config location: `<config_dir>/todolist/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("todolist").join("config.yaml"))
    }

    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and a missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) => match Self::from_file(&path) {
                    Err(e) if is_not_found(&e) => {
                        debug!(file = ?path, "No config file, using defaults");
                        Ok(Self::default())
                    }
                    other => other,
                },
                None => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content).wrap_err_with(|| format!("Invalid config file {}", path.display()))?;
        debug!(file = ?path, ?config, "Loaded config");
        Ok(config)
    }

    /// Parse YAML config text; an empty document yields defaults
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse config YAML")
    }
}

fn is_not_found(err: &eyre::Report) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io| io.kind() == ErrorKind::NotFound)
}

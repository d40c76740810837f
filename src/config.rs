//! Configuration loading for duewatch.
//!
//! A plain struct with explicit defaults; user-supplied fields in a TOML
//! file override exactly the fields they name. A missing config file is
//! not an error - everything has a working default.

use crate::error::{DuewatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the scanner, reconciler, and scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuewatchConfig {
    /// Directories searched recursively for documents.
    #[serde(default = "default_watch_dirs")]
    pub watch_dirs: Vec<PathBuf>,

    /// File extensions eligible for due checking and discovery.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Window ahead of now in which a task counts as due soon.
    #[serde(default = "default_threshold_hours")]
    pub threshold_hours: u64,

    /// Seconds between periodic due checks in watch mode.
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,

    /// Delay after a save event before the deferred due check runs.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Send a "nothing urgent" notification when a check finds no
    /// due or overdue tasks.
    #[serde(default)]
    pub notify_when_idle: bool,

    /// TaskWarrior executable.
    #[serde(default = "default_task_bin")]
    pub task_bin: String,

    /// TaskWarrior project assigned to created tasks.
    #[serde(default = "default_task_project")]
    pub task_project: String,
}

fn default_watch_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

fn default_threshold_hours() -> u64 {
    24
}

fn default_check_interval_secs() -> u64 {
    3600
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_task_bin() -> String {
    "task".to_string()
}

fn default_task_project() -> String {
    "TODO".to_string()
}

impl Default for DuewatchConfig {
    fn default() -> Self {
        Self {
            watch_dirs: default_watch_dirs(),
            extensions: default_extensions(),
            threshold_hours: default_threshold_hours(),
            check_interval_secs: default_check_interval_secs(),
            debounce_ms: default_debounce_ms(),
            notify_when_idle: false,
            task_bin: default_task_bin(),
            task_project: default_task_project(),
        }
    }
}

impl DuewatchConfig {
    /// Load configuration from the given path, falling back to defaults
    /// when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: DuewatchConfig = toml::from_str(&content).map_err(|e| {
                DuewatchError::config_with_path(e.to_string(), path.to_path_buf())
            })?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Default config file location: `<config_dir>/duewatch/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("duewatch")
            .join("config.toml")
    }

    /// Validate field values
    pub fn validate(&self) -> Result<()> {
        if self.watch_dirs.is_empty() {
            return Err(DuewatchError::InvalidConfig {
                field: "watch_dirs".to_string(),
                reason: "at least one directory is required".to_string(),
            });
        }
        if self.extensions.is_empty() {
            return Err(DuewatchError::InvalidConfig {
                field: "extensions".to_string(),
                reason: "at least one extension is required".to_string(),
            });
        }
        if self.check_interval_secs == 0 {
            return Err(DuewatchError::InvalidConfig {
                field: "check_interval_secs".to_string(),
                reason: "interval must be positive".to_string(),
            });
        }
        if self.task_bin.is_empty() {
            return Err(DuewatchError::InvalidConfig {
                field: "task_bin".to_string(),
                reason: "executable name must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Due-soon threshold as a chrono duration
    pub fn threshold(&self) -> chrono::Duration {
        chrono::Duration::hours(self.threshold_hours as i64)
    }
}

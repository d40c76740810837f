//! Task backend abstraction.
//!
//! The external tracker is driven as a blocking subprocess, one call at a
//! time. Arguments are always passed as argv elements - task text never
//! travels through a shell, so metacharacters in a marker cannot become
//! commands.

use crate::error::{DuewatchError, Result};
use crate::tracker;
use regex::Regex;
use std::process::Command;
use std::sync::LazyLock;
use tracing::debug;

static CREATED_UUID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})").unwrap());

/// External task tracker consumed by the reconciliation engine.
///
/// Identifiers are opaque strings of at least 32 characters drawn from
/// lowercase hex digits and hyphens. Existence is the only fact the
/// engine ever asks about an existing record.
pub trait TaskBackend {
    /// Create a record for a task and return its identifier.
    fn create(&self, text: &str, due_date: &str) -> Result<String>;

    /// Whether a record with this identifier still exists.
    fn exists(&self, identifier: &str) -> Result<bool>;
}

/// TaskWarrior driven through its command-line interface.
#[derive(Debug, Clone)]
pub struct TaskWarriorBackend {
    bin: String,
    project: String,
}

impl TaskWarriorBackend {
    /// Create a backend using the given executable and project attribute.
    pub fn new(bin: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            project: project.into(),
        }
    }

    /// Probe whether the TaskWarrior binary responds at all.
    pub fn available(&self) -> bool {
        Command::new(&self.bin)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn run(&self, args: &[&str]) -> Result<std::process::Output> {
        debug!(bin = %self.bin, ?args, "invoking task backend");
        Command::new(&self.bin)
            .args(args)
            .output()
            .map_err(|e| DuewatchError::backend_unavailable(format!("{}: {e}", self.bin)))
    }
}

/// Pull the new record's identifier out of `task add` output.
///
/// With `rc.verbose=new-uuid` TaskWarrior reports
/// `Created task <uuid>.`; the capture is validated against the
/// identifier format before being accepted.
fn parse_created_identifier(stdout: &str) -> Option<String> {
    let id = CREATED_UUID.captures(stdout)?[1].to_string();
    tracker::is_valid_identifier(&id).then_some(id)
}

impl TaskBackend for TaskWarriorBackend {
    fn create(&self, text: &str, due_date: &str) -> Result<String> {
        let due_attr = format!("due:{due_date}");
        let project_attr = format!("project:{}", self.project);
        let output = self.run(&[
            "rc.confirmation=off",
            "rc.verbose=new-uuid",
            "add",
            text,
            &due_attr,
            &project_attr,
        ])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DuewatchError::backend_call(format!(
                "task add exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Err(DuewatchError::backend_call("task add produced no output"));
        }

        parse_created_identifier(&stdout).ok_or_else(|| {
            DuewatchError::backend_call(format!(
                "no identifier in task add output: {}",
                stdout.trim()
            ))
        })
    }

    fn exists(&self, identifier: &str) -> Result<bool> {
        let dom = format!("{identifier}.status");
        let output = self.run(&["_get", &dom])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DuewatchError::backend_call(format!(
                "task _get exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // _get prints the attribute value, or nothing for unknown records.
        Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
    }
}

//! Periodic due checking.
//!
//! Walks every eligible document, classifies its markers against the
//! current instant, and fans urgent findings out to the notifier. Due
//! checking never resolves identifiers - reminders fire whether or not a
//! task has been synced.

use crate::config::DuewatchConfig;
use crate::due::{self, DueStatus};
use crate::error::Result;
use crate::marker;
use crate::notify::{Notifier, Urgency};
use crate::store::DocumentStore;
use chrono::{DateTime, Duration, Local};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Counts from one due-check pass over all documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DueCheckSummary {
    /// Documents that passed the extension allowlist.
    pub documents: usize,
    /// Markers parsed across those documents.
    pub candidates: usize,
    /// Markers past their due date.
    pub overdue: usize,
    /// Markers inside the due-soon window.
    pub due_soon: usize,
}

impl DueCheckSummary {
    /// Total findings that produced a notification.
    pub fn urgent(&self) -> usize {
        self.overdue + self.due_soon
    }
}

/// Scans documents and emits reminders for due and overdue tasks.
pub struct DueChecker<'a, S: DocumentStore, N: Notifier> {
    store: &'a S,
    notifier: &'a N,
    threshold: Duration,
    extensions: Vec<String>,
    notify_when_idle: bool,
}

impl<'a, S: DocumentStore, N: Notifier> DueChecker<'a, S, N> {
    pub fn new(store: &'a S, notifier: &'a N, config: &DuewatchConfig) -> Self {
        Self {
            store,
            notifier,
            threshold: config.threshold(),
            extensions: config.extensions.clone(),
            notify_when_idle: config.notify_when_idle,
        }
    }

    fn name_is_eligible(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|allowed| allowed == e))
            .unwrap_or(false)
    }

    /// Run one due check over every eligible document.
    ///
    /// Markers with unparsable date tokens are skipped silently; they
    /// are a sync concern, not a reminder concern.
    pub fn run(&self, now: DateTime<Local>) -> Result<DueCheckSummary> {
        let mut summary = DueCheckSummary::default();

        for handle in self.store.list_documents()? {
            let name = self.store.name(handle)?;
            if !self.name_is_eligible(&name) {
                continue;
            }
            summary.documents += 1;

            let lines = self.store.lines(handle)?;
            for candidate in marker::parse_document(&lines, handle) {
                summary.candidates += 1;
                match due::evaluate(&candidate.due_date, now, self.threshold) {
                    Ok(DueStatus::Overdue) => {
                        summary.overdue += 1;
                        self.notifier.notify(
                            "TODO Overdue!",
                            &format!(
                                "{}\nwas due {}\nin {}",
                                candidate.text, candidate.due_date, name
                            ),
                            Urgency::Critical,
                        );
                    }
                    Ok(DueStatus::DueSoon { hours_left }) => {
                        summary.due_soon += 1;
                        self.notifier.notify(
                            "TODO Due Soon",
                            &format!(
                                "{}\ndue {}, {}h left\nin {}",
                                candidate.text, candidate.due_date, hours_left, name
                            ),
                            Urgency::Normal,
                        );
                    }
                    Ok(DueStatus::NotYetDue) => {}
                    Err(e) => {
                        debug!(token = %candidate.due_date, error = %e, "skipping unparsable due date");
                    }
                }
            }
        }

        info!(
            "checked {} TODOs across {} documents - {} overdue, {} due soon",
            summary.candidates, summary.documents, summary.overdue, summary.due_soon
        );

        if summary.urgent() == 0 && self.notify_when_idle {
            self.notifier
                .notify("duewatch", "Nothing urgent.", Urgency::Normal);
        }

        Ok(summary)
    }
}

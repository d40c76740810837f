//! Reconciliation between documents and the task backend.
//!
//! `sync` pushes untracked markers into the backend and writes the
//! returned identifiers back into the document; `reap_orphans` removes
//! identifier-comments whose backend records have vanished. Both
//! aggregate per-item failures into a summary instead of aborting the
//! batch.

use crate::backend::TaskBackend;
use crate::error::Result;
use crate::marker;
use crate::store::{DocumentHandle, DocumentStore};
use crate::tracker;
use serde::Serialize;
use tracing::{debug, warn};

/// Counts from one sync pass over a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Candidates newly created in the backend.
    pub synced: usize,
    /// Candidates that already carried an identifier-comment.
    pub skipped: usize,
    /// Candidates whose backend call failed.
    pub failed: usize,
}

/// Result of syncing one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncOutcome {
    /// The document contains no candidates at all; the backend was never
    /// consulted.
    NothingToSync,
    /// The document was processed candidate by candidate.
    Completed(SyncSummary),
}

/// Counts from one orphan-reaping pass over a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReapSummary {
    /// Identifier-comments inspected.
    pub scanned: usize,
    /// Comments removed because their record no longer exists.
    pub removed: usize,
    /// Identifiers whose existence check failed; their comments stay.
    pub failed: usize,
}

impl ReapSummary {
    /// Zero removals is a distinct, reportable outcome.
    pub fn is_clean(&self) -> bool {
        self.removed == 0
    }
}

/// Orchestrates parsing, identifier tracking, and backend calls for one
/// document store / backend pair.
pub struct SyncEngine<'a, S: DocumentStore, B: TaskBackend> {
    store: &'a mut S,
    backend: &'a B,
}

impl<'a, S: DocumentStore, B: TaskBackend> SyncEngine<'a, S, B> {
    pub fn new(store: &'a mut S, backend: &'a B) -> Self {
        Self { store, backend }
    }

    /// Synchronize every untracked marker in a document into the backend.
    ///
    /// Candidates are processed in document order. Each insertion shifts
    /// the remainder of the document down one line, so a cumulative
    /// offset keeps later adjacency checks and insert positions honest
    /// within the same pass. The already-synced check is deliberately
    /// lenient: any line starting with the comment prefix counts, even
    /// one the strict reader would reject.
    pub fn sync(&mut self, document: DocumentHandle) -> Result<SyncOutcome> {
        let mut lines = self.store.lines(document)?;
        let candidates = marker::parse_document(&lines, document);
        if candidates.is_empty() {
            debug!("document has no candidates, nothing to sync");
            return Ok(SyncOutcome::NothingToSync);
        }

        let mut summary = SyncSummary::default();
        let mut offset = 0usize;

        for candidate in candidates {
            let marker_idx = candidate.line_number - 1 + offset;
            let already_synced = lines
                .get(marker_idx + 1)
                .map(|l| tracker::is_identifier_comment(l))
                .unwrap_or(false);
            if already_synced {
                summary.skipped += 1;
                continue;
            }

            match self.backend.create(&candidate.text, &candidate.due_date) {
                Ok(identifier) => {
                    let comment = tracker::comment_for(&identifier);
                    self.store.set_lines(
                        document,
                        marker_idx + 1,
                        marker_idx + 1,
                        vec![comment.clone()],
                    )?;
                    // Mirror the insertion so later candidates in this
                    // pass see the shifted document.
                    lines.insert(marker_idx + 1, comment);
                    offset += 1;
                    summary.synced += 1;
                    debug!(text = %candidate.text, %identifier, "synced marker");
                }
                Err(e) if e.is_backend() => {
                    warn!(text = %candidate.text, error = %e, "backend call failed, skipping candidate");
                    summary.failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(SyncOutcome::Completed(summary))
    }

    /// Remove identifier-comments whose backend records have vanished.
    ///
    /// The whole document is scanned before anything is touched;
    /// deletions are then applied in descending line order so earlier
    /// deletions never invalidate later indices. An existence check that
    /// errors keeps its comment - deleting on an unreachable backend
    /// would orphan live records.
    pub fn reap_orphans(&mut self, document: DocumentHandle) -> Result<ReapSummary> {
        let lines = self.store.lines(document)?;
        let tracked = tracker::scan(&lines);

        let mut summary = ReapSummary {
            scanned: tracked.len(),
            ..Default::default()
        };
        let mut doomed: Vec<usize> = Vec::new();

        for entry in &tracked {
            match self.backend.exists(&entry.identifier) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(identifier = %entry.identifier, line = entry.line_number, "record vanished");
                    doomed.push(entry.line_number);
                }
                Err(e) if e.is_backend() => {
                    warn!(identifier = %entry.identifier, error = %e, "existence check failed, keeping comment");
                    summary.failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        for line_number in doomed.iter().rev() {
            let idx = line_number - 1;
            self.store.set_lines(document, idx, idx + 1, Vec::new())?;
            summary.removed += 1;
        }

        Ok(summary)
    }
}

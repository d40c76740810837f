//! Duewatch - due-task reconciliation for markdown TODOs.
//!
//! Scans documents for `TODO: ... @due(YYYY-MM-DD)` markers, reconciles
//! them into an external task tracker, records the resulting identifiers
//! as `<!-- TW-UUID: ... -->` comments next to the markers, and issues
//! desktop reminders for due and overdue tasks.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`marker`] - Marker parsing into ephemeral task candidates
//! - [`due`] - Due-date parsing and overdue / due-soon classification
//! - [`tracker`] - Identifier-comment reading, scanning, and rendering
//! - [`sync`] - Reconciliation engine (sync and orphan reaping)
//! - [`check`] - Due-check driver feeding the notifier
//! - [`store`] - Document store trait and filesystem implementation
//! - [`backend`] - Task backend trait and TaskWarrior implementation
//! - [`notify`] - Notifier trait and desktop implementation
//! - [`scheduler`] - Owned periodic tick source with save debouncing
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Custom error types and handling
//! - [`testing`] - Mocks for the collaborator traits
//!
//! # Example
//!
//! ```rust,ignore
//! use duewatch::config::DuewatchConfig;
//! use duewatch::store::{DocumentStore, FsDocumentStore};
//! use duewatch::backend::TaskWarriorBackend;
//! use duewatch::sync::SyncEngine;
//!
//! let config = DuewatchConfig::default();
//! let mut store = FsDocumentStore::discover(&config.watch_dirs, &config.extensions);
//! let backend = TaskWarriorBackend::new(&config.task_bin, &config.task_project);
//!
//! let documents = store.list_documents()?;
//! let mut engine = SyncEngine::new(&mut store, &backend);
//! for doc in documents {
//!     engine.sync(doc)?;
//! }
//! ```

pub mod backend;
pub mod check;
pub mod config;
pub mod due;
pub mod error;
pub mod marker;
pub mod notify;
pub mod scheduler;
pub mod store;
pub mod sync;
pub mod testing;
pub mod tracker;

// Re-export commonly used types
pub use error::{DuewatchError, Result};

pub use backend::{TaskBackend, TaskWarriorBackend};
pub use check::{DueCheckSummary, DueChecker};
pub use config::DuewatchConfig;
pub use due::DueStatus;
pub use marker::TaskCandidate;
pub use notify::{DesktopNotifier, Notifier, Urgency};
pub use scheduler::{Scheduler, Tick};
pub use store::{DocumentHandle, DocumentStore, FsDocumentStore};
pub use sync::{ReapSummary, SyncEngine, SyncOutcome, SyncSummary};
pub use tracker::TrackedIdentifier;

// Re-export mocks for downstream test code
pub use testing::{MockDocumentStore, MockNotifier, MockTaskBackend};

//! Testing infrastructure for duewatch.
//!
//! Mock implementations of the three collaborator traits - document
//! store, task backend, and notifier - so engine logic can be exercised
//! without touching the filesystem, TaskWarrior, or a desktop session.
//!
//! # Example
//!
//! ```rust,ignore
//! use duewatch::testing::{MockDocumentStore, MockTaskBackend, MockNotifier};
//!
//! let mut store = MockDocumentStore::new()
//!     .with_document("tasks.md", "TODO: water plants @due(2025-06-01)\n");
//! let backend = MockTaskBackend::new();
//! ```

pub mod mocks;

// Re-export commonly used types
pub use mocks::*;

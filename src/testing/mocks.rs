//! Mock implementations of the collaborator traits.
//!
//! Controllable test doubles for the document store, task backend, and
//! notifier, enabling deterministic unit tests without files, TaskWarrior,
//! or a desktop session.

use crate::backend::TaskBackend;
use crate::error::{DuewatchError, Result};
use crate::notify::{Notifier, Urgency};
use crate::store::{DocumentHandle, DocumentStore};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// In-memory document store.
///
/// # Example
///
/// ```rust,ignore
/// let store = MockDocumentStore::new()
///     .with_document("tasks.md", "TODO: x @due(2025-01-01)\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockDocumentStore {
    documents: Vec<MockDocument>,
}

#[derive(Debug, Clone)]
struct MockDocument {
    name: String,
    lines: Vec<String>,
}

impl MockDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document; its content is split into lines.
    #[must_use]
    pub fn with_document(mut self, name: &str, content: &str) -> Self {
        self.documents.push(MockDocument {
            name: name.to_string(),
            lines: content.lines().map(str::to_string).collect(),
        });
        self
    }

    fn get(&self, handle: DocumentHandle) -> Result<&MockDocument> {
        self.documents
            .get(handle.0)
            .ok_or_else(|| DuewatchError::document(format!("unknown document handle {}", handle.0)))
    }
}

impl DocumentStore for MockDocumentStore {
    fn list_documents(&self) -> Result<Vec<DocumentHandle>> {
        Ok((0..self.documents.len()).map(DocumentHandle).collect())
    }

    fn name(&self, handle: DocumentHandle) -> Result<String> {
        Ok(self.get(handle)?.name.clone())
    }

    fn lines(&self, handle: DocumentHandle) -> Result<Vec<String>> {
        Ok(self.get(handle)?.lines.clone())
    }

    fn set_lines(
        &mut self,
        handle: DocumentHandle,
        start: usize,
        end: usize,
        new_lines: Vec<String>,
    ) -> Result<()> {
        let doc = self
            .documents
            .get_mut(handle.0)
            .ok_or_else(|| DuewatchError::document(format!("unknown document handle {}", handle.0)))?;
        if start > end || end > doc.lines.len() {
            return Err(DuewatchError::RangeOutOfBounds {
                start,
                end,
                len: doc.lines.len(),
            });
        }
        doc.lines.splice(start..end, new_lines);
        Ok(())
    }
}

/// Scriptable task backend with call recording.
///
/// Created identifiers come from the scripted queue, falling back to
/// fresh v4 UUIDs; the first `with_failures(n)` create calls fail.
///
/// # Example
///
/// ```rust,ignore
/// let backend = MockTaskBackend::new()
///     .with_identifiers(vec!["aaaaaaaa-1111-2222-3333-444444444444".into()])
///     .with_existing(vec!["bbbbbbbb-1111-2222-3333-444444444444".into()]);
/// ```
#[derive(Debug, Default)]
pub struct MockTaskBackend {
    identifiers: Mutex<VecDeque<String>>,
    failures_remaining: Mutex<usize>,
    existing: HashSet<String>,
    exists_error: bool,
    create_calls: Mutex<Vec<(String, String)>>,
    exists_calls: Mutex<Vec<String>>,
}

impl MockTaskBackend {
    /// Create a mock where every create succeeds and no record exists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the identifiers returned by successive creates.
    #[must_use]
    pub fn with_identifiers(self, identifiers: Vec<String>) -> Self {
        *self.identifiers.lock().unwrap() = identifiers.into();
        self
    }

    /// Fail the first `count` create calls.
    #[must_use]
    pub fn with_failures(self, count: usize) -> Self {
        *self.failures_remaining.lock().unwrap() = count;
        self
    }

    /// Set the identifiers that exist in the backend.
    #[must_use]
    pub fn with_existing(mut self, identifiers: Vec<String>) -> Self {
        self.existing = identifiers.into_iter().collect();
        self
    }

    /// Make every existence check fail.
    #[must_use]
    pub fn with_exists_error(mut self) -> Self {
        self.exists_error = true;
        self
    }

    /// The `(text, due_date)` pairs passed to create, in call order.
    pub fn create_calls(&self) -> Vec<(String, String)> {
        self.create_calls.lock().unwrap().clone()
    }

    /// The identifiers passed to exists, in call order.
    pub fn exists_calls(&self) -> Vec<String> {
        self.exists_calls.lock().unwrap().clone()
    }
}

impl TaskBackend for MockTaskBackend {
    fn create(&self, text: &str, due_date: &str) -> Result<String> {
        self.create_calls
            .lock()
            .unwrap()
            .push((text.to_string(), due_date.to_string()));

        let mut failures = self.failures_remaining.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(DuewatchError::backend_call("scripted create failure"));
        }

        Ok(self
            .identifiers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()))
    }

    fn exists(&self, identifier: &str) -> Result<bool> {
        self.exists_calls
            .lock()
            .unwrap()
            .push(identifier.to_string());

        if self.exists_error {
            return Err(DuewatchError::backend_unavailable("scripted exists failure"));
        }
        Ok(self.existing.contains(identifier))
    }
}

/// A notification captured by [`MockNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub title: String,
    pub message: String,
    pub urgency: Urgency,
}

/// Notifier that records everything it is asked to deliver.
#[derive(Debug, Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<SentNotification>>,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far, in order.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, title: &str, message: &str, urgency: Urgency) {
        self.sent.lock().unwrap().push(SentNotification {
            title: title.to_string(),
            message: message.to_string(),
            urgency,
        });
    }
}

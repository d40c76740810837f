//! Document storage abstraction.
//!
//! The engines never touch the filesystem directly; they speak to a
//! [`DocumentStore`], which hands out opaque handles and a range-replace
//! mutation primitive. The real implementation scans configured
//! directories for markdown files. Tests use the in-memory mock from
//! [`crate::testing`].

use crate::error::{DuewatchError, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Opaque handle identifying a document within its store.
///
/// Handles are only meaningful to the store that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHandle(pub(crate) usize);

impl DocumentHandle {
    /// Build a handle from a raw index. Exposed for mock stores.
    pub fn from_raw(index: usize) -> Self {
        Self(index)
    }
}

/// Source of document text and the range-replace mutation primitive.
///
/// `set_lines` replaces the 0-based half-open range `start..end`:
/// insertion when `start == end`, deletion when `new_lines` is empty.
pub trait DocumentStore {
    /// Handles for every document currently known to the store.
    fn list_documents(&self) -> Result<Vec<DocumentHandle>>;

    /// Display name of a document (file name for filesystem stores).
    fn name(&self, handle: DocumentHandle) -> Result<String>;

    /// Full line content of a document.
    fn lines(&self, handle: DocumentHandle) -> Result<Vec<String>>;

    /// Replace the line range `start..end` with `new_lines`.
    fn set_lines(
        &mut self,
        handle: DocumentHandle,
        start: usize,
        end: usize,
        new_lines: Vec<String>,
    ) -> Result<()>;
}

/// Filesystem-backed document store.
///
/// Recursively discovers files with the configured extensions under the
/// watch directories at construction time. Mutations are written back to
/// disk immediately.
#[derive(Debug)]
pub struct FsDocumentStore {
    files: Vec<PathBuf>,
}

impl FsDocumentStore {
    /// Discover documents under `roots` whose extension is in `extensions`.
    ///
    /// Unreadable directories are skipped; a missing root is not an error
    /// (directories may come and go between scans).
    pub fn discover(roots: &[PathBuf], extensions: &[String]) -> Self {
        let mut files = Vec::new();
        for root in roots {
            if !root.exists() {
                tracing::warn!("watch directory does not exist: {}", root.display());
                continue;
            }
            for entry in WalkDir::new(root)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if Self::matches_extension(entry.path(), extensions) {
                    files.push(entry.path().to_path_buf());
                }
            }
        }
        files.sort();
        tracing::debug!("discovered {} documents", files.len());
        Self { files }
    }

    fn matches_extension(path: &Path, extensions: &[String]) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.iter().any(|allowed| allowed == e))
            .unwrap_or(false)
    }

    /// Path backing a handle.
    pub fn path(&self, handle: DocumentHandle) -> Option<&Path> {
        self.files.get(handle.0).map(PathBuf::as_path)
    }

    fn path_checked(&self, handle: DocumentHandle) -> Result<&Path> {
        self.files
            .get(handle.0)
            .map(PathBuf::as_path)
            .ok_or_else(|| DuewatchError::document(format!("unknown document handle {}", handle.0)))
    }
}

impl DocumentStore for FsDocumentStore {
    fn list_documents(&self) -> Result<Vec<DocumentHandle>> {
        Ok((0..self.files.len()).map(DocumentHandle).collect())
    }

    fn name(&self, handle: DocumentHandle) -> Result<String> {
        let path = self.path_checked(handle)?;
        Ok(path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()))
    }

    fn lines(&self, handle: DocumentHandle) -> Result<Vec<String>> {
        let path = self.path_checked(handle)?;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn set_lines(
        &mut self,
        handle: DocumentHandle,
        start: usize,
        end: usize,
        new_lines: Vec<String>,
    ) -> Result<()> {
        let mut lines = self.lines(handle)?;
        if start > end || end > lines.len() {
            return Err(DuewatchError::RangeOutOfBounds {
                start,
                end,
                len: lines.len(),
            });
        }
        lines.splice(start..end, new_lines);

        let path = self.path_checked(handle)?;
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write document: {}", path.display()))?;
        Ok(())
    }
}

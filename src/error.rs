//! Custom error types for duewatch.
//!
//! Per-candidate failures during a batch operation are aggregated into
//! summaries rather than propagated; the variants here cover everything
//! that can abort an operation outright, plus the backend failures that
//! the engines count and carry on from.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for duewatch operations
#[derive(Error, Debug)]
pub enum DuewatchError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig { field: String, reason: String },

    // =========================================================================
    // Date Errors
    // =========================================================================
    /// Date token does not have the YYYY-MM-DD shape or names no real date
    #[error("Invalid date format: {token}")]
    InvalidDateFormat { token: String },

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// Backend binary missing or the process could not be spawned
    #[error("Task backend unavailable: {detail}")]
    BackendUnavailable { detail: String },

    /// Backend ran but the call failed (non-zero exit, empty or
    /// unparsable output)
    #[error("Task backend call failed: {message}")]
    BackendCallFailed { message: String },

    // =========================================================================
    // Document Errors
    // =========================================================================
    /// Document could not be read or written
    #[error("Document error: {message}")]
    Document {
        message: String,
        path: Option<PathBuf>,
    },

    /// A line range did not fit the document it was applied to
    #[error("Line range {start}..{end} out of bounds for document of {len} lines")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DuewatchError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(token: impl Into<String>) -> Self {
        Self::InvalidDateFormat {
            token: token.into(),
        }
    }

    /// Create a backend-unavailable error
    pub fn backend_unavailable(detail: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            detail: detail.into(),
        }
    }

    /// Create a backend-call-failed error
    pub fn backend_call(message: impl Into<String>) -> Self {
        Self::BackendCallFailed {
            message: message.into(),
        }
    }

    /// Create a document error
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
            path: None,
        }
    }

    /// Create a document error with path
    pub fn document_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Document {
            message: message.into(),
            path: Some(path),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if this error is a backend failure.
    ///
    /// Backend failures are counted per candidate and never abort a batch.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Self::BackendUnavailable { .. } | Self::BackendCallFailed { .. }
        )
    }

    /// Check if this error is fatal for a batch operation
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::InvalidConfig { .. }
                | Self::Document { .. }
                | Self::RangeOutOfBounds { .. }
                | Self::Io(_)
        )
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::InvalidConfig { .. } => 7,
            Self::BackendUnavailable { .. } => 6,
            Self::Document { .. } | Self::RangeOutOfBounds { .. } => 3,
            Self::BackendCallFailed { .. } => 2,
            _ => 1,
        }
    }
}

/// Type alias for duewatch results
pub type Result<T> = std::result::Result<T, DuewatchError>;

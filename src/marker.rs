//! Marker parsing.
//!
//! A marker is a line encoding a task with a description and a due-date
//! token, in one of three accepted shapes:
//!
//! ```text
//! TODO:<text>@due(<token>)
//! - [ ] TODO:<text>@due(<token>)
//! * TODO:<text>@due(<token>)
//! ```
//!
//! Shapes are tried in that order per line; the first match wins, so a
//! line yields at most one candidate. `<token>` is any non-empty run of
//! digits and hyphens - whether it names a real `YYYY-MM-DD` date is the
//! date evaluator's concern, not the parser's.

use crate::store::DocumentHandle;
use regex::Regex;
use std::sync::LazyLock;

static BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*TODO:(.+?)@due\(([0-9-]+)\)").unwrap());

static CHECKBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-\s*\[\s*\]\s*TODO:(.+?)@due\(([0-9-]+)\)").unwrap());

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*\s*TODO:(.+?)@due\(([0-9-]+)\)").unwrap());

/// A task parsed out of a document line.
///
/// Candidates are ephemeral: they are recomputed on every scan and
/// `line_number` is only valid until the document is next mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCandidate {
    /// Trimmed task description.
    pub text: String,
    /// Raw due-date token, not yet validated as a date.
    pub due_date: String,
    /// 1-based position of the marker line at parse time.
    pub line_number: usize,
    /// Owning document.
    pub document: DocumentHandle,
    /// Identifier from the comment on the following line, if any.
    pub external_id: Option<String>,
}

impl TaskCandidate {
    /// Whether the candidate is already linked to an external record.
    pub fn is_tracked(&self) -> bool {
        self.external_id.is_some()
    }
}

/// Parse a single line into `(text, due_token)`.
///
/// Returns `None` when no shape matches or the description trims to
/// nothing.
pub fn parse_line(line: &str) -> Option<(String, String)> {
    for shape in [&*BARE, &*CHECKBOX, &*BULLET] {
        if let Some(caps) = shape.captures(line) {
            let text = caps[1].trim().to_string();
            if text.is_empty() {
                return None;
            }
            return Some((text, caps[2].to_string()));
        }
    }
    None
}

/// Parse every marker in a document, preserving document order.
///
/// Pure function over its input; identifier resolution is left to the
/// caller.
pub fn parse_document(lines: &[String], document: DocumentHandle) -> Vec<TaskCandidate> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            parse_line(line).map(|(text, due_date)| TaskCandidate {
                text,
                due_date,
                line_number: idx + 1,
                document,
                external_id: None,
            })
        })
        .collect()
}

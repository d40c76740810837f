//! Identifier tracking.
//!
//! The sync relationship between a marker and its external record is a
//! one-line comment immediately following the marker:
//!
//! ```text
//! <!-- TW-UUID: 8ad2e3db-914d-4832-b0e6-72fa04f6e331 -->
//! ```
//!
//! Resolution is adjacency-only: a blank line or any other annotation
//! between a marker and its comment makes the marker look unsynced on
//! every run, which can duplicate backend records. Known limitation;
//! callers must keep the comment on the very next line.

use regex::Regex;
use std::sync::LazyLock;

/// Minimum length of a valid identifier.
pub const MIN_IDENTIFIER_LEN: usize = 32;

/// Literal prefix used by the lenient write-path check.
const COMMENT_PREFIX: &str = "<!-- TW-UUID:";

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<!-- TW-UUID: ([0-9a-f-]+) -->\s*$").unwrap());

/// An identifier embedded in a document, with the line carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedIdentifier {
    /// 1-based line number of the comment line.
    pub line_number: usize,
    /// The embedded identifier.
    pub identifier: String,
}

/// Whether `id` has the accepted identifier format: at least 32
/// characters, lowercase hex digits and hyphens only.
pub fn is_valid_identifier(id: &str) -> bool {
    id.len() >= MIN_IDENTIFIER_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c) || c == '-')
}

/// Resolve the identifier for the marker on `line_number` (1-based).
///
/// Inspects exactly the line immediately following the marker; comments
/// anywhere else are ignored for this candidate.
pub fn resolve(lines: &[String], line_number: usize) -> Option<String> {
    let next = lines.get(line_number)?;
    let caps = COMMENT.captures(next)?;
    let id = caps[1].to_string();
    (id.len() >= MIN_IDENTIFIER_LEN).then_some(id)
}

/// Resolve identifiers for a batch of freshly parsed candidates.
///
/// Line numbers must come from the same `lines` snapshot; candidates are
/// recomputed after any mutation, never patched up.
pub fn attach(lines: &[String], candidates: &mut [crate::marker::TaskCandidate]) {
    for candidate in candidates.iter_mut() {
        candidate.external_id = resolve(lines, candidate.line_number);
    }
}

/// Scan a whole document for embedded identifiers, in document order.
///
/// Used for reconciliation bookkeeping, never for matching a specific
/// candidate.
pub fn scan(lines: &[String]) -> Vec<TrackedIdentifier> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let caps = COMMENT.captures(line)?;
            let identifier = caps[1].to_string();
            (identifier.len() >= MIN_IDENTIFIER_LEN).then_some(TrackedIdentifier {
                line_number: idx + 1,
                identifier,
            })
        })
        .collect()
}

/// Lenient check used on the write path: is this line an
/// identifier-comment at all, regardless of identifier validity?
pub fn is_identifier_comment(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT_PREFIX)
}

/// Render the bit-exact wire format for an identifier.
pub fn comment_for(identifier: &str) -> String {
    format!("<!-- TW-UUID: {identifier} -->")
}

//! Note body format for issues.
//!
//! ```text
//! author NAME <EMAIL> UNIX_SECONDS ±HHMM
//! status STATUS
//! [assignee NAME]*
//! [label NAME]*
//!
//! MESSAGE
//! ```
//!
//! Decoding is split in two steps: [`tokenize_headers`] turns the header
//! block into typed [`Header`]s and rejects any line it does not recognize,
//! then [`decode_issue`] assembles the record and enforces header counts.
//!
//! Duplicate `status` headers resolve to the last one seen. A second
//! `author` header is an error.

use crate::error::FormatError;
use crate::model::{Issue, Signature, Status};
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Separates the header block from the message.
pub const SEPARATOR: &str = "\n\n";

/// Recognized header keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKey {
    Author,
    Status,
    Assignee,
    Label,
}

impl HeaderKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Status => "status",
            Self::Assignee => "assignee",
            Self::Label => "label",
        }
    }

    /// Exact, case-sensitive key lookup.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "author" => Some(Self::Author),
            "status" => Some(Self::Status),
            "assignee" => Some(Self::Assignee),
            "label" => Some(Self::Label),
            _ => None,
        }
    }
}

/// One header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub key: HeaderKey,
    /// Remainder of the line after the key, trimmed.
    pub value: &'a str,
    /// 1-based line number within the note.
    pub line: usize,
}

/// Split a note body into its header block and message at the first
/// blank line.
///
/// # Errors
///
/// Returns [`FormatError::MissingSeparator`] if there is no blank line.
pub fn split_note(text: &str) -> Result<(&str, &str), FormatError> {
    text.split_once(SEPARATOR)
        .ok_or(FormatError::MissingSeparator)
}

/// Tokenize a header block.
///
/// Empty lines are skipped. Every other line must be a known key followed
/// by a single space and a non-empty value.
///
/// # Errors
///
/// Returns [`FormatError::UnknownHeader`] for an unrecognized key and
/// [`FormatError::EmptyHeaderValue`] for a key without a value.
pub fn tokenize_headers(block: &str) -> Result<Vec<Header<'_>>, FormatError> {
    let mut headers = Vec::new();

    for (idx, raw) in block.split('\n').enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let (key, value) = raw.split_once(' ').unwrap_or((raw, ""));
        let key = HeaderKey::parse(key).ok_or_else(|| FormatError::UnknownHeader {
            line,
            text: raw.to_string(),
        })?;

        let value = value.trim();
        if value.is_empty() {
            return Err(FormatError::EmptyHeaderValue {
                key: key.as_str(),
                line,
            });
        }

        headers.push(Header { key, value, line });
    }

    Ok(headers)
}

/// Decode a note body into an issue with an empty `hash`.
///
/// # Errors
///
/// Returns a [`FormatError`] if the separator is missing, a header line is
/// invalid, the author signature does not parse, `author` or `status` is
/// missing, or `author` appears twice.
pub fn decode_issue(text: &str) -> Result<Issue, FormatError> {
    let (block, message) = split_note(text)?;

    let mut author: Option<Signature> = None;
    let mut status: Option<Status> = None;
    let mut assignees = BTreeSet::new();
    let mut labels = BTreeSet::new();

    for header in tokenize_headers(block)? {
        match header.key {
            HeaderKey::Author => {
                if author.is_some() {
                    return Err(FormatError::DuplicateHeader {
                        key: HeaderKey::Author.as_str(),
                        line: header.line,
                    });
                }
                author = Some(Signature::decode(header.value)?);
            }
            HeaderKey::Status => status = Some(Status::from_header(header.value)),
            HeaderKey::Assignee => {
                assignees.insert(header.value.to_string());
            }
            HeaderKey::Label => {
                labels.insert(header.value.to_string());
            }
        }
    }

    let author = author.ok_or(FormatError::MissingHeader {
        key: HeaderKey::Author.as_str(),
    })?;
    let status = status.ok_or(FormatError::MissingHeader {
        key: HeaderKey::Status.as_str(),
    })?;

    Ok(Issue {
        hash: String::new(),
        author,
        status,
        assignees,
        labels,
        message: message.to_string(),
    })
}

/// Encode an issue as a note body.
///
/// Assignees and labels are emitted once each, in sorted order.
#[must_use]
pub fn encode_issue(issue: &Issue) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} {}", HeaderKey::Author.as_str(), issue.author.encode());
    let _ = writeln!(out, "{} {}", HeaderKey::Status.as_str(), issue.status);
    for assignee in &issue.assignees {
        let _ = writeln!(out, "{} {assignee}", HeaderKey::Assignee.as_str());
    }
    for label in &issue.labels {
        let _ = writeln!(out, "{} {label}", HeaderKey::Label.as_str());
    }

    out.push('\n');
    out.push_str(&issue.message);
    out
}

//! Core data types for `git_issue`.
//!
//! - `Issue` - a tracked work item stored as a git note
//! - `Status` - issue lifecycle state
//! - `Signature` / `Identity` - authorship

mod signature;

pub use signature::{Identity, Signature, format_timezone, parse_timezone};

use crate::codec;
use crate::error::{FormatError, IssueError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Layout used for the `Time:` line, e.g. `Tue Jun 25 11:39:19 2024`.
pub const TIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Issue status.
///
/// `open` and `closed` are the conventional values; anything else is
/// preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    Closed,
    #[serde(untagged)]
    Custom(String),
}

impl Status {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Custom(value) => value,
        }
    }

    /// Interpret a stored header value. Never fails; unknown values
    /// become [`Status::Custom`].
    #[must_use]
    pub fn from_header(value: &str) -> Self {
        match value {
            "open" => Self::Open,
            "closed" => Self::Closed,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = IssueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IssueError::validation("status", "cannot be empty"));
        }
        if s.contains(['\n', '\r']) {
            return Err(IssueError::validation("status", "cannot contain line breaks"));
        }
        Ok(Self::from_header(s))
    }
}

/// A tracked work item.
///
/// The note body carries everything except `hash`, which is the id of the
/// anchor object the note is attached to and is filled in on retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Hash of the object the issue note is anchored to.
    #[serde(default)]
    pub hash: String,
    /// Creator of the issue.
    pub author: Signature,
    pub status: Status,
    /// Assigned users.
    #[serde(default)]
    pub assignees: BTreeSet<String>,
    /// Labels used to filter issues.
    #[serde(default)]
    pub labels: BTreeSet<String>,
    /// Description; the first line is the summary.
    #[serde(default)]
    pub message: String,
}

impl Issue {
    /// New issue with no hash, assignees, labels, or message.
    #[must_use]
    pub fn new(author: Signature, status: Status) -> Self {
        Self {
            hash: String::new(),
            author,
            status,
            assignees: BTreeSet::new(),
            labels: BTreeSet::new(),
            message: String::new(),
        }
    }

    #[must_use]
    pub fn with_assignees<I, S>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees.extend(assignees.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// First line of the message.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Abbreviated anchor hash for compact output.
    #[must_use]
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(7)
            .map_or(self.hash.len(), |(idx, _)| idx);
        &self.hash[..end]
    }

    /// Decode a note body. The returned issue has an empty `hash`.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the body is not a well-formed issue.
    pub fn decode(text: &str) -> Result<Self, FormatError> {
        codec::decode_issue(text)
    }

    /// Encode as a note body.
    #[must_use]
    pub fn encode(&self) -> String {
        codec::encode_issue(self)
    }
}

/// Summary rendering: identifying hash, author, time, status, assignees,
/// and the indented first line of the message.
impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "issue {}", self.hash)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Time:   {}", self.author.when.format(TIME_FORMAT))?;
        writeln!(f, "Status: {}", self.status)?;
        for assignee in &self.assignees {
            writeln!(f, "Assignee: {assignee}")?;
        }
        writeln!(f)?;
        writeln!(f, "    {}", self.summary())
    }
}

//! Output formatting for `git-issue`.
//!
//! Human-readable text lives in [`text`]; `--json` output serializes
//! [`IssueJson`] records, one JSON document per command.

mod text;

pub use text::{
    TextFormatOptions, format_issue_detail, format_issue_oneline, format_issue_summary,
    format_status_label, terminal_width, truncate_title,
};

use crate::model::{Issue, Signature, Status};
use serde::Serialize;
use std::collections::BTreeSet;

/// JSON view of an issue.
#[derive(Debug, Clone, Serialize)]
pub struct IssueJson<'a> {
    pub hash: &'a str,
    pub short_hash: &'a str,
    pub author: &'a Signature,
    pub status: &'a Status,
    pub assignees: &'a BTreeSet<String>,
    pub labels: &'a BTreeSet<String>,
    pub summary: &'a str,
    pub message: &'a str,
}

impl<'a> From<&'a Issue> for IssueJson<'a> {
    fn from(issue: &'a Issue) -> Self {
        Self {
            hash: &issue.hash,
            short_hash: issue.short_hash(),
            author: &issue.author,
            status: &issue.status,
            assignees: &issue.assignees,
            labels: &issue.labels,
            summary: issue.summary(),
            message: &issue.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_json_shape() {
        let author = Signature::decode("Bob <bob@test.com> 1719340759 -0700").expect("author");
        let mut issue = Issue::new(author, Status::Closed)
            .with_labels(["bug"])
            .with_message("fix bug\n\ndetails");
        issue.hash = "0123456789abcdef".to_string();

        let value = serde_json::to_value(IssueJson::from(&issue)).expect("json");
        assert_eq!(value["hash"], "0123456789abcdef");
        assert_eq!(value["short_hash"], "0123456");
        assert_eq!(value["status"], "closed");
        assert_eq!(value["labels"][0], "bug");
        assert_eq!(value["summary"], "fix bug");
        assert_eq!(value["author"]["name"], "Bob");
        assert_eq!(value["author"]["email"], "bob@test.com");
        assert!(value["assignees"].as_array().expect("array").is_empty());
    }
}

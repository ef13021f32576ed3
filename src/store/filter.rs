//! Issue filtering.
//!
//! Criteria are OR-ed within a category and AND-ed across categories. An
//! empty category matches every issue.

use crate::model::{Issue, Status};
use std::collections::HashSet;

/// Read-only predicate over assignees, labels, and status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    assignees: HashSet<String>,
    labels: HashSet<String>,
    statuses: HashSet<Status>,
}

impl IssueFilter {
    /// Filter that matches every issue.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new<A, L, S>(assignees: A, labels: L, statuses: S) -> Self
    where
        A: IntoIterator<Item = String>,
        L: IntoIterator<Item = String>,
        S: IntoIterator<Item = Status>,
    {
        Self {
            assignees: assignees.into_iter().collect(),
            labels: labels.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignees.insert(assignee.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.statuses.insert(status);
        self
    }

    /// True when no criteria are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignees.is_empty() && self.labels.is_empty() && self.statuses.is_empty()
    }

    /// Test an issue against every category.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        let assignee_ok = self.assignees.is_empty()
            || issue.assignees.iter().any(|a| self.assignees.contains(a));
        let label_ok =
            self.labels.is_empty() || issue.labels.iter().any(|l| self.labels.contains(l));
        let status_ok = self.statuses.is_empty()
            || self
                .statuses
                .iter()
                .any(|status| status.as_str() == issue.status.as_str());

        assignee_ok && label_ok && status_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Signature;

    fn issue(status: Status, assignees: &[&str], labels: &[&str]) -> Issue {
        let author = Signature::decode("Bob <bob@test.com> 1719340759 -0700").expect("author");
        Issue::new(author, status)
            .with_assignees(assignees.iter().copied())
            .with_labels(labels.iter().copied())
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = IssueFilter::all();
        assert!(filter.is_empty());
        assert!(filter.matches(&issue(Status::Open, &[], &[])));
        assert!(filter.matches(&issue(Status::Closed, &["alice"], &["bug"])));
    }

    #[test]
    fn test_or_within_category() {
        let filter = IssueFilter::all().with_label("bug").with_label("docs");
        assert!(filter.matches(&issue(Status::Open, &[], &["docs"])));
        assert!(filter.matches(&issue(Status::Open, &[], &["bug", "ui"])));
        assert!(!filter.matches(&issue(Status::Open, &[], &["ui"])));
        assert!(!filter.matches(&issue(Status::Open, &[], &[])));
    }

    #[test]
    fn test_and_across_categories() {
        let filter = IssueFilter::all()
            .with_assignee("alice")
            .with_label("bug")
            .with_status(Status::Open);

        assert!(filter.matches(&issue(Status::Open, &["alice"], &["bug"])));
        // each category failing on its own rejects the issue
        assert!(!filter.matches(&issue(Status::Closed, &["alice"], &["bug"])));
        assert!(!filter.matches(&issue(Status::Open, &["bob"], &["bug"])));
        assert!(!filter.matches(&issue(Status::Open, &["alice"], &["ui"])));
    }

    #[test]
    fn test_status_membership() {
        let filter = IssueFilter::new(
            Vec::new(),
            Vec::new(),
            [Status::Closed, Status::Custom("wontfix".to_string())],
        );
        assert!(filter.matches(&issue(Status::Closed, &[], &[])));
        assert!(filter.matches(&issue(Status::Custom("wontfix".to_string()), &[], &[])));
        assert!(!filter.matches(&issue(Status::Open, &[], &[])));
    }

    #[test]
    fn test_status_compares_stored_string() {
        let stored = crate::codec::decode_issue(
            "author Bob <bob@test.com> 1719340759 -0700\nstatus OPEN\n\nmsg",
        )
        .expect("decode");
        let wanted: Status = "OPEN".parse().expect("status");

        assert!(IssueFilter::all().with_status(wanted).matches(&stored));
        assert!(!IssueFilter::all().with_status(Status::Open).matches(&stored));
        assert!(
            IssueFilter::all()
                .with_status(Status::Custom("open".to_string()))
                .matches(&issue(Status::Open, &[], &[]))
        );
    }

    #[test]
    fn test_status_only_filter_ignores_other_categories() {
        let filter = IssueFilter::all().with_status(Status::Open);
        assert!(filter.matches(&issue(Status::Open, &["anyone"], &["anything"])));
    }
}

//! Lazy issue iteration.
//!
//! [`IssueIterator`] looks one issue ahead: construction resolves
//! references until the first match, and every [`IssueIterator::advance`]
//! does the same for the next one. Filtered-out references are never
//! visible to the caller.

use crate::error::Result;
use crate::model::Issue;
use crate::store::{IssueFilter, NoteStore};
use std::collections::VecDeque;
use tracing::trace;

#[derive(Debug)]
enum Cursor {
    Positioned(Issue),
    Exhausted,
}

/// Cursor over a fixed list of note references.
///
/// Issues are produced in the order the references were listed. Any
/// resolution or decode failure ends the iteration; the iterator is left
/// exhausted and the error is returned to the caller.
#[derive(Debug)]
pub struct IssueIterator<'s, S: NoteStore + ?Sized> {
    store: &'s S,
    remaining: VecDeque<String>,
    filter: IssueFilter,
    cursor: Cursor,
}

impl<'s, S: NoteStore + ?Sized> IssueIterator<'s, S> {
    /// Create an iterator and position it on the first matching issue.
    ///
    /// # Errors
    ///
    /// Returns an error if resolving or decoding any reference up to the
    /// first match fails.
    pub fn new<I>(store: &'s S, references: I, filter: IssueFilter) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut iter = Self {
            store,
            remaining: references.into_iter().collect(),
            filter,
            cursor: Cursor::Exhausted,
        };
        iter.advance()?;
        Ok(iter)
    }

    /// True while an issue is positioned.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        matches!(self.cursor, Cursor::Positioned(_))
    }

    /// The positioned issue, or `None` once exhausted.
    #[must_use]
    pub const fn value(&self) -> Option<&Issue> {
        match &self.cursor {
            Cursor::Positioned(issue) => Some(issue),
            Cursor::Exhausted => None,
        }
    }

    /// References not yet resolved.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Move to the next matching issue.
    ///
    /// Advancing an exhausted iterator is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the first resolution or decode error; the iterator is
    /// exhausted afterwards.
    pub fn advance(&mut self) -> Result<()> {
        self.cursor = Cursor::Exhausted;

        while let Some(reference) = self.remaining.pop_front() {
            let issue = match self.store.fetch_issue(&reference) {
                Ok(issue) => issue,
                Err(err) => {
                    self.remaining.clear();
                    return Err(err);
                }
            };

            if self.filter.matches(&issue) {
                trace!(hash = %issue.hash, "positioned on issue");
                self.cursor = Cursor::Positioned(issue);
                return Ok(());
            }
            trace!(hash = %issue.hash, "issue filtered out");
        }

        Ok(())
    }

    /// Visit every remaining issue, starting with the positioned one.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error from resolution or from `f`.
    pub fn for_each<F>(mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&Issue) -> Result<()>,
    {
        while let Cursor::Positioned(issue) = &self.cursor {
            f(issue)?;
            self.advance()?;
        }
        Ok(())
    }

    /// Drain into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first resolution or decode error.
    pub fn collect_issues(self) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        self.for_each(|issue| {
            issues.push(issue.clone());
            Ok(())
        })?;
        Ok(issues)
    }
}

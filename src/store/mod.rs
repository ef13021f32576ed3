//! Issue storage on top of a note store.
//!
//! [`NoteStore`] is the narrow contract the core needs from the backing
//! store: list the annotated objects, read and write note bodies, and write
//! anchor objects. [`IssueStore`] layers issue semantics on top of it.
//! The production implementation is [`crate::git::GitNotes`];
//! [`MemoryNoteStore`] backs tests and benchmarks.

mod filter;
mod iter;
mod memory;

pub use filter::IssueFilter;
pub use iter::IssueIterator;
pub use memory::MemoryNoteStore;

use crate::error::{IssueError, Result};
use crate::model::{Identity, Issue, Signature, Status};
use crate::validation::IssueValidator;
use chrono::Utc;
use tracing::{debug, info};

/// Backing store for issue notes.
///
/// A reference is the id of an annotated anchor object.
pub trait NoteStore {
    /// References of every annotated object, in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    fn list_references(&self) -> Result<Vec<String>>;

    /// Raw note body attached to `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::IssueNotFound`] if no note is attached, or a
    /// store error.
    fn read_note(&self, reference: &str) -> Result<String>;

    /// Store `content` as a new object and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be written.
    fn write_anchor(&self, content: &str) -> Result<String>;

    /// Attach `body` to `reference`, replacing an existing note only when
    /// `overwrite` is set.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::NoteExists`] if a note exists and `overwrite`
    /// is false, or a store error.
    fn write_note(&self, reference: &str, body: &str, overwrite: bool) -> Result<()>;

    /// Expand a possibly abbreviated reference to a full object id.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::IssueNotFound`] if nothing matches.
    fn resolve_reference(&self, partial: &str) -> Result<String>;

    /// Read, decode, and stamp the issue attached to `reference`.
    ///
    /// # Errors
    ///
    /// Returns the store error or the decode error unchanged.
    fn fetch_issue(&self, reference: &str) -> Result<Issue> {
        let body = self.read_note(reference)?;
        let mut issue = Issue::decode(&body)?;
        issue.hash = reference.to_string();
        Ok(issue)
    }
}

/// Source of the identity used to sign new issues.
pub trait IdentityProvider {
    /// # Errors
    ///
    /// Returns a configuration error if no usable identity is configured.
    fn identity(&self) -> Result<Identity>;
}

/// Issue operations over a [`NoteStore`].
#[derive(Debug)]
pub struct IssueStore<S> {
    notes: S,
}

impl<S: NoteStore> IssueStore<S> {
    #[must_use]
    pub const fn new(notes: S) -> Self {
        Self { notes }
    }

    /// The underlying note store.
    #[must_use]
    pub const fn notes(&self) -> &S {
        &self.notes
    }

    /// Write a fresh anchor object and return an unsaved issue attached
    /// to it. The caller fills in the message and calls [`Self::save_issue`].
    ///
    /// # Errors
    ///
    /// Returns an error if the anchor object cannot be written.
    pub fn create_issue<A, L>(
        &self,
        author: Signature,
        status: Status,
        assignees: A,
        labels: L,
    ) -> Result<Issue>
    where
        A: IntoIterator<Item = String>,
        L: IntoIterator<Item = String>,
    {
        let nonce = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let anchor = format!("issue {}\nnonce {nonce}\n", author.encode());
        let hash = self.notes.write_anchor(&anchor)?;
        debug!(%hash, "wrote anchor object");

        let mut issue = Issue::new(author, status)
            .with_assignees(assignees)
            .with_labels(labels);
        issue.hash = hash;
        Ok(issue)
    }

    /// Persist a new issue note.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an incomplete issue,
    /// [`IssueError::NoteExists`] if the anchor already carries a note, or a
    /// store error.
    pub fn save_issue(&self, issue: &Issue) -> Result<()> {
        IssueValidator::validate(issue).map_err(IssueError::from_validation_errors)?;
        self.notes.write_note(&issue.hash, &issue.encode(), false)?;
        info!(hash = %issue.hash, status = %issue.status, "created issue");
        Ok(())
    }

    /// Replace the note of an existing issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::IssueNotFound`] if the issue has no note yet, a
    /// validation error, or a store error.
    pub fn update_issue(&self, issue: &Issue) -> Result<()> {
        IssueValidator::validate(issue).map_err(IssueError::from_validation_errors)?;
        self.notes.read_note(&issue.hash)?;
        self.notes.write_note(&issue.hash, &issue.encode(), true)?;
        info!(hash = %issue.hash, status = %issue.status, "updated issue");
        Ok(())
    }

    /// Iterate issues matching `filter` in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the references cannot be listed or the first
    /// matching issue cannot be resolved.
    pub fn list_issues(&self, filter: IssueFilter) -> Result<IssueIterator<'_, S>> {
        let references = self.notes.list_references()?;
        debug!(count = references.len(), "listed issue references");
        IssueIterator::new(&self.notes, references, filter)
    }

    /// Look up a single issue by full or abbreviated hash.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::IssueNotFound`] if the reference does not
    /// resolve or carries no note, a format error if the note is malformed,
    /// or a store error.
    pub fn get_issue(&self, reference: &str) -> Result<Issue> {
        let hash = self.notes.resolve_reference(reference.trim())?;
        self.notes.fetch_issue(&hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn init_logging() {
        crate::logging::init_test_logging();
    }

    fn author() -> Signature {
        let offset = FixedOffset::west_opt(7 * 3600).expect("offset");
        let when = offset.timestamp_opt(1_719_340_759, 0).single().expect("time");
        Signature::new("Bob", "bob@test.com", when)
    }

    fn create(store: &IssueStore<MemoryNoteStore>, message: &str, labels: &[&str]) -> Issue {
        let issue = store
            .create_issue(
                author(),
                Status::Open,
                Vec::new(),
                labels.iter().map(ToString::to_string),
            )
            .expect("create")
            .with_message(message);
        store.save_issue(&issue).expect("save");
        issue
    }

    #[test]
    fn test_create_does_not_write_a_note() {
        init_logging();
        let store = IssueStore::new(MemoryNoteStore::new());
        let issue = store
            .create_issue(author(), Status::Open, Vec::new(), Vec::new())
            .expect("create");
        assert!(!issue.hash.is_empty());
        assert!(store.notes().list_references().expect("list").is_empty());
    }

    #[test]
    fn test_anchors_are_unique() {
        init_logging();
        let store = IssueStore::new(MemoryNoteStore::new());
        let first = store
            .create_issue(author(), Status::Open, Vec::new(), Vec::new())
            .expect("create");
        let second = store
            .create_issue(author(), Status::Open, Vec::new(), Vec::new())
            .expect("create");
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn test_save_then_get() {
        init_logging();
        let store = IssueStore::new(MemoryNoteStore::new());
        let saved = create(&store, "fix bug\n\nfix the bug in the code", &["bug"]);

        let loaded = store.get_issue(&saved.hash).expect("get");
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_get_by_abbreviated_hash() {
        init_logging();
        let store = IssueStore::new(MemoryNoteStore::new());
        let saved = create(&store, "short", &[]);
        let loaded = store.get_issue(&saved.hash[..8]).expect("get");
        assert_eq!(loaded.hash, saved.hash);
    }

    #[test]
    fn test_get_unknown_issue() {
        init_logging();
        let store = IssueStore::new(MemoryNoteStore::new());
        let err = store.get_issue("deadbeef").expect_err("missing");
        assert!(matches!(err, IssueError::IssueNotFound { .. }));
    }

    #[test]
    fn test_save_twice_is_rejected() {
        init_logging();
        let store = IssueStore::new(MemoryNoteStore::new());
        let saved = create(&store, "once", &[]);
        let err = store.save_issue(&saved).expect_err("duplicate");
        assert!(matches!(err, IssueError::NoteExists { .. }));
    }

    #[test]
    fn test_save_rejects_empty_message() {
        init_logging();
        let store = IssueStore::new(MemoryNoteStore::new());
        let issue = store
            .create_issue(author(), Status::Open, Vec::new(), Vec::new())
            .expect("create");
        let err = store.save_issue(&issue).expect_err("empty message");
        assert!(matches!(err, IssueError::Validation { .. }));
    }

    #[test]
    fn test_update_replaces_note() {
        init_logging();
        let store = IssueStore::new(MemoryNoteStore::new());
        let mut issue = create(&store, "closing soon", &[]);
        issue.status = Status::Closed;
        store.update_issue(&issue).expect("update");

        let loaded = store.get_issue(&issue.hash).expect("get");
        assert_eq!(loaded.status, Status::Closed);
        assert_eq!(store.notes().list_references().expect("list").len(), 1);
    }

    #[test]
    fn test_update_requires_existing_note() {
        init_logging();
        let store = IssueStore::new(MemoryNoteStore::new());
        let issue = store
            .create_issue(author(), Status::Open, Vec::new(), Vec::new())
            .expect("create")
            .with_message("never saved");
        let err = store.update_issue(&issue).expect_err("missing");
        assert!(matches!(err, IssueError::IssueNotFound { .. }));
    }

    #[test]
    fn test_list_with_filter() {
        init_logging();
        let store = IssueStore::new(MemoryNoteStore::new());
        create(&store, "one", &["bug"]);
        create(&store, "two", &["docs"]);
        create(&store, "three", &["bug", "docs"]);

        let summaries: Vec<String> = store
            .list_issues(IssueFilter::all().with_label("bug"))
            .expect("list")
            .collect_issues()
            .expect("collect")
            .iter()
            .map(|issue| issue.summary().to_string())
            .collect();
        assert_eq!(summaries, vec!["one", "three"]);
    }
}

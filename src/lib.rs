//! `git_issue` - issue tracking stored in git notes.
//!
//! Each issue is a note attached to an otherwise unreferenced blob (its
//! anchor) under `refs/notes/issues`. The note body carries the author,
//! status, assignees, labels, and message; the anchor hash identifies the
//! issue.

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod git;
pub mod logging;
pub mod model;
pub mod output;
pub mod store;
pub mod validation;

pub use error::{ErrorCode, FormatError, IssueError, Result, StructuredError};
pub use model::{Issue, Signature, Status};
pub use store::{IssueFilter, IssueIterator, IssueStore, NoteStore};

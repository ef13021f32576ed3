//! Reopen command implementation.

use super::{Workspace, edit::set_status};
use crate::cli::IssueRefArgs;
use crate::error::Result;
use crate::model::Status;

/// Execute the reopen command.
///
/// # Errors
///
/// Returns an error if the issue cannot be found or updated.
pub fn execute(args: &IssueRefArgs, ws: &Workspace) -> Result<()> {
    set_status(ws, &args.issue, Status::Open)
}

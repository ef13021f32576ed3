//! Edit command implementation.

use super::{Workspace, normalize_values};
use crate::cli::EditArgs;
use crate::error::Result;
use crate::format::IssueJson;
use crate::model::{Issue, Status};
use tracing::info;

/// Execute the edit command.
///
/// Header flags are applied first. The message is replaced when `-m`/`-F`
/// is given, and the editor opens on the current message when `-e` is
/// given or no header flag was passed.
///
/// # Errors
///
/// Returns an error if the issue cannot be found, an argument is invalid,
/// the new message is empty, or git fails.
pub fn execute(args: &EditArgs, ws: &Workspace) -> Result<()> {
    let mut issue = ws.store().get_issue(&args.issue)?;
    apply_header_changes(&mut issue, args)?;

    if args.message.is_given() || args.edit_message || !args.changes_headers() {
        issue.message = ws.read_message(&args.message, &issue.hash, &issue.message)?;
    }

    ws.store().update_issue(&issue)?;
    info!(hash = %issue.hash, "issue edited");
    report(ws, &issue)
}

/// Apply status, assignee, and label flags.
///
/// # Errors
///
/// Returns a validation error for an empty or multi-line value.
pub fn apply_header_changes(issue: &mut Issue, args: &EditArgs) -> Result<()> {
    if let Some(status) = &args.status {
        issue.status = status.parse::<Status>()?;
    }
    for assignee in normalize_values("assignee", &args.unassign)? {
        issue.assignees.remove(&assignee);
    }
    issue
        .assignees
        .extend(normalize_values("assignee", &args.assign)?);
    for label in normalize_values("label", &args.unlabel)? {
        issue.labels.remove(&label);
    }
    issue.labels.extend(normalize_values("label", &args.label)?);
    Ok(())
}

/// Set the status of one issue, leaving the note untouched when it already
/// has that status.
///
/// # Errors
///
/// Returns an error if the issue cannot be found or updated.
pub fn set_status(ws: &Workspace, reference: &str, status: Status) -> Result<()> {
    let mut issue = ws.store().get_issue(reference)?;
    if issue.status == status {
        info!(hash = %issue.hash, %status, "status unchanged");
    } else {
        issue.status = status;
        ws.store().update_issue(&issue)?;
        info!(hash = %issue.hash, status = %issue.status, "status changed");
    }
    report(ws, &issue)
}

fn report(ws: &Workspace, issue: &Issue) -> Result<()> {
    let output = ws.output();
    if output.is_json() {
        output.print_json(&IssueJson::from(issue))?;
    } else if !output.is_quiet() {
        println!("{}", issue.hash);
    }
    Ok(())
}

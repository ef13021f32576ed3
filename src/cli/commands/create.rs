//! Create command implementation.

use super::{Workspace, normalize_values};
use crate::cli::CreateArgs;
use crate::error::Result;
use crate::format::IssueJson;
use crate::model::Status;
use crate::store::IdentityProvider;
use tracing::info;

/// Execute the create command.
///
/// The anchor object is written before the message is collected so the
/// editor buffer can name the issue; an aborted message leaves only an
/// unreferenced blob behind.
///
/// # Errors
///
/// Returns an error if the identity is missing, an argument is invalid, the
/// message is empty, or git fails.
pub fn execute(args: &CreateArgs, ws: &Workspace) -> Result<()> {
    let author = ws.git().identity()?.sign_now();
    let status = match &args.status {
        Some(value) => value.parse::<Status>()?,
        None => ws.config().default_status.clone(),
    };
    let assignees = normalize_values("assignee", &args.assignees)?;
    let labels = normalize_values("label", &args.labels)?;

    let mut issue = ws
        .store()
        .create_issue(author, status, assignees, labels)?;
    issue.message = ws.read_message(&args.message, &issue.hash, "")?;
    ws.store().save_issue(&issue)?;
    info!(hash = %issue.hash, summary = %issue.summary(), "issue opened");

    let output = ws.output();
    if output.is_json() {
        output.print_json(&IssueJson::from(&issue))?;
    } else if !output.is_quiet() {
        println!("{}", issue.hash);
    }
    Ok(())
}

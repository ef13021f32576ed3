//! List command implementation.

use super::{Workspace, ignore_broken_pipe};
use crate::cli::ListArgs;
use crate::error::Result;
use crate::format::{IssueJson, format_issue_oneline, format_issue_summary};
use crate::model::Status;
use crate::store::IssueFilter;
use std::io::Write;
use tracing::debug;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if a status does not parse or an issue cannot be read.
pub fn execute(args: &ListArgs, ws: &Workspace) -> Result<()> {
    let filter = build_filter(args)?;
    debug!(?filter, "listing issues");
    stream_issues(ws, filter, args.oneline)
}

/// Build the filter from repeated `-a`, `-l`, and `-s` flags.
///
/// # Errors
///
/// Returns a validation error for an empty status.
pub fn build_filter(args: &ListArgs) -> Result<IssueFilter> {
    let statuses = args
        .statuses
        .iter()
        .map(|s| s.parse::<Status>())
        .collect::<Result<Vec<_>>>()?;
    Ok(IssueFilter::new(
        args.assignees.iter().map(|a| a.trim().to_string()),
        args.labels.iter().map(|l| l.trim().to_string()),
        statuses,
    ))
}

/// Write every issue matching `filter`, in store order.
///
/// Text output goes through the pager; a pager that quits early ends the
/// listing without an error. JSON output is a single array.
///
/// # Errors
///
/// Returns the first resolution, decode, or write error.
pub fn stream_issues(ws: &Workspace, filter: IssueFilter, oneline: bool) -> Result<()> {
    let iter = ws.store().list_issues(filter)?;
    let output = ws.output();

    if output.is_json() {
        let issues = iter.collect_issues()?;
        let records: Vec<IssueJson<'_>> = issues.iter().map(IssueJson::from).collect();
        return ignore_broken_pipe(output.print_json(&records));
    }
    if output.is_quiet() || !iter.has_next() {
        return Ok(());
    }

    let options = output.text_options(oneline);
    let mut sink = ws.open_sink()?;
    let written = iter.for_each(|issue| {
        if oneline {
            writeln!(sink, "{}", format_issue_oneline(issue, options))?;
        } else {
            writeln!(sink, "{}", format_issue_summary(issue, options))?;
        }
        Ok(())
    });
    let finished = sink.finish();
    ignore_broken_pipe(written)?;
    ignore_broken_pipe(finished)
}

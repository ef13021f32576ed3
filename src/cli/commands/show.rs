//! Show command implementation.

use super::{Workspace, ignore_broken_pipe, list::stream_issues};
use crate::cli::ShowArgs;
use crate::error::Result;
use crate::format::{IssueJson, format_issue_detail};
use crate::store::IssueFilter;
use std::io::Write;

/// Execute the show command.
///
/// Without an issue every issue is streamed as in `list`; with one, its
/// full detail is printed.
///
/// # Errors
///
/// Returns an error if the issue cannot be found or read.
pub fn execute(args: &ShowArgs, ws: &Workspace) -> Result<()> {
    let Some(reference) = &args.issue else {
        return stream_issues(ws, IssueFilter::all(), false);
    };

    let issue = ws.store().get_issue(reference)?;
    let output = ws.output();
    if output.is_json() {
        return output.print_json(&IssueJson::from(&issue));
    }
    if output.is_quiet() {
        return Ok(());
    }

    let text = format_issue_detail(&issue, output.text_options(false));
    let mut sink = ws.open_sink()?;
    let written = sink.write_all(text.as_bytes()).map_err(Into::into);
    let finished = sink.finish();
    ignore_broken_pipe(written)?;
    ignore_broken_pipe(finished)
}

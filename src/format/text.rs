//! Text formatting functions for `git-issue`.
//!
//! Three renderings of an issue:
//! - summary: the `Display` layout with optional color (`list`)
//! - detail: summary headers plus labels and the full indented message (`show`)
//! - oneline: `{short-hash} [{status}] {summary}` (`list --oneline`)

use crate::model::{Issue, Status, TIME_FORMAT};
use colored::Colorize;
use std::fmt::Write as _;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Formatting options for text output.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatOptions {
    pub use_color: bool,
    pub max_width: Option<usize>,
}

impl TextFormatOptions {
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            use_color: false,
            max_width: None,
        }
    }
}

/// Format status label with optional color.
#[must_use]
pub fn format_status_label(status: &Status, use_color: bool) -> String {
    let label = status.as_str();
    if !use_color {
        return label.to_string();
    }

    match status {
        Status::Open => label.green().to_string(),
        Status::Closed => label.bright_black().to_string(),
        Status::Custom(_) => label.cyan().to_string(),
    }
}

fn format_hash_line(issue: &Issue, use_color: bool) -> String {
    let line = format!("issue {}", issue.hash);
    if use_color {
        line.yellow().to_string()
    } else {
        line
    }
}

fn write_headers(out: &mut String, issue: &Issue, use_color: bool) {
    let _ = writeln!(out, "{}", format_hash_line(issue, use_color));
    let _ = writeln!(out, "Author: {}", issue.author);
    let _ = writeln!(out, "Time:   {}", issue.author.when.format(TIME_FORMAT));
    let _ = writeln!(
        out,
        "Status: {}",
        format_status_label(&issue.status, use_color)
    );
    for assignee in &issue.assignees {
        let _ = writeln!(out, "Assignee: {assignee}");
    }
}

/// The `list` rendering. Without color this is exactly the issue's
/// `Display` output.
#[must_use]
pub fn format_issue_summary(issue: &Issue, options: TextFormatOptions) -> String {
    let mut out = String::new();
    write_headers(&mut out, issue, options.use_color);
    out.push('\n');
    let _ = writeln!(out, "    {}", issue.summary());
    out
}

/// The `show` rendering: headers, labels, and every message line indented
/// by four spaces.
#[must_use]
pub fn format_issue_detail(issue: &Issue, options: TextFormatOptions) -> String {
    let mut out = String::new();
    write_headers(&mut out, issue, options.use_color);
    if !issue.labels.is_empty() {
        let labels: Vec<&str> = issue.labels.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Labels: {}", labels.join(", "));
    }
    out.push('\n');
    for line in issue.message.trim_end_matches('\n').lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "    {line}");
        }
    }
    out
}

/// Format a single-line issue summary.
///
/// Format: `{short-hash} [{status}] {summary}`, truncated to
/// `options.max_width` columns.
#[must_use]
pub fn format_issue_oneline(issue: &Issue, options: TextFormatOptions) -> String {
    let status_plain = format!("[{}]", issue.status);
    let prefix_len = visible_len(issue.short_hash()) + 1 + visible_len(&status_plain) + 1;

    let summary = options.max_width.map_or_else(
        || issue.summary().to_string(),
        |width| truncate_title(issue.summary(), width.saturating_sub(prefix_len)),
    );

    if options.use_color {
        format!(
            "{} [{}] {summary}",
            issue.short_hash().yellow(),
            format_status_label(&issue.status, true)
        )
    } else {
        format!("{} {status_plain} {summary}", issue.short_hash())
    }
}

/// Determine terminal width from environment (falls back to 80).
#[must_use]
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(80)
}

/// Truncate a title to fit within `max_len` visible columns.
///
/// Handles wide characters (emojis, CJK) correctly using `unicode-width`.
#[must_use]
pub fn truncate_title(title: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(title) <= max_len {
        return title.to_string();
    }
    if max_len <= 3 {
        return take_columns(title, max_len);
    }

    let mut s = take_columns(title, max_len - 3);
    s.push_str("...");
    s
}

fn take_columns(text: &str, columns: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw > columns {
            break;
        }
        width += cw;
        out.push(c);
    }
    out
}

fn visible_len(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

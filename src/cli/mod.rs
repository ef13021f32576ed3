//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Open, close, and edit issues stored in git notes
#[derive(Parser, Debug)]
#[command(name = "git-issue", author, version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Run as if started in <path>
    #[arg(short = 'C', global = true, value_name = "path")]
    pub directory: Option<PathBuf>,

    /// Notes ref holding issues (default: refs/notes/issues)
    #[arg(long, global = true, value_name = "ref")]
    pub notes_ref: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Do not pipe output into a pager
    #[arg(long, global = true)]
    pub no_pager: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a new issue
    #[command(alias = "open")]
    Create(CreateArgs),

    /// List issues
    List(ListArgs),

    /// Show issue contents
    Show(ShowArgs),

    /// Change an existing issue
    Edit(EditArgs),

    /// Mark an issue closed
    Close(IssueRefArgs),

    /// Mark an issue open again
    Reopen(IssueRefArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Show version information
    Version,
}

/// Where an issue message comes from.
#[derive(Args, Debug, Default, Clone)]
pub struct MessageArgs {
    /// Use the given message; multiple -m are joined as separate paragraphs
    #[arg(short = 'm', long = "message", value_name = "msg", conflicts_with = "file")]
    pub message: Vec<String>,

    /// Take the message from a file, or '-' for standard input
    #[arg(short = 'F', long = "file", value_name = "file")]
    pub file: Option<PathBuf>,

    /// Strip comments and collapse blank lines in the message (default)
    #[arg(long, overrides_with = "no_stripspace")]
    pub stripspace: bool,

    /// Keep the message verbatim
    #[arg(long, overrides_with = "stripspace")]
    pub no_stripspace: bool,
}

impl MessageArgs {
    #[must_use]
    pub const fn strip(&self) -> bool {
        !self.no_stripspace
    }

    /// True when the message comes from a flag rather than the editor.
    #[must_use]
    pub fn is_given(&self) -> bool {
        !self.message.is_empty() || self.file.is_some()
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct CreateArgs {
    #[command(flatten)]
    pub message: MessageArgs,

    /// Assign the issue (repeatable)
    #[arg(short = 'a', long = "assignee", value_name = "user")]
    pub assignees: Vec<String>,

    /// Label the issue (repeatable)
    #[arg(short = 'l', long = "label", value_name = "label")]
    pub labels: Vec<String>,

    /// Initial status (default: configured default-status, usually open)
    #[arg(short = 's', long, value_name = "status")]
    pub status: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ListArgs {
    /// Only issues assigned to <user> (repeatable, any matches)
    #[arg(short = 'a', long = "assignee", value_name = "user")]
    pub assignees: Vec<String>,

    /// Only issues with <label> (repeatable, any matches)
    #[arg(short = 'l', long = "label", value_name = "label")]
    pub labels: Vec<String>,

    /// Only issues with <status> (repeatable, any matches)
    #[arg(short = 's', long = "status", value_name = "status")]
    pub statuses: Vec<String>,

    /// One line per issue
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ShowArgs {
    /// Issue hash or abbreviation; all issues when omitted
    pub issue: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct EditArgs {
    /// Issue hash or abbreviation
    pub issue: String,

    #[command(flatten)]
    pub message: MessageArgs,

    /// Set the status
    #[arg(short = 's', long, value_name = "status")]
    pub status: Option<String>,

    /// Add an assignee (repeatable)
    #[arg(short = 'a', long = "assignee", value_name = "user")]
    pub assign: Vec<String>,

    /// Remove an assignee (repeatable)
    #[arg(long, value_name = "user")]
    pub unassign: Vec<String>,

    /// Add a label (repeatable)
    #[arg(short = 'l', long = "label", value_name = "label")]
    pub label: Vec<String>,

    /// Remove a label (repeatable)
    #[arg(long, value_name = "label")]
    pub unlabel: Vec<String>,

    /// Open the editor on the current message
    #[arg(short = 'e', long, conflicts_with_all = ["message", "file"])]
    pub edit_message: bool,
}

impl EditArgs {
    /// True when any header field changes.
    #[must_use]
    pub fn changes_headers(&self) -> bool {
        self.status.is_some()
            || !self.assign.is_empty()
            || !self.unassign.is_empty()
            || !self.label.is_empty()
            || !self.unlabel.is_empty()
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct IssueRefArgs {
    /// Issue hash or abbreviation
    pub issue: String,
}

/// Arguments for the completions command.
#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellType,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Supported shells for completion generation.
#[derive(ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ShellType {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    #[value(name = "powershell")]
    #[value(alias = "pwsh")]
    /// `PowerShell`
    PowerShell,
    /// Elvish
    Elvish,
}

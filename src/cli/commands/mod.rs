//! Command implementations.
//!
//! Repository commands receive a [`Workspace`]: the git runner, the
//! resolved configuration, the output context, and the issue store, all
//! opened once in `main`.

pub mod close;
pub mod completions;
pub mod create;
pub mod edit;
pub mod list;
pub mod reopen;
pub mod show;
pub mod version;

use crate::cli::MessageArgs;
use crate::config::{self, CliOverrides, IssueConfig};
use crate::error::{IssueError, Result};
use crate::git::{Editor, Git, GitNotes};
use crate::output::{OutputContext, OutputSink, Pager};
use crate::store::IssueStore;
use crate::validation::validate_header_value;
use std::fs;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global options that shape how a workspace is opened.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceOptions {
    pub directory: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
    pub no_pager: bool,
    pub overrides: CliOverrides,
}

/// Everything a repository command needs.
#[derive(Debug)]
pub struct Workspace {
    git: Git,
    config: IssueConfig,
    output: OutputContext,
    store: IssueStore<GitNotes>,
    no_pager: bool,
}

impl Workspace {
    /// Locate the repository, load configuration, and open the store.
    ///
    /// # Errors
    ///
    /// Returns an error outside a git repository or for invalid
    /// configuration.
    pub fn open(options: &WorkspaceOptions) -> Result<Self> {
        let workdir = match &options.directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let git = Git::new(workdir);
        let git_dir = git.git_dir()?;
        let toplevel = git.toplevel().ok();
        debug!(git_dir = %git_dir.display(), toplevel = ?toplevel, "opened repository");

        let layer = config::load_config(toplevel.as_deref(), &options.overrides)?;
        let config = IssueConfig::from_layer(&layer)?;
        let output = OutputContext::from_flags(options.json, options.quiet, &config);
        let store = IssueStore::new(GitNotes::new(git.clone(), config.notes_ref.clone()));

        Ok(Self {
            git,
            config,
            output,
            store,
            no_pager: options.no_pager,
        })
    }

    #[must_use]
    pub const fn git(&self) -> &Git {
        &self.git
    }

    #[must_use]
    pub const fn config(&self) -> &IssueConfig {
        &self.config
    }

    #[must_use]
    pub const fn output(&self) -> &OutputContext {
        &self.output
    }

    #[must_use]
    pub const fn store(&self) -> &IssueStore<GitNotes> {
        &self.store
    }

    /// Destination for long output: the pager when stdout is a terminal
    /// and paging is enabled, stdout otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the pager configuration cannot be read.
    pub fn open_sink(&self) -> Result<OutputSink> {
        if self.no_pager || self.output.is_json() || !std::io::stdout().is_terminal() {
            return Ok(OutputSink::stdout());
        }
        let pager = Pager::resolve(&self.git, self.config.pager.as_deref())?;
        Ok(OutputSink::open(pager.as_ref()))
    }

    /// Obtain a message from flags, a file, standard input, or the editor,
    /// then clean it up unless `--no-stripspace` was given.
    ///
    /// `hash` and `current` seed the editor buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read, the editor fails, or
    /// the resulting message is empty.
    pub fn read_message(&self, args: &MessageArgs, hash: &str, current: &str) -> Result<String> {
        let raw = match &args.file {
            Some(path) if path.as_os_str() == "-" => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
            Some(path) => read_file(path)?,
            None if !args.message.is_empty() => args.message.join("\n\n"),
            None => Editor::resolve(&self.git, self.config.editor.as_deref())?
                .edit_message(&self.git, hash, current)?,
        };

        let message = if args.strip() {
            self.git.stripspace(&raw)?
        } else {
            raw
        };

        if message.trim().is_empty() {
            return Err(IssueError::validation(
                "message",
                "empty message, aborting",
            ));
        }
        Ok(message)
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| IssueError::IoAt {
        path: path.to_path_buf(),
        source,
    })
}

/// Trim user-supplied header values and reject ones that cannot be stored.
///
/// # Errors
///
/// Returns a validation error naming `field`.
pub fn normalize_values(field: &str, values: &[String]) -> Result<Vec<String>> {
    values
        .iter()
        .map(|value| {
            let value = value.trim();
            validate_header_value(field, value).map_err(|err| IssueError::Validation {
                field: err.field,
                reason: err.message,
            })?;
            Ok(value.to_string())
        })
        .collect()
}

/// Treat a closed reader as a normal end of output.
///
/// # Errors
///
/// Returns `result` unchanged unless it is a broken pipe.
pub fn ignore_broken_pipe(result: Result<()>) -> Result<()> {
    match result {
        Err(err) if err.is_broken_pipe() => {
            debug!("output closed early");
            Ok(())
        }
        other => other,
    }
}

//! Git plumbing.
//!
//! Everything here shells out to the `git` binary. Each call is a single
//! blocking child process run with `LC_ALL=C` so error text is stable.

mod editor;

pub use editor::{EDIT_MESSAGE_FILE, Editor, edit_template};

use crate::error::{FormatError, IssueError, Result};
use crate::model::Identity;
use crate::store::{IdentityProvider, NoteStore};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tracing::{debug, trace};

/// Notes ref used when none is configured.
pub const DEFAULT_NOTES_REF: &str = "refs/notes/issues";

/// Runs `git` in a fixed working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Run git and return stdout with one trailing newline removed.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::GitNotInstalled`] if git cannot be spawned and
    /// [`IssueError::GitCommand`] if it exits unsuccessfully.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        self.run_raw(args, None).map(trim_one_newline)
    }

    /// Like [`Self::run`], feeding `input` to stdin.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run`].
    pub fn run_with_input(&self, args: &[&str], input: &str) -> Result<String> {
        self.run_raw(args, Some(input)).map(trim_one_newline)
    }

    /// Run git and return stdout untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run`].
    pub fn run_raw(&self, args: &[&str], input: Option<&str>) -> Result<String> {
        self.run_bytes(args, input)
            .map(|stdout| String::from_utf8_lossy(&stdout).into_owned())
    }

    /// Run git and return stdout as bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run`].
    pub fn run_bytes(&self, args: &[&str], input: Option<&str>) -> Result<Vec<u8>> {
        let output = self.output(args, input)?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(command_failed(args, &output))
        }
    }

    fn output(&self, args: &[&str], input: Option<&str>) -> Result<Output> {
        debug!(args = %args.join(" "), "running git");

        let mut command = Command::new("git");
        command
            .args(args)
            .current_dir(&self.workdir)
            .env("LC_ALL", "C")
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|err| spawn_failed(args, &err))?;
        if let Some(input) = input {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(input.as_bytes())?;
            }
        }
        let output = child.wait_with_output()?;
        trace!(status = ?output.status.code(), "git finished");
        Ok(output)
    }

    /// Read a git config value; `None` when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails for a reason other than a missing key.
    pub fn config_get(&self, key: &str) -> Result<Option<String>> {
        let args = ["config", "--get", key];
        let output = self.output(&args, None)?;
        match output.status.code() {
            Some(0) => Ok(Some(trim_one_newline(
                String::from_utf8_lossy(&output.stdout).into_owned(),
            ))),
            // exit code 1 means the key is not set
            Some(1) => Ok(None),
            _ => Err(command_failed(&args, &output)),
        }
    }

    /// Absolute path of the repository's git directory.
    ///
    /// # Errors
    ///
    /// Returns an error outside a repository.
    pub fn git_dir(&self) -> Result<PathBuf> {
        let dir = PathBuf::from(self.run(&["rev-parse", "--git-dir"])?);
        Ok(if dir.is_absolute() {
            dir
        } else {
            self.workdir.join(dir)
        })
    }

    /// Root of the working tree.
    ///
    /// # Errors
    ///
    /// Returns an error outside a working tree.
    pub fn toplevel(&self) -> Result<PathBuf> {
        self.run(&["rev-parse", "--show-toplevel"]).map(PathBuf::from)
    }

    /// Clean up a message the way `git commit` does, dropping `#` lines.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn stripspace(&self, text: &str) -> Result<String> {
        self.run_raw(&["stripspace", "--strip-comments"], Some(text))
    }
}

impl IdentityProvider for Git {
    fn identity(&self) -> Result<Identity> {
        let name = self
            .config_get("user.name")?
            .ok_or(IssueError::MissingIdentity { key: "user.name" })?;
        let email = self
            .config_get("user.email")?
            .ok_or(IssueError::MissingIdentity { key: "user.email" })?;
        Identity::new(name, email)
    }
}

/// [`NoteStore`] backed by a git notes ref.
#[derive(Debug, Clone)]
pub struct GitNotes {
    git: Git,
    notes_ref: String,
}

impl GitNotes {
    #[must_use]
    pub fn new(git: Git, notes_ref: impl Into<String>) -> Self {
        Self {
            git,
            notes_ref: notes_ref.into(),
        }
    }

    #[must_use]
    pub const fn git(&self) -> &Git {
        &self.git
    }

    fn notes_args<'a>(&'a self, rest: &[&'a str]) -> Vec<&'a str> {
        let mut args = vec!["notes", "--ref", self.notes_ref.as_str()];
        args.extend_from_slice(rest);
        args
    }
}

impl NoteStore for GitNotes {
    fn list_references(&self) -> Result<Vec<String>> {
        let listing = self.git.run(&self.notes_args(&["list"]))?;
        parse_note_list(&listing)
    }

    fn read_note(&self, reference: &str) -> Result<String> {
        if !is_object_name(reference) {
            return Err(not_found(reference));
        }
        let body = self
            .git
            .run_bytes(&self.notes_args(&["show", reference]), None)
            .map_err(|err| match err {
                IssueError::GitCommand { ref message, .. } if is_missing_note(message) => {
                    not_found(reference)
                }
                other => other,
            })?;
        note_text(body)
    }

    fn write_anchor(&self, content: &str) -> Result<String> {
        self.git
            .run_with_input(&["hash-object", "-w", "--stdin"], content)
    }

    fn write_note(&self, reference: &str, body: &str, overwrite: bool) -> Result<()> {
        // Storing the body as a blob first and attaching it with -C keeps
        // git from reformatting it.
        let blob = self
            .git
            .run_with_input(&["hash-object", "-w", "--stdin"], body)?;

        let mut rest = vec!["add"];
        if overwrite {
            rest.push("-f");
        }
        rest.extend(["-C", blob.as_str(), reference]);

        self.git
            .run(&self.notes_args(&rest))
            .map(drop)
            .map_err(|err| match err {
                IssueError::GitCommand { ref message, .. }
                    if message.contains("existing notes") =>
                {
                    IssueError::NoteExists {
                        hash: reference.to_string(),
                    }
                }
                other => other,
            })
    }

    fn resolve_reference(&self, partial: &str) -> Result<String> {
        if !is_object_name(partial) {
            return Err(not_found(partial));
        }
        let rev = format!("{partial}^{{object}}");
        let output = self
            .git
            .output(&["rev-parse", "--verify", "--quiet", &rev], None)?;
        let hash = trim_one_newline(String::from_utf8_lossy(&output.stdout).into_owned());
        if output.status.success() && !hash.is_empty() {
            Ok(hash)
        } else {
            Err(not_found(partial))
        }
    }
}

/// Note bodies must be UTF-8; nothing is replaced or dropped.
fn note_text(body: Vec<u8>) -> Result<String> {
    String::from_utf8(body).map_err(|err| {
        FormatError::InvalidEncoding {
            offset: err.utf8_error().valid_up_to(),
        }
        .into()
    })
}

/// Parse `git notes list` output into annotated object ids.
///
/// Each line is `<note-blob> <annotated-object>`.
///
/// # Errors
///
/// Returns [`IssueError::InvalidNoteList`] for a line without exactly two
/// fields.
pub fn parse_note_list(listing: &str) -> Result<Vec<String>> {
    listing
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [_note, object] => Ok((*object).to_string()),
                _ => Err(IssueError::InvalidNoteList {
                    line: line.to_string(),
                }),
            }
        })
        .collect()
}

fn is_object_name(reference: &str) -> bool {
    !reference.is_empty() && !reference.starts_with('-') && !reference.contains(char::is_whitespace)
}

fn is_missing_note(message: &str) -> bool {
    message.contains("no note found") || message.contains("failed to resolve")
}

fn not_found(reference: &str) -> IssueError {
    IssueError::IssueNotFound {
        reference: reference.to_string(),
    }
}

fn spawn_failed(args: &[&str], err: &std::io::Error) -> IssueError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IssueError::GitNotInstalled
    } else {
        IssueError::GitCommand {
            args: args.join(" "),
            message: err.to_string(),
        }
    }
}

fn command_failed(args: &[&str], output: &Output) -> IssueError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let message = if stderr.is_empty() {
        "unknown error".to_string()
    } else {
        stderr
    };
    IssueError::GitCommand {
        args: args.join(" "),
        message,
    }
}

fn trim_one_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

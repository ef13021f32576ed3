//! Interactive message editing.

use super::Git;
use crate::error::{IssueError, Result};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// File under the git directory that holds the message while editing.
pub const EDIT_MESSAGE_FILE: &str = "ISSUES_EDITMSG";

const FALLBACK_EDITOR: &str = "vi";

/// Initial buffer shown to the user. Lines starting with `#` are stripped
/// from the result.
#[must_use]
pub fn edit_template(message: &str, hash: &str) -> String {
    format!("{message}\n\n#\n# Write/edit the message for the following issue:\n#\n# {hash}")
}

/// A resolved editor command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    command: String,
}

impl Editor {
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Pick the editor from the environment, the configured value, and
    /// `core.editor`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::DumbTerminal`] when nothing is configured and
    /// the terminal cannot run `vi`.
    pub fn resolve(git: &Git, configured: Option<&str>) -> Result<Self> {
        choose_editor(
            |name| std::env::var(name).ok(),
            configured,
            || git.config_get("core.editor"),
        )
        .map(Self::new)
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Open `path` and wait for the editor to exit.
    ///
    /// The command goes through `sh -c` so it may carry its own arguments.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::EditorFailed`] if the editor exits unsuccessfully.
    pub fn edit(&self, path: &Path) -> Result<()> {
        debug!(editor = %self.command, path = %path.display(), "launching editor");
        let status = Command::new("sh")
            .arg("-c")
            .arg(format!("{} \"$@\"", self.command))
            .arg(&self.command)
            .arg(path)
            .status()
            .map_err(|err| IssueError::EditorFailed {
                editor: self.command.clone(),
                status: err.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(IssueError::EditorFailed {
                editor: self.command.clone(),
                status: status.to_string(),
            })
        }
    }

    /// Edit `message` for the issue `hash` in the repository's edit file and
    /// return the raw result. The file is removed afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or read, or the editor
    /// fails.
    pub fn edit_message(&self, git: &Git, hash: &str, message: &str) -> Result<String> {
        let path = git.git_dir()?.join(EDIT_MESSAGE_FILE);
        fs::write(&path, edit_template(message, hash)).map_err(|source| IssueError::IoAt {
            path: path.clone(),
            source,
        })?;

        let edited = self.edit(&path).and_then(|()| {
            fs::read_to_string(&path).map_err(|source| IssueError::IoAt {
                path: path.clone(),
                source,
            })
        });
        if let Err(err) = fs::remove_file(&path) {
            debug!(path = %path.display(), %err, "could not remove edit file");
        }

        let edited = edited?;
        info!(bytes = edited.len(), "message edited");
        Ok(edited)
    }
}

fn is_dumb_terminal(term: Option<&str>) -> bool {
    term.is_none_or(|t| t.is_empty() || t == "dumb")
}

/// Editor precedence: `GIT_EDITOR`, configured editor, `core.editor`,
/// `VISUAL` (unless the terminal is dumb), `EDITOR`, then `vi`.
fn choose_editor<E, C>(env: E, configured: Option<&str>, core_editor: C) -> Result<String>
where
    E: Fn(&str) -> Option<String>,
    C: FnOnce() -> Result<Option<String>>,
{
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    if let Some(editor) = non_empty(env("GIT_EDITOR")) {
        return Ok(editor);
    }
    if let Some(editor) = non_empty(configured.map(str::to_string)) {
        return Ok(editor);
    }
    if let Some(editor) = non_empty(core_editor()?) {
        return Ok(editor);
    }

    let term = env("TERM");
    let dumb = is_dumb_terminal(term.as_deref());
    if !dumb {
        if let Some(editor) = non_empty(env("VISUAL")) {
            return Ok(editor);
        }
    }
    if let Some(editor) = non_empty(env("EDITOR")) {
        return Ok(editor);
    }
    if dumb {
        return Err(IssueError::DumbTerminal);
    }
    Ok(FALLBACK_EDITOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn no_core() -> Result<Option<String>> {
        Ok(None)
    }

    #[test]
    fn test_git_editor_wins() {
        let env = env_of(&[("GIT_EDITOR", "nano"), ("EDITOR", "emacs"), ("TERM", "xterm")]);
        let editor = choose_editor(env, Some("code -w"), || Ok(Some("vim".to_string())))
            .expect("editor");
        assert_eq!(editor, "nano");
    }

    #[test]
    fn test_configured_before_core_editor() {
        let env = env_of(&[("TERM", "xterm")]);
        let editor = choose_editor(env, Some("code -w"), || Ok(Some("vim".to_string())))
            .expect("editor");
        assert_eq!(editor, "code -w");
    }

    #[test]
    fn test_core_editor_before_visual() {
        let env = env_of(&[("VISUAL", "gvim"), ("TERM", "xterm")]);
        let editor = choose_editor(env, None, || Ok(Some("vim".to_string()))).expect("editor");
        assert_eq!(editor, "vim");
    }

    #[test]
    fn test_visual_skipped_on_dumb_terminal() {
        let env = env_of(&[("VISUAL", "gvim"), ("EDITOR", "ed"), ("TERM", "dumb")]);
        assert_eq!(choose_editor(env, None, no_core).expect("editor"), "ed");

        let env = env_of(&[("VISUAL", "gvim"), ("EDITOR", "ed"), ("TERM", "xterm")]);
        assert_eq!(choose_editor(env, None, no_core).expect("editor"), "gvim");
    }

    #[test]
    fn test_dumb_terminal_without_editor_fails() {
        let env = env_of(&[("TERM", "dumb")]);
        let err = choose_editor(env, None, no_core).expect_err("dumb");
        assert!(matches!(err, IssueError::DumbTerminal));

        let err = choose_editor(env_of(&[]), None, no_core).expect_err("unset TERM");
        assert!(matches!(err, IssueError::DumbTerminal));
    }

    #[test]
    fn test_falls_back_to_vi() {
        let env = env_of(&[("TERM", "xterm-256color")]);
        assert_eq!(choose_editor(env, None, no_core).expect("editor"), "vi");
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let env = env_of(&[("GIT_EDITOR", "  "), ("EDITOR", "ed"), ("TERM", "xterm")]);
        assert_eq!(choose_editor(env, Some(""), no_core).expect("editor"), "ed");
    }

    #[test]
    fn test_template_layout() {
        assert_eq!(
            edit_template("fix bug", "abc123"),
            "fix bug\n\n#\n# Write/edit the message for the following issue:\n#\n# abc123"
        );
    }
}

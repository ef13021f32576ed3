//! Paging long output.

use crate::error::Result;
use crate::git::Git;
use std::io::{self, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use tracing::debug;

const FALLBACK_PAGER: &str = "less";

/// A resolved pager command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    command: String,
}

impl Pager {
    /// Pick the pager from the environment, the configured value, and
    /// `core.pager`. Returns `None` when paging is disabled with `cat` or an
    /// empty value.
    ///
    /// # Errors
    ///
    /// Returns an error if reading `core.pager` fails.
    pub fn resolve(git: &Git, configured: Option<&str>) -> Result<Option<Self>> {
        choose_pager(
            |name| std::env::var(name).ok(),
            configured,
            || git.config_get("core.pager"),
        )
        .map(|choice| choice.map(|command| Self { command }))
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Pager precedence: `GIT_PAGER`, configured pager, `core.pager`, `PAGER`,
/// then `less`. The first value set wins even when it disables paging.
fn choose_pager<E, C>(env: E, configured: Option<&str>, core_pager: C) -> Result<Option<String>>
where
    E: Fn(&str) -> Option<String>,
    C: FnOnce() -> Result<Option<String>>,
{
    let chosen = match env("GIT_PAGER") {
        Some(value) => value,
        None => match configured {
            Some(value) => value.to_string(),
            None => match core_pager()? {
                Some(value) => value,
                None => env("PAGER").unwrap_or_else(|| FALLBACK_PAGER.to_string()),
            },
        },
    };

    let trimmed = chosen.trim();
    if trimmed.is_empty() || trimmed == "cat" {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

/// Where command output goes: straight to stdout or into a pager.
#[derive(Debug)]
pub enum OutputSink {
    Stdout(io::Stdout),
    Paged { child: Child, stdin: ChildStdin },
}

impl OutputSink {
    #[must_use]
    pub fn stdout() -> Self {
        Self::Stdout(io::stdout())
    }

    /// Spawn `pager` and route output to it. Falls back to stdout if the
    /// pager cannot be started.
    #[must_use]
    pub fn open(pager: Option<&Pager>) -> Self {
        let Some(pager) = pager else {
            return Self::stdout();
        };

        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(pager.command())
            .stdin(Stdio::piped());
        if std::env::var_os("LESS").is_none() {
            command.env("LESS", "FRX");
        }
        if std::env::var_os("LV").is_none() {
            command.env("LV", "-c");
        }

        match command.spawn() {
            Ok(mut child) => match child.stdin.take() {
                Some(stdin) => {
                    debug!(pager = %pager.command(), "paging output");
                    Self::Paged { child, stdin }
                }
                None => Self::stdout(),
            },
            Err(err) => {
                debug!(pager = %pager.command(), %err, "pager failed to start");
                Self::stdout()
            }
        }
    }

    #[must_use]
    pub const fn is_paged(&self) -> bool {
        matches!(self, Self::Paged { .. })
    }

    /// Flush, close the pager's input, and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing or waiting fails.
    pub fn finish(self) -> Result<()> {
        match self {
            Self::Stdout(mut stdout) => stdout.flush()?,
            Self::Paged { mut child, stdin } => {
                drop(stdin);
                child.wait()?;
            }
        }
        Ok(())
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(stdout) => stdout.write(buf),
            Self::Paged { stdin, .. } => stdin.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(stdout) => stdout.flush(),
            Self::Paged { stdin, .. } => stdin.flush(),
        }
    }
}

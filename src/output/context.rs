use crate::config::IssueConfig;
use crate::error::Result;
use crate::format::{TextFormatOptions, terminal_width};
use serde::Serialize;
use std::io::{IsTerminal, Write};

/// Central output coordinator that respects json/quiet modes.
#[derive(Debug, Clone)]
pub struct OutputContext {
    mode: OutputMode,
    /// Terminal width (cached)
    width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Text with ANSI color
    Color,
    /// Plain text, no ANSI codes (for piping)
    Plain,
    /// JSON output only
    Json,
    /// Minimal output (quiet mode)
    Quiet,
}

impl OutputContext {
    /// Create from CLI-style flags and the resolved configuration.
    #[must_use]
    pub fn from_flags(json: bool, quiet: bool, config: &IssueConfig) -> Self {
        let mode = if json {
            OutputMode::Json
        } else if quiet {
            OutputMode::Quiet
        } else if config.use_color(std::io::stdout().is_terminal()) {
            OutputMode::Color
        } else {
            OutputMode::Plain
        };

        Self {
            mode,
            width: terminal_width(),
        }
    }

    #[must_use]
    pub const fn with_mode(mode: OutputMode) -> Self {
        Self { mode, width: 80 }
    }

    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.mode == OutputMode::Quiet
    }

    #[must_use]
    pub fn use_color(&self) -> bool {
        self.mode == OutputMode::Color
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Text options for issue rendering; `fit_width` truncates to the
    /// terminal.
    #[must_use]
    pub fn text_options(&self, fit_width: bool) -> TextFormatOptions {
        TextFormatOptions {
            use_color: self.use_color(),
            max_width: fit_width.then_some(self.width),
        }
    }

    /// Write `value` as pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_json<W: Write, T: Serialize + ?Sized>(&self, out: &mut W, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }

    /// Print `value` as JSON to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.write_json(&mut lock, value)
    }
}

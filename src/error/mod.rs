//! Error types and handling for `git_issue`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Decoding failures live in their own [`FormatError`] so codec code can
//!   return them directly and callers can test for "any format error"
//! - Everything else is an [`IssueError`] variant, grouped by origin
//!   (format, resolution, configuration, validation, I/O)
//! - Provides recovery hints and exit codes via [`StructuredError`]

mod structured;

pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use thiserror::Error;

/// A note body, signature, or header block that does not follow the
/// persisted issue format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Signature line does not match `NAME <EMAIL> UNIX_SECONDS ±HHMM`.
    #[error("invalid author format: '{text}'")]
    InvalidSignature { text: String },

    /// Timezone offset is not a valid `±HHMM` value.
    #[error("invalid timezone format: '{text}'")]
    InvalidTimezone { text: String },

    /// No blank line separates the headers from the message.
    #[error("invalid issue format: missing blank line between headers and message")]
    MissingSeparator,

    /// A header line whose key is not recognized.
    #[error("invalid issue format: unknown header on line {line}: '{text}'")]
    UnknownHeader { line: usize, text: String },

    /// A recognized header without a value.
    #[error("invalid issue format: empty '{key}' header on line {line}")]
    EmptyHeaderValue { key: &'static str, line: usize },

    /// A required header is absent.
    #[error("invalid issue format: missing '{key}' header")]
    MissingHeader { key: &'static str },

    /// A note body that is not UTF-8 text.
    #[error("invalid issue format: note is not valid UTF-8 at byte {offset}")]
    InvalidEncoding { offset: usize },

    /// A header that must appear once appears again.
    #[error("invalid issue format: duplicate '{key}' header on line {line}")]
    DuplicateHeader { key: &'static str, line: usize },
}

/// Primary error type for `git_issue` operations.
#[derive(Error, Debug)]
pub enum IssueError {
    // === Format Errors ===
    /// Stored data could not be decoded.
    #[error(transparent)]
    Format(#[from] FormatError),

    // === Resolution Errors ===
    /// The `git` executable could not be started.
    #[error("git executable is not available in PATH")]
    GitNotInstalled,

    /// A git command exited unsuccessfully.
    #[error("git {args} failed: {message}")]
    GitCommand { args: String, message: String },

    /// `git notes list` produced a line that is not `<note> <object>`.
    #[error("invalid note list format: '{line}'")]
    InvalidNoteList { line: String },

    /// No issue note is attached to the given object.
    #[error("Issue not found: {reference}")]
    IssueNotFound { reference: String },

    /// An issue note is already attached to the anchor object.
    #[error("Issue note already exists for {hash}")]
    NoteExists { hash: String },

    // === Configuration Errors ===
    /// Required identity setting is missing from git config.
    #[error("missing identity: git config {key} is not set")]
    MissingIdentity { key: &'static str },

    /// Identity value cannot appear in a signature line.
    #[error("invalid identity {field}: '{value}'")]
    InvalidIdentity { field: &'static str, value: String },

    /// No editor is configured and the terminal cannot run the default.
    #[error("terminal is dumb, but EDITOR unset")]
    DumbTerminal,

    /// The editor exited unsuccessfully.
    #[error("editor '{editor}' exited with {status}")]
    EditorFailed { editor: String, status: String },

    /// Configuration file or value error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Could not read or write a file at a known path.
    #[error("I/O error at '{path}': {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// The reason for the validation failure.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl IssueError {
    /// Stored data failed to decode.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// The note store could not list, read, or write.
    #[must_use]
    pub const fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::GitNotInstalled
                | Self::GitCommand { .. }
                | Self::InvalidNoteList { .. }
                | Self::IssueNotFound { .. }
                | Self::NoteExists { .. }
        )
    }

    /// Missing or unusable identity, editor, or config.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingIdentity { .. }
                | Self::InvalidIdentity { .. }
                | Self::DumbTerminal
                | Self::EditorFailed { .. }
                | Self::Config(_)
                | Self::Yaml(_)
        )
    }

    /// The error came from a reader or pager that went away.
    #[must_use]
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::Io(err) if err.kind() == std::io::ErrorKind::BrokenPipe)
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::GitNotInstalled => Some("Install git and make sure it is on PATH"),
            Self::MissingIdentity { .. } => {
                Some("Run: git config user.name \"Name\" && git config user.email you@example.com")
            }
            Self::InvalidIdentity { .. } => {
                Some("Names and emails cannot contain '<', '>' or newlines")
            }
            Self::DumbTerminal => Some("Set EDITOR or pass the message with -m/-F"),
            Self::IssueNotFound { .. } => Some("Run 'git issue list' to see available issues"),
            Self::NoteExists { .. } => Some("Use 'git issue edit' to change an existing issue"),
            Self::Format(_) => Some("The issue note is malformed; inspect it with 'git notes show'"),
            _ => None,
        }
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create from multiple validation errors.
    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }
}

/// Result type using `IssueError`.
pub type Result<T> = std::result::Result<T, IssueError>;

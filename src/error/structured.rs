//! Structured error output.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging

use crate::error::{FormatError, IssueError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Resolution Errors (exit code 2) ===
    /// git could not be started
    GitNotInstalled,
    /// git command failed
    GitError,
    /// `git notes list` output was not understood
    NoteListError,
    /// Note already exists for the anchor
    NoteExists,

    // === Issue Errors (exit code 3) ===
    /// No issue note for the reference
    IssueNotFound,
    /// Note body could not be decoded
    FormatError,

    // === Validation Errors (exit code 4) ===
    /// Field validation failed
    ValidationFailed,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,
    /// Identity missing or unusable
    IdentityError,
    /// Editor missing or failed
    EditorError,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GitNotInstalled => "GIT_NOT_INSTALLED",
            Self::GitError => "GIT_ERROR",
            Self::NoteListError => "NOTE_LIST_ERROR",
            Self::NoteExists => "NOTE_EXISTS",
            Self::IssueNotFound => "ISSUE_NOT_FOUND",
            Self::FormatError => "FORMAT_ERROR",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IdentityError => "IDENTITY_ERROR",
            Self::EditorError => "EDITOR_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller might succeed by fixing input or setup and retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed | Self::IdentityError | Self::EditorError
        )
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 2: Note store (git) errors
    /// - 3: Issue errors
    /// - 4: Validation errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::GitNotInstalled | Self::GitError | Self::NoteListError | Self::NoteExists => 2,
            Self::IssueNotFound | Self::FormatError => 3,
            Self::ValidationFailed => 4,
            Self::ConfigError | Self::IdentityError | Self::EditorError => 7,
            Self::IoError | Self::JsonError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from an `IssueError`.
    #[must_use]
    pub fn from_error(err: &IssueError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);
        let hint = err.suggestion().map(str::to_string);

        Self {
            code,
            message: err.to_string(),
            hint,
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &IssueError) -> (ErrorCode, Option<Value>) {
        match err {
            IssueError::Format(format) => (ErrorCode::FormatError, Some(format_context(format))),
            IssueError::GitNotInstalled => (ErrorCode::GitNotInstalled, None),
            IssueError::GitCommand { args, message } => (
                ErrorCode::GitError,
                Some(json!({"args": args, "message": message})),
            ),
            IssueError::InvalidNoteList { line } => {
                (ErrorCode::NoteListError, Some(json!({"line": line})))
            }
            IssueError::IssueNotFound { reference } => (
                ErrorCode::IssueNotFound,
                Some(json!({"reference": reference})),
            ),
            IssueError::NoteExists { hash } => (ErrorCode::NoteExists, Some(json!({"hash": hash}))),
            IssueError::MissingIdentity { key } => {
                (ErrorCode::IdentityError, Some(json!({"key": key})))
            }
            IssueError::InvalidIdentity { field, value } => (
                ErrorCode::IdentityError,
                Some(json!({"field": field, "value": value})),
            ),
            IssueError::DumbTerminal => (ErrorCode::EditorError, None),
            IssueError::EditorFailed { editor, status } => (
                ErrorCode::EditorError,
                Some(json!({"editor": editor, "status": status})),
            ),
            IssueError::Config(_) | IssueError::Yaml(_) => (ErrorCode::ConfigError, None),
            IssueError::Validation { field, reason } => (
                ErrorCode::ValidationFailed,
                Some(json!({"field": field, "reason": reason})),
            ),
            IssueError::ValidationErrors { errors } => (
                ErrorCode::ValidationFailed,
                Some(json!({
                    "errors": errors.iter()
                        .map(|e| json!({"field": e.field, "message": e.message}))
                        .collect::<Vec<_>>()
                })),
            ),
            IssueError::Io(_) => (ErrorCode::IoError, None),
            IssueError::IoAt { path, .. } => (
                ErrorCode::IoError,
                Some(json!({"path": path.display().to_string()})),
            ),
            IssueError::Json(_) => (ErrorCode::JsonError, None),
            IssueError::Other(_) => (ErrorCode::InternalError, None),
        }
    }
}

fn format_context(err: &FormatError) -> Value {
    match err {
        FormatError::InvalidSignature { text } | FormatError::InvalidTimezone { text } => {
            json!({"text": text})
        }
        FormatError::UnknownHeader { line, text } => json!({"line": line, "text": text}),
        FormatError::EmptyHeaderValue { key, line } | FormatError::DuplicateHeader { key, line } => {
            json!({"key": key, "line": line})
        }
        FormatError::MissingHeader { key } => json!({"key": key}),
        FormatError::InvalidEncoding { offset } => json!({"offset": offset}),
        FormatError::MissingSeparator => json!({}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::IssueNotFound.as_str(), "ISSUE_NOT_FOUND");
        assert_eq!(ErrorCode::FormatError.as_str(), "FORMAT_ERROR");
        assert_eq!(ErrorCode::GitError.as_str(), "GIT_ERROR");
    }

    #[test]
    fn test_error_code_exit_codes() {
        assert_eq!(ErrorCode::GitError.exit_code(), 2);
        assert_eq!(ErrorCode::IssueNotFound.exit_code(), 3);
        assert_eq!(ErrorCode::FormatError.exit_code(), 3);
        assert_eq!(ErrorCode::ValidationFailed.exit_code(), 4);
        assert_eq!(ErrorCode::IdentityError.exit_code(), 7);
        assert_eq!(ErrorCode::IoError.exit_code(), 8);
        assert_eq!(ErrorCode::InternalError.exit_code(), 1);
    }

    #[test]
    fn test_from_format_error() {
        let err = IssueError::from(FormatError::UnknownHeader {
            line: 2,
            text: "foo bar".to_string(),
        });
        let structured = StructuredError::from_error(&err);
        assert_eq!(structured.code, ErrorCode::FormatError);
        assert!(!structured.retryable);
        let context = structured.context.expect("context");
        assert_eq!(context["line"], 2);
        assert_eq!(context["text"], "foo bar");
    }

    #[test]
    fn test_structured_error_to_json() {
        let err = IssueError::IssueNotFound {
            reference: "deadbeef".to_string(),
        };
        let json = StructuredError::from_error(&err).to_json();
        assert_eq!(json["error"]["code"], "ISSUE_NOT_FOUND");
        assert_eq!(json["error"]["context"]["reference"], "deadbeef");
        assert_eq!(
            json["error"]["hint"],
            "Run 'git issue list' to see available issues"
        );
    }

    #[test]
    fn test_identity_errors_are_retryable() {
        let err = IssueError::MissingIdentity { key: "user.email" };
        let structured = StructuredError::from_error(&err);
        assert_eq!(structured.code, ErrorCode::IdentityError);
        assert!(structured.retryable);
    }

    #[test]
    fn test_to_human_output() {
        let err = StructuredError {
            code: ErrorCode::IssueNotFound,
            message: "Issue not found: abc".to_string(),
            hint: Some("Run 'git issue list' to see available issues".to_string()),
            retryable: false,
            context: None,
        };

        let plain = err.to_human(false);
        assert!(plain.contains("Error: Issue not found: abc"));
        assert!(plain.contains("Hint: Run 'git issue list'"));

        let colored = err.to_human(true);
        assert!(colored.contains("\x1b[31m"));
        assert!(colored.contains("\x1b[33m"));
    }
}

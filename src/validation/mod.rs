//! Validation helpers for issues.
//!
//! Header values must survive a round trip through the note format: they
//! cannot be empty, span lines, or carry surrounding whitespace the decoder
//! would trim away.

use crate::error::ValidationError;
use crate::model::{Issue, Status};

/// Message size limit, matching what `git notes` handles comfortably.
const MAX_MESSAGE_BYTES: usize = 102_400;
const MAX_HEADER_VALUE_CHARS: usize = 200;

/// Validates issue fields before they are written.
pub struct IssueValidator;

impl IssueValidator {
    /// Validate an issue and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate(issue: &Issue) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if issue.hash.is_empty() {
            errors.push(ValidationError::new("hash", "cannot be empty"));
        } else if !issue.hash.chars().all(|c| c.is_ascii_hexdigit()) {
            errors.push(ValidationError::new("hash", "must be a hexadecimal object id"));
        }

        if let Err(err) = StatusValidator::validate(&issue.status) {
            errors.push(err);
        }
        for assignee in &issue.assignees {
            if let Err(err) = validate_header_value("assignee", assignee) {
                errors.push(err);
            }
        }
        for label in &issue.labels {
            if let Err(err) = LabelValidator::validate(label) {
                errors.push(err);
            }
        }

        if issue.message.trim().is_empty() {
            errors.push(ValidationError::new("message", "cannot be empty"));
        }
        if issue.message.len() > MAX_MESSAGE_BYTES {
            errors.push(ValidationError::new("message", "exceeds 100KB"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Validates a single label value.
pub struct LabelValidator;

impl LabelValidator {
    /// # Errors
    ///
    /// Returns a `ValidationError` if the label is invalid.
    pub fn validate(label: &str) -> Result<(), ValidationError> {
        validate_header_value("label", label)
    }
}

/// Validates a status value.
pub struct StatusValidator;

impl StatusValidator {
    /// # Errors
    ///
    /// Returns a `ValidationError` if a custom status cannot be stored or
    /// spells a built-in status, which would decode as that status.
    pub fn validate(status: &Status) -> Result<(), ValidationError> {
        match status {
            Status::Open | Status::Closed => Ok(()),
            Status::Custom(value) => {
                validate_header_value("status", value)?;
                if Status::from_header(value) == *status {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        "status",
                        format!("custom status '{value}' collides with a built-in status"),
                    ))
                }
            }
        }
    }
}

/// Check a value destined for a single header line.
///
/// # Errors
///
/// Returns a `ValidationError` naming `field` if the value is empty, spans
/// lines, has surrounding whitespace, or is too long.
pub fn validate_header_value(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "cannot be empty"));
    }
    if value.contains(['\n', '\r']) {
        return Err(ValidationError::new(field, "cannot contain line breaks"));
    }
    if value.trim() != value {
        return Err(ValidationError::new(
            field,
            "cannot start or end with whitespace",
        ));
    }
    if value.chars().count() > MAX_HEADER_VALUE_CHARS {
        return Err(ValidationError::new(field, "exceeds 200 characters"));
    }
    Ok(())
}

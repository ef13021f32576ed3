//! Author signatures.
//!
//! A signature is persisted as a single line:
//!
//! ```text
//! NAME <EMAIL> UNIX_SECONDS ±HHMM
//! ```
//!
//! The offset is kept as a fixed offset; zone names are never stored.

use crate::error::{FormatError, IssueError, Result};
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static SIGNATURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^<>\n]*) <(?P<email>[^<>\n]*)> (?P<unix>\d+) (?P<zone>\S+)$")
        .expect("signature pattern is valid")
});

/// Identity of an issue's author plus the moment the issue was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Name of the user.
    pub name: String,
    /// Email of the user.
    pub email: String,
    /// Time the signature was created, in the author's offset.
    pub when: DateTime<FixedOffset>,
}

impl Signature {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        when: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            when,
        }
    }

    /// Decode a signature header value.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidSignature`] if the text does not match
    /// `NAME <EMAIL> UNIX_SECONDS ±HHMM` or the seconds do not fit, and
    /// [`FormatError::InvalidTimezone`] for a malformed offset.
    pub fn decode(text: &str) -> std::result::Result<Self, FormatError> {
        let invalid = || FormatError::InvalidSignature {
            text: text.to_string(),
        };

        let captures = SIGNATURE_PATTERN.captures(text).ok_or_else(invalid)?;
        let unix: i64 = captures["unix"].parse().map_err(|_| invalid())?;
        let offset = parse_timezone(&captures["zone"])?;
        let when = offset.timestamp_opt(unix, 0).single().ok_or_else(invalid)?;

        Ok(Self {
            name: captures["name"].to_string(),
            email: captures["email"].to_string(),
            when,
        })
    }

    /// Encode as a signature header value.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.when.timestamp(),
            format_timezone(*self.when.offset())
        )
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Parse a `±HHMM` offset.
///
/// Minutes carry the sign of the whole offset, so `-0030` is thirty
/// minutes west of UTC.
///
/// # Errors
///
/// Returns [`FormatError::InvalidTimezone`] unless the text is a sign
/// followed by four digits, minutes are below 60, and the offset is
/// within a day.
pub fn parse_timezone(text: &str) -> std::result::Result<FixedOffset, FormatError> {
    let invalid = || FormatError::InvalidTimezone {
        text: text.to_string(),
    };

    if text.len() != 5 || !text.is_ascii() {
        return Err(invalid());
    }
    let sign = match text.as_bytes()[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(invalid()),
    };
    if !text[1..].bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = text[1..3].parse().map_err(|_| invalid())?;
    let minutes: i32 = text[3..].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Format an offset as `±HHMM`.
#[must_use]
pub fn format_timezone(offset: FixedOffset) -> String {
    let total = offset.local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let total = total.unsigned_abs();
    format!("{sign}{:02}{:02}", total / 3600, (total % 3600) / 60)
}

/// The configured name and email used to sign new issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    /// Build an identity, rejecting values that would break the signature line.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::InvalidIdentity`] if either value is empty or
    /// contains `<`, `>`, or a line break.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();
        check_identity_field("name", &name)?;
        check_identity_field("email", &email)?;
        Ok(Self { name, email })
    }

    /// Sign at the given instant.
    #[must_use]
    pub fn sign(&self, when: DateTime<FixedOffset>) -> Signature {
        Signature::new(self.name.clone(), self.email.clone(), when)
    }

    /// Sign at the current local time, truncated to whole seconds.
    #[must_use]
    pub fn sign_now(&self) -> Signature {
        let now = Local::now().fixed_offset();
        let when = now
            .offset()
            .timestamp_opt(now.timestamp(), 0)
            .single()
            .unwrap_or(now);
        self.sign(when)
    }
}

fn check_identity_field(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() || value.contains(['<', '>', '\n', '\r']) {
        return Err(IssueError::InvalidIdentity {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

//! Lead Identifier Value Object
//!
//! Timestamp-derived, prefixed identifier assigned once to every new draft.

use chrono::{DateTime, TimeZone};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Prefix used when the host does not configure one
pub const DEFAULT_LEAD_PREFIX: &str = "LEAD";

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn matches_pattern(value: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Z-]+-\d{14}$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

/// Trim and upper-case a prefix; `None` unless the result is non-empty and
/// made only of `A-Z` and `-`
pub fn normalize_prefix(raw: &str) -> Option<String> {
    let prefix = raw.trim().to_uppercase();
    let valid = !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_uppercase() || c == '-');
    valid.then_some(prefix)
}

/// Lead identifier of the form `PREFIX-YYYYMMDDHHmmss`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(String);

impl LeadId {
    /// Generate an identifier from the wall-clock components of `now`.
    ///
    /// The prefix goes through [`normalize_prefix`]; one it rejects is
    /// replaced by [`DEFAULT_LEAD_PREFIX`]. The timestamp keeps the time zone
    /// `now` was taken in, so `Local::now()` yields local time.
    pub fn generate<Tz>(prefix: &str, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let prefix = normalize_prefix(prefix).unwrap_or_else(|| {
            tracing::warn!("Invalid lead id prefix {:?}, using {}", prefix, DEFAULT_LEAD_PREFIX);
            DEFAULT_LEAD_PREFIX.to_string()
        });
        Self(format!("{}-{}", prefix, now.format(TIMESTAMP_FORMAT)))
    }

    /// Parse an existing identifier, rejecting anything the generator
    /// could not have produced
    pub fn parse(value: impl Into<String>) -> Result<Self, LeadIdError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(LeadIdError::Empty);
        }
        if !matches_pattern(&value) {
            return Err(LeadIdError::InvalidFormat(value));
        }
        Ok(Self(value))
    }

    /// Wrap a raw value without checking it (deserialized or legacy ids)
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier matches `^[A-Z-]+-\d{14}$`
    pub fn is_well_formed(&self) -> bool {
        matches_pattern(&self.0)
    }

    /// Prefix part (everything before the timestamp)
    pub fn prefix(&self) -> Option<&str> {
        self.0.rsplit_once('-').map(|(prefix, _)| prefix)
    }

    /// Timestamp part (`YYYYMMDDHHmmss`)
    pub fn timestamp(&self) -> Option<&str> {
        self.0.rsplit_once('-').map(|(_, ts)| ts)
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LeadId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadIdError {
    #[error("Lead id cannot be empty")]
    Empty,

    #[error("Invalid lead id format: {0}")]
    InvalidFormat(String),
}

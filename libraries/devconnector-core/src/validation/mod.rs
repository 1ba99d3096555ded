//! Input validation
//!
//! Every validator is a pure function over the raw submitted fields. It never
//! fails; it returns a [`Validation`] holding a field → message map and an
//! `is_valid` flag, so callers can hand the map straight back to the client.

mod entries;
mod github;
mod post;
mod profile;
mod users;

pub use entries::{validate_education, validate_experience, EducationInput, ExperienceInput};
pub use github::{validate_repo_query, REPO_SORTS};
pub use post::{validate_post, PostInput, MAX_POST_LENGTH};
pub use profile::{validate_profile, ProfileInput};
pub use users::{validate_login, validate_register, LoginInput, RegisterInput};

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

static EMAIL_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Field name → human readable message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map with a single entry
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error; the first message for a field wins
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Outcome of running a validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub errors: ValidationErrors,
    pub is_valid: bool,
}

impl Validation {
    fn from_errors(errors: ValidationErrors) -> Self {
        let is_valid = errors.is_empty();
        Self { errors, is_valid }
    }

    /// `Ok(())` when valid, otherwise the error map
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Missing, empty or whitespace-only
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Character count (not bytes) of the trimmed value is within `min..=max`
pub(crate) fn length_within(value: &str, min: usize, max: usize) -> bool {
    let len = value.trim().chars().count();
    (min..=max).contains(&len)
}

pub(crate) fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value.trim())
}

/// Accepts URLs with or without a scheme, as long as they have a dotted host
pub(crate) fn is_url(value: &str) -> bool {
    let candidate = crate::types::with_https(value);
    match url::Url::parse(&candidate) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed
                    .host_str()
                    .is_some_and(|host| host.contains('.') && !host.ends_with('.'))
        }
        Err(_) => false,
    }
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Trimmed value, `None` when blank
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

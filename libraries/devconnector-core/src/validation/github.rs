//! GitHub repository lookup parameters
//!
//! Both values end up in an upstream URL, so anything GitHub itself would
//! never accept is rejected before a request is made.

use super::{Validation, ValidationErrors};
use once_cell::sync::Lazy;

/// Orderings the GitHub repository listing understands
pub const REPO_SORTS: [&str; 4] = ["created", "updated", "pushed", "full_name"];

/// GitHub logins: alphanumerics and single inner hyphens, at most 39 characters
static GITHUB_LOGIN_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9]){0,38}$")
        .expect("GitHub login pattern is a valid regex")
});

pub fn validate_repo_query(username: &str, sort: &str) -> Validation {
    let mut errors = ValidationErrors::new();

    if username.chars().count() > 39 || !GITHUB_LOGIN_REGEX.is_match(username) {
        errors.add("username", "Not a valid GitHub username");
    }

    if !REPO_SORTS.contains(&sort) {
        errors.add(
            "sort",
            format!("Sort must be one of {}", REPO_SORTS.join(", ")),
        );
    }

    Validation::from_errors(errors)
}

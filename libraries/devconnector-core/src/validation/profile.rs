//! Profile create/update validator

use super::{is_blank, is_url, length_within, Validation, ValidationErrors};
use serde::Deserialize;

/// Submitted profile form; `skills` is a comma separated list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub handle: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub skills: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
    pub github: Option<String>,
}

pub fn validate_profile(input: &ProfileInput) -> Validation {
    let mut errors = ValidationErrors::new();

    match input.handle.as_deref() {
        handle if is_blank(handle) => errors.add("handle", "Profile handle is required"),
        Some(handle) if !length_within(handle, 2, 40) => {
            errors.add("handle", "Handle needs to be between 2 and 40 characters");
        }
        _ => {}
    }

    if is_blank(input.status.as_deref()) {
        errors.add("status", "Status field is required");
    }

    if is_blank(input.skills.as_deref()) {
        errors.add("skills", "Skills field is required");
    }

    let links = [
        ("website", &input.website),
        ("youtube", &input.youtube),
        ("twitter", &input.twitter),
        ("facebook", &input.facebook),
        ("linkedin", &input.linkedin),
        ("instagram", &input.instagram),
        ("github", &input.github),
    ];
    for (field, value) in links {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            if !is_url(value) {
                errors.add(field, "Not a valid URL");
            }
        }
    }

    Validation::from_errors(errors)
}

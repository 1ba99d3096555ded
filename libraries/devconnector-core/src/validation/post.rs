//! Post and comment text validator

use super::{is_blank, Validation, ValidationErrors};
use serde::Deserialize;

/// Longest accepted post or comment, in characters
pub const MAX_POST_LENGTH: usize = 300;

/// Submitted post or comment body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostInput {
    pub text: Option<String>,
}

pub fn validate_post(input: &PostInput) -> Validation {
    let mut errors = ValidationErrors::new();

    match input.text.as_deref() {
        text if is_blank(text) => errors.add("text", "Text field is required"),
        Some(text) if text.trim().chars().count() > MAX_POST_LENGTH => {
            errors.add(
                "text",
                format!("Post must be at most {MAX_POST_LENGTH} characters"),
            );
        }
        _ => {}
    }

    Validation::from_errors(errors)
}

impl PostInput {
    /// Validated, trimmed text
    pub fn into_text(self) -> Result<String, ValidationErrors> {
        validate_post(&self).into_result()?;
        Ok(self.text.unwrap_or_default().trim().to_string())
    }
}

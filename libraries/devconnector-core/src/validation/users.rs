//! Registration and login validators

use super::{is_blank, is_email, length_within, Validation, ValidationErrors};
use serde::Deserialize;

/// Submitted registration form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Confirmation; checked only when the client sends it
    pub password2: Option<String>,
}

/// Submitted login form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub fn validate_register(input: &RegisterInput) -> Validation {
    let mut errors = ValidationErrors::new();

    match input.name.as_deref() {
        name if is_blank(name) => errors.add("name", "Name field is required"),
        Some(name) if !length_within(name, 2, 30) => {
            errors.add("name", "Name must be between 2 and 30 characters");
        }
        _ => {}
    }

    check_email(input.email.as_deref(), &mut errors);

    match input.password.as_deref() {
        password if is_blank(password) => errors.add("password", "Password field is required"),
        Some(password) if !(6..=30).contains(&password.chars().count()) => {
            errors.add("password", "Password must be between 6 and 30 characters");
        }
        _ => {}
    }

    if let Some(confirm) = input.password2.as_deref() {
        if confirm.trim().is_empty() {
            errors.add("password2", "Confirm password field is required");
        } else if input.password.as_deref() != Some(confirm) {
            errors.add("password2", "Passwords must match");
        }
    }

    Validation::from_errors(errors)
}

pub fn validate_login(input: &LoginInput) -> Validation {
    let mut errors = ValidationErrors::new();

    check_email(input.email.as_deref(), &mut errors);

    if is_blank(input.password.as_deref()) {
        errors.add("password", "Password field is required");
    }

    Validation::from_errors(errors)
}

fn check_email(email: Option<&str>, errors: &mut ValidationErrors) {
    match email {
        email if is_blank(email) => errors.add("email", "Email field is required"),
        Some(email) if !is_email(email) => errors.add("email", "Email is invalid"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            password2: None,
        }
    }

    #[test]
    fn valid_registration() {
        let validation = validate_register(&register("Ada", "a@x.com", "secret12"));
        assert!(validation.is_valid);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn empty_registration_reports_every_field() {
        let validation = validate_register(&RegisterInput::default());
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.get("name"), Some("Name field is required"));
        assert_eq!(validation.errors.get("email"), Some("Email field is required"));
        assert_eq!(
            validation.errors.get("password"),
            Some("Password field is required")
        );
        assert!(!validation.errors.contains("password2"));
    }

    #[test]
    fn whitespace_name_is_missing() {
        let validation = validate_register(&register("   ", "a@x.com", "secret12"));
        assert_eq!(validation.errors.get("name"), Some("Name field is required"));
    }

    #[test]
    fn short_password_and_bad_email() {
        let validation = validate_register(&register("Ada", "ada-at-x", "abc"));
        assert_eq!(validation.errors.get("email"), Some("Email is invalid"));
        assert_eq!(
            validation.errors.get("password"),
            Some("Password must be between 6 and 30 characters")
        );
    }

    #[test]
    fn mismatched_confirmation() {
        let mut input = register("Ada", "a@x.com", "secret12");
        input.password2 = Some("secret13".into());
        let validation = validate_register(&input);
        assert_eq!(validation.errors.get("password2"), Some("Passwords must match"));
    }

    #[test]
    fn login_requires_both_fields() {
        let validation = validate_login(&LoginInput {
            email: Some("a@x.com".into()),
            password: Some(" ".into()),
        });
        assert!(!validation.is_valid);
        assert!(validation.errors.contains("password"));
        assert!(!validation.errors.contains("email"));
    }
}

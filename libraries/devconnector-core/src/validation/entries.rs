//! Experience and education validators
//!
//! Both entry kinds share the same date rules: `from` is required, `to` is
//! optional, and `to` is discarded when the entry is marked `current`.

use super::{is_blank, non_blank, parse_date, Validation, ValidationErrors};
use crate::types::{NewEducation, NewExperience};
use chrono::NaiveDate;
use serde::Deserialize;

/// Submitted experience form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExperienceInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

/// Submitted education form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EducationInput {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub fieldofstudy: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

pub fn validate_experience(input: &ExperienceInput) -> Validation {
    let mut errors = ValidationErrors::new();

    if is_blank(input.title.as_deref()) {
        errors.add("title", "Job title field is required");
    }
    if is_blank(input.company.as_deref()) {
        errors.add("company", "Company field is required");
    }
    check_dates(
        input.from.as_deref(),
        input.to.as_deref(),
        input.current.unwrap_or(false),
        &mut errors,
    );

    Validation::from_errors(errors)
}

pub fn validate_education(input: &EducationInput) -> Validation {
    let mut errors = ValidationErrors::new();

    if is_blank(input.school.as_deref()) {
        errors.add("school", "School field is required");
    }
    if is_blank(input.degree.as_deref()) {
        errors.add("degree", "Degree field is required");
    }
    if is_blank(input.fieldofstudy.as_deref()) {
        errors.add("fieldofstudy", "Field of study field is required");
    }
    check_dates(
        input.from.as_deref(),
        input.to.as_deref(),
        input.current.unwrap_or(false),
        &mut errors,
    );

    Validation::from_errors(errors)
}

fn check_dates(from: Option<&str>, to: Option<&str>, current: bool, errors: &mut ValidationErrors) {
    let from_date = match from {
        from if is_blank(from) => {
            errors.add("from", "From date field is required");
            None
        }
        Some(from) => {
            let parsed = parse_date(from);
            if parsed.is_none() {
                errors.add("from", "From date is invalid");
            }
            parsed
        }
        None => None,
    };

    if current {
        return;
    }

    if let Some(to) = to.filter(|t| !t.trim().is_empty()) {
        match (parse_date(to), from_date) {
            (None, _) => errors.add("to", "To date is invalid"),
            (Some(to), Some(from)) if to < from => {
                errors.add("to", "To date must not be before the from date");
            }
            _ => {}
        }
    }
}

/// Resolve the validated date pair, dropping `to` for current entries
fn resolve_dates(
    from: Option<&str>,
    to: Option<&str>,
    current: bool,
) -> Result<(NaiveDate, Option<NaiveDate>), ValidationErrors> {
    let from = from
        .and_then(parse_date)
        .ok_or_else(|| ValidationErrors::single("from", "From date is invalid"))?;
    let to = if current { None } else { to.and_then(parse_date) };
    Ok((from, to))
}

impl ExperienceInput {
    /// Validate and convert into an entry ready for storage
    pub fn into_new(self) -> Result<NewExperience, ValidationErrors> {
        validate_experience(&self).into_result()?;

        let current = self.current.unwrap_or(false);
        let (from, to) = resolve_dates(self.from.as_deref(), self.to.as_deref(), current)?;

        Ok(NewExperience {
            title: non_blank(self.title).unwrap_or_default(),
            company: non_blank(self.company).unwrap_or_default(),
            location: non_blank(self.location),
            from,
            to,
            current,
            description: non_blank(self.description),
        })
    }
}

impl EducationInput {
    /// Validate and convert into an entry ready for storage
    pub fn into_new(self) -> Result<NewEducation, ValidationErrors> {
        validate_education(&self).into_result()?;

        let current = self.current.unwrap_or(false);
        let (from, to) = resolve_dates(self.from.as_deref(), self.to.as_deref(), current)?;

        Ok(NewEducation {
            school: non_blank(self.school).unwrap_or_default(),
            degree: non_blank(self.degree).unwrap_or_default(),
            fieldofstudy: non_blank(self.fieldofstudy).unwrap_or_default(),
            from,
            to,
            current,
            description: non_blank(self.description),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experience() -> ExperienceInput {
        ExperienceInput {
            title: Some("Engineer".into()),
            company: Some("Acme".into()),
            from: Some("2019-03-01".into()),
            to: Some("2021-06-30".into()),
            ..ExperienceInput::default()
        }
    }

    #[test]
    fn valid_experience_converts() {
        let entry = experience().into_new().unwrap();
        assert_eq!(entry.title, "Engineer");
        assert_eq!(entry.from, NaiveDate::from_ymd_opt(2019, 3, 1).unwrap());
        assert_eq!(entry.to, NaiveDate::from_ymd_opt(2021, 6, 30));
        assert!(!entry.current);
    }

    #[test]
    fn current_entry_drops_end_date() {
        let mut input = experience();
        input.current = Some(true);
        input.to = Some("garbage".into());
        assert!(validate_experience(&input).is_valid);
        assert_eq!(input.into_new().unwrap().to, None);
    }

    #[test]
    fn experience_required_fields() {
        let validation = validate_experience(&ExperienceInput::default());
        assert_eq!(validation.errors.get("title"), Some("Job title field is required"));
        assert_eq!(validation.errors.get("company"), Some("Company field is required"));
        assert_eq!(validation.errors.get("from"), Some("From date field is required"));
    }

    #[test]
    fn bad_dates() {
        let mut input = experience();
        input.from = Some("yesterday".into());
        assert_eq!(
            validate_experience(&input).errors.get("from"),
            Some("From date is invalid")
        );

        let mut input = experience();
        input.to = Some("2010-01-01".into());
        assert!(validate_experience(&input).errors.contains("to"));
    }

    #[test]
    fn education_required_fields() {
        let validation = validate_education(&EducationInput {
            school: Some("MIT".into()),
            ..EducationInput::default()
        });
        assert!(!validation.is_valid);
        assert!(!validation.errors.contains("school"));
        assert!(validation.errors.contains("degree"));
        assert!(validation.errors.contains("fieldofstudy"));
        assert!(validation.errors.contains("from"));
    }

    #[test]
    fn invalid_education_is_rejected_on_conversion() {
        let errors = EducationInput::default().into_new().unwrap_err();
        assert!(errors.contains("school"));
    }
}

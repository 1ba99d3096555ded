/// Profile domain types
use super::ids::{EntryId, ProfileId};
use super::user::UserSummary;
use crate::validation::ProfileInput;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Developer profile, one per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,

    /// Owning user's public fields
    pub user: UserSummary,

    /// Unique public identifier used in profile URLs
    pub handle: String,

    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,

    /// Professional status ("Developer", "Student", ...)
    pub status: String,

    /// Skills in the order they were entered
    pub skills: Vec<String>,

    pub bio: Option<String>,
    pub githubusername: Option<String>,

    pub social: Social,

    /// Most recent first
    pub experience: Vec<Experience>,

    /// Most recent first
    pub education: Vec<Education>,

    pub date: DateTime<Utc>,
}

/// Social network links; every URL carries a scheme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
    pub github: Option<String>,
}

/// Work history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: EntryId,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// Experience entry before it has been stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExperience {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// Schooling entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub id: EntryId,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// Education entry before it has been stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEducation {
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// Partial profile update: `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub handle: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub skills: Option<Vec<String>>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub social: Social,
}

impl ProfilePatch {
    /// Build a patch from submitted fields, dropping blank ones
    pub fn from_input(input: &ProfileInput) -> Self {
        Self {
            handle: present(input.handle.as_deref()),
            company: present(input.company.as_deref()),
            website: present(input.website.as_deref()),
            location: present(input.location.as_deref()),
            status: present(input.status.as_deref()),
            skills: input.skills.as_deref().map(split_skills),
            bio: present(input.bio.as_deref()),
            githubusername: present(input.githubusername.as_deref()),
            social: Social {
                youtube: present(input.youtube.as_deref()).map(|u| with_https(&u)),
                twitter: present(input.twitter.as_deref()).map(|u| with_https(&u)),
                facebook: present(input.facebook.as_deref()).map(|u| with_https(&u)),
                linkedin: present(input.linkedin.as_deref()).map(|u| with_https(&u)),
                instagram: present(input.instagram.as_deref()).map(|u| with_https(&u)),
                github: present(input.github.as_deref()).map(|u| with_https(&u)),
            },
        }
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Split a comma separated skills string, keeping entry order
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Prepend `https://` to a URL that has no scheme
pub fn with_https(url: &str) -> String {
    let url = url.trim();
    if url.contains("://") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        format!("https://{}", url)
    }
}

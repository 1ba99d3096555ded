//! Profiles with their experience and education entries

use crate::{is_foreign_key_violation, is_unique_violation};
use chrono::Utc;
use devconnector_core::{
    error::Result,
    types::{
        Education, EntryId, Experience, NewEducation, NewExperience, Profile, ProfileId,
        ProfilePatch, Social, UserId, UserSummary,
    },
    validation::ValidationErrors,
    CoreError,
};
use sqlx::{sqlite::SqliteRow, Row, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;

const PROFILE_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.handle, p.company, p.website, p.location, p.status,
           p.skills, p.bio, p.githubusername, p.youtube, p.twitter, p.facebook,
           p.linkedin, p.instagram, p.github, p.created_at,
           u.name AS user_name, u.avatar AS user_avatar
    FROM profiles p
    INNER JOIN users u ON u.id = p.user_id
"#;

const HANDLE_TAKEN: &str = "That handle already exists";

fn profile_from_row(row: &SqliteRow) -> Result<Profile> {
    let skills: String = row.try_get("skills")?;

    Ok(Profile {
        id: row.try_get("id")?,
        user: UserSummary {
            id: row.try_get("user_id")?,
            name: row.try_get("user_name")?,
            avatar: row.try_get("user_avatar")?,
        },
        handle: row.try_get("handle")?,
        company: row.try_get("company")?,
        website: row.try_get("website")?,
        location: row.try_get("location")?,
        status: row.try_get("status")?,
        skills: serde_json::from_str(&skills)?,
        bio: row.try_get("bio")?,
        githubusername: row.try_get("githubusername")?,
        social: Social {
            youtube: row.try_get("youtube")?,
            twitter: row.try_get("twitter")?,
            facebook: row.try_get("facebook")?,
            linkedin: row.try_get("linkedin")?,
            instagram: row.try_get("instagram")?,
            github: row.try_get("github")?,
        },
        experience: Vec::new(),
        education: Vec::new(),
        date: row.try_get("created_at")?,
    })
}

fn experience_from_row(row: &SqliteRow) -> Result<Experience> {
    Ok(Experience {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        company: row.try_get("company")?,
        location: row.try_get("location")?,
        from: row.try_get("from_date")?,
        to: row.try_get("to_date")?,
        current: row.try_get::<i64, _>("current")? != 0,
        description: row.try_get("description")?,
    })
}

fn education_from_row(row: &SqliteRow) -> Result<Education> {
    Ok(Education {
        id: row.try_get("id")?,
        school: row.try_get("school")?,
        degree: row.try_get("degree")?,
        fieldofstudy: row.try_get("fieldofstudy")?,
        from: row.try_get("from_date")?,
        to: row.try_get("to_date")?,
        current: row.try_get::<i64, _>("current")? != 0,
        description: row.try_get("description")?,
    })
}

/// Fill in experience and education, most recent first
///
/// With `only` set, entries are loaded for that single profile; otherwise all
/// entries are loaded once and grouped.
async fn attach_entries(
    pool: &SqlitePool,
    profiles: &mut [Profile],
    only: Option<&ProfileId>,
) -> Result<()> {
    let experience_rows = sqlx::query(
        r#"
        SELECT id, profile_id, title, company, location, from_date, to_date, current, description
        FROM experience
        WHERE (?1 IS NULL OR profile_id = ?1)
        ORDER BY seq DESC
        "#,
    )
    .bind(only)
    .fetch_all(pool)
    .await?;

    let education_rows = sqlx::query(
        r#"
        SELECT id, profile_id, school, degree, fieldofstudy, from_date, to_date, current,
               description
        FROM education
        WHERE (?1 IS NULL OR profile_id = ?1)
        ORDER BY seq DESC
        "#,
    )
    .bind(only)
    .fetch_all(pool)
    .await?;

    let mut experience: HashMap<ProfileId, Vec<Experience>> = HashMap::new();
    for row in &experience_rows {
        let profile_id: ProfileId = row.try_get("profile_id")?;
        experience
            .entry(profile_id)
            .or_default()
            .push(experience_from_row(row)?);
    }

    let mut education: HashMap<ProfileId, Vec<Education>> = HashMap::new();
    for row in &education_rows {
        let profile_id: ProfileId = row.try_get("profile_id")?;
        education
            .entry(profile_id)
            .or_default()
            .push(education_from_row(row)?);
    }

    for profile in profiles.iter_mut() {
        profile.experience = experience.remove(&profile.id).unwrap_or_default();
        profile.education = education.remove(&profile.id).unwrap_or_default();
    }

    Ok(())
}

async fn fetch_one(pool: &SqlitePool, row: Option<SqliteRow>) -> Result<Option<Profile>> {
    let Some(row) = row else {
        return Ok(None);
    };

    let mut profile = profile_from_row(&row)?;
    let id = profile.id.clone();
    attach_entries(pool, std::slice::from_mut(&mut profile), Some(&id)).await?;
    Ok(Some(profile))
}

/// Get the profile owned by a user
pub async fn get_by_user(pool: &SqlitePool, user_id: &UserId) -> Result<Option<Profile>> {
    let row = sqlx::query(&format!("{PROFILE_SELECT} WHERE p.user_id = ?"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    fetch_one(pool, row).await
}

/// Get a profile by handle
pub async fn get_by_handle(pool: &SqlitePool, handle: &str) -> Result<Option<Profile>> {
    let row = sqlx::query(&format!("{PROFILE_SELECT} WHERE p.handle = ?"))
        .bind(handle.trim())
        .fetch_optional(pool)
        .await?;

    fetch_one(pool, row).await
}

/// Get all profiles, oldest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Profile>> {
    let rows = sqlx::query(&format!("{PROFILE_SELECT} ORDER BY p.created_at, p.rowid"))
        .fetch_all(pool)
        .await?;

    let mut profiles = rows
        .iter()
        .map(profile_from_row)
        .collect::<Result<Vec<_>>>()?;
    attach_entries(pool, &mut profiles, None).await?;
    Ok(profiles)
}

/// Create the user's profile, or merge `patch` onto the existing one
///
/// Only fields present in the patch are written. A handle held by another
/// user's profile is rejected before anything changes.
pub async fn upsert(pool: &SqlitePool, user_id: &UserId, patch: ProfilePatch) -> Result<Profile> {
    let skills = patch
        .skills
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let mut tx = pool.begin().await?;

    // Writing first takes the database write lock for the rest of the
    // transaction, so the handle check below cannot race another upsert.
    let updated = sqlx::query(
        r#"
        UPDATE profiles SET
            handle = COALESCE(?, handle),
            company = COALESCE(?, company),
            website = COALESCE(?, website),
            location = COALESCE(?, location),
            status = COALESCE(?, status),
            skills = COALESCE(?, skills),
            bio = COALESCE(?, bio),
            githubusername = COALESCE(?, githubusername),
            youtube = COALESCE(?, youtube),
            twitter = COALESCE(?, twitter),
            facebook = COALESCE(?, facebook),
            linkedin = COALESCE(?, linkedin),
            instagram = COALESCE(?, instagram),
            github = COALESCE(?, github)
        WHERE user_id = ?
        "#,
    )
    .bind(&patch.handle)
    .bind(&patch.company)
    .bind(&patch.website)
    .bind(&patch.location)
    .bind(&patch.status)
    .bind(&skills)
    .bind(&patch.bio)
    .bind(&patch.githubusername)
    .bind(&patch.social.youtube)
    .bind(&patch.social.twitter)
    .bind(&patch.social.facebook)
    .bind(&patch.social.linkedin)
    .bind(&patch.social.instagram)
    .bind(&patch.social.github)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(handle_conflict)?
    .rows_affected();

    if updated == 0 {
        insert_profile(&mut tx, user_id, &patch, skills).await?;
    }

    tx.commit().await?;

    get_by_user(pool, user_id)
        .await?
        .ok_or_else(|| CoreError::storage("Failed to retrieve saved profile"))
}

async fn insert_profile(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: &UserId,
    patch: &ProfilePatch,
    skills: Option<String>,
) -> Result<()> {
    let mut missing = ValidationErrors::new();
    if patch.handle.is_none() {
        missing.add("handle", "Profile handle is required");
    }
    if patch.status.is_none() {
        missing.add("status", "Status field is required");
    }
    if !missing.is_empty() {
        return Err(CoreError::Validation(missing));
    }

    let taken = sqlx::query("SELECT 1 FROM profiles WHERE handle = ?")
        .bind(&patch.handle)
        .fetch_optional(&mut **tx)
        .await?
        .is_some();
    if taken {
        return Err(CoreError::duplicate("handle", HANDLE_TAKEN));
    }

    sqlx::query(
        r#"
        INSERT INTO profiles (
            id, user_id, handle, company, website, location, status, skills, bio,
            githubusername, youtube, twitter, facebook, linkedin, instagram, github, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, COALESCE(?, '[]'), ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(ProfileId::generate())
    .bind(user_id)
    .bind(&patch.handle)
    .bind(&patch.company)
    .bind(&patch.website)
    .bind(&patch.location)
    .bind(&patch.status)
    .bind(skills)
    .bind(&patch.bio)
    .bind(&patch.githubusername)
    .bind(&patch.social.youtube)
    .bind(&patch.social.twitter)
    .bind(&patch.social.facebook)
    .bind(&patch.social.linkedin)
    .bind(&patch.social.instagram)
    .bind(&patch.social.github)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        // The owning account was deleted after the caller's token was issued
        if is_foreign_key_violation(&e) {
            CoreError::not_found("user", user_id.as_str())
        } else {
            handle_conflict(e)
        }
    })?;

    Ok(())
}

fn handle_conflict(err: sqlx::Error) -> CoreError {
    if is_unique_violation(&err, "profiles.handle") {
        CoreError::duplicate("handle", HANDLE_TAKEN)
    } else {
        CoreError::from(err)
    }
}

/// Which entry list an operation targets
#[derive(Debug, Clone, Copy)]
enum EntryKind {
    Experience,
    Education,
}

impl EntryKind {
    fn table(self) -> &'static str {
        match self {
            EntryKind::Experience => "experience",
            EntryKind::Education => "education",
        }
    }
}

/// Add an experience entry to the user's profile
pub async fn add_experience(
    pool: &SqlitePool,
    user_id: &UserId,
    entry: NewExperience,
) -> Result<Profile> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO experience (
            id, profile_id, title, company, location, from_date, to_date, current, description
        )
        SELECT ?, p.id, ?, ?, ?, ?, ?, ?, ?
        FROM profiles p
        WHERE p.user_id = ?
        "#,
    )
    .bind(EntryId::generate())
    .bind(&entry.title)
    .bind(&entry.company)
    .bind(&entry.location)
    .bind(entry.from)
    .bind(entry.to)
    .bind(entry.current)
    .bind(&entry.description)
    .bind(user_id)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted == 0 {
        return Err(CoreError::not_found("profile", user_id.as_str()));
    }

    fetch_owned(pool, user_id).await
}

/// Add an education entry to the user's profile
pub async fn add_education(
    pool: &SqlitePool,
    user_id: &UserId,
    entry: NewEducation,
) -> Result<Profile> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO education (
            id, profile_id, school, degree, fieldofstudy, from_date, to_date, current, description
        )
        SELECT ?, p.id, ?, ?, ?, ?, ?, ?, ?
        FROM profiles p
        WHERE p.user_id = ?
        "#,
    )
    .bind(EntryId::generate())
    .bind(&entry.school)
    .bind(&entry.degree)
    .bind(&entry.fieldofstudy)
    .bind(entry.from)
    .bind(entry.to)
    .bind(entry.current)
    .bind(&entry.description)
    .bind(user_id)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted == 0 {
        return Err(CoreError::not_found("profile", user_id.as_str()));
    }

    fetch_owned(pool, user_id).await
}

/// Remove an experience entry from the user's profile
pub async fn remove_experience(
    pool: &SqlitePool,
    user_id: &UserId,
    entry_id: &EntryId,
) -> Result<Profile> {
    remove_entry(pool, user_id, entry_id, EntryKind::Experience).await
}

/// Remove an education entry from the user's profile
pub async fn remove_education(
    pool: &SqlitePool,
    user_id: &UserId,
    entry_id: &EntryId,
) -> Result<Profile> {
    remove_entry(pool, user_id, entry_id, EntryKind::Education).await
}

async fn remove_entry(
    pool: &SqlitePool,
    user_id: &UserId,
    entry_id: &EntryId,
    kind: EntryKind,
) -> Result<Profile> {
    let table = kind.table();
    let removed = sqlx::query(&format!(
        "DELETE FROM {table}
         WHERE id = ? AND profile_id = (SELECT id FROM profiles WHERE user_id = ?)"
    ))
    .bind(entry_id)
    .bind(user_id)
    .execute(pool)
    .await?
    .rows_affected();

    let profile = fetch_owned(pool, user_id).await?;

    if removed == 0 {
        return Err(CoreError::not_found(table, entry_id.as_str()));
    }

    Ok(profile)
}

/// The user's profile, or `NotFound("profile")`
async fn fetch_owned(pool: &SqlitePool, user_id: &UserId) -> Result<Profile> {
    get_by_user(pool, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("profile", user_id.as_str()))
}

/// Profile API routes
use crate::{
    extract::{ApiJson, ApiPath},
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use devconnector_core::{
    validation::{validate_profile, EducationInput, ExperienceInput, ProfileInput},
    EntryId, Profile, ProfilePatch, StorageContext, UserId,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// GET /api/profile/test
pub async fn test() -> Json<Value> {
    Json(json!({ "msg": "Profile Works" }))
}

/// GET /api/profile
pub async fn current(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Profile>> {
    app_state
        .db
        .get_profile_by_user(user.user_id())
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::missing("profile"))
}

/// GET /api/profile/all
pub async fn list_profiles(State(app_state): State<AppState>) -> Result<Json<Vec<Profile>>> {
    let profiles = app_state.db.get_all_profiles().await?;
    Ok(Json(profiles))
}

/// GET /api/profile/handle/:handle
pub async fn by_handle(
    State(app_state): State<AppState>,
    ApiPath(handle): ApiPath<String>,
) -> Result<Json<Profile>> {
    app_state
        .db
        .get_profile_by_handle(&handle)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::missing("profile"))
}

/// GET /api/profile/user/:user_id
pub async fn by_user(
    State(app_state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<Json<Profile>> {
    app_state
        .db
        .get_profile_by_user(&UserId::new(user_id))
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::missing("profile"))
}

/// POST /api/profile
///
/// Creates the caller's profile, or updates it with the fields sent.
pub async fn upsert_profile(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(req): ApiJson<ProfileInput>,
) -> Result<Json<Profile>> {
    validate_profile(&req).into_result()?;

    let profile = app_state
        .db
        .upsert_profile(user.user_id(), ProfilePatch::from_input(&req))
        .await?;

    tracing::info!(user_id = %user.user_id(), handle = %profile.handle, "Profile saved");

    Ok(Json(profile))
}

/// DELETE /api/profile
///
/// Deletes the caller's profile and account. Their posts remain.
pub async fn delete_account(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>> {
    app_state.db.delete_account(user.user_id()).await?;

    tracing::info!(user_id = %user.user_id(), "Account deleted");

    Ok(Json(json!({ "success": true })))
}

/// POST /api/profile/experience
pub async fn add_experience(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(req): ApiJson<ExperienceInput>,
) -> Result<Json<Profile>> {
    let entry = req.into_new()?;
    let profile = app_state.db.add_experience(user.user_id(), entry).await?;
    Ok(Json(profile))
}

/// DELETE /api/profile/experience/:exp_id
pub async fn delete_experience(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(exp_id): ApiPath<String>,
) -> Result<Json<Profile>> {
    let profile = app_state
        .db
        .remove_experience(user.user_id(), &EntryId::new(exp_id))
        .await?;
    Ok(Json(profile))
}

/// POST /api/profile/education
pub async fn add_education(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(req): ApiJson<EducationInput>,
) -> Result<Json<Profile>> {
    let entry = req.into_new()?;
    let profile = app_state.db.add_education(user.user_id(), entry).await?;
    Ok(Json(profile))
}

/// DELETE /api/profile/education/:edu_id
pub async fn delete_education(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(edu_id): ApiPath<String>,
) -> Result<Json<Profile>> {
    let profile = app_state
        .db
        .remove_education(user.user_id(), &EntryId::new(edu_id))
        .await?;
    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct RepoParams {
    username: String,
    count: u32,
    sort: String,
}

/// GET /api/profile/github/:username/:count/:sort
pub async fn github_repos(
    State(app_state): State<AppState>,
    ApiPath(params): ApiPath<RepoParams>,
) -> Result<Json<Value>> {
    let repos = app_state
        .github
        .repos(&params.username, params.count, &params.sort)
        .await?;
    Ok(Json(repos))
}

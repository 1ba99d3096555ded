/// User account API routes
use crate::{
    extract::ApiJson,
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::Identity,
    state::AppState,
};
use axum::{extract::State, Json};
use devconnector_core::{
    types::avatar_url,
    validation::{validate_login, validate_register, LoginInput, RegisterInput},
    CreateUser, StorageContext, User,
};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
}

/// GET /api/users/test
pub async fn test() -> Json<Value> {
    Json(json!({ "msg": "Users Works" }))
}

/// POST /api/users/register
pub async fn register(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<RegisterInput>,
) -> Result<Json<User>> {
    validate_register(&req).into_result()?;

    let name = req.name.unwrap_or_default();
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    if app_state.db.find_user_by_email(&email).await?.is_some() {
        return Err(ServerError::Duplicate {
            field: "email".to_string(),
            message: "Email already exists".to_string(),
        });
    }

    let password_hash = app_state.auth_service.hash_password(&password)?;

    // A concurrent registration with the same email still fails on the
    // unique index and comes back as the same duplicate error.
    let user = app_state
        .db
        .create_user(CreateUser {
            name,
            avatar: avatar_url(&email),
            email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(user))
}

/// POST /api/users/login
pub async fn login(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<LoginInput>,
) -> Result<Json<LoginResponse>> {
    validate_login(&req).into_result()?;

    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let user = app_state
        .db
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| ServerError::not_found("email", "Email not found"))?;

    if !app_state
        .auth_service
        .verify_password(&password, &user.password_hash)?
    {
        tracing::warn!(user_id = %user.id, "Failed login attempt");
        return Err(ServerError::InvalidCredentials("Invalid password".to_string()));
    }

    let handle = app_state
        .db
        .get_profile_by_user(&user.id)
        .await?
        .map(|profile| profile.handle);

    let token = app_state
        .auth_service
        .create_token(&Identity::from_user(&user, handle))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        token: format!("Bearer {token}"),
    }))
}

/// GET /api/users/current
pub async fn current(user: AuthenticatedUser) -> Json<Identity> {
    Json(user.0)
}

/// Authentication middleware
use crate::{error::ServerError, services::Identity, state::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use devconnector_core::{StorageContext, UserId};

/// Identity of the caller, attached by `auth_middleware`
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0.id
    }

    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

/// Middleware that extracts and validates the JWT from the Authorization header
///
/// A valid token is only accepted while its account still exists.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let auth_header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::Auth("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            ServerError::Auth("Authorization header is not a bearer token".to_string())
        })?;

    let identity = app_state
        .auth_service
        .verify_access_token(token.trim())
        .map_err(|e| {
            tracing::warn!("Token verification failed: {}", e);
            ServerError::Auth("Invalid token".to_string())
        })?;

    if app_state.db.get_user(&identity.id).await?.is_none() {
        tracing::warn!(user_id = %identity.id, "Token presented for a deleted account");
        return Err(ServerError::Auth("Account no longer exists".to_string()));
    }

    request.extensions_mut().insert(AuthenticatedUser(identity));

    Ok(next.run(request).await)
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}

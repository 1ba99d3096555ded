/// Server error types
///
/// Every error body is a JSON object mapping a field or condition name to a
/// message, e.g. `{"email": "Email already exists"}`.
use axum::{
    extract::{
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use devconnector_core::{validation::ValidationErrors, CoreError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Missing, malformed, expired or otherwise invalid token
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Wrong password at login
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Caller does not own the record
    #[error("Authorization failed: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {key}")]
    NotFound { key: String, message: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Duplicate {field}: {message}")]
    Duplicate { field: String, message: String },

    /// An upstream service (GitHub) failed or was unreachable
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl ServerError {
    pub fn not_found(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            key: key.into(),
            message: message.into(),
        }
    }

    /// The 404 body for a missing record of the given kind
    pub fn missing(entity: &str) -> Self {
        let (key, message) = match entity {
            "profile" => ("noprofile", "There is no profile for this user"),
            "post" => ("postnotfound", "No post found with that ID"),
            "comment" => ("commentnotfound", "Comment does not exist"),
            "experience" => (
                "noexperience",
                "There is no experience with this id on this profile",
            ),
            "education" => (
                "noeducation",
                "There is no education with this id on this profile",
            ),
            "user" => ("usernotfound", "User not found"),
            other => {
                return Self::not_found(format!("{other}notfound"), format!("No {other} found"))
            }
        };
        Self::not_found(key, message)
    }
}

impl From<CoreError> for ServerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, .. } => ServerError::missing(&entity),
            CoreError::PermissionDenied(msg) => ServerError::Unauthorized(msg),
            CoreError::Duplicate { field, message } => ServerError::Duplicate { field, message },
            CoreError::Validation(errors) => ServerError::Validation(errors),
            CoreError::Storage(msg) | CoreError::Database(msg) => ServerError::Database(msg),
            CoreError::Serialization(e) => ServerError::Internal(e.to_string()),
        }
    }
}

impl From<ValidationErrors> for ServerError {
    fn from(errors: ValidationErrors) -> Self {
        ServerError::Validation(errors)
    }
}

impl From<devconnector_storage::StorageError> for ServerError {
    fn from(err: devconnector_storage::StorageError) -> Self {
        ServerError::Database(err.to_string())
    }
}

/// Unreadable request bodies answer 400 `{body: ...}`
impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

/// Unparseable path segments answer 400 keyed by the parameter name
impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        if let PathRejection::FailedToDeserializePathParams(ref inner) = rejection {
            if let ErrorKind::ParseErrorAtKey {
                key,
                value,
                expected_type,
            } = inner.kind()
            {
                return ServerError::Validation(ValidationErrors::single(
                    key.as_str(),
                    format!("{value:?} is not a valid {expected_type}"),
                ));
            }
        }
        ServerError::Validation(ValidationErrors::single("params", rejection.body_text()))
    }
}

fn single(key: &str, message: impl Into<String>) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert(key.to_string(), serde_json::Value::String(message.into()));
    serde_json::Value::Object(body)
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::Auth(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                (StatusCode::UNAUTHORIZED, single("unauthorized", "Unauthorized"))
            }
            ServerError::InvalidCredentials(msg) => {
                (StatusCode::UNAUTHORIZED, single("password", msg))
            }
            ServerError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, single("notauthorized", msg))
            }
            ServerError::NotFound { key, message } => {
                (StatusCode::NOT_FOUND, single(&key, message))
            }
            ServerError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                serde_json::to_value(&errors).unwrap_or_else(|_| single("error", "Invalid input")),
            ),
            ServerError::Duplicate { field, message } => {
                (StatusCode::BAD_REQUEST, single(&field, message))
            }
            ServerError::Upstream(ref msg) => {
                tracing::error!("Upstream error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    single("github", "Could not reach GitHub"),
                )
            }
            ServerError::Database(ref msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, single("error", "Database error"))
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    single("error", "Configuration error"),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    single("error", "Internal server error"),
                )
            }
            ServerError::Jwt(ref e) => {
                tracing::warn!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, single("unauthorized", "Unauthorized"))
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    single("error", "Password error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

//! DevConnector Server Library
//!
//! REST backend for a developer social network: accounts, profiles with
//! experience and education, and a shared feed of posts, comments and likes.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, github::GithubClient};
pub use state::AppState;

use axum::Router;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .nest("/api", api::routes(&app_state))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Shared application state
use crate::services::{AuthService, GithubClient};
use devconnector_storage::Database;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    pub github: Arc<GithubClient>,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        auth_service: Arc<AuthService>,
        github: Arc<GithubClient>,
    ) -> Self {
        Self {
            db,
            auth_service,
            github,
        }
    }
}

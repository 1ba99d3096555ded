/// Server services
pub mod auth;
pub mod github;

pub use auth::{AuthService, Identity};
pub use github::GithubClient;

//! GitHub repository listing, passed through to clients unchanged

use crate::{
    config::GithubSettings,
    error::{Result, ServerError},
};
use devconnector_core::validation::validate_repo_query;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Largest page the GitHub API serves
pub const MAX_REPOS: u32 = 100;

pub struct GithubClient {
    http: Client,
    base_url: Url,
    client_id: String,
    client_secret: String,
}

impl GithubClient {
    pub fn new(settings: &GithubSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.api_base_url).map_err(|e| {
            ServerError::Config(format!(
                "github.api_base_url is not a valid URL ({e}): {:?}",
                settings.api_base_url
            ))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ServerError::Config(format!(
                "github.api_base_url must be an http:// or https:// URL, got {base_url}"
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(format!("devconnector/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServerError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
        })
    }

    /// Public repositories of `username`, at most `count`, ordered by `sort`
    ///
    /// `username` and `sort` are checked against what GitHub accepts before
    /// anything is sent. The JSON body is returned as GitHub sent it.
    pub async fn repos(&self, username: &str, count: u32, sort: &str) -> Result<serde_json::Value> {
        validate_repo_query(username, sort).into_result()?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ServerError::Config("github.api_base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        let per_page = count.clamp(1, MAX_REPOS).to_string();

        debug!(url = %url, per_page = %per_page, sort = %sort, "Fetching GitHub repositories");

        let mut request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .query(&[("per_page", per_page.as_str()), ("sort", sort)]);

        if !self.client_id.is_empty() {
            request = request.basic_auth(&self.client_id, Some(&self.client_secret));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServerError::Upstream(format!("GitHub request failed: {e}")))?;

        match response.status() {
            status if status.is_success() => response
                .json()
                .await
                .map_err(|e| ServerError::Upstream(format!("Invalid GitHub response: {e}"))),
            StatusCode::NOT_FOUND => Err(ServerError::not_found(
                "githubnotfound",
                format!("No GitHub user named {username}"),
            )),
            status => Err(ServerError::Upstream(format!(
                "GitHub returned {status} for {username}"
            ))),
        }
    }
}

//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use devconnector_server::{
    config::GithubSettings, create_router, services::AuthService, AppState, GithubClient,
};
use devconnector_storage::Database;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key";

/// Full application wired to a temporary on-disk database
pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    _temp_dir: TempDir,
}

impl TestApp {
    /// App whose GitHub client points at an address nothing listens on
    pub async fn new() -> Self {
        Self::with_github("http://127.0.0.1:9").await
    }

    pub async fn with_github(api_base_url: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let db = Arc::new(Database::connect(&db_url).await.unwrap());

        // Minimum bcrypt cost keeps the suite fast
        let auth_service = Arc::new(AuthService::new(TEST_SECRET.to_string(), 5, 4));

        let github = Arc::new(
            GithubClient::new(&GithubSettings {
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string(),
                api_base_url: api_base_url.to_string(),
            })
            .unwrap(),
        );

        let app_state = AppState::new(Arc::clone(&db), Arc::clone(&auth_service), github);

        Self {
            router: create_router(app_state),
            db,
            auth_service,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request and return status plus parsed JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        read_json(response).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(build_request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(build_request("POST", uri, token, Some(body))).await
    }

    /// POST a body that is sent byte for byte, valid JSON or not
    pub async fn post_raw(
        &self,
        uri: &str,
        token: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post_empty(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(build_request("POST", uri, token, None)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(build_request("DELETE", uri, token, None)).await
    }

    /// Register a user and return the created user JSON
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/users/register",
                None,
                serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": password,
                    "password2": password,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body
    }

    /// Log in and return the full `Bearer <jwt>` token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/users/login",
                None,
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Register and log in, returning (user id, token)
    pub async fn signed_up(&self, name: &str) -> (String, String) {
        let email = format!("{}@example.com", name.to_lowercase());
        let user = self.register(name, &email, "password123").await;
        let token = self.login(&email, "password123").await;
        (user["id"].as_str().unwrap().to_string(), token)
    }
}

pub fn build_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::{ops::RangeInclusive, path::PathBuf};

/// Costs accepted by bcrypt
const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_github")]
    pub github: GithubSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

/// OAuth app credentials forwarded on GitHub API calls
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubSettings {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default = "default_github_api_base_url")]
    pub api_base_url: String,
}

impl ServerConfig {
    /// Load configuration from `./config.toml` (or `path` when given) and the environment
    pub fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.unwrap_or_else(|| PathBuf::from("config.toml"));
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables, e.g. DEVCONNECTOR_AUTH__JWT_SECRET
        settings = settings.add_source(
            config::Environment::with_prefix("DEVCONNECTOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set DEVCONNECTOR_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.auth.jwt_expiration_hours == 0 {
            return Err(ServerError::Config(
                "auth.jwt_expiration_hours must be at least 1".to_string(),
            ));
        }

        if !BCRYPT_COST_RANGE.contains(&self.auth.bcrypt_cost) {
            return Err(ServerError::Config(format!(
                "auth.bcrypt_cost must be between {} and {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end()
            )));
        }

        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/devconnector.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
        bcrypt_cost: default_bcrypt_cost(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    5
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_github() -> GithubSettings {
    GithubSettings {
        client_id: String::new(),
        client_secret: String::new(),
        api_base_url: default_github_api_base_url(),
    }
}

fn default_github_api_base_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            github: default_github(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.auth.jwt_expiration_hours, 5);
        assert_eq!(config.github.api_base_url, "https://api.github.com");
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_validate_requires_secret() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_err());

        config.auth.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());

        config.auth.bcrypt_cost = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devconnector.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9000

[auth]
jwt_secret = "from-file"

[github]
client_id = "abc"
"#,
        )
        .unwrap();

        let config = ServerConfig::load_from(Some(path)).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.jwt_secret, "from-file");
        assert_eq!(config.auth.jwt_expiration_hours, 5);
        assert_eq!(config.github.client_id, "abc");
    }
}

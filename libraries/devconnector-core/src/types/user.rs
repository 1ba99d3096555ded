/// User domain types
use super::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Gravatar rendering options: 200px, PG rating, "mystery man" fallback
const GRAVATAR_OPTIONS: &str = "s=200&r=pg&d=mm";

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Login email, unique across users
    pub email: String,

    /// Bcrypt hash of the password; never leaves the server
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Avatar image URL derived from the email
    pub avatar: String,

    /// Registration timestamp
    pub date: DateTime<Utc>,
}

/// Public projection of a user joined onto profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
}

/// Input for creating a user; the password must already be hashed
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
}

/// Normalize an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Derive the avatar URL for an email address
///
/// Gravatar accepts SHA-256 digests of the trimmed, lowercased address, so the
/// same email always maps to the same URL.
pub fn avatar_url(email: &str) -> String {
    let digest = Sha256::digest(normalize_email(email).as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?{}",
        hex::encode(digest),
        GRAVATAR_OPTIONS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_url_is_deterministic_and_case_insensitive() {
        let a = avatar_url("Ada@Example.com ");
        let b = avatar_url("ada@example.com");
        assert_eq!(a, b);
        assert!(a.starts_with("https://www.gravatar.com/avatar/"));
        assert!(a.ends_with("?s=200&r=pg&d=mm"));
    }

    #[test]
    fn avatar_url_differs_per_email() {
        assert_ne!(avatar_url("a@x.com"), avatar_url("b@x.com"));
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: UserId::new("u1"),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$2b$12$secret".into(),
            avatar: avatar_url("ada@example.com"),
            date: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }
}

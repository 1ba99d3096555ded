/// Authentication service - JWT and password handling
use crate::error::{Result, ServerError};
use chrono::{Duration, Utc};
use devconnector_core::{User, UserId};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// The authenticated caller, as carried in the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub avatar: String,

    /// Profile handle at login time, if the user had a profile
    pub handle: Option<String>,
}

impl Identity {
    pub fn from_user(user: &User, handle: Option<String>) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            handle,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    token_expiration: Duration,
    bcrypt_cost: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub name: String,
    pub avatar: String,
    pub handle: Option<String>,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
}

impl AuthService {
    pub fn new(secret: String, expiration_hours: u64, bcrypt_cost: u32) -> Self {
        Self {
            secret,
            token_expiration: Duration::hours(expiration_hours as i64),
            bcrypt_cost,
        }
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Sign a token for `identity`
    pub fn create_token(&self, identity: &Identity) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.token_expiration;

        let claims = Claims {
            sub: identity.id.as_str().to_string(),
            name: identity.name.clone(),
            avatar: identity.avatar.clone(),
            handle: identity.handle.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::new(Algorithm::HS256), &claims, &encoding_key).map_err(ServerError::from)
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify a token and return the identity it carries
    pub fn verify_access_token(&self, token: &str) -> Result<Identity> {
        let claims = self.verify_token(token)?;
        Ok(Identity {
            id: UserId::new(claims.sub),
            name: claims.name,
            avatar: claims.avatar,
            handle: claims.handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            id: UserId::new("user-123"),
            name: "Ada".to_string(),
            avatar: "https://www.gravatar.com/avatar/abc?s=200&r=pg&d=mm".to_string(),
            handle: Some("ada".to_string()),
        }
    }

    #[test]
    fn test_password_hashing() {
        let auth = AuthService::new("secret".to_string(), 5, 4);
        let password = "my_secure_password";

        let hash = auth.hash_password(password).unwrap();
        assert!(auth.verify_password(password, &hash).unwrap());
        assert!(!auth.verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_token_round_trip_carries_identity() {
        let auth = AuthService::new("secret".to_string(), 5, 4);

        let token = auth.create_token(&identity()).unwrap();
        let verified = auth.verify_access_token(&token).unwrap();
        assert_eq!(verified, identity());

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 5 * 3600);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let auth = AuthService::new("secret".to_string(), 5, 4);
        let other = AuthService::new("other-secret".to_string(), 5, 4);

        let token = other.create_token(&identity()).unwrap();
        assert!(auth.verify_access_token(&token).is_err());
    }
}

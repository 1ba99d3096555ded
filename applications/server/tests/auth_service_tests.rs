/// Authentication service tests
/// Tests JWT generation, password hashing, token validation
use devconnector_core::UserId;
use devconnector_server::services::{AuthService, Identity};
use jsonwebtoken::{encode, EncodingKey, Header};

fn create_test_auth_service() -> AuthService {
    AuthService::new("test-secret-key".to_string(), 5, 4)
}

fn test_identity() -> Identity {
    Identity {
        id: UserId::new("user-1"),
        name: "Ada".to_string(),
        avatar: "https://www.gravatar.com/avatar/x?s=200&r=pg&d=mm".to_string(),
        handle: None,
    }
}

/// Test password hashing produces valid bcrypt hashes
#[test]
fn test_password_hashing() {
    let auth_service = create_test_auth_service();

    let password = "MySecurePassword123!";
    let hash = auth_service.hash_password(password).unwrap();

    // bcrypt hashes start with $2b$ or $2a$
    assert!(hash.starts_with("$2b$") || hash.starts_with("$2a$"));
    assert!(hash.len() > 50);

    // Random salt
    let hash2 = auth_service.hash_password(password).unwrap();
    assert_ne!(hash, hash2, "Hashes should differ due to random salt");
}

/// Test password verification
#[test]
fn test_password_verification() {
    let auth_service = create_test_auth_service();

    let hash = auth_service.hash_password("correct horse").unwrap();
    assert!(auth_service.verify_password("correct horse", &hash).unwrap());
    assert!(!auth_service.verify_password("battery staple", &hash).unwrap());
}

/// Test a malformed stored hash is an error, not a mismatch
#[test]
fn test_malformed_hash_is_error() {
    let auth_service = create_test_auth_service();
    assert!(auth_service.verify_password("anything", "not-a-hash").is_err());
}

/// Test token carries the identity through a round trip
#[test]
fn test_token_round_trip() {
    let auth_service = create_test_auth_service();
    let identity = Identity {
        handle: Some("ada".to_string()),
        ..test_identity()
    };

    let token = auth_service.create_token(&identity).unwrap();
    assert_eq!(token.split('.').count(), 3, "JWT has three segments");

    let verified = auth_service.verify_access_token(&token).unwrap();
    assert_eq!(verified, identity);
}

/// Test tokens expire after the configured five hours
#[test]
fn test_token_expiry_window() {
    let auth_service = create_test_auth_service();

    let token = auth_service.create_token(&test_identity()).unwrap();
    let claims = auth_service.verify_token(&token).unwrap();

    assert_eq!(claims.sub, "user-1");
    assert_eq!(claims.exp - claims.iat, 5 * 60 * 60);
}

/// Test expired tokens are rejected
#[test]
fn test_expired_token_rejected() {
    let auth_service = create_test_auth_service();

    #[derive(serde::Serialize)]
    struct ExpiredClaims<'a> {
        sub: &'a str,
        name: &'a str,
        avatar: &'a str,
        handle: Option<&'a str>,
        exp: i64,
        iat: i64,
    }

    let now = chrono::Utc::now().timestamp();
    let token = encode(
        &Header::default(),
        &ExpiredClaims {
            sub: "user-1",
            name: "Ada",
            avatar: "",
            handle: None,
            exp: now - 3600,
            iat: now - 7200,
        },
        &EncodingKey::from_secret(b"test-secret-key"),
    )
    .unwrap();

    assert!(auth_service.verify_access_token(&token).is_err());
}

/// Test tampered tokens are rejected
#[test]
fn test_tampered_token_rejected() {
    let auth_service = create_test_auth_service();

    let token = auth_service.create_token(&test_identity()).unwrap();
    let mut parts: Vec<&str> = token.split('.').collect();
    parts[2] = "invalidsignature";
    let tampered = parts.join(".");

    assert!(auth_service.verify_access_token(&tampered).is_err());
    assert!(auth_service.verify_access_token("").is_err());
}

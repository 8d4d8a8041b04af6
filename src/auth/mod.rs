use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User is not active")]
    InactiveUser,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Session is not active")]
    SessionNotActive,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Unique per token so tokens issued in the same second still differ
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn access(user_id: &str, username: Option<String>, is_admin: bool) -> Self {
        let ttl = config::config().security.access_token_ttl_secs;
        Self::with_ttl(user_id, username, is_admin, TokenType::Access, ttl)
    }

    pub fn refresh(user_id: &str) -> Self {
        let ttl = config::config().security.refresh_token_ttl_secs;
        Self::with_ttl(user_id, None, false, TokenType::Refresh, ttl)
    }

    pub fn with_ttl(
        user_id: &str,
        username: Option<String>,
        is_admin: bool,
        token_type: TokenType,
        ttl_secs: i64,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            username,
            is_admin,
            token_type,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl_secs,
        }
    }
}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthError> {
    encode_jwt(claims, &config::config().security.jwt_secret)
}

/// Decode a token signed with the configured secret and check its type
pub fn validate_jwt(token: &str, expected: TokenType) -> Result<Claims, AuthError> {
    decode_jwt(token, &config::config().security.jwt_secret, expected)
}

pub fn encode_jwt(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn decode_jwt(token: &str, secret: &str, expected: TokenType) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let mut validation = Validation::default();
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?
        .claims;

    if claims.token_type != expected {
        return Err(AuthError::InvalidToken(format!(
            "expected {:?} token, got {:?}",
            expected, claims.token_type
        )));
    }

    Ok(claims)
}

/// SuiteCRM stores `bcrypt(md5(password))`; PHP writes the `$2y$` prefix.
pub fn verify_password(plain: &str, user_hash: &str) -> bool {
    let md5_hex = format!("{:x}", md5::compute(plain.as_bytes()));
    let normalized = match user_hash.strip_prefix("$2y$") {
        Some(rest) => format!("$2b${}", rest),
        None => user_hash.to_string(),
    };
    bcrypt::verify(md5_hex, &normalized).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn access_token_round_trip() {
        let claims = Claims::with_ttl("u1", Some("admin".into()), true, TokenType::Access, 60);
        let token = encode_jwt(&claims, SECRET).unwrap();
        let decoded = decode_jwt(&token, SECRET, TokenType::Access).unwrap();

        assert_eq!(decoded.sub, "u1");
        assert_eq!(decoded.username.as_deref(), Some("admin"));
        assert!(decoded.is_admin);
    }

    #[test]
    fn rejects_wrong_type_secret_and_expired() {
        let refresh = encode_jwt(&Claims::with_ttl("u1", None, false, TokenType::Refresh, 60), SECRET).unwrap();
        assert!(matches!(
            decode_jwt(&refresh, SECRET, TokenType::Access),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(decode_jwt(&refresh, "other-secret", TokenType::Refresh).is_err());

        let expired = encode_jwt(&Claims::with_ttl("u1", None, false, TokenType::Access, -10), SECRET).unwrap();
        assert!(decode_jwt(&expired, SECRET, TokenType::Access).is_err());
    }

    #[test]
    fn empty_secret_is_rejected() {
        let claims = Claims::with_ttl("u1", None, false, TokenType::Access, 60);
        assert!(matches!(encode_jwt(&claims, ""), Err(AuthError::InvalidSecret)));
    }

    #[test]
    fn tokens_issued_together_differ() {
        let a = encode_jwt(&Claims::with_ttl("u1", None, false, TokenType::Access, 60), SECRET).unwrap();
        let b = encode_jwt(&Claims::with_ttl("u1", None, false, TokenType::Access, 60), SECRET).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verifies_suitecrm_password_hashes() {
        let md5_hex = format!("{:x}", md5::compute(b"secret"));
        let hash = bcrypt::hash(md5_hex, 4).unwrap();
        let php_hash = hash.replacen("$2b$", "$2y$", 1);

        assert!(verify_password("secret", &hash));
        assert!(verify_password("secret", &php_hash));
        assert!(!verify_password("wrong", &php_hash));
        assert!(!verify_password("secret", "not-a-hash"));
    }
}

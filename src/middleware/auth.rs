use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};

use crate::auth::{validate_jwt, Claims, TokenType};
use crate::database::{DatabaseManager, SessionStore};
use crate::error::ApiError;

/// Authenticated user context extracted from the access token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
    pub username: Option<String>,
    pub is_admin: bool,
    /// Raw access token, needed by logout
    pub token: String,
}

impl AuthUser {
    fn from_claims(claims: Claims, token: String) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            is_admin: claims.is_admin,
            token,
        }
    }
}

/// Validates the bearer access token and requires an active session for it
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&token, TokenType::Access)?;

    let sessions = SessionStore::new(DatabaseManager::session_pool().await?);
    let active = sessions
        .find_active_by_access_token(&token)
        .await?
        .map(|session| session.is_valid())
        .unwrap_or(false);
    if !active {
        return Err(ApiError::unauthorized("Session is not active"));
    }

    request.extensions_mut().insert(AuthUser::from_claims(claims, token));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

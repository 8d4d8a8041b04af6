// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{http::HeaderMap, Json};
use std::collections::HashMap;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::auth_service::{AuthResponse, ClientInfo, LoginRequest};
use crate::services::AuthService;

const MIN_PASSWORD_LENGTH: usize = 6;

/// POST /auth/login - Authenticate a SuiteCRM user and open a session
///
/// Input: `{ "userName": "string", "password": "string" }`
///
/// Output: `{ accessToken, refreshToken, tokenType, expiresIn, user }` in the
/// success envelope. Any previous session of the user is deactivated.
pub async fn login_post(headers: HeaderMap, Json(payload): Json<LoginRequest>) -> ApiResult<AuthResponse> {
    validate_login(&payload)?;

    let service = AuthService::new().await?;
    let response = service.login(&payload, client_info(&headers)).await?;

    Ok(ApiResponse::success(response))
}

fn validate_login(payload: &LoginRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();
    if payload.user_name.trim().is_empty() {
        field_errors.insert("userName".to_string(), "This field is required".to_string());
    }
    if payload.password.is_empty() {
        field_errors.insert("password".to_string(), "This field is required".to_string());
    } else if payload.password.chars().count() < MIN_PASSWORD_LENGTH {
        field_errors.insert(
            "password".to_string(),
            format!("Must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid login request", Some(field_errors)))
    }
}

/// User agent and client address, preferring the first `X-Forwarded-For` hop
fn client_info(headers: &HeaderMap) -> ClientInfo {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    ClientInfo {
        user_agent: header("user-agent").map(str::to_string),
        ip_address: header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(|ip| ip.trim().to_string())
            .or_else(|| header("x-real-ip").map(str::to_string)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn client_info_uses_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static("curl/8.0"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 172.16.0.1"));

        let info = client_info(&headers);
        assert_eq!(info.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(info.ip_address.as_deref(), Some("10.0.0.1"));
        assert!(client_info(&HeaderMap::new()).ip_address.is_none());
    }

    #[test]
    fn blank_credentials_are_rejected() {
        let err = validate_login(&LoginRequest {
            user_name: "  ".into(),
            password: String::new(),
        })
        .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_json()["field_errors"]["userName"], "This field is required");
    }

    #[test]
    fn short_passwords_are_rejected() {
        let err = validate_login(&LoginRequest {
            user_name: "admin".into(),
            password: "12345".into(),
        })
        .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_json()["field_errors"]["password"], "Must be at least 6 characters");

        assert!(validate_login(&LoginRequest {
            user_name: "admin".into(),
            password: "123456".into(),
        })
        .is_ok());
    }
}

// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::pagination::PaginationError;
use crate::services::FitacPdfError;
use crate::tefi::TefiError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (TEFI / SuiteCRM failures)
    BadGateway(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
            ApiError::BadGateway(_) => 502,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { message, field_errors } => {
                let mut response = json!({
                    "error": true,
                    "message": message,
                    "code": "VALIDATION_ERROR"
                });

                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }

                response
            }
            _ => json!({
                "error": true,
                "message": self.message(),
                "code": self.error_code()
            }),
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field_errors: Option<HashMap<String, String>>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::ConfigMissing(name) => {
                tracing::error!("Database not configured: {} is missing", name);
                ApiError::service_unavailable("Database is not configured")
            }
            DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("DATABASE_URL is not a MySQL URL");
                ApiError::service_unavailable("Database is not configured")
            }
            DatabaseError::QueryError(msg) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database query error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            DatabaseError::Sqlx(sqlx_err) => match sqlx_err {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                    tracing::error!("Database unavailable: {}", sqlx_err);
                    ApiError::service_unavailable("Database temporarily unavailable")
                }
                other => {
                    tracing::error!("SQLx error: {}", other);
                    ApiError::internal_server_error("Database error occurred")
                }
            },
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::unauthorized("Invalid credentials"),
            AuthError::InactiveUser => ApiError::unauthorized("User is not active"),
            AuthError::InvalidToken(msg) => ApiError::unauthorized(format!("Invalid token: {}", msg)),
            AuthError::InvalidRefreshToken => ApiError::unauthorized("Invalid refresh token"),
            AuthError::SessionNotActive => ApiError::unauthorized("Session is not active"),
            AuthError::TokenGeneration(msg) => {
                tracing::error!("JWT generation failed: {}", msg);
                ApiError::internal_server_error("Failed to issue tokens")
            }
            AuthError::InvalidSecret => {
                tracing::error!("JWT_SECRET is not configured");
                ApiError::internal_server_error("Authentication is not configured")
            }
            AuthError::Database(e) => e.into(),
        }
    }
}

impl From<TefiError> for ApiError {
    fn from(err: TefiError) -> Self {
        tracing::error!("TEFI error: {}", err);
        ApiError::bad_gateway(err.to_string())
    }
}

impl From<FitacPdfError> for ApiError {
    fn from(err: FitacPdfError) -> Self {
        match err {
            FitacPdfError::Database(e) => e.into(),
            FitacPdfError::Tefi(e) => e.into(),
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_records_map_to_404() {
        let err: ApiError = DatabaseError::NotFound("Fitac with ID f-1 not found".into()).into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Fitac with ID f-1 not found");
    }

    #[test]
    fn missing_database_config_is_unavailable() {
        let err: ApiError = DatabaseError::ConfigMissing("DATABASE_URL").into();
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn tefi_failures_are_bad_gateway_with_message() {
        for tefi in [
            TefiError::Configuration("TEFI_URL missing".into()),
            TefiError::Authentication("Invalid Login".into()),
            TefiError::transport(Some(500), "HTTP 500: Internal Server Error"),
            TefiError::PdfGeneration("Session expired again after re-authentication".into()),
        ] {
            let expected = tefi.to_string();
            let err: ApiError = tefi.into();
            assert_eq!(err.status_code(), 502);
            assert_eq!(err.message(), expected);
            assert_eq!(err.to_json()["code"], "BAD_GATEWAY");
        }
    }

    #[test]
    fn fitac_pdf_errors_keep_their_mapping() {
        let missing: ApiError = FitacPdfError::Database(DatabaseError::NotFound("gone".into())).into();
        assert_eq!(missing.status_code(), 404);

        let remote: ApiError = FitacPdfError::Tefi(TefiError::transport(None, "timed out")).into();
        assert_eq!(remote.status_code(), 502);
    }

    #[test]
    fn auth_and_pagination_errors() {
        let err: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(err.status_code(), 401);

        let err: ApiError = AuthError::InvalidSecret.into();
        assert_eq!(err.status_code(), 500);

        let err: ApiError = PaginationError::InvalidPage.into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_json()["message"], "page must be greater than or equal to 1");
    }
}

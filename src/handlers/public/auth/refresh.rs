// handlers/public/auth/refresh.rs - POST /auth/refresh handler

use axum::Json;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::auth_service::{AuthResponse, RefreshRequest};
use crate::services::AuthService;

/// POST /auth/refresh - Trade a refresh token for a new token pair
pub async fn refresh_post(Json(payload): Json<RefreshRequest>) -> ApiResult<AuthResponse> {
    if payload.refresh_token.trim().is_empty() {
        return Err(ApiError::bad_request("refreshToken is required"));
    }

    let service = AuthService::new().await?;
    Ok(ApiResponse::success(service.refresh(payload.refresh_token.trim()).await?))
}

use axum::extract::Extension;
use serde_json::{json, Value};

use crate::database::models::user::UserInfo;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::AuthService;

/// POST /api/auth/logout - Deactivate the session behind the current access token
pub async fn logout(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    let service = AuthService::new().await?;
    service.logout(&auth_user.token).await?;
    tracing::info!("User {} logged out", auth_user.user_id);

    Ok(ApiResponse::success(json!({
        "success": true,
        "message": "Logout successful"
    })))
}

/// GET /api/auth/profile - Fresh user data for the caller
pub async fn profile(Extension(auth_user): Extension<AuthUser>) -> ApiResult<UserInfo> {
    let service = AuthService::new().await?;
    let user = service.validate_user(&auth_user.user_id).await?;
    Ok(ApiResponse::success(UserInfo::from(&user)))
}

/// GET /api/auth/validate - Reaching this handler means the token is valid
pub async fn validate(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "valid": true,
        "message": "Token is valid",
        "user": {
            "id": auth_user.user_id,
            "userName": auth_user.username,
            "isAdmin": auth_user.is_admin
        }
    })))
}

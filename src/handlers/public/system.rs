use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;

/// GET / - Service information
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "TEFI API (Rust)",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "SuiteCRM read API with TEFI PDF generation",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "database": "/database/test-connection (public)",
                "public_auth": "/auth/login, /auth/refresh (public - token acquisition)",
                "auth": "/api/auth/logout, /api/auth/profile, /api/auth/validate (protected)",
                "fitac": "/api/fitac[/:id] (protected), POST /api/fitac/:id/generate-pdf/:templateId",
                "account": "/api/account[/:id] (protected)",
                "contact": "/api/contact[/:id] (protected)",
                "project": "/api/project[/:id] (protected)",
                "email_address": "/api/email-address[/:id] (protected)",
            }
        }
    }))
}

/// GET /health - Pings the CRM database
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

/// GET /database/test-connection - Always 200; reports whether the CRM database answers
pub async fn database_test_connection() -> Json<Value> {
    let connected = match DatabaseManager::health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Database connection test failed: {}", e);
            false
        }
    };

    Json(json!({
        "connected": connected,
        "message": if connected {
            "Database connection successful"
        } else {
            "Could not connect to the database"
        }
    }))
}

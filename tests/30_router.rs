use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tefi_api_rust::app::{app, AppState};
use tefi_api_rust::tefi::{PdfSource, TefiError};
use tower::ServiceExt;

/// Counts calls and always fails; handlers must not reach it without auth
#[derive(Default)]
struct StubPdf {
    calls: AtomicUsize,
}

#[async_trait]
impl PdfSource for StubPdf {
    async fn generate_pdf(&self, _fitac_id: &str, _template_id: &str) -> Result<Vec<u8>, TefiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TefiError::PdfGeneration("stub".into()))
    }
}

fn router(pdf: Arc<StubPdf>) -> Router {
    app(AppState::new(pdf))
}

async fn send(router: Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = router.oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

fn json_post(uri: &str, body: Value) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let request = Request::builder().uri("/").body(Body::empty())?;
    let (status, body) = send(router(Arc::default()), request).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "TEFI API (Rust)");
    assert!(body["data"]["endpoints"]["fitac"].is_string());
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() -> Result<()> {
    for uri in ["/api/fitac", "/api/account/a-1", "/api/email-address/e-1/contacts", "/api/auth/profile"] {
        let request = Request::builder().uri(uri).body(Body::empty())?;
        let (status, body) = send(router(Arc::default()), request).await?;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["message"], "Missing Authorization header");
    }
    Ok(())
}

#[tokio::test]
async fn malformed_tokens_are_rejected() -> Result<()> {
    let request = Request::builder()
        .uri("/api/fitac")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())?;
    let (status, body) = send(router(Arc::default()), request).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap_or_default().starts_with("Invalid token"));

    let request = Request::builder()
        .uri("/api/fitac")
        .header(header::AUTHORIZATION, "Basic c3ZjOnNlY3JldA==")
        .body(Body::empty())?;
    let (status, _) = send(router(Arc::default()), request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn pdf_generation_is_not_reachable_without_auth() -> Result<()> {
    let pdf = Arc::new(StubPdf::default());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/fitac/42/generate-pdf/7")
        .body(Body::empty())?;
    let (status, _) = send(router(pdf.clone()), request).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(pdf.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn login_validates_required_fields() -> Result<()> {
    let request = json_post("/auth/login", json!({ "userName": " ", "password": "" }))?;
    let (status, body) = send(router(Arc::default()), request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["userName"], "This field is required");
    assert_eq!(body["field_errors"]["password"], "This field is required");
    Ok(())
}

#[tokio::test]
async fn login_rejects_short_passwords() -> Result<()> {
    let request = json_post("/auth/login", json!({ "userName": "admin", "password": "abc" }))?;
    let (status, body) = send(router(Arc::default()), request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["password"], "Must be at least 6 characters");
    assert!(body["field_errors"].get("userName").is_none());
    Ok(())
}

#[tokio::test]
async fn refresh_requires_a_token() -> Result<()> {
    let request = json_post("/auth/refresh", json!({ "refreshToken": "" }))?;
    let (status, body) = send(router(Arc::default()), request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "refreshToken is required");
    Ok(())
}

#[tokio::test]
async fn unknown_routes_are_not_found() -> Result<()> {
    let request = Request::builder().uri("/api/unknown").body(Body::empty())?;
    let response = router(Arc::default()).oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

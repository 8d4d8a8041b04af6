use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::tefi::PdfSource;

/// Shared state for handlers that need more than a database pool
#[derive(Clone)]
pub struct AppState {
    pub pdf: Arc<dyn PdfSource>,
}

impl AppState {
    pub fn new(pdf: Arc<dyn PdfSource>) -> Self {
        Self { pdf }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/database/test-connection", get(public::database_test_connection))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes())
        // Global middleware
        .layer(cors_layer(&crate::config::config().security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/login", post(auth::login_post))
        .route("/auth/refresh", post(auth::refresh_post))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(fitac_routes())
        .merge(account_routes())
        .merge(contact_routes())
        .merge(project_routes())
        .merge(email_address_routes())
        .route_layer(from_fn(jwt_auth_middleware))
}

fn auth_routes() -> Router<AppState> {
    use protected::auth;

    Router::new()
        .route("/api/auth/logout", post(auth::session_logout))
        .route("/api/auth/profile", get(auth::session_profile))
        .route("/api/auth/validate", get(auth::session_validate))
}

fn fitac_routes() -> Router<AppState> {
    use protected::fitac;

    Router::new()
        .route("/api/fitac", get(fitac::list))
        .route("/api/fitac/status/:status_id", get(fitac::by_status))
        .route("/api/fitac/assigned/:user_id", get(fitac::by_assigned_user))
        .route("/api/fitac/document-name/:document_name", get(fitac::by_document_name))
        .route("/api/fitac/:id", get(fitac::get))
        .route("/api/fitac/:id/generate-pdf/:template_id", post(fitac::generate_pdf))
}

fn account_routes() -> Router<AppState> {
    use protected::account;

    Router::new()
        .route("/api/account", get(account::list))
        .route("/api/account/assigned/:user_id", get(account::by_assigned_user))
        .route("/api/account/search/:name", get(account::search))
        .route("/api/account/:id", get(account::get))
}

fn contact_routes() -> Router<AppState> {
    use protected::contact;

    Router::new()
        .route("/api/contact", get(contact::list))
        .route("/api/contact/assigned-user/:user_id", get(contact::by_assigned_user))
        .route("/api/contact/name/:name", get(contact::by_name))
        .route("/api/contact/:id", get(contact::get))
}

fn project_routes() -> Router<AppState> {
    use protected::project;

    Router::new()
        .route("/api/project", get(project::list))
        .route("/api/project/assigned/:user_id", get(project::by_assigned_user))
        .route("/api/project/search/:name", get(project::search))
        .route("/api/project/:id", get(project::get))
}

fn email_address_routes() -> Router<AppState> {
    use protected::email_address;

    Router::new()
        .route("/api/email-address", get(email_address::list))
        .route("/api/email-address/email/:email", get(email_address::by_email))
        .route("/api/email-address/:id", get(email_address::get))
        .route("/api/email-address/:id/contacts", get(email_address::contacts))
}

/// Permissive when no origins are configured, otherwise limited to the listed ones
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

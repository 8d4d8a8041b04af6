use std::sync::Arc;
use std::time::Duration;

use tefi_api_rust::app::{app, AppState};
use tefi_api_rust::database::{DatabaseError, DatabaseManager, SessionStore};
use tefi_api_rust::tefi::TefiService;
use tefi_api_rust::{config, is_production};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, TEFI_*, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    info!("Starting TEFI API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        if is_production!() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        warn!("JWT_SECRET is empty; logins will fail until it is set");
    }

    let tefi = TefiService::from_env()?;
    info!("TEFI client configured for {}", tefi.config().url);
    let state = AppState::new(Arc::new(tefi));

    // Create the session store up front so a bad SQLITE_DB_PATH fails at boot
    DatabaseManager::session_pool().await?;
    spawn_session_cleanup(Duration::from_secs(config.api.session_cleanup_interval_secs.max(1)));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("TEFI API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    DatabaseManager::close_all().await;
    Ok(())
}

/// Periodically delete sessions whose refresh token has expired
fn spawn_session_cleanup(period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            match clean_expired_sessions().await {
                Ok(0) => {}
                Ok(removed) => info!("Removed {} expired sessions", removed),
                Err(e) => error!("Session cleanup failed: {}", e),
            }
        }
    });
}

async fn clean_expired_sessions() -> Result<u64, DatabaseError> {
    let store = SessionStore::new(DatabaseManager::session_pool().await?);
    store.delete_expired(chrono::Utc::now().timestamp()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;

/// Errors from DatabaseManager and the repositories built on it
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_SESSIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL,
        access_token TEXT NOT NULL,
        refresh_token TEXT NOT NULL,
        access_token_expires_at INTEGER NOT NULL,
        refresh_token_expires_at INTEGER NOT NULL,
        user_agent TEXT,
        ip_address TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        last_activity INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )
"#;

const CREATE_SESSIONS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_sessions_user_active ON sessions (user_id, is_active)";

/// Lazily created pools for the SuiteCRM database (MySQL) and the session store (SQLite)
pub struct DatabaseManager {
    crm: OnceCell<MySqlPool>,
    sessions: OnceCell<SqlitePool>,
}

impl DatabaseManager {
    fn instance() -> &'static DatabaseManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<DatabaseManager> = OnceLock::new();
        INSTANCE.get_or_init(|| DatabaseManager {
            crm: OnceCell::new(),
            sessions: OnceCell::new(),
        })
    }

    /// SuiteCRM database pool, connected on first use
    pub async fn crm_pool() -> Result<MySqlPool, DatabaseError> {
        let pool = Self::instance()
            .crm
            .get_or_try_init(|| async {
                let db = &config::config().database;
                let url = db.url.as_deref().ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
                Self::validate_mysql_url(url)?;

                let mut options = MySqlConnectOptions::from_str(url)?;
                if !db.enable_query_logging {
                    options = options.disable_statement_logging();
                }

                let pool = MySqlPoolOptions::new()
                    .max_connections(db.max_connections)
                    .acquire_timeout(Duration::from_secs(db.connection_timeout))
                    .connect_with(options)
                    .await?;

                info!("Created CRM database pool");
                Ok::<_, DatabaseError>(pool)
            })
            .await?;

        Ok(pool.clone())
    }

    /// Session store pool. The file and the `sessions` table are created if missing.
    pub async fn session_pool() -> Result<SqlitePool, DatabaseError> {
        let pool = Self::instance()
            .sessions
            .get_or_try_init(|| async {
                let path = config::config().database.sqlite_path.clone();
                let pool = Self::open_session_store(&path).await?;
                info!("Opened session store at {}", path);
                Ok::<_, DatabaseError>(pool)
            })
            .await?;

        Ok(pool.clone())
    }

    /// Open a SQLite session store at `path` and make sure its schema exists
    pub async fn open_session_store(path: &str) -> Result<SqlitePool, DatabaseError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| DatabaseError::QueryError(format!("cannot create {}: {}", parent.display(), e)))?;
            }
        }

        let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);
        let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;
        sqlx::query(CREATE_SESSIONS_TABLE).execute(&pool).await?;
        sqlx::query(CREATE_SESSIONS_INDEX).execute(&pool).await?;
        Ok(pool)
    }

    fn validate_mysql_url(url: &str) -> Result<(), DatabaseError> {
        let parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match parsed.scheme() {
            "mysql" | "mariadb" => Ok(()),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }

    /// Pings the CRM database
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::crm_pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close both pools (e.g., on shutdown)
    pub async fn close_all() {
        let manager = Self::instance();
        if let Some(pool) = manager.crm.get() {
            pool.close().await;
            info!("Closed CRM database pool");
        }
        if let Some(pool) = manager.sessions.get() {
            pool.close().await;
            info!("Closed session store");
        }
    }
}

use chrono::Utc;
use serde::Serialize;
use sqlx::FromRow;

/// Application login session kept in the SQLite store. Timestamps are unix seconds.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: String,
    pub access_token_expires_at: i64,
    pub refresh_token_expires_at: i64,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub is_active: bool,
    pub last_activity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Session {
    pub fn is_access_token_expired(&self) -> bool {
        self.access_token_expires_at <= Utc::now().timestamp()
    }

    pub fn is_refresh_token_expired(&self) -> bool {
        self.refresh_token_expires_at <= Utc::now().timestamp()
    }

    pub fn is_valid(&self) -> bool {
        self.is_active && !self.is_refresh_token_expired()
    }
}

use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Session;

/// New session data; expiries are unix seconds
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_at: i64,
    pub refresh_token_expires_at: i64,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

const SESSION_COLUMNS: &str = "id, user_id, access_token, refresh_token, access_token_expires_at, \
     refresh_token_expires_at, user_agent, ip_address, is_active, last_activity, created_at, updated_at";

/// Application login sessions in SQLite. One active session per user.
#[derive(Clone)]
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Deactivate the user's other sessions and insert a new active one
    pub async fn create(&self, new: NewSession) -> Result<Session, DatabaseError> {
        let now = Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE sessions SET is_active = 0, updated_at = ? WHERE user_id = ? AND is_active = 1")
            .bind(now)
            .bind(&new.user_id)
            .execute(&mut *tx)
            .await?;

        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id,
            access_token: new.access_token,
            refresh_token: new.refresh_token,
            access_token_expires_at: new.access_token_expires_at,
            refresh_token_expires_at: new.refresh_token_expires_at,
            user_agent: new.user_agent,
            ip_address: new.ip_address,
            is_active: true,
            last_activity: now,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(&format!(
            "INSERT INTO sessions ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            SESSION_COLUMNS
        ))
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.access_token)
        .bind(&session.refresh_token)
        .bind(session.access_token_expires_at)
        .bind(session.refresh_token_expires_at)
        .bind(&session.user_agent)
        .bind(&session.ip_address)
        .bind(session.is_active)
        .bind(session.last_activity)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!("Created session {} for user {}", session.id, session.user_id);
        Ok(session)
    }

    pub async fn find_active_by_access_token(&self, token: &str) -> Result<Option<Session>, DatabaseError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {} FROM sessions WHERE access_token = ? AND is_active = 1",
            SESSION_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn find_active_by_refresh_token(&self, token: &str) -> Result<Option<Session>, DatabaseError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {} FROM sessions WHERE refresh_token = ? AND is_active = 1",
            SESSION_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    /// Replace both tokens of a session and bump its activity
    pub async fn rotate(
        &self,
        session_id: &str,
        access_token: &str,
        refresh_token: &str,
        access_token_expires_at: i64,
        refresh_token_expires_at: i64,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().timestamp();
        let result = sqlx::query(
            "UPDATE sessions SET access_token = ?, refresh_token = ?, access_token_expires_at = ?, \
             refresh_token_expires_at = ?, last_activity = ?, updated_at = ? WHERE id = ? AND is_active = 1",
        )
        .bind(access_token)
        .bind(refresh_token)
        .bind(access_token_expires_at)
        .bind(refresh_token_expires_at)
        .bind(now)
        .bind(now)
        .bind(session_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Session {} is not active", session_id)));
        }
        Ok(())
    }

    /// Returns whether an active session was found for the token
    pub async fn deactivate_by_access_token(&self, token: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE sessions SET is_active = 0, updated_at = ? WHERE access_token = ? AND is_active = 1",
        )
        .bind(Utc::now().timestamp())
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete sessions whose refresh token expired before `now`
    pub async fn delete_expired(&self, now: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM sessions WHERE refresh_token_expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager::DatabaseManager;
    use std::path::PathBuf;

    async fn temp_store() -> (SessionStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("tefi-store-{}", Uuid::new_v4()));
        let pool = DatabaseManager::open_session_store(&dir.join("sessions.db").to_string_lossy())
            .await
            .unwrap();
        (SessionStore::new(pool), dir)
    }

    fn new_session(user: &str, access: &str, refresh: &str, refresh_exp: i64) -> NewSession {
        NewSession {
            user_id: user.to_string(),
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            access_token_expires_at: Utc::now().timestamp() + 900,
            refresh_token_expires_at: refresh_exp,
            user_agent: Some("test".to_string()),
            ip_address: None,
        }
    }

    #[tokio::test]
    async fn new_login_deactivates_previous_session() {
        let (store, dir) = temp_store().await;
        let later = Utc::now().timestamp() + 3600;

        store.create(new_session("u1", "a1", "r1", later)).await.unwrap();
        store.create(new_session("u1", "a2", "r2", later)).await.unwrap();

        assert!(store.find_active_by_access_token("a1").await.unwrap().is_none());
        let active = store.find_active_by_access_token("a2").await.unwrap().unwrap();
        assert_eq!(active.user_id, "u1");
        assert!(active.is_valid());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn rotate_and_deactivate() {
        let (store, dir) = temp_store().await;
        let later = Utc::now().timestamp() + 3600;
        let session = store.create(new_session("u1", "a1", "r1", later)).await.unwrap();

        store.rotate(&session.id, "a2", "r2", later, later).await.unwrap();
        assert!(store.find_active_by_refresh_token("r1").await.unwrap().is_none());
        assert!(store.find_active_by_refresh_token("r2").await.unwrap().is_some());

        assert!(store.deactivate_by_access_token("a2").await.unwrap());
        assert!(!store.deactivate_by_access_token("a2").await.unwrap());
        assert!(matches!(
            store.rotate(&session.id, "a3", "r3", later, later).await,
            Err(DatabaseError::NotFound(_))
        ));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn cleanup_removes_only_expired() {
        let (store, dir) = temp_store().await;
        let now = Utc::now().timestamp();
        store.create(new_session("u1", "a1", "r1", now - 10)).await.unwrap();
        store.create(new_session("u2", "a2", "r2", now + 3600)).await.unwrap();

        assert_eq!(store.delete_expired(now).await.unwrap(), 1);
        assert!(store.find_active_by_access_token("a2").await.unwrap().is_some());

        let _ = std::fs::remove_dir_all(dir);
    }
}

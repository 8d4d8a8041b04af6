use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlPool;
use tracing::{info, warn};

use crate::auth::{generate_jwt, validate_jwt, verify_password, AuthError, Claims, TokenType};
use crate::database::models::user::UserInfo;
use crate::database::models::User;
use crate::database::session_store::NewSession;
use crate::database::{DatabaseManager, SessionStore};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Where a login request came from, stored with the session
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

struct IssuedTokens {
    access_token: String,
    refresh_token: String,
    access_expires_at: i64,
    refresh_expires_at: i64,
    expires_in: i64,
}

/// Login, refresh and logout against SuiteCRM users and the local session store
pub struct AuthService {
    crm_pool: MySqlPool,
    sessions: SessionStore,
}

impl AuthService {
    pub async fn new() -> Result<Self, AuthError> {
        let crm_pool = DatabaseManager::crm_pool().await?;
        let sessions = SessionStore::new(DatabaseManager::session_pool().await?);
        Ok(Self::with_pools(crm_pool, sessions))
    }

    pub fn with_pools(crm_pool: MySqlPool, sessions: SessionStore) -> Self {
        Self { crm_pool, sessions }
    }

    pub async fn login(&self, request: &LoginRequest, client: ClientInfo) -> Result<AuthResponse, AuthError> {
        let user = self
            .find_user_by_name(&request.user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active() {
            warn!("Login refused for inactive user {}", request.user_name);
            return Err(AuthError::InactiveUser);
        }

        let hash = user.user_hash.clone().unwrap_or_default();
        let password = request.password.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .unwrap_or(false);
        if !valid {
            warn!("Invalid password for user {}", request.user_name);
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = issue_tokens(&user)?;
        self.sessions
            .create(NewSession {
                user_id: user.id.clone(),
                access_token: tokens.access_token.clone(),
                refresh_token: tokens.refresh_token.clone(),
                access_token_expires_at: tokens.access_expires_at,
                refresh_token_expires_at: tokens.refresh_expires_at,
                user_agent: client.user_agent,
                ip_address: client.ip_address,
            })
            .await?;

        info!("User {} logged in", request.user_name);
        Ok(auth_response(tokens, &user))
    }

    /// Verify the refresh token and its session, then rotate both tokens
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        validate_jwt(refresh_token, TokenType::Refresh).map_err(|_| AuthError::InvalidRefreshToken)?;

        let session = self
            .sessions
            .find_active_by_refresh_token(refresh_token)
            .await?
            .filter(|s| s.is_valid())
            .ok_or(AuthError::InvalidRefreshToken)?;

        let user = self.validate_user(&session.user_id).await?;
        let tokens = issue_tokens(&user)?;

        self.sessions
            .rotate(
                &session.id,
                &tokens.access_token,
                &tokens.refresh_token,
                tokens.access_expires_at,
                tokens.refresh_expires_at,
            )
            .await?;

        Ok(auth_response(tokens, &user))
    }

    /// Deactivate the session owning `access_token`. Unknown tokens are not an error.
    pub async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        if !self.sessions.deactivate_by_access_token(access_token).await? {
            warn!("Logout for a token without an active session");
        }
        Ok(())
    }

    /// Load a user that may still use the API
    pub async fn validate_user(&self, user_id: &str) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ? AND deleted = 0",
            User::COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.crm_pool)
        .await
        .map_err(crate::database::DatabaseError::from)?;

        match user {
            Some(user) if user.is_active() => Ok(user),
            Some(_) => Err(AuthError::InactiveUser),
            None => Err(AuthError::InvalidCredentials),
        }
    }

    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE user_name = ? AND deleted = 0",
            User::COLUMNS
        ))
        .bind(user_name)
        .fetch_optional(&self.crm_pool)
        .await
        .map_err(crate::database::DatabaseError::from)?;
        Ok(user)
    }
}

fn issue_tokens(user: &User) -> Result<IssuedTokens, AuthError> {
    let access = Claims::access(&user.id, user.user_name.clone(), user.is_admin);
    let refresh = Claims::refresh(&user.id);

    Ok(IssuedTokens {
        access_token: generate_jwt(&access)?,
        refresh_token: generate_jwt(&refresh)?,
        access_expires_at: access.exp,
        refresh_expires_at: refresh.exp,
        expires_in: access.exp - access.iat,
    })
}

fn auth_response(tokens: IssuedTokens, user: &User) -> AuthResponse {
    AuthResponse {
        expires_in: tokens.expires_in,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer",
        user: UserInfo::from(user),
    }
}

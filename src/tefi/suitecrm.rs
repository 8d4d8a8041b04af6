use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::config::TefiConfig;
use super::error::TefiError;
use super::types::{SessionState, SuiteCrmMethod, SuiteCrmRequest, SuiteCrmResponse, APPLICATION_NAME};

/// Owns the SuiteCRM session for one client instance.
///
/// The state lock is held across the login exchange, so concurrent callers
/// wait for one login instead of issuing their own.
pub struct SuiteCrmSession {
    http: Client,
    config: TefiConfig,
    state: Mutex<SessionState>,
}

impl SuiteCrmSession {
    pub fn new(http: Client, config: TefiConfig) -> Self {
        Self {
            http,
            config,
            state: Mutex::new(SessionState::Unauthenticated),
        }
    }

    /// Log in unless a session is already held. Returns the session token.
    ///
    /// On failure the session is left unauthenticated, even when a previous
    /// token existed and `force_refresh` was set.
    pub async fn authenticate(&self, force_refresh: bool) -> Result<String, TefiError> {
        let mut state = self.state.lock().await;

        if !force_refresh {
            if let SessionState::Authenticated(token) = &*state {
                return Ok(token.clone());
            }
        }

        *state = SessionState::Unauthenticated;
        debug!("Authenticating with SuiteCRM as {}", self.config.username);

        match self.login().await {
            Ok(token) => {
                *state = SessionState::Authenticated(token.clone());
                info!("SuiteCRM authentication successful");
                Ok(token)
            }
            Err(e) => {
                error!("SuiteCRM authentication failed: {}", e);
                Err(match e {
                    TefiError::Authentication(msg) => TefiError::Authentication(msg),
                    other => TefiError::Authentication(other.to_string()),
                })
            }
        }
    }

    /// Best-effort remote logout. The local token is always dropped.
    pub async fn logout(&self) {
        let mut state = self.state.lock().await;

        let token = match &*state {
            SessionState::Authenticated(token) => token.clone(),
            SessionState::Unauthenticated => return,
        };

        let result = self
            .call(SuiteCrmMethod::Logout, json!({ "session": token }))
            .await;

        *state = SessionState::Unauthenticated;

        match result {
            Ok(_) => debug!("SuiteCRM logout successful"),
            Err(e) => error!("SuiteCRM logout error (session cleared anyway): {}", e),
        }
    }

    pub async fn session_token(&self) -> Option<String> {
        self.state.lock().await.token().map(str::to_string)
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(*self.state.lock().await, SessionState::Authenticated(_))
    }

    pub async fn clear_session(&self) {
        *self.state.lock().await = SessionState::Unauthenticated;
    }

    /// Clear the session only if it still holds `token`.
    ///
    /// Returns false when another caller already replaced or cleared it.
    pub async fn invalidate(&self, token: &str) -> bool {
        let mut state = self.state.lock().await;
        if state.token() == Some(token) {
            *state = SessionState::Unauthenticated;
            true
        } else {
            false
        }
    }

    async fn login(&self) -> Result<String, TefiError> {
        let args = json!({
            "user_auth": {
                "user_name": self.config.username,
                "password": self.config.password,
            },
            "application_name": APPLICATION_NAME,
            "name_value_list": {},
        });

        let response = self.call(SuiteCrmMethod::Login, args).await?;

        match response.id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => {
                let reason = response
                    .description
                    .or(response.name)
                    .map(|r| format!(" ({})", r))
                    .unwrap_or_default();
                Err(TefiError::Authentication(format!(
                    "No authentication token received{}",
                    reason
                )))
            }
        }
    }

    /// Send one RPC call and check the answer for the invalid-session markers
    async fn call(&self, method: SuiteCrmMethod, args: Value) -> Result<SuiteCrmResponse, TefiError> {
        let request = SuiteCrmRequest::new(method, &args).map_err(|e| {
            TefiError::transport(None, format!("Failed to encode {} arguments: {}", method.as_str(), e))
        })?;

        debug!("SuiteCRM API call: {}", method.as_str());

        let response = self
            .http
            .post(self.config.rest_url())
            .timeout(self.config.rpc_timeout)
            .form(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TefiError::transport(
                Some(status.as_u16()),
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        let body = response.text().await?;
        let value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str::<Value>(&body).map_err(|e| {
                TefiError::transport(
                    Some(status.as_u16()),
                    format!("Malformed {} response: {}", method.as_str(), e),
                )
            })?
        };

        let parsed = SuiteCrmResponse::from_value(value);
        if parsed.is_session_expired() {
            return Err(TefiError::SessionExpired(format!(
                "SuiteCRM rejected {} call: {}",
                method.as_str(),
                parsed.name.as_deref().unwrap_or("Invalid Session ID")
            )));
        }

        Ok(parsed)
    }
}

use std::env;
use std::time::Duration;

use super::error::TefiError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the SuiteCRM instance.
///
/// `password` already holds the MD5 hex digest: the v4.1 REST login expects it
/// that way. It is a wire format, not a credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TefiConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    /// Timeout for login/logout RPC calls
    pub rpc_timeout: Duration,
    /// Optional timeout for the PDF entry point
    pub pdf_timeout: Option<Duration>,
}

impl TefiConfig {
    /// Build a config from a plain-text password
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        plain_password: &str,
    ) -> Result<Self, TefiError> {
        let url = url.into();
        let username = username.into();

        if url.trim().is_empty() || username.trim().is_empty() || plain_password.is_empty() {
            return Err(TefiError::Configuration(
                "Missing TEFI configuration. Check TEFI_URL, TEFI_USERNAME and TEFI_PASSWORD".to_string(),
            ));
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            username,
            password: hash_password(plain_password),
            rpc_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pdf_timeout: None,
        })
    }

    /// Read TEFI_URL, TEFI_USERNAME, TEFI_PASSWORD and the optional timeouts
    pub fn from_env() -> Result<Self, TefiError> {
        let url = env::var("TEFI_URL").unwrap_or_default();
        let username = env::var("TEFI_USERNAME").unwrap_or_default();
        let password = env::var("TEFI_PASSWORD").unwrap_or_default();

        let mut config = Self::new(url, username, &password)?;

        if let Ok(v) = env::var("TEFI_TIMEOUT_SECS") {
            config.rpc_timeout = v
                .parse()
                .map(Duration::from_secs)
                .unwrap_or(config.rpc_timeout);
        }
        if let Ok(v) = env::var("TEFI_PDF_TIMEOUT_SECS") {
            config.pdf_timeout = v.parse().ok().map(Duration::from_secs);
        }

        Ok(config)
    }

    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    pub fn with_pdf_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pdf_timeout = timeout;
        self
    }

    pub fn rest_url(&self) -> String {
        format!("{}{}", self.url, super::types::REST_PATH)
    }

    pub fn pdf_url(&self) -> String {
        format!("{}{}", self.url, super::types::PDF_ENTRY_POINT)
    }
}

/// Unsalted MD5 hex digest, as required by the SuiteCRM login call
pub fn hash_password(password: &str) -> String {
    format!("{:x}", md5::compute(password.as_bytes()))
}

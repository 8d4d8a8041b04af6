//! SuiteCRM ("TEFI") integration client.
//!
//! `TefiService::generate_pdf` is the only entry point most callers need: it
//! makes sure a session exists, requests the PDF, and logs in again once if
//! SuiteCRM reports that the session has expired in the meantime.

pub mod config;
pub mod error;
pub mod pdf;
pub mod suitecrm;
pub mod types;

use async_trait::async_trait;
use reqwest::{redirect, Client};
use tracing::{info, warn};

pub use config::{hash_password, TefiConfig};
pub use error::TefiError;
pub use pdf::PdfGenerator;
pub use suitecrm::SuiteCrmSession;
pub use types::{PdfRequest, SessionState};

/// Upper bound on PDF requests per `generate_pdf` call: the first try plus one after re-login
pub const MAX_PDF_ATTEMPTS: usize = 2;

/// Anything that can turn a FITAC id and a template id into PDF bytes.
///
/// Handlers depend on this rather than on `TefiService` so they can be driven
/// without a live CRM.
#[async_trait]
pub trait PdfSource: Send + Sync {
    async fn generate_pdf(&self, fitac_id: &str, template_id: &str) -> Result<Vec<u8>, TefiError>;
}

pub struct TefiService {
    config: TefiConfig,
    session: SuiteCrmSession,
    pdf: PdfGenerator,
}

impl TefiService {
    /// Build a client with its own HTTP connection pool. Redirects are not followed.
    pub fn new(config: TefiConfig) -> Result<Self, TefiError> {
        let http = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| TefiError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: TefiConfig, http: Client) -> Self {
        Self {
            session: SuiteCrmSession::new(http.clone(), config.clone()),
            pdf: PdfGenerator::new(http),
            config,
        }
    }

    pub fn from_env() -> Result<Self, TefiError> {
        Self::new(TefiConfig::from_env()?)
    }

    pub fn config(&self) -> &TefiConfig {
        &self.config
    }

    pub fn session(&self) -> &SuiteCrmSession {
        &self.session
    }

    pub async fn authenticate(&self, force_refresh: bool) -> Result<String, TefiError> {
        self.session.authenticate(force_refresh).await
    }

    pub async fn logout(&self) {
        self.session.logout().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    pub async fn session_token(&self) -> Option<String> {
        self.session.session_token().await
    }

    /// Drop the local token without telling SuiteCRM. The next call logs in again.
    pub async fn clear_session(&self) {
        self.session.clear_session().await
    }

    /// Produce the PDF for `fitac_id` rendered with `template_id`.
    ///
    /// `SessionExpired` never escapes: it either leads to one more attempt with
    /// a fresh login, or becomes `PdfGeneration` once attempts run out.
    pub async fn generate_pdf(&self, fitac_id: &str, template_id: &str) -> Result<Vec<u8>, TefiError> {
        let request = PdfRequest::new(fitac_id, template_id);

        for attempt in 1..=MAX_PDF_ATTEMPTS {
            let token = self
                .session
                .authenticate(false)
                .await
                .map_err(|e| e.with_context(&request))?;

            match self.pdf.generate_pdf(&self.config, &token, &request).await {
                Ok(bytes) => {
                    if attempt > 1 {
                        info!("PDF for FITAC {} generated after re-authentication", fitac_id);
                    }
                    return Ok(bytes);
                }
                Err(e) if e.is_session_expired() => {
                    self.session.invalidate(&token).await;
                    if attempt < MAX_PDF_ATTEMPTS {
                        warn!(
                            "Session expired, re-authenticating (attempt {}/{})",
                            attempt + 1,
                            MAX_PDF_ATTEMPTS
                        );
                    }
                }
                Err(e) => return Err(e.with_context(&request)),
            }
        }

        Err(TefiError::PdfGeneration(
            "Session expired again after re-authentication".to_string(),
        )
        .with_context(&request))
    }
}

#[async_trait]
impl PdfSource for TefiService {
    async fn generate_pdf(&self, fitac_id: &str, template_id: &str) -> Result<Vec<u8>, TefiError> {
        TefiService::generate_pdf(self, fitac_id, template_id).await
    }
}

use thiserror::Error;

use super::types::PdfRequest;

/// Errors raised by the SuiteCRM integration client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TefiError {
    #[error("TEFI configuration error: {0}")]
    Configuration(String),

    #[error("TEFI authentication error: {0}")]
    Authentication(String),

    /// Retry signal for the orchestrator. Never returned by `TefiService::generate_pdf`.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("TEFI transport error: {message}")]
    Transport { status: Option<u16>, message: String },

    #[error("PDF generation error: {0}")]
    PdfGeneration(String),
}

impl TefiError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        TefiError::Transport {
            status,
            message: message.into(),
        }
    }

    /// Prefix the message with the fitac/template being processed, keeping the variant.
    pub fn with_context(self, request: &PdfRequest) -> Self {
        let prefix = |msg: String| {
            format!(
                "FITAC {} (template {}): {}",
                request.fitac_id, request.template_id, msg
            )
        };

        match self {
            TefiError::Configuration(msg) => TefiError::Configuration(prefix(msg)),
            TefiError::Authentication(msg) => TefiError::Authentication(prefix(msg)),
            TefiError::SessionExpired(msg) => TefiError::SessionExpired(prefix(msg)),
            TefiError::Transport { status, message } => TefiError::Transport {
                status,
                message: prefix(message),
            },
            TefiError::PdfGeneration(msg) => TefiError::PdfGeneration(prefix(msg)),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, TefiError::SessionExpired(_))
    }
}

impl From<reqwest::Error> for TefiError {
    fn from(err: reqwest::Error) -> Self {
        TefiError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

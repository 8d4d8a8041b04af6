use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Client;
use tracing::{debug, error, warn};

use super::config::TefiConfig;
use super::error::TefiError;
use super::types::{cookies_signal_expiry, PdfRequest};

/// Requests rendered PDFs from the SuiteCRM `generatePdf` entry point.
///
/// This endpoint authenticates with the PHP session cookie rather than the
/// RPC envelope, and reports expiry through `set-cookie`, not the status code.
pub struct PdfGenerator {
    http: Client,
}

impl PdfGenerator {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    pub async fn generate_pdf(
        &self,
        config: &TefiConfig,
        session_token: &str,
        request: &PdfRequest,
    ) -> Result<Vec<u8>, TefiError> {
        debug!(
            "Generating PDF for FITAC {} with template {}",
            request.fitac_id, request.template_id
        );

        let result = self.request_pdf(config, session_token, request).await;

        match &result {
            Ok(bytes) => debug!(
                "PDF generated for FITAC {} ({} bytes)",
                request.fitac_id,
                bytes.len()
            ),
            Err(e) if e.is_session_expired() => {
                warn!("SuiteCRM session expired while generating PDF for FITAC {}", request.fitac_id)
            }
            Err(e) => error!("PDF generation failed for FITAC {}: {}", request.fitac_id, e),
        }

        result
    }

    async fn request_pdf(
        &self,
        config: &TefiConfig,
        session_token: &str,
        request: &PdfRequest,
    ) -> Result<Vec<u8>, TefiError> {
        let mut builder = self
            .http
            .post(config.pdf_url())
            .header(COOKIE, session_cookie(session_token))
            .form(&request.form_fields());

        if let Some(timeout) = config.pdf_timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();

        let expired = cookies_signal_expiry(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );
        if expired {
            return Err(TefiError::SessionExpired(
                "Session expired during PDF generation".to_string(),
            ));
        }

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

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

fn session_cookie(session_token: &str) -> String {
    format!("PHPSESSID={}; Path=/;", session_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_session_cookie() {
        assert_eq!(session_cookie("SESS123"), "PHPSESSID=SESS123; Path=/;");
    }
}

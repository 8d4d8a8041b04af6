use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::tefi::TefiService;

use super::error_code;

/// Log in with the configured credentials, then log out
pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let service = TefiService::from_env()?;

    if let Err(e) = service.authenticate(true).await {
        output_error(output_format, &e.to_string(), Some(error_code(&e)))?;
        return Err(e.into());
    }
    service.logout().await;

    output_success(
        output_format,
        &format!("Authenticated against {}", service.config().url),
        Some(json!({ "url": service.config().url })),
    )
}

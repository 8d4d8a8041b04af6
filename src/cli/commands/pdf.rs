use anyhow::Context;
use serde_json::json;
use std::path::PathBuf;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::tefi::TefiService;

use super::error_code;

pub async fn handle(
    fitac_id: &str,
    template_id: &str,
    output: Option<PathBuf>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let service = TefiService::from_env()?;

    let bytes = match service.generate_pdf(fitac_id, template_id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            output_error(output_format, &e.to_string(), Some(error_code(&e)))?;
            return Err(e.into());
        }
    };

    let path = output.unwrap_or_else(|| PathBuf::from(format!("fitac-{}.pdf", fitac_id)));
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    service.logout().await;

    output_success(
        output_format,
        &format!("Wrote {} ({} bytes)", path.display(), bytes.len()),
        Some(json!({
            "path": path.display().to_string(),
            "bytes": bytes.len(),
            "fitacId": fitac_id,
            "templateId": template_id
        })),
    )
}

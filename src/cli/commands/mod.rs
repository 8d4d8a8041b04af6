pub mod check;
pub mod pdf;

use crate::tefi::TefiError;

/// Stable code for `--json` error output
pub(crate) fn error_code(err: &TefiError) -> &'static str {
    match err {
        TefiError::Configuration(_) => "CONFIGURATION",
        TefiError::Authentication(_) => "AUTHENTICATION",
        TefiError::SessionExpired(_) => "SESSION_EXPIRED",
        TefiError::Transport { .. } => "TRANSPORT",
        TefiError::PdfGeneration(_) => "PDF_GENERATION",
    }
}

// handlers/protected/fitac.rs - /api/fitac/*

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::FITAC;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::pagination::{parse_relations, PaginatedResponse, PaginationQuery, RelationsQuery};
use crate::services::FitacService;

/// GET /api/fitac
pub async fn list(Query(query): Query<PaginationQuery>) -> ApiResult<PaginatedResponse<Value>> {
    let page = query.resolve(&FITAC)?;
    let service = FitacService::new().await?;
    Ok(ApiResponse::success(service.find_all(&page).await?))
}

/// GET /api/fitac/status/:statusId
pub async fn by_status(
    Path(status_id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<PaginatedResponse<Value>> {
    let page = query.resolve(&FITAC)?;
    let service = FitacService::new().await?;
    Ok(ApiResponse::success(service.find_by_status(&status_id, &page).await?))
}

/// GET /api/fitac/assigned/:userId
pub async fn by_assigned_user(
    Path(user_id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<PaginatedResponse<Value>> {
    let page = query.resolve(&FITAC)?;
    let service = FitacService::new().await?;
    Ok(ApiResponse::success(service.find_by_assigned_user(&user_id, &page).await?))
}

/// GET /api/fitac/document-name/:documentName
pub async fn by_document_name(
    Path(document_name): Path<String>,
    Query(query): Query<RelationsQuery>,
) -> ApiResult<Value> {
    let relations = parse_relations(query.relations.as_deref(), &FITAC)?;
    let service = FitacService::new().await?;
    Ok(ApiResponse::success(
        service.find_by_document_name(&document_name, &relations).await?,
    ))
}

/// GET /api/fitac/:id
pub async fn get(Path(id): Path<String>, Query(query): Query<RelationsQuery>) -> ApiResult<Value> {
    let relations = parse_relations(query.relations.as_deref(), &FITAC)?;
    let service = FitacService::new().await?;
    Ok(ApiResponse::success(service.find_one(&id, &relations).await?))
}

/// POST /api/fitac/:id/generate-pdf/:templateId
///
/// Streams the rendered document back as an `application/pdf` attachment.
/// A missing record is a 404; any TEFI failure is a 502 carrying its message.
pub async fn generate_pdf(
    State(state): State<AppState>,
    Path((id, template_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let service = FitacService::new().await?;
    let bytes = service.generate_pdf(&id, &template_id, state.pdf.as_ref()).await?;
    Ok(pdf_response(&id, bytes))
}

pub fn pdf_response(id: &str, bytes: Vec<u8>) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"fitac-{}.pdf\"", id))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"fitac.pdf\""));

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

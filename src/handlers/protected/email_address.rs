use axum::extract::{Path, Query};
use serde_json::Value;

use crate::database::models::EMAIL_ADDRESS;
use crate::middleware::{ApiResponse, ApiResult};
use crate::pagination::{parse_relations, PaginatedResponse, PaginationQuery, RelationsQuery};
use crate::services::EmailAddressService;

/// GET /api/email-address
pub async fn list(Query(query): Query<PaginationQuery>) -> ApiResult<PaginatedResponse<Value>> {
    let page = query.resolve(&EMAIL_ADDRESS)?;
    let service = EmailAddressService::new().await?;
    Ok(ApiResponse::success(service.find_all(&page).await?))
}

/// GET /api/email-address/email/:email
pub async fn by_email(Path(email): Path<String>, Query(query): Query<RelationsQuery>) -> ApiResult<Value> {
    let relations = parse_relations(query.relations.as_deref(), &EMAIL_ADDRESS)?;
    let service = EmailAddressService::new().await?;
    Ok(ApiResponse::success(service.find_by_email(&email, &relations).await?))
}

/// GET /api/email-address/:id
pub async fn get(Path(id): Path<String>, Query(query): Query<RelationsQuery>) -> ApiResult<Value> {
    let relations = parse_relations(query.relations.as_deref(), &EMAIL_ADDRESS)?;
    let service = EmailAddressService::new().await?;
    Ok(ApiResponse::success(service.find_one(&id, &relations).await?))
}

/// GET /api/email-address/:id/contacts
pub async fn contacts(Path(id): Path<String>) -> ApiResult<Vec<Value>> {
    let service = EmailAddressService::new().await?;
    Ok(ApiResponse::success(service.contacts(&id).await?))
}

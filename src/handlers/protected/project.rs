use axum::extract::{Path, Query};
use serde_json::Value;

use crate::database::models::PROJECT;
use crate::middleware::{ApiResponse, ApiResult};
use crate::pagination::{parse_relations, PaginatedResponse, PaginationQuery, RelationsQuery};
use crate::services::ProjectService;

/// GET /api/project
pub async fn list(Query(query): Query<PaginationQuery>) -> ApiResult<PaginatedResponse<Value>> {
    let page = query.resolve(&PROJECT)?;
    let service = ProjectService::new().await?;
    Ok(ApiResponse::success(service.find_all(&page).await?))
}

/// GET /api/project/assigned/:userId
pub async fn by_assigned_user(
    Path(user_id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<PaginatedResponse<Value>> {
    let page = query.resolve(&PROJECT)?;
    let service = ProjectService::new().await?;
    Ok(ApiResponse::success(service.find_by_assigned_user(&user_id, &page).await?))
}

/// GET /api/project/search/:name
pub async fn search(
    Path(name): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<PaginatedResponse<Value>> {
    let page = query.resolve(&PROJECT)?;
    let service = ProjectService::new().await?;
    Ok(ApiResponse::success(service.find_by_name(&name, &page).await?))
}

/// GET /api/project/:id
pub async fn get(Path(id): Path<String>, Query(query): Query<RelationsQuery>) -> ApiResult<Value> {
    let relations = parse_relations(query.relations.as_deref(), &PROJECT)?;
    let service = ProjectService::new().await?;
    Ok(ApiResponse::success(service.find_one(&id, &relations).await?))
}

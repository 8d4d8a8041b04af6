//! Query-string pagination, sorting and relation selection for list endpoints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::database::models::EntityDef;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be greater than or equal to 1")]
    InvalidPage,

    #[error("limit must be between 1 and {0}")]
    InvalidLimit(u32),

    #[error("cannot sort {entity} by '{field}'")]
    UnknownSortField { entity: &'static str, field: String },

    #[error("sortOrder must be 'asc' or 'desc', got '{0}'")]
    InvalidSortOrder(String),

    #[error("unknown relation '{relation}' for {entity}; allowed: {allowed}")]
    UnknownRelation {
        entity: &'static str,
        relation: String,
        allowed: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Raw `?page=&limit=&sortBy=&sortOrder=&relations=` parameters.
///
/// `page` and `limit` stay strings so malformed numbers are reported as
/// `PaginationError` instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub relations: Option<String>,
}

/// `?relations=` on single-record endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationsQuery {
    pub relations: Option<String>,
}

/// Validated page request with the sort field already mapped to a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort_column: &'static str,
    pub sort_order: SortOrder,
    pub relations: Vec<&'static str>,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl PaginationQuery {
    pub fn resolve(&self, entity: &'static EntityDef) -> Result<PageRequest, PaginationError> {
        let api = &config::config().api;
        self.resolve_with(entity, api.default_page_size, api.max_page_size)
    }

    /// Limits above `max_limit` are clamped; zero is rejected.
    pub fn resolve_with(
        &self,
        entity: &'static EntityDef,
        default_limit: u32,
        max_limit: u32,
    ) -> Result<PageRequest, PaginationError> {
        let page = match parse_number(self.page.as_deref()) {
            None => 1,
            Some(Some(page)) if page >= 1 => page,
            Some(_) => return Err(PaginationError::InvalidPage),
        };

        let limit = match parse_number(self.limit.as_deref()) {
            None => default_limit.min(max_limit),
            Some(Some(limit)) if limit >= 1 => limit.min(max_limit),
            Some(_) => return Err(PaginationError::InvalidLimit(max_limit)),
        };

        let sort_field = self.sort_by.as_deref().unwrap_or(entity.default_sort);
        let sort_column = entity
            .column_for_field(sort_field)
            .ok_or_else(|| PaginationError::UnknownSortField {
                entity: entity.name,
                field: sort_field.to_string(),
            })?;

        let sort_order = match self.sort_order.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("desc") => SortOrder::Desc,
            Some("asc") => SortOrder::Asc,
            Some(other) => return Err(PaginationError::InvalidSortOrder(other.to_string())),
        };

        Ok(PageRequest {
            page,
            limit,
            sort_column,
            sort_order,
            relations: parse_relations(self.relations.as_deref(), entity)?,
        })
    }
}

/// `None` when absent or blank, `Some(None)` when present but not a non-negative integer
fn parse_number(raw: Option<&str>) -> Option<Option<u32>> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty())?;
    Some(raw.parse::<u32>().ok())
}

/// Split a comma-separated relation list, check it against the entity and add its defaults
pub fn parse_relations(
    raw: Option<&str>,
    entity: &'static EntityDef,
) -> Result<Vec<&'static str>, PaginationError> {
    let mut relations: Vec<&'static str> = entity.default_relations.to_vec();

    for name in raw.unwrap_or_default().split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let relation = entity.relation(name).ok_or_else(|| PaginationError::UnknownRelation {
            entity: entity.name,
            relation: name.to_string(),
            allowed: entity.relation_names().join(", "),
        })?;
        if !relations.contains(&relation.name) {
            relations.push(relation.name);
        }
    }

    Ok(relations)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, request: &PageRequest) -> Self {
        let limit = i64::from(request.limit.max(1));
        let total_pages = (total + limit - 1) / limit;
        let page = i64::from(request.page);

        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

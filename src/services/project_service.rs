use serde_json::Value;
use sqlx::mysql::MySqlPool;

use crate::database::models::PROJECT;
use crate::database::{DatabaseError, DatabaseManager, Repository};
use crate::pagination::{PageRequest, PaginatedResponse};

pub struct ProjectService {
    repo: Repository,
}

impl ProjectService {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self::with_pool(DatabaseManager::crm_pool().await?))
    }

    pub fn with_pool(pool: MySqlPool) -> Self {
        Self {
            repo: Repository::new(&PROJECT, pool),
        }
    }

    pub async fn find_all(&self, page: &PageRequest) -> Result<PaginatedResponse<Value>, DatabaseError> {
        self.repo.select_page(self.repo.query(), page).await
    }

    pub async fn find_one(&self, id: &str, relations: &[&'static str]) -> Result<Value, DatabaseError> {
        self.repo
            .select_404(self.repo.query().where_eq("id", id), relations, || {
                format!("Project with ID {} not found", id)
            })
            .await
    }

    pub async fn find_by_assigned_user(
        &self,
        user_id: &str,
        page: &PageRequest,
    ) -> Result<PaginatedResponse<Value>, DatabaseError> {
        self.repo
            .select_page(self.repo.query().where_eq("assigned_user_id", user_id), page)
            .await
    }

    /// Projects are named by their document name
    pub async fn find_by_name(&self, name: &str, page: &PageRequest) -> Result<PaginatedResponse<Value>, DatabaseError> {
        self.repo
            .select_page(self.repo.query().where_contains_any(&["document_name"], name), page)
            .await
    }
}

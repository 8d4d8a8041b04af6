use serde_json::Value;
use sqlx::mysql::MySqlPool;
use thiserror::Error;
use tracing::info;

use crate::database::models::FITAC;
use crate::database::{DatabaseError, DatabaseManager, Repository};
use crate::pagination::{PageRequest, PaginatedResponse};
use crate::tefi::{PdfSource, TefiError};

#[derive(Debug, Error)]
pub enum FitacPdfError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Tefi(#[from] TefiError),
}

pub struct FitacService {
    repo: Repository,
}

impl FitacService {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self::with_pool(DatabaseManager::crm_pool().await?))
    }

    pub fn with_pool(pool: MySqlPool) -> Self {
        Self {
            repo: Repository::new(&FITAC, pool),
        }
    }

    pub async fn find_all(&self, page: &PageRequest) -> Result<PaginatedResponse<Value>, DatabaseError> {
        self.repo.select_page(self.repo.query(), page).await
    }

    pub async fn find_one(&self, id: &str, relations: &[&'static str]) -> Result<Value, DatabaseError> {
        self.repo
            .select_404(self.repo.query().where_eq("id", id), relations, || {
                format!("Fitac with ID {} not found", id)
            })
            .await
    }

    pub async fn find_by_status(
        &self,
        status_id: &str,
        page: &PageRequest,
    ) -> Result<PaginatedResponse<Value>, DatabaseError> {
        self.repo
            .select_page(self.repo.query().where_eq("status_id", status_id), page)
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

    /// Exact match on the trimmed document name
    pub async fn find_by_document_name(
        &self,
        document_name: &str,
        relations: &[&'static str],
    ) -> Result<Value, DatabaseError> {
        let document_name = document_name.trim();
        self.repo
            .select_404(
                self.repo.query().where_eq("document_name", document_name),
                relations,
                || format!("Fitac with document name {} not found", document_name),
            )
            .await
    }

    /// Check the record exists, then render it remotely with `template_id`
    pub async fn generate_pdf(
        &self,
        id: &str,
        template_id: &str,
        pdf: &dyn PdfSource,
    ) -> Result<Vec<u8>, FitacPdfError> {
        self.find_one(id, &[]).await?;

        let bytes = pdf.generate_pdf(id, template_id).await?;
        info!("Generated PDF for fitac {} ({} bytes)", id, bytes.len());
        Ok(bytes)
    }
}

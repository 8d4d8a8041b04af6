use serde_json::Value;
use sqlx::mysql::MySqlPool;

use crate::database::models::EMAIL_ADDRESS;
use crate::database::{DatabaseError, DatabaseManager, Repository};
use crate::pagination::{PageRequest, PaginatedResponse};

pub struct EmailAddressService {
    repo: Repository,
}

impl EmailAddressService {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self::with_pool(DatabaseManager::crm_pool().await?))
    }

    pub fn with_pool(pool: MySqlPool) -> Self {
        Self {
            repo: Repository::new(&EMAIL_ADDRESS, pool),
        }
    }

    pub async fn find_all(&self, page: &PageRequest) -> Result<PaginatedResponse<Value>, DatabaseError> {
        self.repo.select_page(self.repo.query(), page).await
    }

    pub async fn find_one(&self, id: &str, relations: &[&'static str]) -> Result<Value, DatabaseError> {
        self.repo
            .select_404(self.repo.query().where_eq("id", id), relations, || {
                format!("Email address with ID {} not found", id)
            })
            .await
    }

    pub async fn find_by_email(&self, email: &str, relations: &[&'static str]) -> Result<Value, DatabaseError> {
        let normalized = normalize_email(email);
        self.repo
            .select_404(
                self.repo.query().where_eq("email_address", normalized.as_str()),
                relations,
                || format!("Email address {} not found", email),
            )
            .await
    }

    /// Contacts linked to the address
    pub async fn contacts(&self, id: &str) -> Result<Vec<Value>, DatabaseError> {
        let mut record = self.find_one(id, &["contacts"]).await?;
        match record.get_mut("contacts").map(Value::take) {
            Some(Value::Array(contacts)) => Ok(contacts),
            _ => Ok(Vec::new()),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

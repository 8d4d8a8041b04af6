use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// SuiteCRM `users` row, limited to what login and profile need
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub user_name: Option<String>,
    #[serde(skip_serializing)]
    pub user_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: bool,
    pub status: Option<String>,
    pub deleted: bool,
}

impl User {
    pub const COLUMNS: &'static str =
        "id, user_name, user_hash, first_name, last_name, is_admin, status, deleted";

    pub fn is_active(&self) -> bool {
        !self.deleted && self.status.as_deref() == Some("Active")
    }

    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// User data returned to clients after login or refresh
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: String,
    pub is_admin: bool,
    pub status: Option<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            user_name: user.user_name.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            is_admin: user.is_admin,
            status: user.status.clone(),
        }
    }
}

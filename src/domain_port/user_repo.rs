use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        username: &str,
        email: &str,
    ) -> Result<(), AuthError>;

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, AuthError>;

    async fn conflict_exists(&self, username: &str, email: &str) -> Result<bool, AuthError>;
}

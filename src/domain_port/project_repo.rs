use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub project_id: ProjectId,
    pub owner_id: UserId,
    pub title: String,
    pub short_description: String,
    pub long_description: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait ProjectRepo: Send + Sync {
    async fn create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        project: &ProjectRecord,
    ) -> Result<(), ProjectError>;

    async fn get_by_id(&self, project_id: ProjectId)
    -> Result<Option<ProjectRecord>, ProjectError>;

    async fn get_by_owner(&self, owner_id: UserId)
    -> Result<Option<ProjectRecord>, ProjectError>;

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<ProjectRecord>, ProjectError>;

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        project_id: ProjectId,
    ) -> Result<(), ProjectError>;
}

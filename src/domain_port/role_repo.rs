use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

#[derive(Debug, Clone)]
pub struct RoleRecord {
    pub role_id: RoleId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
}

#[async_trait::async_trait]
pub trait RoleRepo: Send + Sync {
    async fn create_roles_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        roles: &[RoleRecord],
    ) -> Result<(), ProjectError>;

    async fn delete_by_project_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        project_id: ProjectId,
    ) -> Result<(), ProjectError>;
}

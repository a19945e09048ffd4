use crate::domain_model::*;
use crate::domain_port::ProjectRecord;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("user already owns a project")]
    AlreadyOwner,
    #[error("project not found")]
    NotFound,
    #[error("requester does not own the project")]
    NotOwner,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone)]
pub struct RoleInput {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    pub title: String,
    pub short_description: String,
    pub long_description: String,
    pub roles: Vec<RoleInput>,
}

#[async_trait::async_trait]
pub trait ProjectService: Send + Sync {
    /// Create a project with its roles. Each user owns at most one project.
    async fn create_project(
        &self,
        input: CreateProjectInput,
        owner: UserId,
    ) -> Result<ProjectId, ProjectError>;

    async fn list_projects(&self, offset: u64, limit: u64)
    -> Result<Vec<ProjectRecord>, ProjectError>;

    /// Delete a project owned by the requester, along with its roles.
    async fn delete_project(
        &self,
        project_id: ProjectId,
        requester: UserId,
    ) -> Result<(), ProjectError>;
}

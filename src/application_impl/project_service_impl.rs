use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::{ProjectRecord, ProjectRepo, RoleRecord, RoleRepo, TxManager};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct RealProjectService {
    project_repo: Arc<dyn ProjectRepo>,
    role_repo: Arc<dyn RoleRepo>,
    tx_manager: Arc<dyn TxManager>,
}

impl RealProjectService {
    pub fn new(
        project_repo: Arc<dyn ProjectRepo>,
        role_repo: Arc<dyn RoleRepo>,
        tx_manager: Arc<dyn TxManager>,
    ) -> Self {
        Self {
            project_repo,
            role_repo,
            tx_manager,
        }
    }
}

#[async_trait::async_trait]
impl ProjectService for RealProjectService {
    async fn create_project(
        &self,
        input: CreateProjectInput,
        owner: UserId,
    ) -> Result<ProjectId, ProjectError> {
        // Each user owns at most one project.
        if self.project_repo.get_by_owner(owner).await?.is_some() {
            return Err(ProjectError::AlreadyOwner);
        }

        let project_id = ProjectId(Uuid::new_v4());
        let project = ProjectRecord {
            project_id,
            owner_id: owner,
            title: input.title,
            short_description: input.short_description,
            long_description: input.long_description,
            created_at: Utc::now(),
        };
        let roles: Vec<RoleRecord> = input
            .roles
            .into_iter()
            .map(|role| RoleRecord {
                role_id: RoleId(Uuid::new_v4()),
                project_id,
                title: role.title,
                description: role.description,
                skills: role.skills,
            })
            .collect();

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| ProjectError::Store(e.to_string()))?;

        self.project_repo.create_in_tx(tx.as_mut(), &project).await?;
        self.role_repo
            .create_roles_in_tx(tx.as_mut(), &roles)
            .await?;

        tx.commit()
            .await
            .map_err(|e| ProjectError::Store(e.to_string()))?;

        Ok(project_id)
    }

    async fn list_projects(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ProjectRecord>, ProjectError> {
        self.project_repo.list(offset, limit).await
    }

    async fn delete_project(
        &self,
        project_id: ProjectId,
        requester: UserId,
    ) -> Result<(), ProjectError> {
        let project = self
            .project_repo
            .get_by_id(project_id)
            .await?
            .ok_or(ProjectError::NotFound)?;

        if project.owner_id != requester {
            return Err(ProjectError::NotOwner);
        }

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| ProjectError::Store(e.to_string()))?;

        self.role_repo
            .delete_by_project_in_tx(tx.as_mut(), project_id)
            .await?;
        self.project_repo
            .delete_in_tx(tx.as_mut(), project_id)
            .await?;

        tx.commit()
            .await
            .map_err(|e| ProjectError::Store(e.to_string()))?;

        Ok(())
    }
}

use super::util::downcast;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
// Roles are only ever written alongside their project, so every operation
// runs on the surrounding transaction and no pool handle is needed.
pub struct MySqlRoleRepo;

impl MySqlRoleRepo {
    pub fn new() -> Self {
        MySqlRoleRepo
    }
}

impl Default for MySqlRoleRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RoleRepo for MySqlRoleRepo {
    async fn create_roles_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        roles: &[RoleRecord],
    ) -> Result<(), ProjectError> {
        let tx = downcast(tx);

        for role in roles {
            let skills = serde_json::to_string(&role.skills)
                .map_err(|e| ProjectError::InternalError(e.to_string()))?;

            sqlx::query(
                r#"
INSERT INTO project_role (role_id, project_id, title, description, skills)
VALUES (?, ?, ?, ?, ?)
"#,
            )
            .bind(role.role_id)
            .bind(role.project_id)
            .bind(&role.title)
            .bind(&role.description)
            .bind(skills)
            .execute(tx.conn())
            .await
            .map_err(|e| ProjectError::Store(e.to_string()))?;
        }

        Ok(())
    }

    async fn delete_by_project_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        project_id: ProjectId,
    ) -> Result<(), ProjectError> {
        let tx = downcast(tx);

        sqlx::query("DELETE FROM project_role WHERE project_id = ?")
            .bind(project_id)
            .execute(tx.conn())
            .await
            .map_err(|e| ProjectError::Store(e.to_string()))?;

        Ok(())
    }
}

use super::util::{downcast, is_dup_key};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlProjectRepo {
    pool: MySqlPool,
}

impl MySqlProjectRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlProjectRepo { pool }
    }

    fn row_to_record(row: MySqlRow) -> Result<ProjectRecord, ProjectError> {
        let project_id: ProjectId = row
            .try_get("project_id")
            .map_err(|e| ProjectError::Store(e.to_string()))?;
        let owner_id: UserId = row
            .try_get("owner_id")
            .map_err(|e| ProjectError::Store(e.to_string()))?;
        let title: String = row
            .try_get("title")
            .map_err(|e| ProjectError::Store(e.to_string()))?;
        let short_description: String = row
            .try_get("short_description")
            .map_err(|e| ProjectError::Store(e.to_string()))?;
        let long_description: String = row
            .try_get("long_description")
            .map_err(|e| ProjectError::Store(e.to_string()))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| ProjectError::Store(e.to_string()))?;

        Ok(ProjectRecord {
            project_id,
            owner_id,
            title,
            short_description,
            long_description,
            created_at,
        })
    }
}

const SELECT_PROJECT: &str = r#"
SELECT project_id, owner_id, title, short_description, long_description, created_at
FROM project
"#;

#[async_trait::async_trait]
impl ProjectRepo for MySqlProjectRepo {
    async fn create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        project: &ProjectRecord,
    ) -> Result<(), ProjectError> {
        let tx = downcast(tx);

        sqlx::query(
            r#"
INSERT INTO project (project_id, owner_id, title, short_description, long_description)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(project.project_id)
        .bind(project.owner_id)
        .bind(&project.title)
        .bind(&project.short_description)
        .bind(&project.long_description)
        .execute(tx.conn())
        .await
        .map_err(|e| {
            // owner_id carries a unique index; losing the race to another
            // insert surfaces the same way as the pre-check.
            if is_dup_key(&e) {
                ProjectError::AlreadyOwner
            } else {
                ProjectError::Store(e.to_string())
            }
        })?;

        Ok(())
    }

    async fn get_by_id(
        &self,
        project_id: ProjectId,
    ) -> Result<Option<ProjectRecord>, ProjectError> {
        let row_opt: Option<MySqlRow> =
            sqlx::query(&format!("{SELECT_PROJECT} WHERE project_id = ?"))
                .bind(project_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| ProjectError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn get_by_owner(&self, owner_id: UserId) -> Result<Option<ProjectRecord>, ProjectError> {
        let row_opt: Option<MySqlRow> = sqlx::query(&format!("{SELECT_PROJECT} WHERE owner_id = ?"))
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ProjectError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<ProjectRecord>, ProjectError> {
        let rows = sqlx::query(&format!(
            "{SELECT_PROJECT} ORDER BY created_at, project_id LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProjectError::Store(e.to_string()))?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        project_id: ProjectId,
    ) -> Result<(), ProjectError> {
        let tx = downcast(tx);

        sqlx::query("DELETE FROM project WHERE project_id = ?")
            .bind(project_id)
            .execute(tx.conn())
            .await
            .map_err(|e| ProjectError::Store(e.to_string()))?;

        Ok(())
    }
}

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::project::Project;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: Project) -> Result<Project, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError>;
    async fn find_all_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, DomainError>;
    async fn update(&self, project: Project) -> Result<Option<Project>, DomainError>;
    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError>;
}

#[derive(Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn create(&self, project: Project) -> Result<Project, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, user_id, name, hourly_rate, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(project.id)
        .bind(project.user_id)
        .bind(&project.name)
        .bind(project.hourly_rate)
        .bind(project.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create project: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(project_id = %project.id, user_id = %project.user_id, "project created");
        Ok(project)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, name, hourly_rate, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find project by id {}: {}", id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn find_all_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, DomainError> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, name, hourly_rate, created_at, updated_at
            FROM projects
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to list projects for user {}: {}", user_id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn update(&self, project: Project) -> Result<Option<Project>, DomainError> {
        let now = Utc::now();
        let updated = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $2, hourly_rate = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, user_id, name, hourly_rate, created_at, updated_at
            "#,
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(project.hourly_rate)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update project {}: {}", project.id, e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        if updated.is_some() {
            info!(project_id = %project.id, "project updated");
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete project {}: {}", id, e);
                DomainError::Internal(format!("database error: {}", e))
            })?;

        info!(project_id = %id, "project deleted");
        Ok(())
    }
}

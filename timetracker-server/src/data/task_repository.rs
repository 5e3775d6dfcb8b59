use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::task::{OwnedTask, Task};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: Task) -> Result<Task, DomainError>;
    /// Resolves the task together with its project's owner so callers can
    /// authorize through the ownership chain in one lookup.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OwnedTask>, DomainError>;
    async fn find_all_for_project(&self, project_id: Uuid) -> Result<Vec<Task>, DomainError>;
    async fn update(&self, task: Task) -> Result<Option<Task>, DomainError>;
    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError>;
}

#[derive(Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, project_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            "#,
        )
        .bind(task.id)
        .bind(task.project_id)
        .bind(&task.name)
        .bind(task.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create task: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(task_id = %task.id, project_id = %task.project_id, "task created");
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OwnedTask>, DomainError> {
        sqlx::query_as::<_, OwnedTask>(
            r#"
            SELECT t.id, t.project_id, t.name, t.created_at, t.updated_at,
                   p.user_id AS owner_id
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find task by id {}: {}", id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn find_all_for_project(&self, project_id: Uuid) -> Result<Vec<Task>, DomainError> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, name, created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to list tasks for project {}: {}", project_id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn update(&self, task: Task) -> Result<Option<Task>, DomainError> {
        let now = Utc::now();
        let updated = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET name = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, project_id, name, created_at, updated_at
            "#,
        )
        .bind(task.id)
        .bind(&task.name)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update task {}: {}", task.id, e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        if updated.is_some() {
            info!(task_id = %task.id, "task updated");
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete task {}: {}", id, e);
                DomainError::Internal(format!("database error: {}", e))
            })?;

        info!(task_id = %id, "task deleted");
        Ok(())
    }
}

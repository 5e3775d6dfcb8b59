use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::time_entry::{ActiveEntry, TimeEntry};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimeEntryRepository: Send + Sync {
    async fn create(&self, entry: TimeEntry) -> Result<TimeEntry, DomainError>;
    /// Inserts a running entry only while the user has none; returns `None`
    /// when the store-side guard blocked the insert.
    async fn create_running(&self, entry: TimeEntry) -> Result<Option<TimeEntry>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TimeEntry>, DomainError>;
    async fn find_active_for_user(&self, user_id: Uuid)
    -> Result<Option<ActiveEntry>, DomainError>;
    /// Closes the entry only while it is still running; returns `None` when a
    /// concurrent stop already closed it.
    async fn close(
        &self,
        id: Uuid,
        end_time: DateTime<Utc>,
        duration: i64,
        cost: Option<Decimal>,
    ) -> Result<Option<TimeEntry>, DomainError>;
    async fn find_all_for_user(&self, user_id: Uuid) -> Result<Vec<TimeEntry>, DomainError>;
    async fn find_for_task(&self, task_id: Uuid) -> Result<Vec<TimeEntry>, DomainError>;
    async fn find_for_project_between(
        &self,
        project_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, DomainError>;
    async fn update(&self, entry: TimeEntry) -> Result<Option<TimeEntry>, DomainError>;
    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError>;
}

#[derive(Clone)]
pub struct PostgresTimeEntryRepository {
    pool: PgPool,
}

impl PostgresTimeEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimeEntryRepository for PostgresTimeEntryRepository {
    async fn create(&self, entry: TimeEntry) -> Result<TimeEntry, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO time_entries (id, task_id, user_id, start_time, end_time, duration, cost)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(entry.task_id)
        .bind(entry.user_id)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(entry.duration)
        .bind(entry.cost)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create time entry: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(entry_id = %entry.id, user_id = %entry.user_id, "time entry created");
        Ok(entry)
    }

    async fn create_running(&self, entry: TimeEntry) -> Result<Option<TimeEntry>, DomainError> {
        // the NOT EXISTS guard re-checks the one-running-entry-per-user
        // invariant inside the insert itself
        let inserted = sqlx::query_as::<_, TimeEntry>(
            r#"
            INSERT INTO time_entries (id, task_id, user_id, start_time)
            SELECT $1, $2, $3, $4
            WHERE NOT EXISTS (
                SELECT 1 FROM time_entries WHERE user_id = $3 AND end_time IS NULL
            )
            RETURNING id, task_id, user_id, start_time, end_time, duration, cost
            "#,
        )
        .bind(entry.id)
        .bind(entry.task_id)
        .bind(entry.user_id)
        .bind(entry.start_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to start time entry: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        if let Some(ref entry) = inserted {
            info!(entry_id = %entry.id, user_id = %entry.user_id, "time entry started");
        }
        Ok(inserted)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TimeEntry>, DomainError> {
        sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, task_id, user_id, start_time, end_time, duration, cost
            FROM time_entries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find time entry by id {}: {}", id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn find_active_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ActiveEntry>, DomainError> {
        sqlx::query_as::<_, ActiveEntry>(
            r#"
            SELECT te.id, te.task_id, te.user_id, te.start_time, te.end_time,
                   te.duration, te.cost, p.hourly_rate
            FROM time_entries te
            JOIN tasks t ON t.id = te.task_id
            JOIN projects p ON p.id = t.project_id
            WHERE te.user_id = $1 AND te.end_time IS NULL
            ORDER BY te.start_time DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find active entry for user {}: {}", user_id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn close(
        &self,
        id: Uuid,
        end_time: DateTime<Utc>,
        duration: i64,
        cost: Option<Decimal>,
    ) -> Result<Option<TimeEntry>, DomainError> {
        // end_time IS NULL keeps the close a single atomic read-modify-write;
        // a stop that lost the race updates zero rows
        let closed = sqlx::query_as::<_, TimeEntry>(
            r#"
            UPDATE time_entries
            SET end_time = $2, duration = $3, cost = $4
            WHERE id = $1 AND end_time IS NULL
            RETURNING id, task_id, user_id, start_time, end_time, duration, cost
            "#,
        )
        .bind(id)
        .bind(end_time)
        .bind(duration)
        .bind(cost)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to close time entry {}: {}", id, e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        if closed.is_some() {
            info!(entry_id = %id, duration, "time entry stopped");
        }
        Ok(closed)
    }

    async fn find_all_for_user(&self, user_id: Uuid) -> Result<Vec<TimeEntry>, DomainError> {
        sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, task_id, user_id, start_time, end_time, duration, cost
            FROM time_entries
            WHERE user_id = $1
            ORDER BY start_time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to list time entries for user {}: {}", user_id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn find_for_task(&self, task_id: Uuid) -> Result<Vec<TimeEntry>, DomainError> {
        sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, task_id, user_id, start_time, end_time, duration, cost
            FROM time_entries
            WHERE task_id = $1
            ORDER BY start_time DESC
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to list time entries for task {}: {}", task_id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn find_for_project_between(
        &self,
        project_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, DomainError> {
        sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT te.id, te.task_id, te.user_id, te.start_time, te.end_time,
                   te.duration, te.cost
            FROM time_entries te
            JOIN tasks t ON t.id = te.task_id
            WHERE t.project_id = $1 AND te.start_time BETWEEN $2 AND $3
            ORDER BY te.start_time DESC
            "#,
        )
        .bind(project_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "failed to list time entries for project {}: {}",
                project_id, e
            );
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn update(&self, entry: TimeEntry) -> Result<Option<TimeEntry>, DomainError> {
        let updated = sqlx::query_as::<_, TimeEntry>(
            r#"
            UPDATE time_entries
            SET task_id = $2, start_time = $3, end_time = $4, duration = $5, cost = $6
            WHERE id = $1
            RETURNING id, task_id, user_id, start_time, end_time, duration, cost
            "#,
        )
        .bind(entry.id)
        .bind(entry.task_id)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(entry.duration)
        .bind(entry.cost)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update time entry {}: {}", entry.id, e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        if updated.is_some() {
            info!(entry_id = %entry.id, "time entry updated");
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM time_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete time entry {}: {}", id, e);
                DomainError::Internal(format!("database error: {}", e))
            })?;

        info!(entry_id = %id, "time entry deleted");
        Ok(())
    }
}

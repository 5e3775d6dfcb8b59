use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ownership::resolve_owned;
use crate::data::project_repository::ProjectRepository;
use crate::data::task_repository::TaskRepository;
use crate::data::time_entry_repository::TimeEntryRepository;
use crate::data::user_repository::UserRepository;
use crate::datetime;
use crate::domain::time_entry::{TimeEntry, entry_cost};
use crate::domain::{error::DomainError, user::User};
use crate::presentation::dto::TimeEntryRequest;

#[derive(Clone)]
pub struct TimeEntryService<
    E: TimeEntryRepository + 'static,
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    U: UserRepository + 'static,
> {
    entries: Arc<E>,
    tasks: Arc<T>,
    projects: Arc<P>,
    users: Arc<U>,
}

impl<E, T, P, U> TimeEntryService<E, T, P, U>
where
    E: TimeEntryRepository + 'static,
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(entries: Arc<E>, tasks: Arc<T>, projects: Arc<P>, users: Arc<U>) -> Self {
        Self {
            entries,
            tasks,
            projects,
            users,
        }
    }

    async fn principal(&self, email: &str) -> Result<User, DomainError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(email.to_owned()))
    }

    #[instrument(skip(self))]
    pub async fn start(&self, email: &str, task_id: Uuid) -> Result<TimeEntry, DomainError> {
        let user = self.principal(email).await?;
        let task = resolve_owned(self.tasks.find_by_id(task_id).await?, task_id, user.id)?;

        if self.entries.find_active_for_user(user.id).await?.is_some() {
            return Err(DomainError::ActiveEntryExists);
        }

        let entry = TimeEntry::started(task.task.id, user.id, datetime::now());
        // the store re-checks the invariant inside the insert; a racing start
        // that slipped past the query above loses here
        self.entries
            .create_running(entry)
            .await?
            .ok_or(DomainError::ActiveEntryExists)
    }

    #[instrument(skip(self))]
    pub async fn stop(&self, email: &str) -> Result<TimeEntry, DomainError> {
        let user = self.principal(email).await?;
        let active = self
            .entries
            .find_active_for_user(user.id)
            .await?
            .ok_or(DomainError::NoActiveEntry)?;

        let end_time = datetime::now();
        let duration = (end_time - active.entry.start_time).num_seconds();
        let cost = active
            .hourly_rate
            .map(|rate| entry_cost(rate, duration));

        self.entries
            .close(active.entry.id, end_time, duration, cost)
            .await?
            .ok_or(DomainError::NoActiveEntry)
    }

    pub async fn my_entries(&self, email: &str) -> Result<Vec<TimeEntry>, DomainError> {
        let user = self.principal(email).await?;
        self.entries.find_all_for_user(user.id).await
    }

    pub async fn entries_for_task(
        &self,
        email: &str,
        task_id: Uuid,
    ) -> Result<Vec<TimeEntry>, DomainError> {
        let user = self.principal(email).await?;
        resolve_owned(self.tasks.find_by_id(task_id).await?, task_id, user.id)?;
        self.entries.find_for_task(task_id).await
    }

    pub async fn entries_for_project(
        &self,
        email: &str,
        project_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, DomainError> {
        let user = self.principal(email).await?;
        resolve_owned(
            self.projects.find_by_id(project_id).await?,
            project_id,
            user.id,
        )?;
        self.entries
            .find_for_project_between(project_id, start_date, end_date)
            .await
    }

    pub async fn get_entry(&self, email: &str, id: Uuid) -> Result<TimeEntry, DomainError> {
        let user = self.principal(email).await?;
        resolve_owned(self.entries.find_by_id(id).await?, id, user.id)
    }

    /// Manual entries store the supplied fields verbatim; nothing is derived
    /// and the running-entry slot is not contended.
    #[instrument(skip(self))]
    pub async fn create_manual(
        &self,
        email: &str,
        request: TimeEntryRequest,
    ) -> Result<TimeEntry, DomainError> {
        validate_entry(&request)?;
        let user = self.principal(email).await?;
        let task = resolve_owned(
            self.tasks.find_by_id(request.task_id).await?,
            request.task_id,
            user.id,
        )?;

        let entry = TimeEntry::manual(
            task.task.id,
            user.id,
            request.start_time,
            request.end_time,
            request.duration,
            request.cost,
        );
        self.entries.create(entry).await
    }

    #[instrument(skip(self))]
    pub async fn update_entry(
        &self,
        email: &str,
        id: Uuid,
        request: TimeEntryRequest,
    ) -> Result<TimeEntry, DomainError> {
        validate_entry(&request)?;
        let user = self.principal(email).await?;
        // the entry is owned directly; the assigned task re-checks through
        // its project
        let entry = resolve_owned(self.entries.find_by_id(id).await?, id, user.id)?;
        let task = resolve_owned(
            self.tasks.find_by_id(request.task_id).await?,
            request.task_id,
            user.id,
        )?;

        let updated = TimeEntry {
            id: entry.id,
            task_id: task.task.id,
            user_id: user.id,
            start_time: request.start_time,
            end_time: request.end_time,
            duration: request.duration,
            cost: request.cost,
        };
        self.entries
            .update(updated)
            .await?
            .ok_or(DomainError::TimeEntryNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_entry(&self, email: &str, id: Uuid) -> Result<(), DomainError> {
        let user = self.principal(email).await?;
        resolve_owned(self.entries.find_by_id(id).await?, id, user.id)?;
        self.entries.delete_by_id(id).await
    }
}

fn validate_entry(request: &TimeEntryRequest) -> Result<(), DomainError> {
    if let Some(cost) = request.cost {
        if cost < Decimal::ZERO {
            return Err(DomainError::InvalidInput(
                "cost must be greater than or equal to 0".into(),
            ));
        }
    }
    Ok(())
}

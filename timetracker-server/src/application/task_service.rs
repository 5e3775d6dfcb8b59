use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::application::ownership::resolve_owned;
use crate::data::project_repository::ProjectRepository;
use crate::data::task_repository::TaskRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, task::Task, user::User};

#[derive(Clone)]
pub struct TaskService<
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    U: UserRepository + 'static,
> {
    tasks: Arc<T>,
    projects: Arc<P>,
    users: Arc<U>,
}

impl<T, P, U> TaskService<T, P, U>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(tasks: Arc<T>, projects: Arc<P>, users: Arc<U>) -> Self {
        Self {
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

    pub async fn list_tasks(&self, email: &str, project_id: Uuid) -> Result<Vec<Task>, DomainError> {
        let user = self.principal(email).await?;
        resolve_owned(self.projects.find_by_id(project_id).await?, project_id, user.id)?;
        self.tasks.find_all_for_project(project_id).await
    }

    pub async fn get_task(&self, email: &str, id: Uuid) -> Result<Task, DomainError> {
        let user = self.principal(email).await?;
        let owned = resolve_owned(self.tasks.find_by_id(id).await?, id, user.id)?;
        Ok(owned.task)
    }

    #[instrument(skip(self))]
    pub async fn create_task(
        &self,
        email: &str,
        project_id: Uuid,
        name: String,
    ) -> Result<Task, DomainError> {
        validate_name(&name)?;
        let user = self.principal(email).await?;
        let project =
            resolve_owned(self.projects.find_by_id(project_id).await?, project_id, user.id)?;
        let task = Task::new(project.id, name);
        self.tasks.create(task).await
    }

    #[instrument(skip(self))]
    pub async fn update_task(&self, email: &str, id: Uuid, name: String) -> Result<Task, DomainError> {
        validate_name(&name)?;
        let user = self.principal(email).await?;
        let mut owned = resolve_owned(self.tasks.find_by_id(id).await?, id, user.id)?;

        owned.task.name = name;

        self.tasks
            .update(owned.task)
            .await?
            .ok_or(DomainError::TaskNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, email: &str, id: Uuid) -> Result<(), DomainError> {
        let user = self.principal(email).await?;
        resolve_owned(self.tasks.find_by_id(id).await?, id, user.id)?;
        self.tasks.delete_by_id(id).await
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() || name.len() > 255 {
        return Err(DomainError::InvalidInput(
            "name is required and must not exceed 255 characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::data::project_repository::MockProjectRepository;
    use crate::data::task_repository::MockTaskRepository;
    use crate::data::user_repository::MockUserRepository;
    use crate::domain::error::DomainError;
    use crate::domain::project::Project;
    use crate::domain::task::{OwnedTask, Task};
    use crate::domain::user::User;

    use super::TaskService;

    const OWNER: u128 = 1;
    const INTRUDER: u128 = 2;

    fn user(id: u128) -> User {
        let mut user = User::new("a@x.com".into(), "Ada".into(), "hash".into());
        user.id = Uuid::from_u128(id);
        user
    }

    fn users_repo(id: u128) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user(id))));
        users
    }

    #[tokio::test]
    async fn create_task_under_a_foreign_project_reports_project_not_found() {
        let mut projects = MockProjectRepository::new();
        projects.expect_find_by_id().returning(|id| {
            let mut project = Project::new(Uuid::from_u128(OWNER), "site".into(), None);
            project.id = id;
            Ok(Some(project))
        });
        let mut tasks = MockTaskRepository::new();
        tasks.expect_create().never();

        let service = TaskService::new(
            Arc::new(tasks),
            Arc::new(projects),
            Arc::new(users_repo(INTRUDER)),
        );
        let project_id = Uuid::new_v4();
        let err = service
            .create_task("b@x.com", project_id, "wiring".into())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ProjectNotFound(got) if got == project_id));
    }

    #[tokio::test]
    async fn update_renames_an_owned_task() {
        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_by_id().returning(|id| {
            let mut task = Task::new(Uuid::from_u128(7), "old name".into());
            task.id = id;
            Ok(Some(OwnedTask {
                task,
                owner_id: Uuid::from_u128(OWNER),
            }))
        });
        tasks
            .expect_update()
            .withf(|task: &Task| task.name == "new name")
            .returning(|task| Ok(Some(task)));

        let service = TaskService::new(
            Arc::new(tasks),
            Arc::new(MockProjectRepository::new()),
            Arc::new(users_repo(OWNER)),
        );
        let task = service
            .update_task("a@x.com", Uuid::new_v4(), "new name".into())
            .await
            .unwrap();

        assert_eq!(task.name, "new name");
    }

    #[tokio::test]
    async fn update_rejects_a_blank_name() {
        let service = TaskService::new(
            Arc::new(MockTaskRepository::new()),
            Arc::new(MockProjectRepository::new()),
            Arc::new(users_repo(OWNER)),
        );
        let err = service
            .update_task("a@x.com", Uuid::new_v4(), "   ".into())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ownership::resolve_owned;
use crate::data::project_repository::ProjectRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, project::Project, user::User};
use crate::presentation::dto::ProjectRequest;

#[derive(Clone)]
pub struct ProjectService<P: ProjectRepository + 'static, U: UserRepository + 'static> {
    projects: Arc<P>,
    users: Arc<U>,
}

impl<P, U> ProjectService<P, U>
where
    P: ProjectRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(projects: Arc<P>, users: Arc<U>) -> Self {
        Self { projects, users }
    }

    async fn principal(&self, email: &str) -> Result<User, DomainError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(email.to_owned()))
    }

    pub async fn list_my_projects(&self, email: &str) -> Result<Vec<Project>, DomainError> {
        let user = self.principal(email).await?;
        self.projects.find_all_for_user(user.id).await
    }

    pub async fn get_project(&self, email: &str, id: Uuid) -> Result<Project, DomainError> {
        let user = self.principal(email).await?;
        resolve_owned(self.projects.find_by_id(id).await?, id, user.id)
    }

    #[instrument(skip(self))]
    pub async fn create_project(
        &self,
        email: &str,
        request: ProjectRequest,
    ) -> Result<Project, DomainError> {
        validate_project(&request)?;
        let user = self.principal(email).await?;
        let project = Project::new(user.id, request.name, request.hourly_rate);
        self.projects.create(project).await
    }

    #[instrument(skip(self))]
    pub async fn update_project(
        &self,
        email: &str,
        id: Uuid,
        request: ProjectRequest,
    ) -> Result<Project, DomainError> {
        validate_project(&request)?;
        let user = self.principal(email).await?;
        let mut project = resolve_owned(self.projects.find_by_id(id).await?, id, user.id)?;

        project.name = request.name;
        project.hourly_rate = request.hourly_rate;

        self.projects
            .update(project)
            .await?
            .ok_or(DomainError::ProjectNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_project(&self, email: &str, id: Uuid) -> Result<(), DomainError> {
        let user = self.principal(email).await?;
        resolve_owned(self.projects.find_by_id(id).await?, id, user.id)?;
        self.projects.delete_by_id(id).await
    }
}

fn validate_project(request: &ProjectRequest) -> Result<(), DomainError> {
    if request.name.trim().is_empty() || request.name.len() > 255 {
        return Err(DomainError::InvalidInput(
            "name is required and must not exceed 255 characters".into(),
        ));
    }
    if let Some(rate) = request.hourly_rate {
        if rate < Decimal::ZERO {
            return Err(DomainError::InvalidInput(
                "hourly rate must be greater than or equal to 0".into(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::data::project_repository::MockProjectRepository;
    use crate::data::user_repository::MockUserRepository;
    use crate::domain::error::DomainError;
    use crate::domain::project::Project;
    use crate::domain::user::User;
    use crate::presentation::dto::ProjectRequest;

    use super::ProjectService;

    fn user() -> User {
        let mut user = User::new("a@x.com".into(), "Ada".into(), "hash".into());
        user.id = Uuid::from_u128(1);
        user
    }

    fn users_repo() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user())));
        users
    }

    #[tokio::test]
    async fn create_rejects_a_negative_rate() {
        let service = ProjectService::new(
            Arc::new(MockProjectRepository::new()),
            Arc::new(users_repo()),
        );

        let err = service
            .create_project(
                "a@x.com",
                ProjectRequest {
                    name: "site".into(),
                    hourly_rate: Some(Decimal::new(-100, 2)),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn get_foreign_project_reports_not_found() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_find_by_id()
            .returning(|id| {
                let mut project = Project::new(Uuid::from_u128(99), "theirs".into(), None);
                project.id = id;
                Ok(Some(project))
            });

        let service = ProjectService::new(Arc::new(projects), Arc::new(users_repo()));
        let id = Uuid::new_v4();
        let err = service.get_project("a@x.com", id).await.unwrap_err();

        assert!(matches!(err, DomainError::ProjectNotFound(got) if got == id));
    }

    #[tokio::test]
    async fn unknown_principal_reports_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let service = ProjectService::new(Arc::new(MockProjectRepository::new()), Arc::new(users));
        let err = service.list_my_projects("ghost@x.com").await.unwrap_err();

        assert!(matches!(err, DomainError::UserNotFound(_)));
    }
}

pub mod auth_service;
pub mod ownership;
pub mod project_service;
pub mod task_service;
pub mod time_entry_service;

use crate::data::project_repository::PostgresProjectRepository;
use crate::data::task_repository::PostgresTaskRepository;
use crate::data::time_entry_repository::PostgresTimeEntryRepository;
use crate::data::user_repository::PostgresUserRepository;

pub type AppAuthService = auth_service::AuthService<PostgresUserRepository>;
pub type AppProjectService =
    project_service::ProjectService<PostgresProjectRepository, PostgresUserRepository>;
pub type AppTaskService = task_service::TaskService<
    PostgresTaskRepository,
    PostgresProjectRepository,
    PostgresUserRepository,
>;
pub type AppTimeEntryService = time_entry_service::TimeEntryService<
    PostgresTimeEntryRepository,
    PostgresTaskRepository,
    PostgresProjectRepository,
    PostgresUserRepository,
>;

use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::project::Project;
use crate::domain::task::OwnedTask;
use crate::domain::time_entry::TimeEntry;

/// A resource whose owning user can be resolved for authorization.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
    fn not_found(id: Uuid) -> DomainError;
}

impl Owned for Project {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn not_found(id: Uuid) -> DomainError {
        DomainError::ProjectNotFound(id)
    }
}

impl Owned for OwnedTask {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn not_found(id: Uuid) -> DomainError {
        DomainError::TaskNotFound(id)
    }
}

impl Owned for TimeEntry {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn not_found(id: Uuid) -> DomainError {
        DomainError::TimeEntryNotFound(id)
    }
}

/// A missing resource and a resource owned by someone else produce the same
/// not-found error, so a caller cannot probe for existence.
pub fn resolve_owned<R: Owned>(
    found: Option<R>,
    id: Uuid,
    principal_id: Uuid,
) -> Result<R, DomainError> {
    match found {
        Some(resource) if resource.owner_id() == principal_id => Ok(resource),
        _ => Err(R::not_found(id)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::resolve_owned;
    use crate::domain::error::DomainError;
    use crate::domain::project::Project;
    use crate::domain::task::{OwnedTask, Task};
    use crate::domain::time_entry::TimeEntry;

    #[test]
    fn resolves_a_resource_owned_by_the_principal() {
        let owner = Uuid::new_v4();
        let project = Project::new(owner, "site".into(), None);
        let id = project.id;

        let resolved = resolve_owned(Some(project), id, owner).unwrap();
        assert_eq!(resolved.id, id);
    }

    #[test]
    fn foreign_project_is_indistinguishable_from_missing() {
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let project = Project::new(owner, "site".into(), None);
        let id = project.id;

        let denied = resolve_owned(Some(project), id, intruder).unwrap_err();
        let missing = resolve_owned(None::<Project>, id, intruder).unwrap_err();

        assert!(matches!(denied, DomainError::ProjectNotFound(got) if got == id));
        assert!(matches!(missing, DomainError::ProjectNotFound(got) if got == id));
        assert_eq!(denied.code(), missing.code());
    }

    #[test]
    fn task_ownership_walks_through_the_project_owner() {
        let owner = Uuid::new_v4();
        let task = Task::new(Uuid::new_v4(), "wiring".into());
        let id = task.id;
        let owned = OwnedTask {
            task,
            owner_id: owner,
        };

        assert!(resolve_owned(Some(owned.clone()), id, owner).is_ok());
        let err = resolve_owned(Some(owned), id, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code(), "TASK_NOT_FOUND");
    }

    #[test]
    fn entry_ownership_uses_the_denormalized_user_id() {
        let owner = Uuid::new_v4();
        let entry = TimeEntry::started(Uuid::new_v4(), owner, Utc::now());
        let id = entry.id;

        let err = resolve_owned(Some(entry), id, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code(), "TIME_ENTRY_NOT_FOUND");
    }
}

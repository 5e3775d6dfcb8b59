use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user not found with email: {0}")]
    UserNotFound(String),
    #[error("user already exists with email: {0}")]
    EmailAlreadyRegistered(String),
    #[error("project not found with id: {0}")]
    ProjectNotFound(Uuid),
    #[error("task not found with id: {0}")]
    TaskNotFound(Uuid),
    #[error("time entry not found with id: {0}")]
    TimeEntryNotFound(Uuid),
    #[error("you already have an active time entry")]
    ActiveEntryExists,
    #[error("no active time entry found")]
    NoActiveEntry,
    #[error("{0}")]
    InvalidInput(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::UserNotFound(_) => "USER_NOT_FOUND",
            DomainError::EmailAlreadyRegistered(_) => "USER_EMAIL_ALREADY_EXISTS",
            DomainError::ProjectNotFound(_) => "PROJECT_NOT_FOUND",
            DomainError::TaskNotFound(_) => "TASK_NOT_FOUND",
            DomainError::TimeEntryNotFound(_) => "TIME_ENTRY_NOT_FOUND",
            DomainError::ActiveEntryExists => "ACTIVE_TIME_ENTRY_EXISTS",
            DomainError::NoActiveEntry => "NO_ACTIVE_TIME_ENTRY",
            DomainError::InvalidInput(_) => "INVALID_INPUT",
            DomainError::Unauthorized => "UNAUTHORIZED",
            DomainError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::UserNotFound(_)
            | DomainError::ProjectNotFound(_)
            | DomainError::TaskNotFound(_)
            | DomainError::TimeEntryNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::EmailAlreadyRegistered(_)
            | DomainError::ActiveEntryExists
            | DomainError::NoActiveEntry => StatusCode::CONFLICT,
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // store failures keep their detail in the log, not the response
        let message = match self {
            DomainError::Internal(_) => "an unexpected error occurred".to_string(),
            other => other.to_string(),
        };
        let body = ErrorBody {
            code: self.code(),
            message,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{ResponseError, http::StatusCode};
    use uuid::Uuid;

    use super::DomainError;

    #[test]
    fn lookup_misses_map_to_not_found() {
        let id = Uuid::new_v4();
        for err in [
            DomainError::ProjectNotFound(id),
            DomainError::TaskNotFound(id),
            DomainError::TimeEntryNotFound(id),
            DomainError::UserNotFound("a@x.com".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn business_rule_violations_map_to_conflict() {
        assert_eq!(
            DomainError::ActiveEntryExists.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DomainError::NoActiveEntry.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DomainError::EmailAlreadyRegistered("a@x.com".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let response = DomainError::Internal("database error: password=hunter2".into());
        let body = response.error_response();
        assert_eq!(body.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

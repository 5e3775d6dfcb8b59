use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(project_id: Uuid, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A task joined with the id of the user owning its project.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedTask {
    #[sqlx(flatten)]
    pub task: Task,
    pub owner_id: Uuid,
}

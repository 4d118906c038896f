use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A single to-do record.
///
/// Serialized with camelCase keys so the stored slot keeps the
/// `id, title, description, category, completed, createdAt, updatedAt` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh task stamped with `now`. Title and description are trimmed.
    pub fn new(title: &str, description: &str, category: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: new_task_id(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            category: category.trim().to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// True once the task has been mutated after creation.
    pub fn is_edited(&self) -> bool {
        self.updated_at != self.created_at
    }

    pub fn has_category(&self) -> bool {
        !self.category.is_empty()
    }
}

pub fn new_task_id() -> String {
    Ulid::new().to_string()
}

/// A fixed grouping label. `color` is an opaque display token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

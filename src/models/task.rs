use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `status_enum` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "status_enum", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Todo,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Done,
}

/// Input structure for creating a task.
///
/// There is no owner field: the owner is always the authenticated caller.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional free-text description.
    pub description: Option<String>,

    /// Optional due date for the task.
    pub due_date: Option<DateTime<Utc>>,

    /// Initial status; `todo` when omitted.
    #[serde(default)]
    pub status: TaskStatus,
}

impl TaskInput {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            status: TaskStatus::default(),
        }
    }
}

/// Partial update of a task.
///
/// Absent fields are left untouched. For the nullable columns (`description`,
/// `due_date`) an explicit `null` clears the value; `title` and `status` cannot be
/// cleared, so `null` there is the same as leaving the field out.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    pub status: Option<TaskStatus>,
}

// Distinguishes an explicit `null` (Some(None)) from a missing field (None, via `default`).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: i32,
    /// Identifier of the user who owns the task.
    pub user_id: i32,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// Optional due date for the task.
    pub due_date: Option<DateTime<Utc>>,
    /// The current status of the task.
    pub status: TaskStatus,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Applies the fields present in `patch`. Timestamps are the store's business.
    pub fn apply(&mut self, patch: TaskUpdate) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Offset/limit window for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self {
            skip: i64::from(skip),
            limit: i64::from(limit),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 50 }
    }
}

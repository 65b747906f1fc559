use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Input structure for creating a task or renaming it.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Must not be empty.
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: i64,
    pub title: String,
    /// Identifier of the user who owns the task. Never changes.
    #[sqlx(rename = "user_id")]
    pub owner: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

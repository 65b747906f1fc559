//! Persistence for users and tasks.
//!
//! Every task operation takes the owning user's id and applies it as a hard
//! filter next to the task id. A task that exists but belongs to someone else
//! is reported exactly like a task that does not exist.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewUser, Task, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact, case-sensitive lookup. `AppError::NotFound` when no user has this email.
    async fn find_user_by_email(&self, email: &str) -> Result<User, AppError>;

    /// `AppError::DuplicateEmail` when the email is already taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// The owner's tasks, oldest first.
    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<Task>, AppError>;

    async fn get_task(&self, owner_id: i64, task_id: i64) -> Result<Task, AppError>;

    async fn create_task(&self, owner_id: i64, title: &str) -> Result<Task, AppError>;

    async fn update_title(&self, owner_id: i64, task_id: i64, title: &str)
        -> Result<Task, AppError>;

    async fn delete_task(&self, owner_id: i64, task_id: i64) -> Result<(), AppError>;
}

pub(crate) fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

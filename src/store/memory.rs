//! In-memory store for single-process runs and tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{task_not_found, TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewUser, Task, User};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    next_user_id: i64,
    next_task_id: i64,
}

/// Keeps users and tasks in vectors behind a Tokio `RwLock`. Ids start at 1.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<User, AppError> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned()
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }

        tables.next_user_id += 1;
        let created = User {
            id: tables.next_user_id,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<Task>, AppError> {
        let tables = self.tables.read().await;
        // Insertion order is creation order.
        Ok(tables
            .tasks
            .iter()
            .filter(|task| task.owner == owner_id)
            .cloned()
            .collect())
    }

    async fn get_task(&self, owner_id: i64, task_id: i64) -> Result<Task, AppError> {
        let tables = self.tables.read().await;
        tables
            .tasks
            .iter()
            .find(|task| task.id == task_id && task.owner == owner_id)
            .cloned()
            .ok_or_else(task_not_found)
    }

    async fn create_task(&self, owner_id: i64, title: &str) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        tables.next_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: tables.next_task_id,
            title: title.to_string(),
            owner: owner_id,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_title(
        &self,
        owner_id: i64,
        task_id: i64,
        title: &str,
    ) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        let task = tables
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id && task.owner == owner_id)
            .ok_or_else(task_not_found)?;
        task.title = title.to_string();
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete_task(&self, owner_id: i64, task_id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables
            .tasks
            .retain(|task| !(task.id == task_id && task.owner == owner_id));
        if tables.tasks.len() == before {
            return Err(task_not_found());
        }
        Ok(())
    }
}

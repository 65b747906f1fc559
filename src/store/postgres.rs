use async_trait::async_trait;
use sqlx::PgPool;

use super::{task_not_found, TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewUser, Task, User};

const TASK_COLUMNS: &str = "id, title, user_id, created_at, updated_at";

/// Postgres-backed store. Every task statement carries `user_id = $owner`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Store(format!("Failed to run migrations: {}", e)))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2)
             RETURNING id, email, password_hash, created_at",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::DuplicateEmail,
            other => other.into(),
        })
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn get_task(&self, owner_id: i64, task_id: i64) -> Result<Task, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(task_not_found)
    }

    async fn create_task(&self, owner_id: i64, title: &str) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (title, user_id) VALUES ($1, $2) RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(title)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_title(
        &self,
        owner_id: i64,
        task_id: i64,
        title: &str,
    ) -> Result<Task, AppError> {
        let sql = format!(
            "UPDATE tasks SET title = $1, updated_at = NOW()
             WHERE id = $2 AND user_id = $3
             RETURNING {}",
            TASK_COLUMNS
        );
        // No row back means zero rows matched: absent or someone else's.
        sqlx::query_as::<_, Task>(&sql)
            .bind(title)
            .bind(task_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(task_not_found)
    }

    async fn delete_task(&self, owner_id: i64, task_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(task_not_found());
        }
        Ok(())
    }
}

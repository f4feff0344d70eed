//! PostgreSQL store backend.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{StoreError, UserStore};
use crate::models::auth::User;
use crate::models::task::{NewTask, Task};
use crate::tasks::TaskStore;

type TaskRow = (i64, i64, String, Option<String>, String);

fn task_from_row((id, user_id, title, description, status): TaskRow) -> Task {
    Task {
        id,
        user_id,
        title,
        description,
        status,
    }
}

/// Store backed by a PostgreSQL pool. Run [`crate::migrate::migrate`] first.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e
                && db.is_unique_violation()
            {
                return StoreError::DuplicateUsername(username.to_string());
            }
            StoreError::Db(e)
        })?;

        Ok(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id, username, password_hash)| User {
            id,
            username,
            password_hash,
        }))
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, user_id: i64, task: NewTask) -> Result<Task, StoreError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (user_id, title, description, status) VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, title, description, status",
        )
        .bind(user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(task_from_row(row))
    }

    async fn list_tasks(&self, user_id: i64, status: Option<&str>) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, user_id, title, description, status FROM tasks \
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY id",
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(task_from_row).collect())
    }

    async fn get_task(&self, task_id: i64, user_id: i64) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "SELECT id, user_id, title, description, status FROM tasks \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(task_from_row))
    }

    async fn update_task(
        &self,
        task_id: i64,
        user_id: i64,
        task: NewTask,
    ) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks SET title = $3, description = $4, status = $5 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, title, description, status",
        )
        .bind(task_id)
        .bind(user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(task_from_row))
    }

    async fn delete_task(&self, task_id: i64, user_id: i64) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "DELETE FROM tasks WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, title, description, status",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(task_from_row))
    }
}

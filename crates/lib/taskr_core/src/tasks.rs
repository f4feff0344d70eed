//! Per-user task storage.
//!
//! Every operation is scoped to the owning user id: a task that belongs to
//! someone else looks exactly like one that does not exist.

use async_trait::async_trait;

use crate::models::task::{NewTask, Task};
use crate::store::StoreError;

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, user_id: i64, task: NewTask) -> Result<Task, StoreError>;

    /// Tasks of `user_id` in id order, optionally filtered by exact status.
    async fn list_tasks(&self, user_id: i64, status: Option<&str>) -> Result<Vec<Task>, StoreError>;

    async fn get_task(&self, task_id: i64, user_id: i64) -> Result<Option<Task>, StoreError>;

    /// Replace all fields of a task. `None` if no such task for this user.
    async fn update_task(
        &self,
        task_id: i64,
        user_id: i64,
        task: NewTask,
    ) -> Result<Option<Task>, StoreError>;

    /// Delete a task, returning what was removed.
    async fn delete_task(&self, task_id: i64, user_id: i64) -> Result<Option<Task>, StoreError>;
}

//! In-memory store backend.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{StoreError, UserStore};
use crate::models::auth::User;
use crate::models::task::{NewTask, Task};
use crate::tasks::TaskStore;

/// Users and tasks held in concurrent maps. Ids start at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    tasks: DashMap<i64, Task>,
    last_user_id: AtomicI64,
    last_task_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        // The entry guard holds the shard lock, making check-and-insert atomic.
        match self.users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateUsername(username.to_string())),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.last_user_id.fetch_add(1, Ordering::SeqCst) + 1,
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, user_id: i64, task: NewTask) -> Result<Task, StoreError> {
        let task = Task {
            id: self.last_task_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id,
            title: task.title,
            description: task.description,
            status: task.status,
        };
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, user_id: i64, status: Option<&str>) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id && status.is_none_or(|s| t.status == s))
            .map(|t| t.value().clone())
            .collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn get_task(&self, task_id: i64, user_id: i64) -> Result<Option<Task>, StoreError> {
        Ok(self
            .tasks
            .get(&task_id)
            .filter(|t| t.user_id == user_id)
            .map(|t| t.value().clone()))
    }

    async fn update_task(
        &self,
        task_id: i64,
        user_id: i64,
        task: NewTask,
    ) -> Result<Option<Task>, StoreError> {
        let Some(mut existing) = self.tasks.get_mut(&task_id) else {
            return Ok(None);
        };
        if existing.user_id != user_id {
            return Ok(None);
        }
        existing.title = task.title;
        existing.description = task.description;
        existing.status = task.status;
        Ok(Some(existing.value().clone()))
    }

    async fn delete_task(&self, task_id: i64, user_id: i64) -> Result<Option<Task>, StoreError> {
        Ok(self
            .tasks
            .remove_if(&task_id, |_, t| t.user_id == user_id)
            .map(|(_, t)| t))
    }
}

//! Task request handlers. Every route here sits behind `require_auth`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{NewTask, Task, TaskListQuery};

fn validate(task: &NewTask) -> AppResult<()> {
    if task.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".into()));
    }
    if task.status.trim().is_empty() {
        return Err(AppError::Validation("status must not be empty".into()));
    }
    Ok(())
}

fn not_found(task_id: i64) -> AppError {
    AppError::NotFound(format!("Task {task_id} not found"))
}

/// `POST /tasks`
pub async fn create_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> AppResult<Json<Task>> {
    let Json(body) = body?;
    validate(&body)?;
    let task = state.tasks.create_task(user.0.id, body).await?;
    Ok(Json(task))
}

/// `GET /tasks?status=`
pub async fn list_tasks_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    query: Result<Query<TaskListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Task>>> {
    let Query(query) = query?;
    let status = query.status.as_deref().filter(|s| !s.is_empty());
    let tasks = state.tasks.list_tasks(user.0.id, status).await?;
    Ok(Json(tasks))
}

/// `GET /tasks/{id}`
pub async fn get_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    task_id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Task>> {
    let Path(task_id) = task_id?;
    state
        .tasks
        .get_task(task_id, user.0.id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(task_id))
}

/// `PUT /tasks/{id}` — replace a task's fields.
pub async fn update_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    task_id: Result<Path<i64>, PathRejection>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> AppResult<Json<Task>> {
    let Path(task_id) = task_id?;
    let Json(body) = body?;
    validate(&body)?;
    state
        .tasks
        .update_task(task_id, user.0.id, body)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(task_id))
}

/// `DELETE /tasks/{id}` — returns the deleted task.
pub async fn delete_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    task_id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Task>> {
    let Path(task_id) = task_id?;
    state
        .tasks
        .delete_task(task_id, user.0.id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(task_id))
}

//! Task API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateTaskRequest, Task, UpdateTaskRequest};
use crate::AppState;

/// GET /api/tasks - List all tasks.
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Vec<Task>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_tasks().await {
        Ok(tasks) => success(tasks, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/tasks - Create a new task.
pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<Task> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.title.trim().is_empty() {
        return error(
            AppError::Validation("Title is required".to_string()),
            revision_id,
        );
    }

    match state.repo.create_task(&request).await {
        Ok(task) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(task, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/tasks/:id - Update a task.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<Task> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_task(&id, &request).await {
        Ok(task) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(task, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/tasks/:id - Delete a task.
pub async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_task(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

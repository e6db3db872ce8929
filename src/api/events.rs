//! Calendar event API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, validate_date, ApiResult};
use crate::errors::AppError;
use crate::models::{CalendarEvent, CreateEventRequest, UpdateEventRequest};
use crate::AppState;

/// GET /api/events - List all calendar events.
pub async fn list_events(State(state): State<AppState>) -> ApiResult<Vec<CalendarEvent>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_events().await {
        Ok(events) => success(events, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/events/:id - Get a single event.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CalendarEvent> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_event(&id).await {
        Ok(Some(event)) => success(event, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Event {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/events - Create a new event.
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> ApiResult<CalendarEvent> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.title.trim().is_empty() {
        return error(
            AppError::Validation("Title is required".to_string()),
            revision_id,
        );
    }
    if let Err(e) = validate_date("date", &request.date) {
        return error(e, revision_id);
    }

    match state.repo.create_event(&request).await {
        Ok(event) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(event, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/events/:id - Update an event.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateEventRequest>,
) -> ApiResult<CalendarEvent> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Some(date) = &request.date {
        if let Err(e) = validate_date("date", date) {
            return error(e, revision_id);
        }
    }

    match state.repo.update_event(&id, &request).await {
        Ok(event) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(event, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/events/:id - Delete an event.
pub async fn delete_event(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_event(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

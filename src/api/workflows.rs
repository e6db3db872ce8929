//! Workflow trigger API endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::workflow::ActionResult;
use crate::AppState;

/// Request body for the meeting-completed trigger.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingCompletedRequest {
    pub event_id: String,
    #[serde(default)]
    pub create_follow_up_task: bool,
}

/// Pipeline outcome returned to the caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowOutcome {
    pub event_id: String,
    pub results: Vec<ActionResult>,
}

/// POST /api/workflows/meeting-completed - Run the fixed meeting pipeline.
///
/// Action failures are recorded in the result list, not surfaced as an HTTP
/// error; the request only fails when the event cannot be loaded.
pub async fn meeting_completed(
    State(state): State<AppState>,
    Json(request): Json<MeetingCompletedRequest>,
) -> ApiResult<WorkflowOutcome> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let event = match state.repo.get_event(&request.event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return error(
                AppError::NotFound(format!("Event {} not found", request.event_id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    };

    let results = state
        .workflow
        .run_meeting_completed(&state.repo, &event, request.create_follow_up_task)
        .await;

    let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
    success(
        WorkflowOutcome {
            event_id: request.event_id,
            results,
        },
        new_revision,
    )
}

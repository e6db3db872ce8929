//! Availability API endpoints.

use axum::{
    extract::{Query, State},
    Json,
};

use super::{error, success, validate_date, validate_time, ApiResult};
use crate::errors::AppError;
use crate::models::{Availability, AvailabilityFilter, UpsertAvailabilityRequest};
use crate::AppState;

/// GET /api/availability - List availability rows, optionally filtered.
pub async fn list_availability(
    State(state): State<AppState>,
    Query(filter): Query<AvailabilityFilter>,
) -> ApiResult<Vec<Availability>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_availability(&filter).await {
        Ok(rows) => success(rows, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/availability - Upsert one (member, date) availability row.
pub async fn upsert_availability(
    State(state): State<AppState>,
    Json(request): Json<UpsertAvailabilityRequest>,
) -> ApiResult<Availability> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.member_email.trim().is_empty() {
        return error(
            AppError::Validation("memberEmail is required".to_string()),
            revision_id,
        );
    }
    if let Err(e) = validate_date("date", &request.date) {
        return error(e, revision_id);
    }
    for (field, value) in [
        ("preferredStartTime", &request.preferred_start_time),
        ("preferredEndTime", &request.preferred_end_time),
    ] {
        if let Some(time) = value {
            if let Err(e) = validate_time(field, time) {
                return error(e, revision_id);
            }
        }
    }

    match state.repo.upsert_availability(&request).await {
        Ok(row) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(row, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

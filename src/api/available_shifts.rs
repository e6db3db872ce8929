//! Available (open) shift API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{error, success, validate_date, validate_time, ApiResult};
use crate::errors::AppError;
use crate::models::{
    AvailableShift, AvailableShiftFilter, ClaimShiftRequest, CreateAvailableShiftRequest,
};
use crate::AppState;

/// GET /api/available-shifts - List open shifts.
pub async fn list_available_shifts(
    State(state): State<AppState>,
    Query(filter): Query<AvailableShiftFilter>,
) -> ApiResult<Vec<AvailableShift>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_available_shifts(&filter).await {
        Ok(shifts) => success(shifts, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/available-shifts - Publish a new open shift.
pub async fn create_available_shift(
    State(state): State<AppState>,
    Json(request): Json<CreateAvailableShiftRequest>,
) -> ApiResult<AvailableShift> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = validate_date("date", &request.date)
        .map(|_| ())
        .and_then(|_| validate_time("startTime", &request.start_time))
        .and_then(|_| validate_time("endTime", &request.end_time))
    {
        return error(e, revision_id);
    }
    if request.competence_required < 1 {
        return error(
            AppError::Validation("Competence required must be at least 1".to_string()),
            revision_id,
        );
    }

    match state.repo.create_available_shift(&request).await {
        Ok(shift) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(shift, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/available-shifts/:id/claim - Claim an open shift.
///
/// Of two concurrent claimers exactly one wins; the other receives 409.
pub async fn claim_available_shift(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ClaimShiftRequest>,
) -> ApiResult<AvailableShift> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    // The claimant must exist and meet the competence requirement
    let member = match state.repo.get_member_by_email(&request.member_email).await {
        Ok(Some(member)) => member,
        Ok(None) => {
            return error(
                AppError::Validation(format!("No member with email {}", request.member_email)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    };

    let shift = match state.repo.get_available_shift(&id).await {
        Ok(Some(shift)) => shift,
        Ok(None) => {
            return error(
                AppError::NotFound(format!("Available shift {} not found", id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    };

    if member.competence_level < shift.competence_required {
        return error(
            AppError::Validation(format!(
                "Competence level {} is below the required {}",
                member.competence_level, shift.competence_required
            )),
            revision_id,
        );
    }

    match state
        .repo
        .claim_available_shift(&id, &request.member_email)
        .await
    {
        Ok(claimed) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(claimed, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/available-shifts/:id - Remove an open shift.
pub async fn delete_available_shift(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_available_shift(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

//! Shift API endpoints: CRUD, bulk generation and period statistics.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use super::{error, success, validate_date, validate_time, ApiResult};
use crate::errors::AppError;
use crate::models::{
    BulkShiftRequest, CreateShiftRequest, Shift, ShiftFilter, ShiftStatus, UpdateShiftRequest,
};
use crate::scheduling::{self, ShiftStats, StatsPeriod};
use crate::AppState;

/// GET /api/shifts - List shifts, optionally filtered.
pub async fn list_shifts(
    State(state): State<AppState>,
    Query(filter): Query<ShiftFilter>,
) -> ApiResult<Vec<Shift>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_shifts(&filter).await {
        Ok(shifts) => success(shifts, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/shifts/:id - Get a single shift.
pub async fn get_shift(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Shift> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_shift(&id).await {
        Ok(Some(shift)) => success(shift, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Shift {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/shifts - Create a new shift.
pub async fn create_shift(
    State(state): State<AppState>,
    Json(request): Json<CreateShiftRequest>,
) -> ApiResult<Shift> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = validate_date("date", &request.date)
        .map(|_| ())
        .and_then(|_| validate_time("startTime", &request.start_time))
        .and_then(|_| validate_time("endTime", &request.end_time))
    {
        return error(e, revision_id);
    }
    if request.created_by.trim().is_empty() {
        return error(
            AppError::Validation("createdBy is required".to_string()),
            revision_id,
        );
    }

    match state.repo.create_shift(&request).await {
        Ok(shift) => {
            // Record an in-app notification for the assignee
            if let Some(assignee) = &shift.assigned_to {
                let body = format!(
                    "You have a {} shift on {} from {} to {}",
                    shift.shift_type, shift.date, shift.start_time, shift.end_time
                );
                if let Err(e) = state
                    .repo
                    .create_notification(assignee, "New shift assigned", &body)
                    .await
                {
                    tracing::warn!("Failed to record shift notification: {}", e);
                }
            }

            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(shift, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/shifts/:id - Update a shift.
pub async fn update_shift(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateShiftRequest>,
) -> ApiResult<Shift> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Some(date) = &request.date {
        if let Err(e) = validate_date("date", date) {
            return error(e, revision_id);
        }
    }

    match state.repo.update_shift(&id, &request).await {
        Ok(shift) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(shift, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/shifts/:id - Delete a shift.
pub async fn delete_shift(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_shift(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/shifts/bulk - Generate one shift per matching day in a range.
pub async fn bulk_create_shifts(
    State(state): State<AppState>,
    Json(request): Json<BulkShiftRequest>,
) -> ApiResult<Vec<Shift>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let start = match validate_date("startDate", &request.start_date) {
        Ok(d) => d,
        Err(e) => return error(e, revision_id),
    };
    let end = match validate_date("endDate", &request.end_date) {
        Ok(d) => d,
        Err(e) => return error(e, revision_id),
    };
    if end < start {
        return error(
            AppError::Validation("endDate must not precede startDate".to_string()),
            revision_id,
        );
    }
    if let Err(e) = validate_time("startTime", &request.start_time)
        .and_then(|_| validate_time("endTime", &request.end_time))
    {
        return error(e, revision_id);
    }
    if request.weekdays.iter().any(|d| *d > 6) {
        return error(
            AppError::Validation("Weekday numbers must be 0-6".to_string()),
            revision_id,
        );
    }
    if request.assigned_to.trim().is_empty() {
        return error(
            AppError::Validation("assignedTo is required".to_string()),
            revision_id,
        );
    }

    let days = scheduling::expand_bulk_days(start, end, &request.weekdays);
    if days.is_empty() {
        // Rejected before any insert
        return error(
            AppError::Validation(
                "No days in the range match the selected weekdays".to_string(),
            ),
            revision_id,
        );
    }

    let inserts: Vec<CreateShiftRequest> = days
        .iter()
        .map(|day| CreateShiftRequest {
            assigned_to: Some(request.assigned_to.clone()),
            date: day.format("%Y-%m-%d").to_string(),
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            shift_type: request.shift_type.clone(),
            status: ShiftStatus::Scheduled,
            notes: None,
            created_by: request.created_by.clone(),
        })
        .collect();

    match state.repo.insert_shifts_batch(&inserts).await {
        Ok(shifts) => {
            tracing::info!(
                count = shifts.len(),
                assignee = %request.assigned_to,
                "Bulk-generated shifts"
            );
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(shifts, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// Query parameters for the statistics endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub period: String,
    /// Override for "today", mainly for deterministic reports and tests.
    #[serde(default)]
    pub today: Option<String>,
}

/// GET /api/shifts/stats - Per-period shift statistics.
pub async fn shift_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<ShiftStats> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let Some(period) = StatsPeriod::from_str(&query.period) else {
        return error(
            AppError::Validation(format!(
                "period must be week, month, quarter or year, got '{}'",
                query.period
            )),
            revision_id,
        );
    };

    let today = match &query.today {
        Some(value) => match validate_date("today", value) {
            Ok(d) => d,
            Err(e) => return error(e, revision_id),
        },
        None => Utc::now().date_naive(),
    };

    let shifts = match state.repo.list_shifts(&Default::default()).await {
        Ok(shifts) => shifts,
        Err(e) => return error(e, revision_id),
    };
    let members = match state.repo.list_members().await {
        Ok(members) => members,
        Err(e) => return error(e, revision_id),
    };

    let stats = scheduling::compute_shift_stats(&shifts, &members, period.start(today));
    success(stats, revision_id)
}

//! Calendar grid API endpoints.

use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;

use super::{error, success, validate_date, ApiResult};
use crate::models::{Availability, AvailabilityFilter, CalendarEvent, Shift, ShiftFilter};
use crate::scheduling::calendar::{self, CalendarGrid};
use crate::AppState;

/// Query parameters for the grid endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridQuery {
    /// Any date inside the desired week or month; defaults to today.
    #[serde(default)]
    pub anchor: Option<String>,
}

async fn load_rows(
    state: &AppState,
) -> Result<(Vec<Shift>, Vec<Availability>, Vec<CalendarEvent>), crate::errors::AppError> {
    let shifts = state.repo.list_shifts(&ShiftFilter::default()).await?;
    let availability = state
        .repo
        .list_availability(&AvailabilityFilter::default())
        .await?;
    let events = state.repo.list_events().await?;
    Ok((shifts, availability, events))
}

/// GET /api/calendar/week - Seven Monday-start day cells around the anchor.
pub async fn week_grid(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> ApiResult<CalendarGrid> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let anchor = match &query.anchor {
        Some(value) => match validate_date("anchor", value) {
            Ok(d) => d,
            Err(e) => return error(e, revision_id),
        },
        None => Utc::now().date_naive(),
    };

    let (shifts, availability, events) = match load_rows(&state).await {
        Ok(rows) => rows,
        Err(e) => return error(e, revision_id),
    };

    let days = calendar::week_days(anchor)
        .into_iter()
        .map(|d| (d, true))
        .collect();
    let grid = calendar::build_grid(anchor, days, &shifts, &availability, &events);
    success(grid, revision_id)
}

/// GET /api/calendar/month - 42 cells (6 weeks) around the anchor's month.
pub async fn month_grid(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> ApiResult<CalendarGrid> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let anchor = match &query.anchor {
        Some(value) => match validate_date("anchor", value) {
            Ok(d) => d,
            Err(e) => return error(e, revision_id),
        },
        None => Utc::now().date_naive(),
    };

    let (shifts, availability, events) = match load_rows(&state).await {
        Ok(rows) => rows,
        Err(e) => return error(e, revision_id),
    };

    let days = calendar::month_grid_days(anchor);
    let grid = calendar::build_grid(anchor, days, &shifts, &availability, &events);
    success(grid, revision_id)
}

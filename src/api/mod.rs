//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod availability;
mod available_shifts;
mod calendar;
mod events;
mod members;
mod notifications;
mod revision;
mod shifts;
mod tasks;
mod workflows;

pub use availability::*;
pub use available_shifts::*;
pub use calendar::*;
pub use events::*;
pub use members::*;
pub use notifications::*;
pub use revision::*;
pub use shifts::*;
pub use tasks::*;
pub use workflows::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::AppError;
use crate::scheduling::{parse_date, parse_time_minutes};

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: i64) -> ApiResult<T> {
    Err(crate::errors::AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

/// Validate a canonical ISO date string (YYYY-MM-DD) at the boundary.
///
/// The calendar grids match rows by exact string equality, so non-canonical
/// spellings of a valid day are rejected here instead of silently never
/// matching a cell.
pub(crate) fn validate_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    match parse_date(value) {
        Some(date) if date.format("%Y-%m-%d").to_string() == value => Ok(date),
        _ => Err(AppError::Validation(format!(
            "{} must be a YYYY-MM-DD date, got '{}'",
            field, value
        ))),
    }
}

/// Validate an HH:MM time string at the boundary.
pub(crate) fn validate_time(field: &str, value: &str) -> Result<(), AppError> {
    match parse_time_minutes(value) {
        Some(_) => Ok(()),
        None => Err(AppError::Validation(format!(
            "{} must be an HH:MM time, got '{}'",
            field, value
        ))),
    }
}

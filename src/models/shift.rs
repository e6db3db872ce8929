//! Shift model matching the frontend Shift interface.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a shift.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl ShiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Scheduled => "scheduled",
            ShiftStatus::Confirmed => "confirmed",
            ShiftStatus::Completed => "completed",
            ShiftStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(ShiftStatus::Scheduled),
            "confirmed" => Some(ShiftStatus::Confirmed),
            "completed" => Some(ShiftStatus::Completed),
            "cancelled" => Some(ShiftStatus::Cancelled),
            _ => None,
        }
    }
}

/// A scheduled work interval assigned to a team member on a specific date.
///
/// No overlap prevention is enforced between shifts for the same assignee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// ISO calendar date, YYYY-MM-DD
    pub date: String,
    /// 24-hour wall time, HH:MM
    pub start_time: String,
    pub end_time: String,
    pub shift_type: String,
    pub status: ShiftStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_by: String,
    pub updated_at: String,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

/// Request body for creating a new shift.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_shift_type")]
    pub shift_type: String,
    #[serde(default = "default_status")]
    pub status: ShiftStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: String,
}

fn default_shift_type() -> String {
    "regular".to_string()
}

fn default_status() -> ShiftStatus {
    ShiftStatus::Scheduled
}

/// Request body for updating an existing shift.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub shift_type: Option<String>,
    #[serde(default)]
    pub status: Option<ShiftStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Query filters for listing shifts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftFilter {
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Request body for bulk shift generation over a date range.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkShiftRequest {
    pub start_date: String,
    /// Inclusive end of the range.
    pub end_date: String,
    /// Weekday numbers, 0 = Sunday .. 6 = Saturday.
    pub weekdays: Vec<u8>,
    pub assigned_to: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_shift_type")]
    pub shift_type: String,
    pub created_by: String,
}

//! Available (open) shift model.

use serde::{Deserialize, Serialize};

/// An unassigned shift a qualifying member may claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableShift {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    /// Minimum competence level required to claim this shift.
    pub competence_required: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<String>,
    pub created_by: String,
    pub updated_at: String,
}

/// Request body for publishing a new available shift.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailableShiftRequest {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_competence")]
    pub competence_required: i64,
    pub created_by: String,
}

fn default_competence() -> i64 {
    1
}

/// Request body for claiming an available shift.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimShiftRequest {
    pub member_email: String,
}

/// Query filters for listing available shifts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableShiftFilter {
    #[serde(default)]
    pub unclaimed_only: Option<bool>,
}

//! Per-member daily availability model.

use serde::{Deserialize, Serialize};

/// One availability row per (member, date); repeated saves overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub member_email: String,
    pub date: String,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub updated_at: String,
}

/// Request body for the availability upsert. Last write wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertAvailabilityRequest {
    pub member_email: String,
    pub date: String,
    pub is_available: bool,
    #[serde(default)]
    pub preferred_start_time: Option<String>,
    #[serde(default)]
    pub preferred_end_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Query filters for listing availability rows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityFilter {
    #[serde(default)]
    pub member_email: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

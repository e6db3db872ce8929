//! Team member model matching the frontend TeamMember interface.

use serde::{Deserialize, Serialize};

/// Role of a team member within the tenant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(MemberRole::Admin),
            "member" => Some(MemberRole::Member),
            _ => None,
        }
    }
}

/// A team member who can be assigned shifts and claim available shifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: MemberRole,
    /// Ordinal skill tier gating which available shifts the member may claim.
    pub competence_level: i64,
    pub hourly_rate: f64,
    pub updated_at: String,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

/// Request body for creating a new team member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub email: String,
    pub name: String,
    #[serde(default = "default_role")]
    pub role: MemberRole,
    #[serde(default = "default_competence")]
    pub competence_level: i64,
    #[serde(default)]
    pub hourly_rate: f64,
}

fn default_role() -> MemberRole {
    MemberRole::Member
}

fn default_competence() -> i64 {
    1
}

/// Request body for updating an existing team member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<MemberRole>,
    #[serde(default)]
    pub competence_level: Option<i64>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

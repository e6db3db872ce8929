//! Data models for the shift scheduling backend.
//!
//! Wire shapes use camelCase field names to match the frontend contract.

mod availability;
mod available_shift;
mod event;
mod member;
mod notification;
mod shift;
mod task;

pub use availability::*;
pub use available_shift::*;
pub use event::*;
pub use member::*;
pub use notification::*;
pub use shift::*;
pub use task::*;

use serde::Serialize;

/// Revision metadata returned by the revision endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}

//! Notification API endpoints.

use axum::extract::{Query, State};

use super::{error, success, ApiResult};
use crate::models::{Notification, NotificationFilter};
use crate::AppState;

/// GET /api/notifications - List notifications, optionally by recipient.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(filter): Query<NotificationFilter>,
) -> ApiResult<Vec<Notification>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_notifications(&filter).await {
        Ok(rows) => success(rows, revision_id),
        Err(e) => error(e, revision_id),
    }
}

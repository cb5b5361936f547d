/// Notification endpoints
///
/// The in-app inbox. All reads and writes are scoped to the authenticated
/// user; marking a notification read is idempotent.
///
/// # Endpoints
///
/// - `GET /v1/notifications` - All notifications, newest first
/// - `GET /v1/notifications/unread` - Unread only
/// - `GET /v1/notifications/count` - Unread count (badge)
/// - `PUT /v1/notifications/:id/read` - Mark one read
/// - `PUT /v1/notifications/read-all` - Mark everything read

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use taskhive_shared::{auth::middleware::AuthContext, models::notification::Notification};
use uuid::Uuid;

/// Unread count response
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    /// Number of unread notifications
    pub count: i64,
}

/// Bulk mark-read response
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    /// How many notifications flipped from unread to read
    pub marked: u64,
}

/// Lists all of the user's notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = Notification::list_by_user(&state.db, ctx.user_id).await?;

    Ok(Json(notifications))
}

/// Lists the user's unread notifications
pub async fn list_unread(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = Notification::list_unread(&state.db, ctx.user_id).await?;

    Ok(Json(notifications))
}

/// Returns the user's unread notification count
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<UnreadCountResponse>> {
    let count = Notification::count_unread(&state.db, ctx.user_id).await?;

    Ok(Json(UnreadCountResponse { count }))
}

/// Marks one notification as read
///
/// Idempotent; a second call on the same notification succeeds. A
/// notification belonging to another user is reported as not found.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let found = Notification::mark_read(&state.db, id, ctx.user_id).await?;
    if !found {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "read": true })))
}

/// Marks all of the user's notifications as read
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<MarkAllReadResponse>> {
    let marked = Notification::mark_all_read(&state.db, ctx.user_id).await?;

    Ok(Json(MarkAllReadResponse { marked }))
}

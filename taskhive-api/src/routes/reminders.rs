/// Reminder endpoints
///
/// Reminders are addressed as their own resource; ownership is always
/// checked through the parent task, so another user's reminders look like
/// they don't exist.
///
/// # Endpoints
///
/// - `POST   /v1/reminders` - Schedule a reminder for one of your tasks
/// - `GET    /v1/reminders/task/:task_id` - List a task's reminders
/// - `GET    /v1/reminders/pending` - Your due-but-unsent reminders
/// - `DELETE /v1/reminders/:id` - Delete a reminder

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskhive_shared::{
    auth::middleware::AuthContext,
    models::{activity_log::ActivityLog, reminder::Reminder, task::Task},
};
use uuid::Uuid;

/// Create reminder request
#[derive(Debug, Deserialize)]
pub struct CreateReminderRequest {
    /// Task the reminder is for
    pub task_id: Uuid,

    /// When the reminder should fire
    pub remind_at: DateTime<Utc>,
}

/// Schedules a reminder for one of the user's tasks
///
/// # Errors
///
/// - `400 Bad Request`: `remind_at` is in the past
/// - `404 Not Found`: Task missing or owned by someone else
pub async fn create_reminder(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<CreateReminderRequest>,
) -> ApiResult<(StatusCode, Json<Reminder>)> {
    if req.remind_at <= Utc::now() {
        return Err(ApiError::BadRequest(
            "Reminder time must be in the future".to_string(),
        ));
    }

    let task = Task::find_by_id_and_user(&state.db, req.task_id, ctx.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let reminder = Reminder::create(&state.db, task.id, req.remind_at).await?;

    ActivityLog::record_best_effort(
        &state.db,
        "create",
        "reminder",
        Some(reminder.id),
        &ctx.username,
        Some(&task.title),
    )
    .await;

    Ok((StatusCode::CREATED, Json(reminder)))
}

/// Lists all reminders for one of the user's tasks
pub async fn list_task_reminders(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Reminder>>> {
    // Ownership check through the parent task
    Task::find_by_id_and_user(&state.db, task_id, ctx.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let reminders = Reminder::list_by_task(&state.db, task_id).await?;

    Ok(Json(reminders))
}

/// Lists the user's due-but-unsent reminders across all their tasks
pub async fn list_pending_reminders(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Reminder>>> {
    let reminders = Reminder::list_pending_for_user(&state.db, ctx.user_id, Utc::now()).await?;

    Ok(Json(reminders))
}

/// Deletes a reminder
///
/// The delete is scoped through the parent task's owner, so a reminder on
/// someone else's task is reported as not found.
pub async fn delete_reminder(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Reminder::delete(&state.db, id, ctx.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Reminder not found".to_string()));
    }

    ActivityLog::record_best_effort(
        &state.db,
        "delete",
        "reminder",
        Some(id),
        &ctx.username,
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

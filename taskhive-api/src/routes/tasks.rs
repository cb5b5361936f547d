/// Task endpoints
///
/// All handlers here operate on the authenticated user's own tasks; the
/// owner id comes from the [`AuthContext`] injected by the JWT layer and is
/// threaded into every query. Admin-wide task views live under
/// `routes::admin`.
///
/// # Endpoints
///
/// - `GET    /v1/tasks` - Paginated listing with filters and sorting
/// - `POST   /v1/tasks` - Create a task
/// - `GET    /v1/tasks/all` - Unpaginated listing (served from cache)
/// - `GET    /v1/tasks/search` - Keyword search through the same engine
/// - `GET    /v1/tasks/overdue` - Overdue, not-completed tasks
/// - `GET    /v1/tasks/calendar` - Tasks due within a date range
/// - `GET    /v1/tasks/archived` - Archived tasks
/// - `GET    /v1/tasks/:id` - Fetch one task
/// - `PUT    /v1/tasks/:id` - Update title/description/priority/due date
/// - `PUT    /v1/tasks/:id/status` - Change status
/// - `PUT    /v1/tasks/:id/archive` - Archive
/// - `PUT    /v1/tasks/:id/unarchive` - Unarchive
/// - `DELETE /v1/tasks/:id` - Delete task with reminders and notifications

use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskhive_shared::{
    auth::middleware::AuthContext,
    models::{
        activity_log::ActivityLog,
        task::{CreateTask, Task, TaskFilter, TaskPriority, TaskStatus, UpdateTask},
    },
    pagination::{Page, PageSpec, SortDir},
};
use uuid::Uuid;
use validator::Validate;

/// Query parameters for the paginated task listing
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksParams {
    /// Zero-based page number
    pub page: Option<u32>,

    /// Page size (clamped to 1..=100)
    pub size: Option<u32>,

    /// Sort field (allow-listed; defaults to created_at)
    pub sort_by: Option<String>,

    /// Sort direction: "asc" or "desc"
    pub sort_dir: Option<String>,

    /// Status filter (unrecognized values are ignored)
    pub status: Option<String>,

    /// Priority filter (unrecognized values are ignored)
    pub priority: Option<String>,

    /// Keyword to match against title and description
    pub keyword: Option<String>,
}

impl ListTasksParams {
    fn page_spec(&self) -> PageSpec {
        let defaults = PageSpec::default();
        PageSpec::new(
            self.page.unwrap_or(defaults.page),
            self.size.unwrap_or(defaults.size),
            self.sort_by.clone().unwrap_or(defaults.sort_by),
            self.sort_dir
                .as_deref()
                .map(SortDir::parse)
                .unwrap_or(defaults.sort_dir),
        )
    }

    fn filter(&self) -> TaskFilter {
        TaskFilter::from_params(
            self.status.as_deref(),
            self.priority.as_deref(),
            self.keyword.as_deref(),
        )
    }
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// Priority (defaults to medium)
    pub priority: Option<TaskPriority>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Update task request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// Title
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// Priority (absent keeps the current one)
    pub priority: Option<TaskPriority>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Status change request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status
    pub status: TaskStatus,
}

/// Query parameters for the calendar view
#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    /// Inclusive range start
    pub start: DateTime<Utc>,

    /// Inclusive range end
    pub end: DateTime<Utc>,
}

/// Paginated, filtered task listing
///
/// Composes the status/priority/keyword filters with mandatory ownership
/// scoping. Unknown filter values degrade to "no filter"; an unknown sort
/// field is a 422.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ListTasksParams>,
) -> ApiResult<Json<Page<Task>>> {
    let spec = params.page_spec();
    let filter = params.filter();

    let page = Task::query(&state.db, ctx.user_id, &filter, &spec).await?;

    Ok(Json(page))
}

/// Unpaginated listing of the user's unarchived tasks
///
/// Served from the in-process cache when possible; repopulated from the
/// database on a miss.
pub async fn list_all_tasks(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    if let Some(tasks) = state.task_cache.get(ctx.user_id).await {
        return Ok(Json(tasks));
    }

    let tasks = Task::list_by_user(&state.db, ctx.user_id).await?;
    state.task_cache.insert(ctx.user_id, tasks.clone()).await;

    Ok(Json(tasks))
}

/// Creates a new task in pending status
pub async fn create_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    validate_request(&req)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: ctx.user_id,
            title: req.title,
            description: req.description,
            priority: req.priority,
            due_date: req.due_date,
        },
    )
    .await?;

    state.task_cache.invalidate(ctx.user_id).await;

    ActivityLog::record_best_effort(
        &state.db,
        "create",
        "task",
        Some(task.id),
        &ctx.username,
        Some(&task.title),
    )
    .await;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Fetches one of the user's tasks
///
/// A task owned by someone else is reported as not found.
pub async fn get_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id_and_user(&state.db, id, ctx.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Updates a task's title, description, priority, and due date
pub async fn update_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    validate_request(&req)?;

    let task = Task::update(
        &state.db,
        id,
        ctx.user_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            priority: req.priority,
            due_date: req.due_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    state.task_cache.invalidate(ctx.user_id).await;

    ActivityLog::record_best_effort(
        &state.db,
        "update",
        "task",
        Some(task.id),
        &ctx.username,
        Some(&task.title),
    )
    .await;

    Ok(Json(task))
}

/// Changes a task's status
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Task>> {
    let task = Task::update_status(&state.db, id, ctx.user_id, req.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    state.task_cache.invalidate(ctx.user_id).await;

    ActivityLog::record_best_effort(
        &state.db,
        "update_status",
        "task",
        Some(task.id),
        &ctx.username,
        Some(task.status.as_str()),
    )
    .await;

    Ok(Json(task))
}

/// Archives a task, hiding it from default listings
pub async fn archive_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    set_archived(state, ctx, id, true).await
}

/// Restores an archived task
pub async fn unarchive_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    set_archived(state, ctx, id, false).await
}

async fn set_archived(
    state: AppState,
    ctx: AuthContext,
    id: Uuid,
    archived: bool,
) -> ApiResult<Json<Task>> {
    let task = Task::set_archived(&state.db, id, ctx.user_id, archived)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    state.task_cache.invalidate(ctx.user_id).await;

    ActivityLog::record_best_effort(
        &state.db,
        if archived { "archive" } else { "unarchive" },
        "task",
        Some(task.id),
        &ctx.username,
        Some(&task.title),
    )
    .await;

    Ok(Json(task))
}

/// Deletes a task together with its reminders and notifications
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete_with_children(&state.db, id, ctx.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    state.task_cache.invalidate(ctx.user_id).await;

    ActivityLog::record_best_effort(&state.db, "delete", "task", Some(id), &ctx.username, None)
        .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Lists the user's overdue tasks
pub async fn list_overdue_tasks(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::find_overdue_for_user(&state.db, ctx.user_id, Utc::now()).await?;

    Ok(Json(tasks))
}

/// Lists the user's tasks due within a date range
///
/// # Errors
///
/// - `400 Bad Request`: `start` is after `end`
pub async fn list_calendar_tasks(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<CalendarParams>,
) -> ApiResult<Json<Vec<Task>>> {
    if params.start > params.end {
        return Err(ApiError::BadRequest(
            "Range start must not be after range end".to_string(),
        ));
    }

    let tasks =
        Task::find_by_date_range(&state.db, ctx.user_id, params.start, params.end).await?;

    Ok(Json(tasks))
}

/// Lists the user's archived tasks
pub async fn list_archived_tasks(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_archived(&state.db, ctx.user_id).await?;

    Ok(Json(tasks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_request_validation() {
        let req = CreateTaskRequest {
            title: String::new(),
            description: None,
            priority: None,
            due_date: None,
        };
        assert!(req.validate().is_err());

        let req = CreateTaskRequest {
            title: "a".repeat(101),
            description: None,
            priority: None,
            due_date: None,
        };
        assert!(req.validate().is_err());

        let req = CreateTaskRequest {
            title: "Write quarterly report".to_string(),
            description: Some("Q3 numbers for the board".to_string()),
            priority: Some(TaskPriority::High),
            due_date: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_list_params_defaults() {
        let params = ListTasksParams::default();
        let spec = params.page_spec();
        assert_eq!(spec.page, 0);
        assert_eq!(spec.size, 10);
        assert_eq!(spec.sort_by, "created_at");
        assert_eq!(spec.sort_dir, SortDir::Desc);
    }

    #[test]
    fn test_list_params_filter_degrades_unknown_values() {
        let params = ListTasksParams {
            status: Some("done".to_string()),
            priority: Some("URGENT".to_string()),
            keyword: Some("report".to_string()),
            ..Default::default()
        };
        let filter = params.filter();
        assert!(filter.status.is_none());
        assert!(filter.priority.is_none());
        assert_eq!(filter.keyword.as_deref(), Some("report"));
    }
}

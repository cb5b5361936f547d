/// Admin endpoints
///
/// Gated behind the admin role by the router layer. These are the only
/// handlers that see data across users.
///
/// # Endpoints
///
/// - `GET    /v1/admin/users` - Paginated user listing
/// - `GET    /v1/admin/users/:id` - Fetch one user
/// - `PUT    /v1/admin/users/:id/role` - Change a user's role
/// - `DELETE /v1/admin/users/:id` - Delete a user and their data
/// - `GET    /v1/admin/tasks` - Paginated listing of all tasks
/// - `GET    /v1/admin/activity` - Recent audit entries

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskhive_shared::{
    auth::middleware::AuthContext,
    models::{
        activity_log::ActivityLog,
        task::Task,
        user::{User, UserRole},
    },
    pagination::{Page, PageSpec, SortDir},
};
use uuid::Uuid;

/// Pagination parameters for admin listings
#[derive(Debug, Default, Deserialize)]
pub struct AdminListParams {
    /// Zero-based page number
    pub page: Option<u32>,

    /// Page size (clamped to 1..=100)
    pub size: Option<u32>,

    /// Sort field for the task listing (allow-listed)
    pub sort_by: Option<String>,

    /// Sort direction: "asc" or "desc"
    pub sort_dir: Option<String>,
}

impl AdminListParams {
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
}

/// Role change request
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// New role: "user" or "admin"
    pub role: String,
}

/// Activity listing parameters
#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    /// Maximum entries to return (default 100)
    pub limit: Option<i64>,
}

/// Paginated listing of all users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> ApiResult<Json<Page<User>>> {
    let spec = params.page_spec();

    let total = User::count(&state.db).await?;
    let users = User::list(&state.db, spec.limit(), spec.offset()).await?;

    Ok(Json(Page::new(users, &spec, total)))
}

/// Fetches one user by id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Changes a user's role
///
/// # Errors
///
/// - `400 Bad Request`: Unknown role, or an admin demoting themselves
/// - `404 Not Found`: No such user
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<User>> {
    let role = UserRole::parse(&req.role)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown role: {}", req.role)))?;

    if id == ctx.user_id && role != UserRole::Admin {
        return Err(ApiError::BadRequest(
            "Admins cannot demote themselves".to_string(),
        ));
    }

    let user = User::update_role(&state.db, id, role)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    ActivityLog::record_best_effort(
        &state.db,
        "update_role",
        "user",
        Some(user.id),
        &ctx.username,
        Some(role.as_str()),
    )
    .await;

    Ok(Json(user))
}

/// Deletes a user account
///
/// Tasks, reminders, and notifications go with it via cascading deletes.
///
/// # Errors
///
/// - `400 Bad Request`: An admin deleting their own account
/// - `404 Not Found`: No such user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if id == ctx.user_id {
        return Err(ApiError::BadRequest(
            "Admins cannot delete their own account".to_string(),
        ));
    }

    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    state.task_cache.invalidate(id).await;

    ActivityLog::record_best_effort(&state.db, "delete", "user", Some(id), &ctx.username, None)
        .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Paginated listing of every task in the system
pub async fn list_all_tasks(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> ApiResult<Json<Page<Task>>> {
    let spec = params.page_spec();
    let page = Task::list_all(&state.db, &spec).await?;

    Ok(Json(page))
}

/// Recent audit entries, newest first
pub async fn list_activity(
    State(state): State<AppState>,
    Query(params): Query<ActivityParams>,
) -> ApiResult<Json<Vec<ActivityLog>>> {
    let limit = params.limit.unwrap_or(100).clamp(1, 1000);
    let entries = ActivityLog::list_recent(&state.db, limit).await?;

    Ok(Json(entries))
}

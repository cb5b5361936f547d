/// Own-profile endpoints
///
/// Self-service account management for the authenticated user. Role
/// changes and account deletion live under `routes::admin`.
///
/// # Endpoints
///
/// - `GET /v1/users/me` - Fetch own profile
/// - `PUT /v1/users/me` - Update email / notification opt-in
/// - `PUT /v1/users/me/password` - Change password

use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use taskhive_shared::{
    auth::{middleware::AuthContext, password},
    models::{activity_log::ActivityLog, user::User},
};
use validator::Validate;

/// Profile update request
///
/// Absent fields keep their current value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Whether reminder/overdue emails should be sent
    pub email_notifications: Option<bool>,
}

/// Password change request
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password, re-verified before the change
    pub current_password: String,

    /// New password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Fetches the authenticated user's profile
///
/// The password hash never appears in the response.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, ctx.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Updates the authenticated user's email and notification opt-in
///
/// # Errors
///
/// - `409 Conflict`: Email already used by another account
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    validate_request(&req)?;

    if let Some(email) = &req.email {
        if User::email_taken_by_other(&state.db, email, ctx.user_id).await? {
            return Err(ApiError::Conflict("Email already exists".to_string()));
        }
    }

    let user = User::update_profile(
        &state.db,
        ctx.user_id,
        req.email.as_deref(),
        req.email_notifications,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    ActivityLog::record_best_effort(
        &state.db,
        "update_profile",
        "user",
        Some(user.id),
        &ctx.username,
        None,
    )
    .await;

    Ok(Json(user))
}

/// Changes the authenticated user's password
///
/// The current password is re-verified before the new hash is stored.
///
/// # Errors
///
/// - `401 Unauthorized`: Current password is wrong
pub async fn change_password(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    validate_request(&req)?;

    let user = User::find_by_id(&state.db, ctx.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = password::verify_password(&req.current_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = password::hash_password(&req.new_password)?;
    User::update_password_hash(&state.db, ctx.user_id, &new_hash).await?;

    ActivityLog::record_best_effort(
        &state.db,
        "change_password",
        "user",
        Some(user.id),
        &ctx.username,
        None,
    )
    .await;

    Ok(Json(serde_json::json!({ "changed": true })))
}

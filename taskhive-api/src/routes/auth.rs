/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get a token

use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskhive_shared::{
    auth::{jwt, password},
    models::{
        activity_log::ActivityLog,
        user::{CreateUser, User, UserRole},
    },
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username (unique)
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Email address (unique)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// User ID
    pub user_id: String,

    /// Username
    pub username: String,

    /// Access token (24h)
    pub token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User ID
    pub user_id: String,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// Role
    pub role: UserRole,

    /// Access token (24h)
    pub token: String,
}

/// Register a new user
///
/// Creates a user account with the default `user` role and returns a token
/// so the client can skip a separate login round trip.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Username or email already taken
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    validate_request(&req)?;

    if User::exists_by_username(&state.db, &req.username).await? {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }
    if User::exists_by_email(&state.db, &req.email).await? {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username.clone(),
            email: req.email.clone(),
            password_hash,
        },
    )
    .await?;

    let claims = jwt::Claims::new(user.id, user.username.clone(), user.role);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    ActivityLog::record_best_effort(
        &state.db,
        "register",
        "user",
        Some(user.id),
        &user.username,
        None,
    )
    .await;

    tracing::info!(user_id = %user.id, username = %user.username, "New user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id.to_string(),
            username: user.username,
            token,
        }),
    ))
}

/// Login endpoint
///
/// Authenticates a user by username and password and returns a JWT.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials (unknown user and wrong
///   password are indistinguishable)
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    validate_request(&req)?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, user.username.clone(), user.role);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    ActivityLog::record_best_effort(
        &state.db,
        "login",
        "user",
        Some(user.id),
        &user.username,
        None,
    )
    .await;

    Ok(Json(LoginResponse {
        user_id: user.id.to_string(),
        username: user.username,
        email: user.email,
        role: user.role,
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            username: "al".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "a-long-enough-password".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_login_response_carries_email() {
        let response = LoginResponse {
            user_id: uuid::Uuid::new_v4().to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: UserRole::User,
            token: "signed.jwt.token".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["role"], "user");
        assert!(json["token"].is_string());
    }
}

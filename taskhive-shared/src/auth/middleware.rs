/// Authentication middleware for Axum
///
/// Extracts the Bearer token from the Authorization header, validates it,
/// and adds an [`AuthContext`] to the request extensions. Handlers receive
/// the caller's identity explicitly through that context; there is no
/// ambient "current user" lookup anywhere below the HTTP layer.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use taskhive_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.username)
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::models::user::UserRole;

/// Authenticated caller identity added to request extensions
///
/// Built from validated JWT claims; passed explicitly into every query and
/// mutation so ownership scoping never depends on hidden state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Username embedded in the token
    pub username: String,

    /// Role embedded in the token
    pub role: UserRole,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_claims(claims: &super::jwt::Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username.clone(),
            role: claims.role,
        }
    }

    /// Whether the caller holds the admin role
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

/// JWT authentication middleware
///
/// Validates the `Authorization: Bearer <token>` header and injects an
/// [`AuthContext`] into the request extensions.
///
/// # Errors
///
/// Returns 401 Unauthorized if the header is missing, the token is invalid,
/// or the token has expired; 400 Bad Request for a non-Bearer header.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    req.extensions_mut().insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Claims;

    #[test]
    fn test_auth_context_from_claims() {
        let claims = Claims::new(Uuid::new_v4(), "alice".to_string(), UserRole::Admin);
        let ctx = AuthContext::from_claims(&claims);

        assert_eq!(ctx.user_id, claims.sub);
        assert_eq!(ctx.username, "alice");
        assert!(ctx.is_admin());
    }

    #[test]
    fn test_regular_user_is_not_admin() {
        let claims = Claims::new(Uuid::new_v4(), "bob".to_string(), UserRole::User);
        let ctx = AuthContext::from_claims(&claims);
        assert!(!ctx.is_admin());
    }
}

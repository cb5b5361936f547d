/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskhive_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskhive_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskhive_shared::{
    auth::middleware::{jwt_auth_middleware, AuthContext},
    cache::TaskListCache,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Per-user task-list cache
    pub task_cache: TaskListCache,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            task_cache: TaskListCache::new(),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /v1/                           # API v1 (versioned)
///     ├── /auth/                     # Authentication (public)
///     │   ├── POST /register
///     │   └── POST /login
///     ├── /tasks/                    # Task management (authenticated)
///     │   ├── GET    /               # Paginated, filtered listing
///     │   ├── POST   /               # Create task
///     │   ├── GET    /all            # Unpaginated listing (cached)
///     │   ├── GET    /search         # Keyword search (same engine)
///     │   ├── GET    /overdue        # Overdue tasks
///     │   ├── GET    /calendar       # Tasks in a date range
///     │   ├── GET    /archived       # Archived tasks
///     │   ├── GET    /:id            # Fetch one task
///     │   ├── PUT    /:id            # Update task
///     │   ├── PUT    /:id/status     # Change status
///     │   ├── PUT    /:id/archive    # Archive
///     │   ├── PUT    /:id/unarchive  # Unarchive
///     │   └── DELETE /:id            # Delete with reminders/notifications
///     ├── /reminders/
///     │   ├── POST   /               # Schedule a reminder
///     │   ├── GET    /task/:task_id  # List a task's reminders
///     │   ├── GET    /pending        # Caller's due-but-unsent reminders
///     │   └── DELETE /:id            # Delete a reminder
///     ├── /notifications/            # (authenticated)
///     │   ├── GET /
///     │   ├── GET /unread
///     │   ├── GET /count
///     │   ├── PUT /:id/read
///     │   └── PUT /read-all
///     ├── /users/                    # Own profile (authenticated)
///     │   ├── GET /me
///     │   ├── PUT /me
///     │   └── PUT /me/password
///     └── /admin/                    # (authenticated + admin role)
///         ├── GET    /users
///         ├── GET    /users/:id
///         ├── DELETE /users/:id
///         ├── PUT    /users/:id/role
///         ├── GET    /tasks
///         └── GET    /activity
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
/// 4. Admin role gate (admin routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Task routes (require JWT authentication)
    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks))
        .route("/", post(routes::tasks::create_task))
        .route("/all", get(routes::tasks::list_all_tasks))
        .route("/search", get(routes::tasks::list_tasks))
        .route("/overdue", get(routes::tasks::list_overdue_tasks))
        .route("/calendar", get(routes::tasks::list_calendar_tasks))
        .route("/archived", get(routes::tasks::list_archived_tasks))
        .route("/:id", get(routes::tasks::get_task))
        .route("/:id", put(routes::tasks::update_task))
        .route("/:id", delete(routes::tasks::delete_task))
        .route("/:id/status", put(routes::tasks::update_task_status))
        .route("/:id/archive", put(routes::tasks::archive_task))
        .route("/:id/unarchive", put(routes::tasks::unarchive_task));

    let reminder_routes = Router::new()
        .route("/", post(routes::reminders::create_reminder))
        .route("/task/:task_id", get(routes::reminders::list_task_reminders))
        .route("/pending", get(routes::reminders::list_pending_reminders))
        .route("/:id", delete(routes::reminders::delete_reminder));

    let notification_routes = Router::new()
        .route("/", get(routes::notifications::list_notifications))
        .route("/unread", get(routes::notifications::list_unread))
        .route("/count", get(routes::notifications::unread_count))
        .route("/:id/read", put(routes::notifications::mark_read))
        .route("/read-all", put(routes::notifications::mark_all_read));

    let user_routes = Router::new()
        .route("/me", get(routes::users::get_profile))
        .route("/me", put(routes::users::update_profile))
        .route("/me/password", put(routes::users::change_password));

    // Admin routes stack the role gate on top of JWT auth
    let admin_routes = Router::new()
        .route("/users", get(routes::admin::list_users))
        .route("/users/:id", get(routes::admin::get_user))
        .route("/users/:id", delete(routes::admin::delete_user))
        .route("/users/:id/role", put(routes::admin::update_user_role))
        .route("/tasks", get(routes::admin::list_all_tasks))
        .route("/activity", get(routes::admin::list_activity))
        .layer(axum::middleware::from_fn(require_admin));

    let authenticated = Router::new()
        .nest("/tasks", task_routes)
        .nest("/reminders", reminder_routes)
        .nest("/notifications", notification_routes)
        .nest("/users", user_routes)
        .nest("/admin", admin_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Build complete v1 API
    let v1_routes = Router::new().nest("/auth", auth_routes).merge(authenticated);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the JWT from the Authorization header, then
/// injects [`AuthContext`] into request extensions. Every handler behind
/// this layer acts on that explicit identity; nothing downstream reads
/// ambient state.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let secret = state.jwt_secret().to_string();

    jwt_auth_middleware(secret, req, next)
        .await
        .map_err(Into::into)
}

/// Admin role gate
///
/// Must run after [`jwt_auth_layer`] so the [`AuthContext`] extension is
/// present. Rejects non-admin callers with 403.
async fn require_admin(req: Request, next: Next) -> Result<Response, crate::error::ApiError> {
    let ctx = req
        .extensions()
        .get::<AuthContext>()
        .ok_or_else(|| crate::error::ApiError::Unauthorized("Missing credentials".to_string()))?;

    if !ctx.is_admin() {
        return Err(crate::error::ApiError::Forbidden(
            "Admin role required".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

/// Database models for TaskHive
///
/// This module contains all database models and their query operations.
///
/// # Models
///
/// - `user`: User accounts, roles, and notification preferences
/// - `task`: Tasks plus the query/filter engine and sort allow-list
/// - `reminder`: Explicit per-task reminders with a sent flag
/// - `notification`: In-app reminder/overdue notifications with read tracking
/// - `activity_log`: Append-only audit records
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::user::{User, CreateUser, UserRole};
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     email: "alice@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod activity_log;
pub mod notification;
pub mod reminder;
pub mod task;
pub mod user;

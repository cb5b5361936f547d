/// Notification model and operations
///
/// Notifications are the in-app inbox: the sweep writes one row per fired
/// reminder or overdue detection, and users read, mark, and count them
/// through the API. Rows are always scoped to a user; the task link is
/// optional and survives only as long as the task does.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notifications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     task_id UUID REFERENCES tasks(id) ON DELETE CASCADE,
///     message VARCHAR(500) NOT NULL,
///     kind notification_kind NOT NULL,
///     is_read BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// What produced a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Upcoming-due-date or explicit reminder
    Reminder,

    /// Past-due detection
    Overdue,
}

impl NotificationKind {
    /// Converts kind to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Reminder => "reminder",
            NotificationKind::Overdue => "overdue",
        }
    }
}

/// Notification model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// User this notification is addressed to
    pub user_id: Uuid,

    /// Task that triggered it, if it still exists
    pub task_id: Option<Uuid>,

    /// Human-readable message
    pub message: String,

    /// What produced it
    pub kind: NotificationKind,

    /// Whether the user has read it
    pub is_read: bool,

    /// When it was created
    pub created_at: DateTime<Utc>,
}

impl Notification {
    const COLUMNS: &'static str = "id, user_id, task_id, message, kind, is_read, created_at";

    /// Creates a notification
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        task_id: Option<Uuid>,
        message: &str,
        kind: NotificationKind,
    ) -> Result<Self, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, task_id, message, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, task_id, message, kind, is_read, created_at
            "#,
        )
        .bind(user_id)
        .bind(task_id)
        .bind(message)
        .bind(kind)
        .fetch_one(pool)
        .await?;

        Ok(notification)
    }

    /// Lists all of a user's notifications, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
            Self::COLUMNS
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    /// Lists a user's unread notifications, newest first
    pub async fn list_unread(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications WHERE user_id = $1 AND is_read = FALSE \
             ORDER BY created_at DESC",
            Self::COLUMNS
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    /// Counts a user's unread notifications
    pub async fn count_unread(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Marks one notification as read, scoped to its owner
    ///
    /// Idempotent: marking an already-read notification succeeds.
    ///
    /// # Returns
    ///
    /// `true` if the notification exists and belongs to `user_id`.
    pub async fn mark_read(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Marks all of a user's notifications as read
    ///
    /// # Returns
    ///
    /// How many rows flipped from unread to read.
    pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Reminder model and operations
///
/// Explicit reminders let a user schedule a notification at an arbitrary
/// time for one of their tasks, independent of the task's due date. The
/// hourly sweep fires any reminder whose `remind_at` has passed and marks
/// it sent, so each reminder fires at most once.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE reminders (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     remind_at TIMESTAMPTZ NOT NULL,
///     sent BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Reminder model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reminder {
    /// Unique reminder ID
    pub id: Uuid,

    /// Task this reminder belongs to
    pub task_id: Uuid,

    /// When the reminder should fire
    pub remind_at: DateTime<Utc>,

    /// Set once the sweep has fired this reminder
    pub sent: bool,

    /// When the reminder was created
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// Creates a reminder for a task
    ///
    /// The caller is responsible for having verified task ownership first.
    pub async fn create(
        pool: &PgPool,
        task_id: Uuid,
        remind_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let reminder = sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (task_id, remind_at)
            VALUES ($1, $2)
            RETURNING id, task_id, remind_at, sent, created_at
            "#,
        )
        .bind(task_id)
        .bind(remind_at)
        .fetch_one(pool)
        .await?;

        Ok(reminder)
    }

    /// Lists all reminders for a task, soonest first
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let reminders = sqlx::query_as::<_, Reminder>(
            "SELECT id, task_id, remind_at, sent, created_at FROM reminders \
             WHERE task_id = $1 ORDER BY remind_at ASC",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(reminders)
    }

    /// Unsent reminders whose fire time has passed
    ///
    /// Sweep support: spans all users. The partial index on `sent = FALSE`
    /// keeps this cheap as the table grows.
    pub async fn find_pending(
        pool: &PgPool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let reminders = sqlx::query_as::<_, Reminder>(
            "SELECT id, task_id, remind_at, sent, created_at FROM reminders \
             WHERE sent = FALSE AND remind_at < $1 ORDER BY remind_at ASC",
        )
        .bind(now)
        .fetch_all(pool)
        .await?;

        Ok(reminders)
    }

    /// Unsent, already-due reminders on the caller's own tasks, soonest first
    pub async fn list_pending_for_user(
        pool: &PgPool,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let reminders = sqlx::query_as::<_, Reminder>(
            "SELECT r.id, r.task_id, r.remind_at, r.sent, r.created_at \
             FROM reminders r JOIN tasks t ON r.task_id = t.id \
             WHERE t.user_id = $1 AND r.sent = FALSE AND r.remind_at < $2 \
             ORDER BY r.remind_at ASC",
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(pool)
        .await?;

        Ok(reminders)
    }

    /// Marks a reminder as sent
    pub async fn mark_sent(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE reminders SET sent = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Deletes a reminder, scoped to the owner of its task
    ///
    /// # Returns
    ///
    /// `true` if the reminder existed, belonged to a task owned by
    /// `user_id`, and was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM reminders r USING tasks t \
             WHERE r.id = $1 AND r.task_id = t.id AND t.user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

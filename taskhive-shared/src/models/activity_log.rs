/// Activity log model
///
/// Append-only audit trail. Every mutating operation records who did what
/// to which entity; rows are never updated or deleted through the API.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE activity_logs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     action VARCHAR(50) NOT NULL,
///     entity_type VARCHAR(50) NOT NULL,
///     entity_id UUID,
///     username VARCHAR(50) NOT NULL,
///     details VARCHAR(500),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Activity log entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLog {
    /// Unique entry ID
    pub id: Uuid,

    /// What happened, e.g. "create", "update_status", "delete"
    pub action: String,

    /// What kind of entity, e.g. "task", "user", "reminder"
    pub entity_type: String,

    /// The entity acted on, when one exists
    pub entity_id: Option<Uuid>,

    /// Who did it
    pub username: String,

    /// Free-form detail
    pub details: Option<String>,

    /// When it happened
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    /// Appends an audit entry
    pub async fn record(
        pool: &PgPool,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
        username: &str,
        details: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO activity_logs (action, entity_type, entity_id, username, details) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(username)
        .bind(details)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Appends an audit entry, logging instead of failing on error
    ///
    /// Audit writes must never fail the operation they describe.
    pub async fn record_best_effort(
        pool: &PgPool,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
        username: &str,
        details: Option<&str>,
    ) {
        if let Err(e) =
            Self::record(pool, action, entity_type, entity_id, username, details).await
        {
            tracing::warn!(action, entity_type, error = %e, "Failed to write activity log entry");
        }
    }

    /// Lists recent entries, newest first (admin surface)
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        let entries = sqlx::query_as::<_, ActivityLog>(
            "SELECT id, action, entity_type, entity_id, username, details, created_at \
             FROM activity_logs ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }
}

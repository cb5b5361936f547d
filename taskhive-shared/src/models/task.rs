/// Task model, CRUD operations, and the query/filter engine
///
/// Tasks are the core entity of TaskHive. Every task belongs to exactly one
/// user, and every query here takes the caller's user id explicitly; there
/// is no way to reach another user's tasks through this module short of the
/// admin-wide listing, which is a separate, explicitly named operation.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(100) NOT NULL,
///     description VARCHAR(500),
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date TIMESTAMPTZ,
///     archived BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Filtering
///
/// [`Task::query`] composes ownership scoping (mandatory), the implicit
/// `archived = false` predicate, and the optional status/priority/keyword
/// filters into a single SQL statement. Sort fields are validated against
/// [`TaskSortField`]; a caller-supplied column name never reaches the SQL
/// text directly.

use crate::pagination::{Page, PageSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    Pending,

    /// Being worked on
    InProgress,

    /// Done; completed tasks are never picked up by the sweep
    Completed,
}

impl TaskStatus {
    /// Converts status to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parses a status string, case-insensitively
    ///
    /// Returns `None` for unrecognized values. Filter parameters treat
    /// `None` as "no filter" rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("pending") {
            Some(TaskStatus::Pending)
        } else if s.eq_ignore_ascii_case("in_progress") {
            Some(TaskStatus::InProgress)
        } else if s.eq_ignore_ascii_case("completed") {
            Some(TaskStatus::Completed)
        } else {
            None
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Converts priority to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Parses a priority string, case-insensitively
    ///
    /// Returns `None` for unrecognized values.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("low") {
            Some(TaskPriority::Low)
        } else if s.eq_ignore_ascii_case("medium") {
            Some(TaskPriority::Medium)
        } else if s.eq_ignore_ascii_case("high") {
            Some(TaskPriority::High)
        } else {
            None
        }
    }
}

/// Allow-listed sort fields for task queries
///
/// The caller-supplied sort parameter must map onto one of these; anything
/// else is rejected with [`TaskQueryError::InvalidSortField`] before any
/// SQL is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortField {
    CreatedAt,
    UpdatedAt,
    DueDate,
    Title,
    Status,
    Priority,
}

impl TaskSortField {
    /// Parses a sort parameter, accepting both snake_case and camelCase
    /// spellings ("due_date" and "dueDate").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" | "createdAt" => Some(TaskSortField::CreatedAt),
            "updated_at" | "updatedAt" => Some(TaskSortField::UpdatedAt),
            "due_date" | "dueDate" => Some(TaskSortField::DueDate),
            "title" => Some(TaskSortField::Title),
            "status" => Some(TaskSortField::Status),
            "priority" => Some(TaskSortField::Priority),
            _ => None,
        }
    }

    /// Storage column backing this sort field
    pub fn column(&self) -> &'static str {
        match self {
            TaskSortField::CreatedAt => "created_at",
            TaskSortField::UpdatedAt => "updated_at",
            TaskSortField::DueDate => "due_date",
            TaskSortField::Title => "title",
            TaskSortField::Status => "status",
            TaskSortField::Priority => "priority",
        }
    }
}

/// Composable filter over a user's tasks
///
/// `None` fields apply no constraint. Status and priority are parsed
/// permissively from query parameters: unrecognized values degrade to
/// "no filter" instead of erroring.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Exact status match
    pub status: Option<TaskStatus>,

    /// Exact priority match
    pub priority: Option<TaskPriority>,

    /// Case-insensitive substring match on title OR description
    pub keyword: Option<String>,
}

impl TaskFilter {
    /// Builds a filter from raw query-parameter strings
    ///
    /// Unrecognized status/priority values are dropped silently; a blank
    /// keyword is treated as absent.
    pub fn from_params(
        status: Option<&str>,
        priority: Option<&str>,
        keyword: Option<&str>,
    ) -> Self {
        Self {
            status: status.and_then(TaskStatus::parse),
            priority: priority.and_then(TaskPriority::parse),
            keyword: keyword
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
        }
    }
}

/// Error type for the task query engine
#[derive(Debug, thiserror::Error)]
pub enum TaskQueryError {
    /// Sort field is not in the allow-list
    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    /// Underlying database error
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Title (required, at most 100 characters)
    pub title: String,

    /// Optional description (at most 500 characters)
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Hidden from default listings when true
    pub archived: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning user
    pub user_id: Uuid,

    /// Title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority (defaults to medium)
    pub priority: Option<TaskPriority>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Input for updating a task
///
/// Update semantics are whole-record: title, description, and due date are
/// replaced outright; an absent priority keeps the current one. Status
/// changes go through [`Task::update_status`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    const COLUMNS: &'static str = "id, user_id, title, description, status, priority, due_date, \
                                   archived, created_at, updated_at";

    /// Creates a new task in pending state
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, priority, due_date)
            VALUES ($1, $2, $3, COALESCE($4, 'medium'::task_priority), $5)
            RETURNING id, user_id, title, description, status, priority, due_date,
                      archived, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID without ownership scoping
    ///
    /// Background-worker use only; API handlers go through
    /// [`Task::find_by_id_and_user`].
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            Self::COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, scoped to its owner
    ///
    /// Returns `None` both when the task does not exist and when it belongs
    /// to a different user; callers cannot distinguish the two.
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            Self::COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a user's unarchived tasks without pagination, newest first
    ///
    /// Backs the default listing endpoint and the per-user task-list cache.
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 AND archived = FALSE \
             ORDER BY created_at DESC",
            Self::COLUMNS
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Queries a page of the user's unarchived tasks under a composable filter
    ///
    /// Ownership scoping and `archived = false` are unconditional. The
    /// status, priority, and keyword predicates apply only when present in
    /// the filter, and all filtering happens inside the SQL statement.
    ///
    /// # Errors
    ///
    /// Returns [`TaskQueryError::InvalidSortField`] when `spec.sort_by` is
    /// not in the allow-list.
    pub async fn query(
        pool: &PgPool,
        user_id: Uuid,
        filter: &TaskFilter,
        spec: &PageSpec,
    ) -> Result<Page<Self>, TaskQueryError> {
        let sort = TaskSortField::parse(&spec.sort_by)
            .ok_or_else(|| TaskQueryError::InvalidSortField(spec.sort_by.clone()))?;

        let predicates = "user_id = $1 AND archived = FALSE \
             AND ($2::task_status IS NULL OR status = $2) \
             AND ($3::task_priority IS NULL OR priority = $3) \
             AND ($4::text IS NULL OR title ILIKE $4 OR description ILIKE $4)";

        let keyword_pattern = filter.keyword.as_ref().map(|k| format!("%{}%", k));

        let (total,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM tasks WHERE {}", predicates))
                .bind(user_id)
                .bind(filter.status)
                .bind(filter.priority)
                .bind(keyword_pattern.as_deref())
                .fetch_one(pool)
                .await?;

        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE {} ORDER BY {} {} LIMIT $5 OFFSET $6",
            Self::COLUMNS,
            predicates,
            sort.column(),
            spec.sort_dir.as_sql(),
        ))
        .bind(user_id)
        .bind(filter.status)
        .bind(filter.priority)
        .bind(keyword_pattern.as_deref())
        .bind(spec.limit())
        .bind(spec.offset())
        .fetch_all(pool)
        .await?;

        Ok(Page::new(tasks, spec, total))
    }

    /// Lists the user's unarchived tasks with a due date in `[start, end]`
    pub async fn find_by_date_range(
        pool: &PgPool,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks \
             WHERE user_id = $1 AND archived = FALSE \
               AND due_date IS NOT NULL AND due_date >= $2 AND due_date <= $3 \
             ORDER BY due_date ASC",
            Self::COLUMNS
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the user's overdue tasks (due before `now`, not completed)
    pub async fn find_overdue_for_user(
        pool: &PgPool,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks \
             WHERE user_id = $1 AND archived = FALSE \
               AND due_date IS NOT NULL AND due_date < $2 AND status <> 'completed' \
             ORDER BY due_date ASC",
            Self::COLUMNS
        ))
        .bind(user_id)
        .bind(now)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the user's archived tasks
    pub async fn list_archived(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 AND archived = TRUE \
             ORDER BY updated_at DESC",
            Self::COLUMNS
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Admin-wide paginated listing with no ownership filter
    pub async fn list_all(pool: &PgPool, spec: &PageSpec) -> Result<Page<Self>, TaskQueryError> {
        let sort = TaskSortField::parse(&spec.sort_by)
            .ok_or_else(|| TaskQueryError::InvalidSortField(spec.sort_by.clone()))?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks ORDER BY {} {} LIMIT $1 OFFSET $2",
            Self::COLUMNS,
            sort.column(),
            spec.sort_dir.as_sql(),
        ))
        .bind(spec.limit())
        .bind(spec.offset())
        .fetch_all(pool)
        .await?;

        Ok(Page::new(tasks, spec, total))
    }

    /// Updates a task's title, description, priority, and due date
    ///
    /// Bumps `updated_at`. Returns `None` if the task does not exist or is
    /// not owned by `user_id`.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3,
                description = $4,
                priority = COALESCE($5, priority),
                due_date = $6,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, status, priority, due_date,
                      archived, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates a task's status
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $3,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, status, priority, due_date,
                      archived, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Archives or unarchives a task
    pub async fn set_archived(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        archived: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET archived = $3,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, status, priority, due_date,
                      archived, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(archived)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task together with its reminders and notifications
    ///
    /// All three deletes run inside one transaction so a partial failure
    /// never leaves orphaned child rows.
    ///
    /// # Returns
    ///
    /// `true` if the task existed (and was owned by `user_id`) and was
    /// deleted, `false` otherwise.
    pub async fn delete_with_children(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM reminders WHERE task_id = $1 \
             AND EXISTS (SELECT 1 FROM tasks WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM notifications WHERE task_id = $1 \
             AND EXISTS (SELECT 1 FROM tasks WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Tasks due strictly within `(after, before)` and not completed
    ///
    /// Sweep support: spans all users. Used by the upcoming pass.
    pub async fn find_due_between(
        pool: &PgPool,
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks \
             WHERE due_date IS NOT NULL AND due_date > $1 AND due_date < $2 \
               AND status <> 'completed' \
             ORDER BY due_date ASC",
            Self::COLUMNS
        ))
        .bind(after)
        .bind(before)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Tasks due strictly before `now` and not completed
    ///
    /// Sweep support: spans all users. Used by the overdue pass.
    pub async fn find_overdue(
        pool: &PgPool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks \
             WHERE due_date IS NOT NULL AND due_date < $1 AND status <> 'completed' \
             ORDER BY due_date ASC",
            Self::COLUMNS
        ))
        .bind(now)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!(TaskStatus::parse("pending"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::parse("PENDING"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::parse("In_Progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("completed"), Some(TaskStatus::Completed));
    }

    #[test]
    fn test_status_parse_unrecognized() {
        // "done" is not a status; filters degrade this to "no filter".
        assert_eq!(TaskStatus::parse("done"), None);
        assert_eq!(TaskStatus::parse(""), None);
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!(TaskPriority::parse("low"), Some(TaskPriority::Low));
        assert_eq!(TaskPriority::parse("MEDIUM"), Some(TaskPriority::Medium));
        assert_eq!(TaskPriority::parse("High"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("urgent"), None);
    }

    #[test]
    fn test_sort_field_allow_list() {
        assert_eq!(TaskSortField::parse("created_at"), Some(TaskSortField::CreatedAt));
        assert_eq!(TaskSortField::parse("createdAt"), Some(TaskSortField::CreatedAt));
        assert_eq!(TaskSortField::parse("dueDate"), Some(TaskSortField::DueDate));
        assert_eq!(TaskSortField::parse("priority"), Some(TaskSortField::Priority));

        // Anything outside the allow-list is rejected, never interpolated.
        assert_eq!(TaskSortField::parse("user_id; DROP TABLE tasks"), None);
        assert_eq!(TaskSortField::parse("password_hash"), None);
        assert_eq!(TaskSortField::parse(""), None);
    }

    #[test]
    fn test_sort_field_columns() {
        assert_eq!(TaskSortField::CreatedAt.column(), "created_at");
        assert_eq!(TaskSortField::DueDate.column(), "due_date");
        assert_eq!(TaskSortField::Title.column(), "title");
    }

    #[test]
    fn test_filter_from_params_permissive() {
        let filter = TaskFilter::from_params(Some("done"), Some("urgent"), None);
        assert!(filter.status.is_none());
        assert!(filter.priority.is_none());

        let filter = TaskFilter::from_params(Some("pending"), Some("high"), Some("report"));
        assert_eq!(filter.status, Some(TaskStatus::Pending));
        assert_eq!(filter.priority, Some(TaskPriority::High));
        assert_eq!(filter.keyword.as_deref(), Some("report"));
    }

    #[test]
    fn test_filter_blank_keyword_dropped() {
        let filter = TaskFilter::from_params(None, None, Some("   "));
        assert!(filter.keyword.is_none());
    }
}

/// Hourly reminder and overdue sweep
///
/// The sweep is the worker's whole job. On every tick it makes three
/// passes over the database:
///
/// 1. **Upcoming**: tasks due within the next 24 hours (and not completed)
///    get a reminder notification
/// 2. **Overdue**: tasks past their due date (and not completed) get an
///    overdue notification
/// 3. **Explicit reminders**: user-scheduled reminders whose fire time has
///    passed produce a notification and are marked sent, so each fires at
///    most once
///
/// Every notification is also offered to the [`Mailer`] unless the
/// recipient has opted out of email. A failure on one task is logged and
/// never stops the rest of the sweep; the overdue pass deliberately
/// re-notifies on every tick until the task is completed or its due date
/// moves.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskhive_worker::{mailer::LogMailer, sweep::{SweepConfig, Sweeper}};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example(pool: sqlx::PgPool) {
/// let sweeper = Sweeper::new(pool, Arc::new(LogMailer::new()), SweepConfig::default());
/// let cancel = CancellationToken::new();
/// sweeper.run(cancel).await;
/// # }
/// ```

use crate::mailer::Mailer;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use taskhive_shared::models::{
    notification::{Notification, NotificationKind},
    reminder::Reminder,
    task::Task,
    user::User,
};
use tokio_util::sync::CancellationToken;

/// Default sweep interval (1 hour)
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3600);

/// How far ahead the upcoming pass looks (24 hours)
pub const UPCOMING_WINDOW_HOURS: i64 = 24;

/// Sweep configuration
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Time between sweep ticks
    pub interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl SweepConfig {
    /// Loads sweep configuration from environment variables
    ///
    /// `SWEEP_INTERVAL_SECONDS` overrides the default hourly interval;
    /// values below 1 are rejected.
    pub fn from_env() -> anyhow::Result<Self> {
        let interval = match std::env::var("SWEEP_INTERVAL_SECONDS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>()?;
                if secs == 0 {
                    anyhow::bail!("SWEEP_INTERVAL_SECONDS must be at least 1");
                }
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_INTERVAL,
        };

        Ok(Self { interval })
    }
}

/// Counts from one sweep tick
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Notifications created by the upcoming pass
    pub upcoming: u64,

    /// Notifications created by the overdue pass
    pub overdue: u64,

    /// Explicit reminders fired and marked sent
    pub reminders_fired: u64,
}

/// End of the upcoming-pass window for a given tick time
pub fn upcoming_window_end(now: DateTime<Utc>) -> DateTime<Utc> {
    now + ChronoDuration::hours(UPCOMING_WINDOW_HOURS)
}

/// Message for a task due within the window
pub fn upcoming_message(task: &Task) -> String {
    match task.due_date {
        Some(due) => format!(
            "Task '{}' is due at {}",
            task.title,
            due.format("%Y-%m-%d %H:%M UTC")
        ),
        None => format!("Task '{}' is due soon", task.title),
    }
}

/// Message for a task past its due date
pub fn overdue_message(task: &Task) -> String {
    match task.due_date {
        Some(due) => format!(
            "Task '{}' is overdue (was due {})",
            task.title,
            due.format("%Y-%m-%d %H:%M UTC")
        ),
        None => format!("Task '{}' is overdue", task.title),
    }
}

/// Message for a user-scheduled reminder
pub fn reminder_message(task: &Task) -> String {
    format!("Reminder for task '{}'", task.title)
}

/// The sweep driver
pub struct Sweeper {
    pool: PgPool,
    mailer: Arc<dyn Mailer>,
    config: SweepConfig,
}

impl Sweeper {
    /// Creates a new sweeper
    pub fn new(pool: PgPool, mailer: Arc<dyn Mailer>, config: SweepConfig) -> Self {
        Self {
            pool,
            mailer,
            config,
        }
    }

    /// Runs sweep ticks until the cancellation token fires
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            mailer = self.mailer.name(),
            "Sweep loop started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Sweep loop stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match self.run_once(Utc::now()).await {
                        Ok(report) => {
                            tracing::info!(
                                upcoming = report.upcoming,
                                overdue = report.overdue,
                                reminders_fired = report.reminders_fired,
                                "Sweep tick complete"
                            );
                        }
                        Err(e) => {
                            tracing::error!("Sweep tick failed: {:#}", e);
                        }
                    }
                }
            }
        }
    }

    /// Executes the three sweep passes once
    ///
    /// Per-task failures are logged and skipped; only a failure to load a
    /// pass's candidate set aborts the tick.
    pub async fn run_once(&self, now: DateTime<Utc>) -> anyhow::Result<SweepReport> {
        let mut report = SweepReport::default();

        // Pass 1: tasks coming due
        let upcoming = Task::find_due_between(&self.pool, now, upcoming_window_end(now)).await?;
        for task in &upcoming {
            match self
                .notify(task, NotificationKind::Reminder, &upcoming_message(task))
                .await
            {
                Ok(()) => report.upcoming += 1,
                Err(e) => {
                    tracing::warn!(task_id = %task.id, "Upcoming notification failed: {:#}", e);
                }
            }
        }

        // Pass 2: tasks past due
        let overdue = Task::find_overdue(&self.pool, now).await?;
        for task in &overdue {
            match self
                .notify(task, NotificationKind::Overdue, &overdue_message(task))
                .await
            {
                Ok(()) => report.overdue += 1,
                Err(e) => {
                    tracing::warn!(task_id = %task.id, "Overdue notification failed: {:#}", e);
                }
            }
        }

        // Pass 3: user-scheduled reminders
        let pending = Reminder::find_pending(&self.pool, now).await?;
        for reminder in &pending {
            match self.fire_reminder(reminder).await {
                Ok(()) => report.reminders_fired += 1,
                Err(e) => {
                    tracing::warn!(
                        reminder_id = %reminder.id,
                        "Reminder firing failed: {:#}", e
                    );
                }
            }
        }

        Ok(report)
    }

    async fn fire_reminder(&self, reminder: &Reminder) -> anyhow::Result<()> {
        match Task::find_by_id(&self.pool, reminder.task_id).await? {
            Some(task) => {
                self.notify(&task, NotificationKind::Reminder, &reminder_message(&task))
                    .await?;
            }
            None => {
                tracing::warn!(
                    reminder_id = %reminder.id,
                    "Reminder points at a missing task; marking sent"
                );
            }
        }

        // Marked sent regardless, so a broken reminder cannot fire forever
        Reminder::mark_sent(&self.pool, reminder.id).await?;

        Ok(())
    }

    /// Writes the notification row, then offers it to the mailer
    ///
    /// Email delivery is best effort; the notification row is the source of
    /// truth and survives a mailer failure.
    async fn notify(
        &self,
        task: &Task,
        kind: NotificationKind,
        message: &str,
    ) -> anyhow::Result<()> {
        Notification::create(&self.pool, task.user_id, Some(task.id), message, kind).await?;

        let user = match User::find_by_id(&self.pool, task.user_id).await? {
            Some(user) => user,
            None => return Ok(()),
        };

        if !user.email_notifications {
            return Ok(());
        }

        let subject = match kind {
            NotificationKind::Reminder => "Task reminder",
            NotificationKind::Overdue => "Task overdue",
        };

        if let Err(e) = self.mailer.send(&user.email, subject, message).await {
            tracing::warn!(
                task_id = %task.id,
                recipient = %user.email,
                "Email delivery failed: {}", e
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhive_shared::models::task::{TaskPriority, TaskStatus};
    use uuid::Uuid;

    fn sample_task(title: &str, due_date: Option<DateTime<Utc>>) -> Task {
        Task {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date,
            archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_upcoming_window_is_24_hours() {
        let now = Utc::now();
        let end = upcoming_window_end(now);
        assert_eq!(end - now, ChronoDuration::hours(24));
    }

    #[test]
    fn test_upcoming_message_includes_due_date() {
        let due = "2026-09-01T10:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let task = sample_task("Ship release", Some(due));
        assert_eq!(
            upcoming_message(&task),
            "Task 'Ship release' is due at 2026-09-01 10:30 UTC"
        );
    }

    #[test]
    fn test_overdue_message_includes_due_date() {
        let due = "2026-08-20T08:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let task = sample_task("File expenses", Some(due));
        assert_eq!(
            overdue_message(&task),
            "Task 'File expenses' is overdue (was due 2026-08-20 08:00 UTC)"
        );
    }

    #[test]
    fn test_reminder_message() {
        let task = sample_task("Call the dentist", None);
        assert_eq!(reminder_message(&task), "Reminder for task 'Call the dentist'");
    }

    #[test]
    fn test_sweep_config_default_interval() {
        let config = SweepConfig::default();
        assert_eq!(config.interval, Duration::from_secs(3600));
    }
}

//! # TaskHive Worker Library
//!
//! This library provides the background worker for TaskHive: the hourly
//! sweep that turns due dates and scheduled reminders into notifications
//! and emails.
//!
//! ## Modules
//!
//! - `mailer`: Email delivery trait and implementations
//! - `sweep`: The three-pass reminder/overdue sweep
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskhive_worker::{mailer::LogMailer, sweep::{SweepConfig, Sweeper}};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(pool: sqlx::PgPool) {
//! let sweeper = Sweeper::new(pool, Arc::new(LogMailer::new()), SweepConfig::default());
//! sweeper.run(CancellationToken::new()).await;
//! # }
//! ```

pub mod mailer;
pub mod sweep;

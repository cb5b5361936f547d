/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `tasks`: Task CRUD, listing, filtering, archiving
/// - `reminders`: Reminder scheduling and deletion
/// - `notifications`: Notification inbox
/// - `users`: Own-profile management
/// - `admin`: User administration and system-wide views

pub mod admin;
pub mod auth;
pub mod health;
pub mod notifications;
pub mod reminders;
pub mod tasks;
pub mod users;

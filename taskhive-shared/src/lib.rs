//! # TaskHive Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the TaskHive API server and the reminder sweep worker.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their query operations
//! - `auth`: Authentication utilities (JWT, password hashing, middleware)
//! - `db`: Connection pool and migration runner
//! - `pagination`: Page specification and page envelope types
//! - `cache`: Per-user task listing cache

pub mod auth;
pub mod cache;
pub mod db;
pub mod models;
pub mod pagination;

/// Current version of the TaskHive shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

//! # TaskTrack Shared Library
//!
//! Authentication, authorization and persistence for the TaskTrack API.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, session tokens, the authenticator and the
//!   resource ownership guard
//! - `models`: Database models and their queries
//! - `store`: Storage traits with PostgreSQL and in-memory implementations
//! - `tasks`: Owner-scoped task operations
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;
pub mod tasks;

/// Current version of the TaskTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

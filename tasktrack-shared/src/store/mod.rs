//! Storage contracts consumed by the auth core
//!
//! The authenticator and task service only see these traits. Two
//! implementations ship with the crate:
//!
//! - [`postgres`]: sqlx-backed, used by the API server
//! - [`memory`]: `RwLock<HashMap>`-backed, used by tests and local runs
//!
//! Both enforce username uniqueness at the store boundary and report a
//! duplicate as [`StoreError::ConstraintViolation`].

use async_trait::async_trait;

use crate::models::{
    task::{CreateTask, Task},
    user::{CreateUser, User},
};

pub mod memory;
pub mod postgres;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness (or other integrity) constraint rejected the write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A foreign key pointed at a row that no longer exists
    #[error("Missing reference: {0}")]
    MissingReference(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StoreError::ConstraintViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                let constraint = db_err.constraint().unwrap_or("foreign_key").to_string();
                return StoreError::MissingReference(constraint);
            }
        }

        StoreError::Database(err)
    }
}

/// Persistence for registered identities
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns true if `username` is registered
    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError>;

    /// Persists a new identity
    ///
    /// Must fail with `StoreError::ConstraintViolation` if the username is
    /// taken, even when two saves race.
    async fn save(&self, identity: CreateUser) -> Result<User, StoreError>;

    /// Looks up an identity by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Verifies the backing store is reachable
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Persistence for owned tasks
///
/// `find_by_id` is deliberately unscoped; its result must pass the resource
/// guard. Writes are scoped to the owner recorded on the task.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Looks up a task by ID regardless of owner
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>, StoreError>;

    /// Lists an owner's tasks, newest first
    async fn list_by_owner(&self, owner_username: &str) -> Result<Vec<Task>, StoreError>;

    /// Inserts a new task and returns it with ID and timestamps assigned
    async fn insert(&self, task: CreateTask) -> Result<Task, StoreError>;

    /// Persists changes to an existing task
    ///
    /// Returns `None` if no task with this ID and owner exists.
    async fn save(&self, task: &Task) -> Result<Option<Task>, StoreError>;

    /// Deletes a task owned by `owner_username`; true if it existed
    async fn delete(&self, id: i64, owner_username: &str) -> Result<bool, StoreError>;
}

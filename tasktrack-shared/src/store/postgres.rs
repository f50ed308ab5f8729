//! PostgreSQL-backed stores
//!
//! Thin adapters from the store traits to the sqlx model functions. Username
//! uniqueness is the `users.username` UNIQUE constraint; a concurrent duplicate
//! insert surfaces as a unique violation and is mapped to
//! `StoreError::ConstraintViolation`.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{CredentialStore, StoreError, TaskStore};
use crate::db::pool::health_check;
use crate::models::{
    task::{CreateTask, Task},
    user::{CreateUser, User},
};

/// Credential store over the `users` table
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        Ok(User::exists_by_username(&self.pool, username).await?)
    }

    async fn save(&self, identity: CreateUser) -> Result<User, StoreError> {
        Ok(User::create(&self.pool, identity).await?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(health_check(&self.pool).await?)
    }
}

/// Task store over the `tasks` table
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_by_owner(&self, owner_username: &str) -> Result<Vec<Task>, StoreError> {
        Ok(Task::list_by_owner(&self.pool, owner_username).await?)
    }

    async fn insert(&self, task: CreateTask) -> Result<Task, StoreError> {
        Ok(Task::create(&self.pool, task).await?)
    }

    async fn save(&self, task: &Task) -> Result<Option<Task>, StoreError> {
        Ok(Task::update(&self.pool, task).await?)
    }

    async fn delete(&self, id: i64, owner_username: &str) -> Result<bool, StoreError> {
        Ok(Task::delete(&self.pool, id, owner_username).await?)
    }
}

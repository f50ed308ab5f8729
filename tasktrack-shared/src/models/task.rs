//! Task model and database operations
//!
//! Tasks are the owned resource of TaskTrack. Each task has exactly one owner,
//! fixed at creation. Every query that reads or writes an existing task must
//! be paired with an ownership check (see [`crate::auth::authorization`]);
//! `update` and `delete` additionally filter on `owner_username` in SQL.
//!
//! # Schema
//!
//! ```sql
//! CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
//!
//! CREATE TABLE tasks (
//!     id BIGSERIAL PRIMARY KEY,
//!     owner_username VARCHAR(50) NOT NULL REFERENCES users(username),
//!     title VARCHAR(200) NOT NULL,
//!     description TEXT,
//!     status task_status NOT NULL DEFAULT 'pending',
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::authorization::OwnedResource;

/// Task progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Converts status to its database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// A task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Store-assigned ID
    pub id: i64,

    /// Username of the only identity allowed to see or change this task
    pub owner_username: String,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last modified
    pub updated_at: DateTime<Utc>,
}

impl OwnedResource for Task {
    fn owner_username(&self) -> &str {
        &self.owner_username
    }
}

/// Input for creating a task
///
/// The owner comes from the authenticated caller, never from the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub owner_username: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
}

const TASK_COLUMNS: &str = "id, owner_username, title, description, status, created_at, updated_at";

impl Task {
    /// Inserts a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO tasks (owner_username, title, description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            TASK_COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.owner_username)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .fetch_one(pool)
            .await?;

        Ok(task)
    }

    /// Finds a task by ID regardless of owner
    ///
    /// The result must go through the resource guard before it is returned to
    /// a caller.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Lists an owner's tasks, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_username: &str) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM tasks WHERE owner_username = $1 ORDER BY created_at DESC, id DESC",
            TASK_COLUMNS
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(owner_username)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Writes the mutable fields of `task` back and bumps `updated_at`
    ///
    /// Returns `None` if no row with this ID and owner exists.
    pub async fn update(pool: &PgPool, task: &Task) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, status = $5, updated_at = NOW()
            WHERE id = $1 AND owner_username = $2
            RETURNING {}
            "#,
            TASK_COLUMNS
        );

        let updated = sqlx::query_as::<_, Task>(&query)
            .bind(task.id)
            .bind(&task.owner_username)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .fetch_optional(pool)
            .await?;

        Ok(updated)
    }

    /// Deletes a task owned by `owner_username`
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: i64, owner_username: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_username = $2")
            .bind(id)
            .bind(owner_username)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

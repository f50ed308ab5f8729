//! Owner-scoped task operations
//!
//! Every operation takes the caller's [`AuthContext`] explicitly. Reads,
//! updates and deletes load the task and pass it through the resource guard
//! first; creation stamps the caller as owner.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tasktrack_shared::auth::middleware::AuthContext;
//! use tasktrack_shared::store::memory::MemoryTaskStore;
//! use tasktrack_shared::tasks::{TaskInput, TaskService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TaskService::new(Arc::new(MemoryTaskStore::new()));
//! let alice = AuthContext::new("alice");
//!
//! let task = service.create(&alice, TaskInput::titled("Buy milk")).await?;
//! assert_eq!(task.owner_username, "alice");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::{
    authorization::{guard, AuthzError},
    middleware::AuthContext,
};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::store::{StoreError, TaskStore};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Task is absent or owned by someone else
    #[error("Task not found with id: {0}")]
    NotFound(i64),

    /// The caller's identity no longer exists in the credential store
    #[error("User not found: {0}")]
    OwnerNotFound(String),

    /// Task store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Caller-supplied task fields for create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    /// `None` means "pending" on create and "unchanged" on update
    pub status: Option<TaskStatus>,
}

impl TaskInput {
    /// Input with only a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Task operations over a [`TaskStore`]
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Lists the caller's tasks, newest first
    pub async fn list(&self, auth: &AuthContext) -> Result<Vec<Task>, TaskError> {
        debug!(username = %auth.username, "Fetching all tasks for user");

        Ok(self.store.list_by_owner(&auth.username).await?)
    }

    /// Fetches one of the caller's tasks
    pub async fn get(&self, auth: &AuthContext, id: i64) -> Result<Task, TaskError> {
        debug!(task_id = id, username = %auth.username, "Fetching task");

        self.load_owned(auth, id).await
    }

    /// Creates a task owned by the caller
    pub async fn create(&self, auth: &AuthContext, input: TaskInput) -> Result<Task, TaskError> {
        let task = self
            .store
            .insert(CreateTask {
                owner_username: auth.username.clone(),
                title: input.title,
                description: input.description,
                status: input.status.unwrap_or_default(),
            })
            .await
            .map_err(|e| match e {
                // A valid token can outlive its user row
                StoreError::MissingReference(_) => TaskError::OwnerNotFound(auth.username.clone()),
                other => TaskError::Store(other),
            })?;

        info!(task_id = task.id, username = %auth.username, "Task created successfully");
        Ok(task)
    }

    /// Replaces title and description; replaces status only when given
    pub async fn update(
        &self,
        auth: &AuthContext,
        id: i64,
        input: TaskInput,
    ) -> Result<Task, TaskError> {
        let mut task = self.load_owned(auth, id).await?;

        task.title = input.title;
        task.description = input.description;
        if let Some(status) = input.status {
            task.status = status;
        }

        // The row may have been deleted since it was loaded
        let updated = self.store.save(&task).await?.ok_or(TaskError::NotFound(id))?;

        info!(task_id = id, username = %auth.username, "Task updated successfully");
        Ok(updated)
    }

    /// Deletes one of the caller's tasks
    pub async fn delete(&self, auth: &AuthContext, id: i64) -> Result<(), TaskError> {
        let task = self.load_owned(auth, id).await?;

        if !self.store.delete(task.id, &auth.username).await? {
            return Err(TaskError::NotFound(id));
        }

        info!(task_id = id, username = %auth.username, "Task deleted successfully");
        Ok(())
    }

    async fn load_owned(&self, auth: &AuthContext, id: i64) -> Result<Task, TaskError> {
        let task = self.store.find_by_id(id).await?;

        guard(auth, task).map_err(|e| match e {
            AuthzError::NotFound => TaskError::NotFound(id),
        })
    }
}

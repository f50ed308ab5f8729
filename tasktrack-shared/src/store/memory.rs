//! In-memory stores
//!
//! Process-local implementations of the store traits. The uniqueness check and
//! the insert happen under one write lock, so concurrent registrations of the
//! same username behave like the PostgreSQL UNIQUE constraint: exactly one
//! wins, the others get `StoreError::ConstraintViolation`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{CredentialStore, StoreError, TaskStore};
use crate::models::{
    task::{CreateTask, Task},
    user::{CreateUser, User},
};

/// Credential store held in a `HashMap` keyed by username
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
    next_id: AtomicI64,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered identities
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Returns true if no identity is registered
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn save(&self, identity: CreateUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&identity.username) {
            return Err(StoreError::ConstraintViolation("users_username_key".to_string()));
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            username: identity.username,
            password_hash: identity.password_hash,
            created_at: Utc::now(),
        };
        users.insert(user.username.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

/// Task store held in a `HashMap` keyed by task ID
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<i64, Task>>,
    next_id: AtomicI64,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_username: &str) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| t.owner_username == owner_username)
            .cloned()
            .collect();

        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn insert(&self, task: CreateTask) -> Result<Task, StoreError> {
        let now = Utc::now();
        let task = Task {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            owner_username: task.owner_username,
            title: task.title,
            description: task.description,
            status: task.status,
            created_at: now,
            updated_at: now,
        };

        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn save(&self, task: &Task) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;

        match tasks.get_mut(&task.id) {
            Some(stored) if stored.owner_username == task.owner_username => {
                stored.title = task.title.clone();
                stored.description = task.description.clone();
                stored.status = task.status;
                stored.updated_at = Utc::now();
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: i64, owner_username: &str) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;

        let owned = tasks
            .get(&id)
            .is_some_and(|stored| stored.owner_username == owner_username);
        if owned {
            tasks.remove(&id);
        }

        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskStatus;

    fn new_user(username: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn new_task(owner: &str, title: &str) -> CreateTask {
        CreateTask {
            owner_username: owner.to_string(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_credential_store_uniqueness() {
        let store = MemoryCredentialStore::new();

        let alice = store.save(new_user("alice")).await.unwrap();
        assert_eq!(alice.id, 1);
        assert!(store.exists_by_username("alice").await.unwrap());
        assert!(!store.exists_by_username("bob").await.unwrap());

        let duplicate = store.save(new_user("alice")).await;
        assert!(matches!(duplicate, Err(StoreError::ConstraintViolation(_))));
        assert_eq!(store.len().await, 1);

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_task_store_lifecycle() {
        let store = MemoryTaskStore::new();

        let task = store.insert(new_task("alice", "first")).await.unwrap();
        assert_eq!(task.owner_username, "alice");
        assert_eq!(task.created_at, task.updated_at);

        let mut changed = task.clone();
        changed.title = "renamed".to_string();
        changed.status = TaskStatus::Completed;
        let saved = store.save(&changed).await.unwrap().unwrap();
        assert_eq!(saved.title, "renamed");
        assert_eq!(saved.status, TaskStatus::Completed);
        assert!(saved.updated_at >= task.updated_at);

        assert!(store.delete(task.id, "alice").await.unwrap());
        assert!(store.find_by_id(task.id).await.unwrap().is_none());
        assert!(!store.delete(task.id, "alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_task_store_writes_are_owner_scoped() {
        let store = MemoryTaskStore::new();
        let task = store.insert(new_task("alice", "private")).await.unwrap();

        let mut hijacked = task.clone();
        hijacked.owner_username = "bob".to_string();
        hijacked.title = "mine now".to_string();

        assert!(store.save(&hijacked).await.unwrap().is_none());
        assert!(!store.delete(task.id, "bob").await.unwrap());

        let stored = store.find_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "private");
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let store = MemoryTaskStore::new();
        store.insert(new_task("alice", "one")).await.unwrap();
        store.insert(new_task("bob", "other")).await.unwrap();
        store.insert(new_task("alice", "two")).await.unwrap();

        let titles: Vec<String> = store
            .list_by_owner("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();

        assert_eq!(titles, vec!["two", "one"]);
    }
}

/// In-process cache for per-user task listings
///
/// The default task listing is the hottest read path, so results are kept
/// in memory keyed by user id. Any write to a user's tasks invalidates that
/// user's entry; the next listing repopulates it from the database. The
/// cache is process-local and rebuilt from scratch on restart.

use crate::models::task::Task;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared, cloneable task-list cache
#[derive(Debug, Clone, Default)]
pub struct TaskListCache {
    entries: Arc<RwLock<HashMap<Uuid, Vec<Task>>>>,
}

impl TaskListCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached listing for a user, if present
    pub async fn get(&self, user_id: Uuid) -> Option<Vec<Task>> {
        self.entries.read().await.get(&user_id).cloned()
    }

    /// Stores a user's listing
    pub async fn insert(&self, user_id: Uuid, tasks: Vec<Task>) {
        self.entries.write().await.insert(user_id, tasks);
    }

    /// Drops a user's cached listing
    ///
    /// Called after every mutating task operation for that user.
    pub async fn invalidate(&self, user_id: Uuid) {
        self.entries.write().await.remove(&user_id);
    }

    /// Drops everything
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{TaskPriority, TaskStatus};
    use chrono::Utc;

    fn sample_task(user_id: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            user_id,
            title: "Write quarterly report".to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = TaskListCache::new();
        let user_id = Uuid::new_v4();

        assert!(cache.get(user_id).await.is_none());

        cache.insert(user_id, vec![sample_task(user_id)]).await;
        let hit = cache.get(user_id).await.unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].user_id, user_id);
    }

    #[tokio::test]
    async fn test_invalidate_is_per_user() {
        let cache = TaskListCache::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        cache.insert(alice, vec![sample_task(alice)]).await;
        cache.insert(bob, vec![sample_task(bob)]).await;

        cache.invalidate(alice).await;

        assert!(cache.get(alice).await.is_none());
        assert!(cache.get(bob).await.is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = TaskListCache::new();
        let user_id = Uuid::new_v4();

        cache.insert(user_id, vec![]).await;
        cache.clear().await;
        assert!(cache.get(user_id).await.is_none());
    }
}

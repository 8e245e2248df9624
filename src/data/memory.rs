use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, User};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Default)]
struct Storage {
    next_id: i64,
    users: HashMap<i64, User>,
}

/// Process-local stand-in for the `users` table, used by the test suites. Ids start at 1
/// and are never reused.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<Storage>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Storage::default())),
        }
    }

    pub async fn find_user_by_id(&self, id: i64) -> Option<User> {
        let storage = self.storage.read().await;
        storage.users.get(&id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.storage.read().await.users.len()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert_user(&self, user: &CreateUser) -> Result<i64> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        let id = storage
            .next_id
            .checked_add(1)
            .ok_or_else(|| DomainError::Storage("user id space exhausted".to_string()))?;
        storage.next_id = id;
        storage.users.insert(id, user.clone().into_user(id));
        debug!(user_id = id, "User saved to memory storage");
        Ok(id)
    }
}

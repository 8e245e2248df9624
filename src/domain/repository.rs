use crate::domain::user::CreateUser;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists the user and returns the id the store assigned to it.
    async fn insert_user(&self, user: &CreateUser) -> Result<i64>;
}

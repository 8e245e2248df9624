use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, User};
use anyhow::Result;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Inserts one row and returns the user carrying the id the store assigned.
    /// Not idempotent: repeating the call creates another row.
    pub async fn create_user(&self, req: CreateUser) -> Result<User> {
        let id = self.repository.insert_user(&req).await?;
        Ok(req.into_user(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryUserRepository;
    use crate::domain::error::DomainError;
    use async_trait::async_trait;

    struct UnavailableRepository;

    #[async_trait]
    impl UserRepository for UnavailableRepository {
        async fn insert_user(&self, _user: &CreateUser) -> Result<i64> {
            Err(DomainError::Storage("connection refused".to_string()).into())
        }
    }

    #[tokio::test]
    async fn test_create_user_returns_assigned_id() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(repo.clone());

        let user = service
            .create_user(CreateUser::new("Alice", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(repo.find_user_by_id(1).await, Some(user));
    }

    #[tokio::test]
    async fn test_create_user_propagates_storage_error() {
        let service = UserService::new(Arc::new(UnavailableRepository));

        let err = service
            .create_user(CreateUser::new("Bob", "bob@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Storage(_))
        ));
    }
}

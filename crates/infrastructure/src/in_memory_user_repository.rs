use std::collections::HashMap;

use async_trait::async_trait;
use sika_application::{NewUserRecord, UserCredentials, UserRepository};
use sika_core::{AppError, AppResult};
use sika_domain::{EmailAddress, User, UserId};
use tokio::sync::RwLock;

/// In-memory user repository for local development and tests.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, UserCredentials>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .map(|credentials| credentials.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> AppResult<Option<UserCredentials>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|credentials| credentials.user.email == *email)
            .cloned())
    }

    async fn create_user(&self, user: NewUserRecord) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|credentials| credentials.user.email == user.email)
        {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let next_id = users
            .keys()
            .map(UserId::as_i64)
            .max()
            .unwrap_or_default()
            + 1;
        let created = User {
            id: UserId::new(next_id),
            name: user.name,
            email: user.email,
            role: user.role,
        };

        users.insert(
            created.id,
            UserCredentials {
                user: created.clone(),
                password_hash: user.password_hash,
            },
        );
        Ok(created)
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::session::errors::StoreError;
use crate::domain::session::ports::CredentialStore;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

#[derive(Debug, Clone)]
struct StoredRefreshToken {
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Users {
    next_id: i64,
    by_id: HashMap<UserId, User>,
}

/// Credential store kept in process memory.
///
/// Every call takes the relevant lock for its whole duration, so each get or
/// replace of a user's refresh token is atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<Users>>,
    /// Map of user_id -> the single live refresh token
    refresh_tokens: Arc<RwLock<HashMap<UserId, StoredRefreshToken>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if users.by_id.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email.to_string()));
        }

        users.next_id += 1;
        let created = User {
            id: UserId(users.next_id),
            email: user.email,
            password_hash: user.password_hash,
            created_at: user.created_at,
        };
        users.by_id.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_user_by_credentials(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .by_id
            .values()
            .find(|u| &u.email == email && u.password_hash == password_hash)
            .cloned())
    }

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.by_id.get(id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.users.read().await.by_id.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn save_refresh_token(
        &self,
        user_id: &UserId,
        token: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let stored = StoredRefreshToken {
            token: token.to_string(),
            expires_at: Utc::now() + ttl,
        };

        self.refresh_tokens.write().await.insert(*user_id, stored);

        Ok(())
    }

    async fn find_refresh_token(&self, user_id: &UserId) -> Result<Option<String>, StoreError> {
        let mut refresh_tokens = self.refresh_tokens.write().await;

        match refresh_tokens.get(user_id) {
            Some(stored) if stored.expires_at > Utc::now() => Ok(Some(stored.token.clone())),
            Some(_) => {
                refresh_tokens.remove(user_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

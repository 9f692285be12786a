use async_trait::async_trait;
use chrono::Duration;

use crate::domain::session::errors::SessionError;
use crate::domain::session::errors::StoreError;
use crate::domain::session::models::TokenPair;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for session service operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated email and plaintext password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Storage` - Credential store failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, SessionError>;

    /// Verify credentials and issue a fresh token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No user matches email and password
    /// * `Token` - Signing failed
    /// * `Storage` - Credential store failed
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, SessionError>;

    /// Exchange the active refresh token for a new pair, rotating it.
    ///
    /// # Errors
    /// * `Token` - Token is malformed, expired or badly signed
    /// * `UserNotFound` - Token subject no longer exists
    /// * `NoStoredToken` - No live refresh token is stored for the user
    /// * `TokenNotIssued` - Token differs from the stored one (reused or forged)
    /// * `Storage` - Credential store failed
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, SessionError>;

    /// Validate an access token and return its subject.
    ///
    /// # Errors
    /// * `Token` - Token is malformed, expired or badly signed
    fn validate_access_token(&self, access_token: &str) -> Result<UserId, SessionError>;

    /// Retrieve all registered users.
    ///
    /// # Errors
    /// * `Storage` - Credential store failed
    async fn list_users(&self) -> Result<Vec<User>, SessionError>;
}

/// Persistence of users and their single active refresh token.
///
/// Implementations serving concurrent requests must make each call atomic per
/// user id.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new user and assign its identifier.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Unavailable` - Storage operation failed
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Retrieve the user whose email and password hash both match.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_user_by_credentials(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    /// Retrieve all users.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Store `token` as the user's refresh token for `ttl`, replacing any previous one.
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn save_refresh_token(
        &self,
        user_id: &UserId,
        token: &str,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// Retrieve the user's refresh token.
    ///
    /// # Returns
    /// Optional token (None if never stored or expired)
    async fn find_refresh_token(&self, user_id: &UserId) -> Result<Option<String>, StoreError>;
}

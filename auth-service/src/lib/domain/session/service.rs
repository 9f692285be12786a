use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtError;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::TokenPair;
use crate::domain::session::ports::CredentialStore;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Token authority: authenticates credentials, issues token pairs and rotates
/// refresh tokens.
///
/// Stateless apart from its injected dependencies. The one-token-per-user record
/// lives in the credential store.
pub struct SessionService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Authenticator,
}

impl<CS> SessionService<CS>
where
    CS: CredentialStore,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential store implementation
    /// * `authenticator` - Hashing and signing configured with key, salt and lifetimes
    pub fn new(store: Arc<CS>, authenticator: Authenticator) -> Self {
        Self {
            store,
            authenticator,
        }
    }

    /// Mint a new token pair for `user` and store its refresh token.
    ///
    /// Any refresh token previously stored for the user is superseded.
    ///
    /// # Errors
    /// * `Token` - Signing failed
    /// * `Storage` - Refresh token could not be stored
    pub async fn issue(&self, user: &User) -> Result<TokenPair, SessionError> {
        let pair = self.authenticator.sign_pair(user.id)?;

        self.store
            .save_refresh_token(&user.id, &pair.refresh.token, self.authenticator.refresh_ttl())
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Failed to store refresh token");
                SessionError::from(e)
            })?;

        Ok(TokenPair {
            access_expires_at: self.authenticator.confirm_issued(&pair.access),
            refresh_expires_at: self.authenticator.confirm_issued(&pair.refresh),
            access_token: pair.access.token,
            refresh_token: pair.refresh.token,
        })
    }

    fn parse_subject(&self, token: &str) -> Result<UserId, SessionError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!(error = %e, "Token rejected");
            SessionError::from(e)
        })?;

        UserId::from_subject(&claims.sub)
            .map_err(|e| SessionError::Token(JwtError::Malformed(e.to_string())))
    }
}

#[async_trait]
impl<CS> SessionServicePort for SessionService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, SessionError> {
        let user = NewUser {
            email: command.email,
            password_hash: self.authenticator.hash_password(&command.password),
            created_at: Utc::now(),
        };

        let created_user = self.store.create_user(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, SessionError> {
        // A malformed email cannot match any user
        let email =
            EmailAddress::new(email.to_string()).map_err(|_| SessionError::InvalidCredentials)?;
        let password_hash = self.authenticator.hash_password(password);

        let user = self
            .store
            .find_user_by_credentials(&email, &password_hash)
            .await?
            .ok_or_else(|| {
                tracing::debug!("Login rejected");
                SessionError::InvalidCredentials
            })?;

        let pair = self.issue(&user).await?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(pair)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, SessionError> {
        let user_id = self.parse_subject(refresh_token)?;

        let user = self
            .store
            .find_user_by_id(&user_id)
            .await?
            .ok_or(SessionError::UserNotFound(user_id))?;

        let stored_token = self
            .store
            .find_refresh_token(&user_id)
            .await?
            .ok_or(SessionError::NoStoredToken(user_id))?;

        if stored_token != refresh_token {
            tracing::warn!(user_id = %user_id, "Refresh token reuse or forgery detected");
            return Err(SessionError::TokenNotIssued);
        }

        let pair = self.issue(&user).await?;
        tracing::info!(user_id = %user_id, "Refresh token rotated");

        Ok(pair)
    }

    fn validate_access_token(&self, access_token: &str) -> Result<UserId, SessionError> {
        self.parse_subject(access_token)
    }

    async fn list_users(&self) -> Result<Vec<User>, SessionError> {
        Ok(self.store.list_users().await?)
    }
}

#[cfg(test)]
mod tests {
    use auth::Claims;
    use auth::JwtHandler;
    use auth::TokenSettings;
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::session::errors::StoreError;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
    const SALT: &[u8] = b"test-salt";

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
            async fn find_user_by_credentials(&self, email: &EmailAddress, password_hash: &str) -> Result<Option<User>, StoreError>;
            async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;
            async fn list_users(&self) -> Result<Vec<User>, StoreError>;
            async fn save_refresh_token(&self, user_id: &UserId, token: &str, ttl: Duration) -> Result<(), StoreError>;
            async fn find_refresh_token(&self, user_id: &UserId) -> Result<Option<String>, StoreError>;
        }
    }

    fn authenticator() -> Authenticator {
        Authenticator::new(SECRET, SALT, TokenSettings::default())
    }

    fn service(store: MockTestCredentialStore) -> SessionService<MockTestCredentialStore> {
        SessionService::new(Arc::new(store), authenticator())
    }

    fn alice() -> User {
        User {
            id: UserId(1),
            email: EmailAddress::new("alice@x.com".to_string()).unwrap(),
            password_hash: authenticator().hash_password("pw1"),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut store = MockTestCredentialStore::new();
        let expected_hash = authenticator().hash_password("pw1");

        store
            .expect_create_user()
            .withf(move |user| {
                user.email.as_str() == "alice@x.com" && user.password_hash == expected_hash
            })
            .times(1)
            .returning(|user| {
                Ok(User {
                    id: UserId(1),
                    email: user.email,
                    password_hash: user.password_hash,
                    created_at: user.created_at,
                })
            });

        let command = RegisterUserCommand::new(
            EmailAddress::new("alice@x.com".to_string()).unwrap(),
            "pw1".to_string(),
        );

        let user = service(store).register(command).await.unwrap();
        assert_eq!(user.id, UserId(1));
        assert_ne!(user.password_hash, "pw1");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_create_user()
            .times(1)
            .returning(|user| Err(StoreError::DuplicateEmail(user.email.to_string())));

        let command = RegisterUserCommand::new(
            EmailAddress::new("alice@x.com".to_string()).unwrap(),
            "pw1".to_string(),
        );

        let result = service(store).register(command).await;
        assert!(matches!(result, Err(SessionError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_success_issues_and_stores_pair() {
        let mut store = MockTestCredentialStore::new();
        let user = alice();
        let expected_hash = user.password_hash.clone();

        store
            .expect_find_user_by_credentials()
            .withf(move |email, hash| email.as_str() == "alice@x.com" && hash == expected_hash)
            .times(1)
            .returning(move |_, _| Ok(Some(user.clone())));

        store
            .expect_save_refresh_token()
            .withf(|user_id, token, ttl| {
                *user_id == UserId(1) && !token.is_empty() && *ttl == Duration::days(30)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service(store);
        let pair = service.login("alice@x.com", "pw1").await.unwrap();

        assert_eq!(
            service.validate_access_token(&pair.access_token),
            Ok(UserId(1))
        );
        assert!(pair.access_expires_at < pair.refresh_expires_at);
        let spread = pair.refresh_expires_at - pair.access_expires_at;
        assert!((spread - (30 * 24 * 3600 - 12 * 3600)).abs() <= 1);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_wrong_email_are_indistinguishable() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_user_by_credentials()
            .times(2)
            .returning(|_, _| Ok(None));
        store.expect_save_refresh_token().times(0);

        let service = service(store);

        let wrong_password = service.login("alice@x.com", "wrong").await;
        let wrong_email = service.login("bob@x.com", "pw1").await;

        assert_eq!(wrong_password, Err(SessionError::InvalidCredentials));
        assert_eq!(wrong_email, wrong_password);
    }

    #[tokio::test]
    async fn test_login_malformed_email_is_invalid_credentials() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_user_by_credentials().times(0);

        let result = service(store).login("not-an-email", "pw1").await;
        assert_eq!(result, Err(SessionError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_storage_failure() {
        let mut store = MockTestCredentialStore::new();
        let user = alice();

        store
            .expect_find_user_by_credentials()
            .returning(move |_, _| Ok(Some(user.clone())));
        store
            .expect_save_refresh_token()
            .times(1)
            .returning(|_, _, _| Err(StoreError::Unavailable("connection reset".to_string())));

        let result = service(store).login("alice@x.com", "pw1").await;
        assert!(matches!(result, Err(SessionError::Storage(_))));
    }

    #[tokio::test]
    async fn test_refresh_rotates_matching_token() {
        let mut store = MockTestCredentialStore::new();
        let user = alice();
        let presented = authenticator().sign_pair(1).unwrap().refresh.token;
        let stored = presented.clone();

        store
            .expect_find_user_by_id()
            .withf(|id| *id == UserId(1))
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        store
            .expect_find_refresh_token()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let old_token = presented.clone();
        store
            .expect_save_refresh_token()
            .withf(move |_, token, _| token != old_token)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let pair = service(store).refresh(&presented).await.unwrap();
        assert_ne!(pair.refresh_token, presented);
    }

    #[tokio::test]
    async fn test_refresh_with_superseded_token() {
        let mut store = MockTestCredentialStore::new();
        let user = alice();
        let presented = authenticator().sign_pair(1).unwrap().refresh.token;
        let newer = authenticator().sign_pair(1).unwrap().refresh.token;

        store
            .expect_find_user_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        store
            .expect_find_refresh_token()
            .returning(move |_| Ok(Some(newer.clone())));
        store.expect_save_refresh_token().times(0);

        let result = service(store).refresh(&presented).await;
        assert_eq!(result, Err(SessionError::TokenNotIssued));
    }

    #[tokio::test]
    async fn test_refresh_without_stored_token() {
        let mut store = MockTestCredentialStore::new();
        let user = alice();
        let presented = authenticator().sign_pair(1).unwrap().refresh.token;

        store
            .expect_find_user_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        store
            .expect_find_refresh_token()
            .returning(|_| Ok(None));
        store.expect_save_refresh_token().times(0);

        let result = service(store).refresh(&presented).await;
        assert_eq!(result, Err(SessionError::NoStoredToken(UserId(1))));
    }

    #[tokio::test]
    async fn test_refresh_for_missing_user() {
        let mut store = MockTestCredentialStore::new();
        let presented = authenticator().sign_pair(5).unwrap().refresh.token;

        store.expect_find_user_by_id().returning(|_| Ok(None));
        store.expect_find_refresh_token().times(0);

        let result = service(store).refresh(&presented).await;
        assert_eq!(result, Err(SessionError::UserNotFound(UserId(5))));
    }

    #[tokio::test]
    async fn test_refresh_with_expired_token() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_user_by_id().times(0);

        let claims = Claims::for_subject(1, Utc::now() - Duration::days(31), Duration::days(30));
        let expired = JwtHandler::new(SECRET).encode(&claims).unwrap();

        let result = service(store).refresh(&expired).await;
        assert_eq!(result, Err(SessionError::Token(JwtError::Expired)));
    }

    #[tokio::test]
    async fn test_refresh_with_foreign_signature() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_user_by_id().times(0);

        let foreign = Authenticator::new(
            b"some-other-secret-key-at-least-32-bytes!",
            SALT,
            TokenSettings::default(),
        )
        .sign_pair(1)
        .unwrap()
        .refresh
        .token;

        let result = service(store).refresh(&foreign).await;
        assert_eq!(result, Err(SessionError::Token(JwtError::InvalidSignature)));
    }

    #[tokio::test]
    async fn test_refresh_with_non_numeric_subject() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_user_by_id().times(0);

        let claims = Claims::for_subject("alice", Utc::now(), Duration::hours(1));
        let token = JwtHandler::new(SECRET).encode(&claims).unwrap();

        let result = service(store).refresh(&token).await;
        assert!(matches!(
            result,
            Err(SessionError::Token(JwtError::Malformed(_)))
        ));
    }

    #[test]
    fn test_validate_access_token_rejects_garbage() {
        let store = MockTestCredentialStore::new();

        let result = service(store).validate_access_token("invalid.token.here");
        assert!(matches!(
            result,
            Err(SessionError::Token(JwtError::Malformed(_)))
        ));
    }

    #[tokio::test]
    async fn test_list_users() {
        let mut store = MockTestCredentialStore::new();
        let user = alice();

        store
            .expect_list_users()
            .times(1)
            .returning(move || Ok(vec![user.clone()]));

        let users = service(store).list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email.as_str(), "alice@x.com");
    }
}

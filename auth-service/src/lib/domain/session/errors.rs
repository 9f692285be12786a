use auth::JwtError;
use thiserror::Error;

use crate::user::models::UserId;

/// Error reported by a credential store implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for all session operations.
///
/// Every variant is terminal for the call that produced it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Unknown email and wrong password both end up here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("No refresh token stored for user {0}")]
    NoStoredToken(UserId),

    #[error("Refresh token was not issued or has been superseded")]
    TokenNotIssued,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(email) => SessionError::EmailAlreadyExists(email),
            StoreError::Unavailable(_) => SessionError::Storage(err),
        }
    }
}

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Session token claims.
///
/// Access and refresh tokens share this schema; only the expiry horizon differs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Unique token identifier, keeps two tokens minted in the same second distinct
    pub jti: String,
}

impl Claims {
    /// Create claims for a subject, valid for `ttl` starting at `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Token subject (user identifier)
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Validity window
    ///
    /// # Returns
    /// Claims with sub, iat, exp and a fresh jti
    pub fn for_subject(subject: impl ToString, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

use chrono::Duration;
use thiserror::Error;

/// Error for invalid token lifetime settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Token lifetime must be positive, got {0} seconds")]
    NonPositiveTtl(i64),

    #[error("Access token lifetime ({access}s) must be shorter than refresh token lifetime ({refresh}s)")]
    AccessOutlivesRefresh { access: i64, refresh: i64 },
}

/// Lifetimes of the two tokens of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSettings {
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenSettings {
    /// Validate and build token lifetimes.
    ///
    /// # Errors
    /// * `NonPositiveTtl` - Either lifetime is zero or negative
    /// * `AccessOutlivesRefresh` - Access token would not expire before the refresh token
    pub fn new(access_ttl: Duration, refresh_ttl: Duration) -> Result<Self, SettingsError> {
        for ttl in [access_ttl, refresh_ttl] {
            if ttl <= Duration::zero() {
                return Err(SettingsError::NonPositiveTtl(ttl.num_seconds()));
            }
        }

        if access_ttl >= refresh_ttl {
            return Err(SettingsError::AccessOutlivesRefresh {
                access: access_ttl.num_seconds(),
                refresh: refresh_ttl.num_seconds(),
            });
        }

        Ok(Self {
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

impl Default for TokenSettings {
    /// 12 hour access tokens, 30 day refresh tokens.
    fn default() -> Self {
        Self {
            access_ttl: Duration::hours(12),
            refresh_ttl: Duration::days(30),
        }
    }
}

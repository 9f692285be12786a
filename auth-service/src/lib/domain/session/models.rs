/// Token pair handed back to the caller after login or refresh.
///
/// Only the refresh token string is retained server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry (Unix timestamp)
    pub access_expires_at: i64,
    /// Refresh token expiry (Unix timestamp)
    pub refresh_expires_at: i64,
}

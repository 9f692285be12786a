use thiserror::Error;

/// Error type for JWT operations.
///
/// Each parse failure is its own variant so callers can map them without
/// inspecting messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token signing method is not HMAC")]
    InvalidSignatureMethod,
}

use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenSettings;
use crate::password::PasswordHasher;

/// Session crypto coordinator combining password hashing and token signing.
///
/// Holds no mutable state; everything it needs (signing key, salt, lifetimes) is
/// injected at construction.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    settings: TokenSettings,
}

/// A signed token together with the claims it was signed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub token: String,
    pub claims: Claims,
}

/// Access and refresh tokens minted at the same instant for the same subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPair {
    pub access: SignedToken,
    pub refresh: SignedToken,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for HMAC signing
    /// * `password_salt` - Fixed secret salt for password hashing
    /// * `settings` - Access and refresh token lifetimes
    pub fn new(jwt_secret: &[u8], password_salt: &[u8], settings: TokenSettings) -> Self {
        Self {
            password_hasher: PasswordHasher::new(password_salt),
            jwt_handler: JwtHandler::new(jwt_secret),
            settings,
        }
    }

    /// Hash a password for storage or lookup.
    pub fn hash_password(&self, password: &str) -> String {
        self.password_hasher.hash(password)
    }

    /// Lifetime of refresh tokens, also used as their storage TTL.
    pub fn refresh_ttl(&self) -> Duration {
        self.settings.refresh_ttl()
    }

    /// Sign an access token and a refresh token for `subject`.
    ///
    /// Both share the same `iat`; they differ in `exp` and `jti`.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn sign_pair(&self, subject: impl ToString) -> Result<SignedPair, JwtError> {
        let subject = subject.to_string();
        let now = Utc::now();

        let access_claims = Claims::for_subject(&subject, now, self.settings.access_ttl());
        let refresh_claims = Claims::for_subject(&subject, now, self.settings.refresh_ttl());

        Ok(SignedPair {
            access: self.sign(access_claims)?,
            refresh: self.sign(refresh_claims)?,
        })
    }

    fn sign(&self, claims: Claims) -> Result<SignedToken, JwtError> {
        let token = self.jwt_handler.encode(&claims)?;
        Ok(SignedToken { token, claims })
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }

    /// Re-parse a token this authenticator just signed and return its expiry.
    ///
    /// # Panics
    /// If the token does not parse back to the claims it was signed from. That can
    /// only happen through a programming error, never through caller input.
    pub fn confirm_issued(&self, signed: &SignedToken) -> i64 {
        match self.validate_token(&signed.token) {
            Ok(parsed) if parsed == signed.claims => parsed.exp,
            other => panic!(
                "freshly signed token does not round-trip: expected {:?}, got {:?}",
                signed.claims, other
            ),
        }
    }
}

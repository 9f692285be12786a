//! Session token utilities library
//!
//! Provides the crypto half of the session scheme:
//! - Deterministic password hashing (SHA-256 with a fixed secret salt)
//! - HMAC JWT signing and validation with typed errors
//! - Access/refresh pair minting
//!
//! Storage of users and refresh tokens belongs to the calling service.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(b"fixed_secret_salt");
//! assert_eq!(hasher.hash("my_password"), hasher.hash("my_password"));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//! use chrono::{Duration, Utc};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::for_subject(42, Utc::now(), Duration::hours(1));
//! let token = handler.encode(&claims).unwrap();
//! let decoded: Claims = handler.decode(&token).unwrap();
//! assert_eq!(decoded.sub, "42");
//! ```
//!
//! ## Token Pairs
//! ```
//! use auth::{Authenticator, TokenSettings};
//!
//! let auth = Authenticator::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     b"fixed_secret_salt",
//!     TokenSettings::default(),
//! );
//!
//! let pair = auth.sign_pair(42).unwrap();
//! assert!(pair.access.claims.exp < pair.refresh.claims.exp);
//!
//! let claims = auth.validate_token(&pair.access.token).unwrap();
//! assert_eq!(claims.sub, "42");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use authenticator::SignedPair;
pub use authenticator::SignedToken;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SettingsError;
pub use jwt::TokenSettings;
pub use password::PasswordHasher;

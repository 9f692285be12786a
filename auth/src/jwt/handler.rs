use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

const HMAC_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// Only the algorithm a token header declares, whatever its value.
#[derive(Deserialize)]
struct DeclaredAlgorithm {
    alg: String,
}

/// JWT token handler for signing and parsing tokens.
///
/// Signs with HS256. Parsing accepts the whole HMAC family (HS256, HS384, HS512)
/// under the same key and rejects every other algorithm.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            validation,
        }
    }

    /// Sign claims into a JWT token.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Verify and decode a JWT token.
    ///
    /// # Arguments
    /// * `token` - JWT token string to decode
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `InvalidSignatureMethod` - Declared algorithm is not HMAC
    /// * `InvalidSignature` - Signature does not verify against the key
    /// * `Expired` - `exp` claim is in the past
    /// * `Malformed` - Token structure or claims cannot be decoded
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        check_declared_algorithm(token)?;

        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidAlgorithm => JwtError::InvalidSignatureMethod,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Malformed(e.to_string()),
            })
    }
}

/// Reject headers declaring a non-HMAC algorithm, including ones jsonwebtoken
/// cannot represent such as `none`.
fn check_declared_algorithm(token: &str) -> Result<(), JwtError> {
    let (header, _) = token
        .split_once('.')
        .ok_or_else(|| JwtError::Malformed("missing token segments".to_string()))?;

    let header = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| JwtError::Malformed(format!("header is not base64url: {}", e)))?;
    let declared: DeclaredAlgorithm = serde_json::from_slice(&header)
        .map_err(|e| JwtError::Malformed(format!("header is not valid JSON: {}", e)))?;

    if HMAC_ALGORITHMS.contains(&declared.alg.as_str()) {
        Ok(())
    } else {
        Err(JwtError::InvalidSignatureMethod)
    }
}

use sha2::Digest;
use sha2::Sha256;

/// Deterministic password hashing.
///
/// Digests the password bytes followed by a fixed, process-wide secret salt with
/// SHA-256. The same password always yields the same hash, which lets the credential
/// store look users up by exact hash match.
///
/// # Security Notes
/// There is no per-user salt: if the salt leaks, hashes are open to precomputation.
/// Moving to per-user salts requires the store to verify per record instead of
/// matching on the hash.
#[derive(Clone)]
pub struct PasswordHasher {
    salt: Vec<u8>,
}

impl PasswordHasher {
    /// Create a hasher bound to the given secret salt.
    pub fn new(salt: &[u8]) -> Self {
        Self {
            salt: salt.to_vec(),
        }
    }

    /// Hash a plaintext password.
    ///
    /// # Returns
    /// 64 character lowercase hex digest
    pub fn hash(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hasher.update(&self.salt);
        format!("{:x}", hasher.finalize())
    }
}

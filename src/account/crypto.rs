//! # Credential Hashing
//!
//! The hashing boundary and its Argon2id implementation.
//!
//! Passwords are only ever stored as Argon2id digests; comparison is
//! delegated to the argon2 verifier, which is constant-time.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use super::errors::{HashError, HashResult};

/// Hashing primitive: `hash(plaintext) -> digest`,
/// `compare(plaintext, digest) -> bool`
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted digest
    fn hash(&self, plaintext: &str) -> HashResult<String>;

    /// Check `plaintext` against a stored digest
    fn compare(&self, plaintext: &str, digest: &str) -> HashResult<bool>;
}

/// Argon2id hasher
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with explicit cost: memory in KiB, iteration count, lanes
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> HashResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| HashError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> HashResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| HashError::HashingFailed)
    }

    fn compare(&self, plaintext: &str, digest: &str) -> HashResult<bool> {
        let parsed = PasswordHash::new(digest).map_err(|_| HashError::MalformedDigest)?;

        // Cost parameters are read from the digest itself.
        Ok(self
            .argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}

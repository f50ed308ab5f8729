//! Password hashing using Argon2id
//!
//! Passwords are hashed with Argon2id and stored in PHC string format, so each
//! stored hash carries its own algorithm, parameters and salt. Verification
//! reads the parameters back out of the stored hash, which means the work
//! factor can be raised later without invalidating existing credentials.
//!
//! # Default Parameters
//!
//! - **Memory**: 64 MB (65536 KiB)
//! - **Iterations**: 3 passes
//! - **Parallelism**: 4 lanes
//! - **Output**: 32-byte hash
//! - **Salt**: 16 random bytes per call
//!
//! # Example
//!
//! ```
//! use tasktrack_shared::auth::password::{HashingParams, PasswordHasher};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hasher = PasswordHasher::new(HashingParams::default())?;
//!
//! let hash = hasher.hash("super_secret_password_123")?;
//! assert!(hasher.verify("super_secret_password_123", &hash)?);
//! assert!(!hasher.verify("wrong_password", &hash)?);
//! # Ok(())
//! # }
//! ```

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2, ParamsBuilder, Version,
};
use serde::{Deserialize, Serialize};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Work factor parameters were rejected by Argon2
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a parseable PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingParams {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes over memory
    pub iterations: u32,

    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Salted, one-way password hasher
///
/// Cloning is cheap; a clone can be moved into `spawn_blocking` so the
/// deliberately slow hash never runs on an async worker thread.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    params: HashingParams,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", &self.params)
            .finish()
    }
}

impl PasswordHasher {
    /// Creates a hasher with the given work factor
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidParams` if Argon2 rejects the
    /// parameters (for example memory below `8 * parallelism` KiB).
    pub fn new(params: HashingParams) -> Result<Self, PasswordError> {
        let argon_params = ParamsBuilder::new()
            .m_cost(params.memory_kib)
            .t_cost(params.iterations)
            .p_cost(params.parallelism)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, argon_params);

        Ok(Self { argon2, params })
    }

    /// Returns the configured work factor
    pub fn params(&self) -> HashingParams {
        self.params
    }

    /// Hashes a password with a fresh random salt
    ///
    /// Two calls with the same input produce different PHC strings:
    ///
    /// ```text
    /// $argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>
    /// ```
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored PHC hash
    ///
    /// The comparison of the derived and stored digests is constant-time.
    ///
    /// # Returns
    ///
    /// `Ok(true)` on match, `Ok(false)` on mismatch.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidHash` if `hash` is not a PHC string, or
    /// `PasswordError::VerifyError` for any other Argon2 failure.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
        }
    }
}

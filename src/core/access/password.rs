//! Password hashing and verification using Argon2
//!
//! Container passwords are stored as Argon2id PHC strings in the container
//! header. Verification goes through the `password-hash` verifier, which
//! compares digests in constant time.

use crate::config::{SecretString, SecurityConfig};
use crate::domain::{Result, UmdfError};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use secrecy::ExposeSecret;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl KdfParams {
    /// Creates a parameter set
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| UmdfError::Configuration(format!("Invalid Argon2 params: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::from(&SecurityConfig::default())
    }
}

impl From<&SecurityConfig> for KdfParams {
    fn from(config: &SecurityConfig) -> Self {
        Self::new(
            config.kdf_memory_kib,
            config.kdf_iterations,
            config.kdf_parallelism,
        )
    }
}

/// Hash a password using Argon2id
///
/// Returns the PHC-formatted hash string that includes the salt and parameters.
pub fn hash_password(password: &SecretString, params: &KdfParams) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    params
        .hasher()?
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UmdfError::Configuration(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash
///
/// Parameters are read from the PHC string, so containers created with other
/// cost settings still verify.
///
/// # Errors
///
/// Returns an error if the stored hash is not a valid PHC string.
pub fn verify_password(password: &SecretString, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| UmdfError::Integrity(format!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.expose_secret().as_bytes(), &parsed_hash)
        .is_ok())
}

/// Spends roughly one verification worth of work and discards the result
///
/// Used on failure paths that would otherwise return faster than a real
/// password check.
pub fn burn_verification(password: &SecretString, params: &KdfParams) {
    let _ = hash_password(password, params);
}

/// Gate an open against the container's stored password hash
///
/// Every mismatch, including a password supplied to an unauthenticated
/// container, fails with [`UmdfError::AccessDenied`].
pub fn check_access(
    stored_hash: Option<&str>,
    supplied: Option<&SecretString>,
    params: &KdfParams,
) -> Result<()> {
    match (stored_hash, supplied) {
        (None, None) => Ok(()),
        (None, Some(password)) => {
            burn_verification(password, params);
            Err(UmdfError::AccessDenied)
        }
        (Some(_), None) => Err(UmdfError::AccessDenied),
        (Some(hash), Some(password)) => match verify_password(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) | Err(_) => Err(UmdfError::AccessDenied),
        },
    }
}

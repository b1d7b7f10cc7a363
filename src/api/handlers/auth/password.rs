//! Salted one-way password hashing (Argon2id, PHC string format).
//!
//! Hashing and verification are CPU bound and deliberately slow, so both run
//! on the blocking pool.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
};
use rand::rngs::OsRng;

use super::error::AuthError;

pub const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
pub const DEFAULT_ITERATIONS: u32 = 3;
const PARALLELISM: u32 = 1;

#[derive(Clone, Debug)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// # Errors
    /// Returns an error if the Argon2 cost parameters are out of range.
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, PARALLELISM, None)
            .map_err(|err| AuthError::PasswordHash(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn hash_blocking(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| AuthError::PasswordHash(err.to_string()))
    }

    /// Hash a raw password with a fresh random salt.
    ///
    /// # Errors
    /// Returns an error if hashing fails or the blocking task is cancelled.
    pub async fn hash(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password))
            .await
            .map_err(|err| AuthError::PasswordHash(err.to_string()))?
    }

    /// Check a raw password against a stored PHC hash. Cost parameters are
    /// read from the hash itself, so records hashed under older settings
    /// still verify.
    ///
    /// # Errors
    /// Returns an error if the stored hash is corrupt or the task is cancelled.
    pub async fn verify(&self, password: String, stored_hash: String) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || verify_blocking(&password, &stored_hash))
            .await
            .map_err(|err| AuthError::PasswordHash(err.to_string()))?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::new(DEFAULT_MEMORY_KIB, DEFAULT_ITERATIONS, PARALLELISM, None)
                .unwrap_or_default(),
        }
    }
}

fn verify_blocking(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|err| AuthError::PasswordHash(err.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(AuthError::PasswordHash(err.to_string())),
    }
}

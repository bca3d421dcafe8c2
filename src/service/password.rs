//! Argon2id password hashing and verification.
//!
//! Hashes use a random salt from [`OsRng`] and are stored as PHC strings, so
//! the algorithm parameters and salt travel with the hash.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::ComicLensError;

/// Hash a plaintext password. Returns the PHC-formatted string.
pub fn hash_password(password: &str) -> Result<String, ComicLensError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ComicLensError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ComicLensError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| ComicLensError::PasswordHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ComicLensError::PasswordHash(e.to_string())),
    }
}

/// Runs hashing on the blocking pool; Argon2 is deliberately slow.
pub async fn hash_password_blocking(password: String) -> Result<String, ComicLensError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ComicLensError::UnexpectedError(format!("hash task failed: {e}")))?
}

pub async fn verify_password_blocking(
    password: String,
    hash: String,
) -> Result<bool, ComicLensError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ComicLensError::UnexpectedError(format!("verify task failed: {e}")))?
}

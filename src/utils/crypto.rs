//! Argon2id password hashing for docente accounts.
//!
//! Hashing is deliberately slow, so both operations run on the blocking pool instead of
//! stalling the request executor.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tokio::task;

use crate::error::{Error, Result};

fn hash_blocking(plain: &[u8]) -> std::result::Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default().hash_password(plain, &salt)?.to_string())
}

fn verify_blocking(plain: &[u8], stored: &str) -> std::result::Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(plain, &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// PHC string with a fresh random salt.
pub async fn hash_password(plain: String) -> Result<String> {
    let hashed = task::spawn_blocking(move || hash_blocking(plain.as_bytes()))
        .await
        .map_err(|e| Error::Internal(format!("password hashing task failed: {}", e)))??;
    Ok(hashed)
}

/// `Ok(false)` on a mismatch; a stored value that is not a PHC string is an error.
pub async fn verify_password(plain: String, stored: String) -> Result<bool> {
    let ok = task::spawn_blocking(move || verify_blocking(plain.as_bytes(), &stored))
        .await
        .map_err(|e| Error::Internal(format!("password check task failed: {}", e)))??;
    Ok(ok)
}

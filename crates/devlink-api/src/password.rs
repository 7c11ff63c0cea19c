//! Argon2 password hashing.
//!
//! Both operations run on the blocking pool.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::error::ApiError;

/// A well-formed argon2id hash with default parameters that no password
/// matches. Login verifies against it when the email is unknown so both
/// failure paths pay for one argon2 run.
pub const DUMMY_PHC: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$peW/95BIxhRJ1mUn+q9nokdwAyJDKCfVTW3wx42X+o8";

/// Produce an argon2id PHC string for `password`.
pub fn hash_password_blocking(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

pub async fn hash_password(password: String) -> Result<String, ApiError> {
  tokio::task::spawn_blocking(move || hash_password_blocking(&password))
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
}

/// `true` iff `password` matches the stored PHC string. A malformed stored
/// hash never matches.
pub async fn verify_password(password: String, phc: String) -> Result<bool, ApiError> {
  tokio::task::spawn_blocking(move || {
    PasswordHash::new(&phc)
      .map(|parsed| {
        Argon2::default()
          .verify_password(password.as_bytes(), &parsed)
          .is_ok()
      })
      .unwrap_or(false)
  })
  .await
  .map_err(|e| ApiError::Internal(e.to_string()))
}

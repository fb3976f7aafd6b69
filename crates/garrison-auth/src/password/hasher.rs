//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use async_trait::async_trait;

use garrison_core::error::AppError;
use garrison_core::result::AppResult;
use garrison_core::traits::PasswordHasher;

/// Argon2id implementation of [`PasswordHasher`].
///
/// Hashing is CPU-bound, so both operations run on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Creates a new hasher instance.
    pub fn new() -> Self {
        Self
    }

    fn hash_blocking(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    fn compare_blocking(password: &str, digest: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, plain: &str) -> AppResult<String> {
        let plain = plain.to_string();
        tokio::task::spawn_blocking(move || Self::hash_blocking(&plain))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
    }

    async fn compare(&self, plain: &str, digest: &str) -> AppResult<bool> {
        let plain = plain.to_string();
        let digest = digest.to_string();
        tokio::task::spawn_blocking(move || Self::compare_blocking(&plain, &digest))
            .await
            .map_err(|e| AppError::internal(format!("Hash comparison task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_compare() {
        let hasher = Argon2PasswordHasher::new();
        let digest = hasher.hash("Correct-Horse-42").await.unwrap();

        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.compare("Correct-Horse-42", &digest).await.unwrap());
        assert!(!hasher.compare("correct-horse-42", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn test_salts_differ() {
        let hasher = Argon2PasswordHasher::new();
        let a = hasher.hash("same").await.unwrap();
        let b = hasher.hash("same").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_malformed_digest_is_an_error() {
        let hasher = Argon2PasswordHasher::new();
        assert!(hasher.compare("x", "plaintext-not-a-hash").await.is_err());
    }
}

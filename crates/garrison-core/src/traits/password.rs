//! Password hashing capability.

use async_trait::async_trait;

use crate::result::AppResult;

/// Hashes plaintext secrets and compares them against stored digests.
#[async_trait]
pub trait PasswordHasher: Send + Sync + std::fmt::Debug + 'static {
    /// Produces a self-describing digest for `plain`.
    async fn hash(&self, plain: &str) -> AppResult<String>;

    /// Returns `Ok(true)` if `plain` matches `digest`, `Ok(false)` on mismatch.
    ///
    /// Errors are reserved for malformed digests or backend failures.
    async fn compare(&self, plain: &str, digest: &str) -> AppResult<bool>;
}

//! Normalization and structural validation of raw caller input.

pub mod sanitizer;

use garrison_core::result::AppResult;
use garrison_core::types::UserId;
use garrison_entity::credentials::LoginCredentials;

pub use sanitizer::DefaultInputPolicy;

/// Cleans and checks raw input before any repository is touched.
///
/// Validation failures are `Validation` errors and may say exactly what is
/// malformed; they describe syntax, never whether credentials are right.
pub trait InputPolicy: Send + Sync + std::fmt::Debug + 'static {
    /// Normalizes the identity field and strips noise from the secret.
    fn sanitize_credentials(&self, raw: LoginCredentials) -> LoginCredentials;

    /// Checks the shape of sanitized credentials.
    fn validate_credentials(&self, credentials: &LoginCredentials) -> AppResult<()>;

    /// Normalizes a raw account id.
    fn sanitize_id(&self, raw: &str) -> String;

    /// Parses a sanitized account id.
    fn validate_id(&self, sanitized: &str) -> AppResult<UserId>;
}

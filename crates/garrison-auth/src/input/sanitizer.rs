//! Default input policy.

use validator::Validate;

use garrison_core::error::AppError;
use garrison_core::result::AppResult;
use garrison_core::types::UserId;
use garrison_entity::credentials::LoginCredentials;

use super::InputPolicy;

/// Digit-only registration numbers, secrets with control characters removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInputPolicy;

impl DefaultInputPolicy {
    /// Creates the policy.
    pub fn new() -> Self {
        Self
    }

    /// Drops whitespace and separators people type into registration numbers.
    fn normalize_military_id(raw: &str) -> String {
        raw.chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect()
    }

    fn clean_secret(raw: &str) -> String {
        raw.trim().chars().filter(|c| !c.is_control()).collect()
    }
}

impl InputPolicy for DefaultInputPolicy {
    fn sanitize_credentials(&self, raw: LoginCredentials) -> LoginCredentials {
        LoginCredentials {
            military_id: Self::normalize_military_id(&raw.military_id),
            password: Self::clean_secret(&raw.password),
        }
    }

    fn validate_credentials(&self, credentials: &LoginCredentials) -> AppResult<()> {
        credentials
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid login request: {e}")))?;

        if !credentials.military_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::validation("Military ID must contain digits only"));
        }
        Ok(())
    }

    fn sanitize_id(&self, raw: &str) -> String {
        raw.trim().chars().filter(|c| !c.is_control()).collect()
    }

    fn validate_id(&self, sanitized: &str) -> AppResult<UserId> {
        sanitized
            .parse::<UserId>()
            .map_err(|_| AppError::validation("User ID must be a UUID"))
    }
}

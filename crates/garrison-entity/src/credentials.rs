//! Login input.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Raw or sanitized login credentials.
///
/// `Debug` is implemented by hand so the secret never reaches a log line.
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    /// Registration number of the identity.
    #[validate(length(min = 4, max = 20, message = "Military ID must be 4-20 digits"))]
    pub military_id: String,
    /// The secret.
    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,
}

impl LoginCredentials {
    /// Builds credentials from borrowed strings.
    pub fn new(military_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            military_id: military_id.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("military_id", &self.military_id)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

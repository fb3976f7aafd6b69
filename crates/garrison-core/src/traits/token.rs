//! Token signing capability.

use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token exchanged for a new pair.
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// Signs and verifies opaque token strings carrying a JSON payload.
///
/// Payload shapes are fixed one layer up; a signer only guarantees
/// integrity, expiry, and that a token of one kind never verifies as the
/// other.
pub trait TokenSigner: Send + Sync + std::fmt::Debug + 'static {
    /// Signs `payload` as a token of `kind` valid for `ttl`.
    fn sign(
        &self,
        kind: TokenKind,
        payload: serde_json::Map<String, serde_json::Value>,
        ttl: chrono::Duration,
    ) -> AppResult<String>;

    /// Verifies `token` as a token of `kind` and returns its payload.
    ///
    /// Fails with an `Authentication` error when the token is malformed,
    /// tampered, expired, or of the other kind.
    fn verify(
        &self,
        kind: TokenKind,
        token: &str,
    ) -> AppResult<serde_json::Map<String, serde_json::Value>>;
}

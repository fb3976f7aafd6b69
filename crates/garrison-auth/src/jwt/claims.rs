//! JWT claims envelope.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use garrison_core::traits::TokenKind;

/// Registered claims wrapped around a caller payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token kind; an access token never verifies as a refresh token.
    pub typ: TokenKind,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token id, so two tokens minted in the same second differ.
    pub jti: Uuid,
    /// Caller payload, flattened into the top-level object.
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

//! Token payload shapes.
//!
//! These are the only shapes the token service will sign, so a caller
//! cannot mint a token missing its session binding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use garrison_core::types::{SessionId, UserId};

use crate::user::UserRole;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenPayload {
    /// Account the token was issued to.
    pub user_id: UserId,
    /// Session the token is bound to.
    pub session_id: SessionId,
    /// Role at issuance time.
    pub role: UserRole,
    /// Registration number of the identity.
    pub military_id: String,
}

/// Claims carried by a refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenPayload {
    /// Account the token was issued to.
    pub user_id: UserId,
    /// Session the token is bound to.
    pub session_id: SessionId,
}

/// A freshly minted access + refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

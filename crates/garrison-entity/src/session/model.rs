//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use garrison_core::types::{SessionId, UserId};

/// Longest device description kept on a session, in characters.
pub const MAX_DEVICE_INFO_LENGTH: usize = 100;

/// A login session.
///
/// Created on login, rotated on refresh, soft-revoked by clearing
/// `is_active`, and physically removed by the reaper once expired or
/// inactive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier.
    pub id: SessionId,
    /// The account this session belongs to.
    pub user_id: UserId,
    /// Current access token.
    #[serde(skip_serializing)]
    pub token: String,
    /// Current refresh token.
    #[serde(skip_serializing)]
    pub refresh_token: String,
    /// Cleared on logout or revoke.
    pub is_active: bool,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// Last time the session was used. Never moves `expires_at`.
    pub last_access_at: DateTime<Utc>,
    /// Hard expiry fixed at creation.
    pub expires_at: DateTime<Utc>,
    /// Client description, truncated to [`MAX_DEVICE_INFO_LENGTH`].
    pub device_info: Option<String>,
}

impl Session {
    /// Whether the session may still be used at `now`.
    pub fn is_alive_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at > now
    }

    /// Whether the reaper should physically delete the session at `now`.
    pub fn is_reapable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_alive_at(now)
    }
}

/// Data required to create a session; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewSession {
    /// The account logging in.
    pub user_id: UserId,
    /// Initial access token (may be empty until tokens are minted).
    pub token: String,
    /// Initial refresh token (may be empty until tokens are minted).
    pub refresh_token: String,
    /// Usually `true`.
    pub is_active: bool,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
    /// Client description, any length.
    pub device_info: Option<String>,
}

/// Cuts a device description down to [`MAX_DEVICE_INFO_LENGTH`] characters.
pub fn truncate_device_info(info: Option<String>) -> Option<String> {
    info.map(|text| {
        if text.chars().count() > MAX_DEVICE_INFO_LENGTH {
            text.chars().take(MAX_DEVICE_INFO_LENGTH).collect()
        } else {
            text
        }
    })
}

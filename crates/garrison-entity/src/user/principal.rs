//! Authenticated principal.

use serde::{Deserialize, Serialize};

use garrison_core::types::UserId;

use crate::personnel::Personnel;

use super::model::UserAccount;
use super::role::UserRole;

/// The caller identity returned by a successful credential check.
///
/// Built from the account and its personnel record; it has no field that
/// could carry the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Account identifier.
    pub id: UserId,
    /// Account role.
    pub role: UserRole,
    /// Human-readable name (rank and name).
    pub display_name: String,
    /// External registration number of the identity.
    pub military_id: String,
}

impl AuthenticatedUser {
    /// Combines an identity and its account.
    pub fn from_parts(personnel: &Personnel, account: &UserAccount) -> Self {
        Self {
            id: account.id,
            role: account.role,
            display_name: personnel.display_name(),
            military_id: personnel.military_id.clone(),
        }
    }
}

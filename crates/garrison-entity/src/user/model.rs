//! Login account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use garrison_core::types::{PersonnelId, UserId};

use super::role::UserRole;

/// The credential record attached to a personnel identity.
///
/// A personnel record may exist without an account; only accounts can
/// log in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique account identifier.
    pub id: UserId,
    /// The identity this account belongs to.
    pub personnel_id: PersonnelId,
    /// Password digest produced by the configured hasher.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account role.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Creates an account for `personnel_id` with an already hashed password.
    pub fn new(personnel_id: PersonnelId, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            personnel_id,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full registry administrator.
    Admin,
    /// Maintains personnel, rank, and vehicle records for a unit.
    Manager,
    /// Read access to the registry.
    User,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
            Self::User => write!(f, "user"),
        }
    }
}

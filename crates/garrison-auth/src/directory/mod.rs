//! Identity and credential lookup.
//!
//! The personnel registry (identities) and the account table (credential
//! records) are separate collaborators: an identity can exist without an
//! account, and only the account carries a password hash.

pub mod memory;

use async_trait::async_trait;

use garrison_core::result::AppResult;
use garrison_core::types::{PersonnelId, UserId};
use garrison_entity::personnel::Personnel;
use garrison_entity::user::{UserAccount, UserRole};

pub use memory::MemoryDirectory;

/// Looks up personnel identities.
#[async_trait]
pub trait IdentityRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Finds an identity by its registration number.
    async fn find_by_military_id(&self, military_id: &str) -> AppResult<Option<Personnel>>;

    /// Finds an identity by primary key.
    async fn find_by_id(&self, id: PersonnelId) -> AppResult<Option<Personnel>>;
}

/// Looks up and maintains login accounts.
#[async_trait]
pub trait CredentialRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Finds the account attached to an identity.
    async fn find_by_personnel_id(&self, personnel_id: PersonnelId)
    -> AppResult<Option<UserAccount>>;

    /// Finds an account by primary key.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<UserAccount>>;

    /// Lists every account.
    async fn find_all(&self) -> AppResult<Vec<UserAccount>>;

    /// Whether an account with this id is registered.
    async fn exists(&self, id: UserId) -> AppResult<bool>;

    /// Replaces the stored password digest.
    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()>;

    /// Changes the account role.
    async fn update_role(&self, id: UserId, role: UserRole) -> AppResult<()>;
}

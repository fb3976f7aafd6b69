//! In-memory directory for single-node deployments and tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use garrison_core::error::AppError;
use garrison_core::result::AppResult;
use garrison_core::types::{PersonnelId, UserId};
use garrison_entity::personnel::Personnel;
use garrison_entity::user::{UserAccount, UserRole};

use super::{CredentialRepository, IdentityRepository};

/// Holds personnel and accounts in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    /// Identities by primary key.
    personnel: Arc<DashMap<PersonnelId, Personnel>>,
    /// Accounts by primary key.
    accounts: Arc<DashMap<UserId, UserAccount>>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an identity, rejecting a duplicate registration number.
    pub fn insert_personnel(&self, personnel: Personnel) -> AppResult<()> {
        let taken = self
            .personnel
            .iter()
            .any(|entry| entry.military_id == personnel.military_id);
        if taken {
            return Err(AppError::validation(format!(
                "Military ID {} is already registered",
                personnel.military_id
            )));
        }
        self.personnel.insert(personnel.id, personnel);
        Ok(())
    }

    /// Registers an account, rejecting a second account for the same identity.
    pub fn insert_account(&self, account: UserAccount) -> AppResult<()> {
        if !self.personnel.contains_key(&account.personnel_id) {
            return Err(AppError::not_found(format!(
                "Personnel {} not found",
                account.personnel_id
            )));
        }
        let taken = self
            .accounts
            .iter()
            .any(|entry| entry.personnel_id == account.personnel_id);
        if taken {
            return Err(AppError::validation(format!(
                "Personnel {} already has an account",
                account.personnel_id
            )));
        }
        self.accounts.insert(account.id, account);
        Ok(())
    }
}

#[async_trait]
impl IdentityRepository for MemoryDirectory {
    async fn find_by_military_id(&self, military_id: &str) -> AppResult<Option<Personnel>> {
        Ok(self
            .personnel
            .iter()
            .find(|entry| entry.military_id == military_id)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: PersonnelId) -> AppResult<Option<Personnel>> {
        Ok(self.personnel.get(&id).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl CredentialRepository for MemoryDirectory {
    async fn find_by_personnel_id(
        &self,
        personnel_id: PersonnelId,
    ) -> AppResult<Option<UserAccount>> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.personnel_id == personnel_id)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> AppResult<Vec<UserAccount>> {
        Ok(self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn exists(&self, id: UserId) -> AppResult<bool> {
        Ok(self.accounts.contains_key(&id))
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()> {
        let mut account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        account.password_hash = password_hash.to_string();
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn update_role(&self, id: UserId, role: UserRole) -> AppResult<()> {
        let mut account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        account.role = role;
        account.updated_at = Utc::now();
        Ok(())
    }
}

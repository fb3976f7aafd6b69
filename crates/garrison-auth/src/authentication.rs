//! Credential verification with a uniform failure.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use garrison_core::error::AppError;
use garrison_core::result::AppResult;
use garrison_core::traits::PasswordHasher;
use garrison_core::types::UserId;
use garrison_entity::credentials::LoginCredentials;
use garrison_entity::user::AuthenticatedUser;

use crate::directory::{CredentialRepository, IdentityRepository};
use crate::input::InputPolicy;
use crate::password::PasswordValidator;

/// Plaintext hashed once to give missing-identity branches something to compare against.
const TIMING_DUMMY_SECRET: &str = "garrison-timing-equalization";

/// Verifies login credentials against the personnel registry and account table.
///
/// Unknown identity, identity without an account, and wrong secret all end in
/// the same [`AppError::invalid_credentials`] value, built in one place.
#[derive(Debug, Clone)]
pub struct AuthenticationService {
    /// Identity lookup by registration number.
    identities: Arc<dyn IdentityRepository>,
    /// Credential record lookup and password updates.
    credentials: Arc<dyn CredentialRepository>,
    /// Digest comparison.
    hasher: Arc<dyn PasswordHasher>,
    /// Input sanitizer/validator.
    input: Arc<dyn InputPolicy>,
    /// Policy for new passwords.
    password_policy: PasswordValidator,
    /// Digest compared on branches that have no stored hash.
    dummy_digest: Arc<OnceCell<String>>,
}

impl AuthenticationService {
    /// Creates the service from its collaborators.
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        credentials: Arc<dyn CredentialRepository>,
        hasher: Arc<dyn PasswordHasher>,
        input: Arc<dyn InputPolicy>,
        password_policy: PasswordValidator,
    ) -> Self {
        Self {
            identities,
            credentials,
            hasher,
            input,
            password_policy,
            dummy_digest: Arc::new(OnceCell::new()),
        }
    }

    /// Sanitizes the credentials the same way `authenticate` does.
    pub fn sanitize(&self, raw: LoginCredentials) -> LoginCredentials {
        self.input.sanitize_credentials(raw)
    }

    /// Authenticates raw credentials.
    ///
    /// Validation errors are specific and surface before any lookup.
    /// Every credential mismatch yields the uniform authentication error.
    pub async fn authenticate(&self, raw: LoginCredentials) -> AppResult<AuthenticatedUser> {
        let credentials = self.input.sanitize_credentials(raw);
        self.authenticate_sanitized(&credentials).await
    }

    /// Authenticates credentials that already went through [`sanitize`].
    ///
    /// [`sanitize`]: AuthenticationService::sanitize
    pub async fn authenticate_sanitized(
        &self,
        credentials: &LoginCredentials,
    ) -> AppResult<AuthenticatedUser> {
        self.input.validate_credentials(credentials)?;

        match self
            .verify(&credentials.military_id, &credentials.password)
            .await?
        {
            Some(user) => {
                debug!(user_id = %user.id, "Credentials verified");
                Ok(user)
            }
            None => Err(AppError::invalid_credentials()),
        }
    }

    /// Changes a user's password after re-checking the current one.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        self.password_policy.validate(new_password)?;
        self.password_policy
            .validate_not_same(current_password, new_password)?;

        let account = self
            .credentials
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        if !self
            .hasher
            .compare(current_password, &account.password_hash)
            .await?
        {
            warn!(user_id = %user_id, "Password change rejected: current password mismatch");
            return Err(AppError::invalid_credentials());
        }

        let digest = self.hasher.hash(new_password).await?;
        self.credentials.update_password(user_id, &digest).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Rebuilds the principal for an account id, if the account and its identity still exist.
    pub async fn resolve_principal(&self, user_id: UserId) -> AppResult<Option<AuthenticatedUser>> {
        let Some(account) = self.credentials.find_by_id(user_id).await? else {
            return Ok(None);
        };
        let personnel = self.identities.find_by_id(account.personnel_id).await?;
        Ok(personnel.map(|personnel| AuthenticatedUser::from_parts(&personnel, &account)))
    }

    /// Runs the three credential gates. `None` means any of them failed.
    async fn verify(
        &self,
        military_id: &str,
        password: &str,
    ) -> AppResult<Option<AuthenticatedUser>> {
        let Some(personnel) = self.identities.find_by_military_id(military_id).await? else {
            self.equalize_timing(password).await;
            return Ok(None);
        };

        let Some(account) = self.credentials.find_by_personnel_id(personnel.id).await? else {
            self.equalize_timing(password).await;
            return Ok(None);
        };

        if !self.hasher.compare(password, &account.password_hash).await? {
            return Ok(None);
        }

        Ok(Some(AuthenticatedUser::from_parts(&personnel, &account)))
    }

    /// Spends one hash comparison so a missing record costs as much as a wrong secret.
    async fn equalize_timing(&self, password: &str) {
        let digest = self
            .dummy_digest
            .get_or_try_init(|| self.hasher.hash(TIMING_DUMMY_SECRET))
            .await;

        match digest {
            Ok(digest) => {
                let _ = self.hasher.compare(password, digest).await;
            }
            Err(e) => debug!(error = %e, "Timing equalization digest unavailable"),
        }
    }
}

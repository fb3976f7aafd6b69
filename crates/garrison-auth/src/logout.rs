//! Bulk session revocation for a user.

use std::sync::Arc;

use tracing::info;

use garrison_core::error::AppError;
use garrison_core::result::AppResult;
use garrison_core::traits::AuditLogger;

use crate::directory::CredentialRepository;
use crate::input::InputPolicy;
use crate::session::SessionStore;

/// Soft-revokes every session a user holds.
#[derive(Debug, Clone)]
pub struct LogoutService {
    /// Registered-user check.
    credentials: Arc<dyn CredentialRepository>,
    /// Session persistence.
    session_store: Arc<dyn SessionStore>,
    /// Id sanitizer/validator.
    input: Arc<dyn InputPolicy>,
    /// Audit trail.
    audit: Arc<dyn AuditLogger>,
}

impl LogoutService {
    /// Creates a new logout service.
    pub fn new(
        credentials: Arc<dyn CredentialRepository>,
        session_store: Arc<dyn SessionStore>,
        input: Arc<dyn InputPolicy>,
        audit: Arc<dyn AuditLogger>,
    ) -> Self {
        Self {
            credentials,
            session_store,
            input,
            audit,
        }
    }

    /// Logs a user out of every session.
    ///
    /// Succeeds when the user has no active sessions. Fails with a
    /// validation error for a malformed id and `NotFound` for an unknown one.
    pub async fn logout(&self, raw_user_id: &str) -> AppResult<()> {
        let sanitized = self.input.sanitize_id(raw_user_id);
        let user_id = self.input.validate_id(&sanitized)?;

        if !self.credentials.exists(user_id).await? {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }

        let revoked = self
            .session_store
            .deactivate_all_user_sessions(user_id)
            .await?;

        self.audit.log_logout(&user_id.to_string());
        info!(user_id = %user_id, revoked = revoked, "User logged out");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use garrison_core::error::ErrorKind;
    use garrison_core::{Clock, ManualClock};
    use garrison_entity::personnel::Personnel;
    use garrison_entity::session::NewSession;
    use garrison_entity::user::{UserAccount, UserRole};

    use crate::audit::{AuditEvent, MemoryAuditLogger};
    use crate::directory::MemoryDirectory;
    use crate::input::DefaultInputPolicy;
    use crate::session::MemorySessionStore;

    struct Fixture {
        service: LogoutService,
        store: Arc<MemorySessionStore>,
        audit: MemoryAuditLogger,
        account: UserAccount,
        clock: ManualClock,
    }

    fn fixture() -> Fixture {
        let clock = ManualClock::starting_now();
        let directory = MemoryDirectory::new();
        let personnel = Personnel::new("1234", "Kim", None);
        let account = UserAccount::new(personnel.id, "digest".into(), UserRole::User);
        directory.insert_personnel(personnel).unwrap();
        directory.insert_account(account.clone()).unwrap();

        let store = Arc::new(MemorySessionStore::new(Arc::new(clock.clone())));
        let audit = MemoryAuditLogger::new();
        let service = LogoutService::new(
            Arc::new(directory),
            store.clone(),
            Arc::new(DefaultInputPolicy::new()),
            Arc::new(audit.clone()),
        );

        Fixture {
            service,
            store,
            audit,
            account,
            clock,
        }
    }

    async fn open_session(f: &Fixture, token: &str) {
        f.store
            .create(NewSession {
                user_id: f.account.id,
                token: token.to_string(),
                refresh_token: format!("{token}-r"),
                is_active: true,
                expires_at: f.clock.now() + Duration::days(7),
                device_info: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_logout_revokes_all_sessions() {
        let f = fixture();
        open_session(&f, "a").await;
        open_session(&f, "b").await;

        f.service
            .logout(&format!("  {}\n", f.account.id))
            .await
            .unwrap();

        assert!(f.store.find_active_by_user_id(f.account.id).await.unwrap().is_none());
        assert_eq!(f.store.len(), 2);
        assert_eq!(
            f.audit.events(),
            vec![AuditEvent::Logout {
                user_id: f.account.id.to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let f = fixture();
        let id = f.account.id.to_string();
        f.service.logout(&id).await.unwrap();
        f.service.logout(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_rejects_bad_ids() {
        let f = fixture();

        let err = f.service.logout("not-a-uuid").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = f
            .service
            .logout(&uuid::Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        assert!(f.audit.events().is_empty());
    }
}

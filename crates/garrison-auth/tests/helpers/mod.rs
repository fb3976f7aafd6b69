//! Shared test harness wiring the auth services over in-memory collaborators.

use std::sync::Arc;

use garrison_auth::{
    Argon2PasswordHasher, AuthenticationService, DefaultInputPolicy, JwtSigner, LogoutService,
    MemoryAuditLogger, MemoryDirectory, MemorySessionStore, PasswordValidator, RateLimiter,
    SessionManager, TokenService,
};
use garrison_core::config::{AuthConfig, RateLimitConfig, SessionConfig};
use garrison_core::traits::PasswordHasher;
use garrison_core::{Clock, ManualClock};
use garrison_entity::personnel::Personnel;
use garrison_entity::user::{UserAccount, UserRole};

/// Fully wired services plus handles for inspection.
pub struct TestApp {
    pub manager: SessionManager,
    pub logout: LogoutService,
    pub authentication: AuthenticationService,
    pub directory: MemoryDirectory,
    pub store: Arc<MemorySessionStore>,
    pub audit: MemoryAuditLogger,
    pub clock: ManualClock,
    hasher: Argon2PasswordHasher,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AuthConfig {
            jwt_access_secret: "integration-access-secret".into(),
            jwt_refresh_secret: "integration-refresh-secret".into(),
            ..AuthConfig::default()
        };
        let clock = ManualClock::starting_now();
        let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());
        let directory = MemoryDirectory::new();
        let hasher = Argon2PasswordHasher::new();
        let store = Arc::new(MemorySessionStore::new(shared_clock.clone()));
        let audit = MemoryAuditLogger::new();
        let input = Arc::new(DefaultInputPolicy::new());

        let authentication = AuthenticationService::new(
            Arc::new(directory.clone()),
            Arc::new(directory.clone()),
            Arc::new(hasher.clone()),
            input.clone(),
            PasswordValidator::new(&config),
        );
        let signer = JwtSigner::new(&config, shared_clock.clone()).expect("valid auth config");
        let tokens = TokenService::new(Arc::new(signer), &config, shared_clock.clone());

        let manager = SessionManager::new(
            authentication.clone(),
            tokens,
            store.clone(),
            RateLimiter::new(shared_clock.clone()),
            Arc::new(audit.clone()),
            shared_clock,
            RateLimitConfig::default(),
            SessionConfig::default(),
        );
        let logout = LogoutService::new(
            Arc::new(directory.clone()),
            store.clone(),
            input,
            Arc::new(audit.clone()),
        );

        Self {
            manager,
            logout,
            authentication,
            directory,
            store,
            audit,
            clock,
            hasher,
        }
    }

    /// Registers an identity with an account and returns the account.
    pub async fn create_test_user(&self, military_id: &str, password: &str) -> UserAccount {
        let personnel = Personnel::new(military_id, "Test Soldier", Some("PVT".into()));
        let digest = self.hasher.hash(password).await.expect("hash");
        let account = UserAccount::new(personnel.id, digest, UserRole::User);
        self.directory.insert_personnel(personnel).expect("personnel");
        self.directory.insert_account(account.clone()).expect("account");
        account
    }

    /// Registers an identity that has no account.
    pub fn create_orphan_identity(&self, military_id: &str) {
        self.directory
            .insert_personnel(Personnel::new(military_id, "No Account", None))
            .expect("personnel");
    }
}

//! Session lifecycle manager: login, refresh, authorize, and end-session flows.

use std::net::IpAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use garrison_core::Clock;
use garrison_core::config::{RateLimitConfig, SessionConfig};
use garrison_core::error::AppError;
use garrison_core::result::AppResult;
use garrison_core::traits::AuditLogger;
use garrison_core::types::SessionId;
use garrison_entity::credentials::LoginCredentials;
use garrison_entity::session::{
    AccessTokenPayload, NewSession, RefreshTokenPayload, Session, TokenPair,
};
use garrison_entity::user::AuthenticatedUser;

use crate::authentication::AuthenticationService;
use crate::rate_limit::RateLimiter;
use crate::token::TokenService;

use super::store::SessionStore;

/// Message for a token whose session is gone, revoked, or rotated away.
const STALE_SESSION_MESSAGE: &str = "Session is no longer valid";

/// Client details captured at login.
#[derive(Debug, Clone, Default)]
pub struct LoginContext {
    /// Remote address, when known.
    pub client_ip: Option<IpAddr>,
    /// Free-form client description (user agent). Truncated on storage.
    pub device_info: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    /// Generated token pair.
    pub tokens: TokenPair,
    /// Created session.
    pub session: Session,
    /// The authenticated user.
    pub user: AuthenticatedUser,
}

/// A verified access token together with its live session.
#[derive(Debug, Clone)]
pub struct Authorization {
    /// Decoded access token payload.
    pub claims: AccessTokenPayload,
    /// The session the token belongs to, after the access touch.
    pub session: Session,
}

/// Orchestrates the rate limiter, authentication, session store, and token service.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Credential verification.
    authentication: AuthenticationService,
    /// Token minting and verification.
    tokens: TokenService,
    /// Session persistence.
    session_store: Arc<dyn SessionStore>,
    /// Login attempt limiter.
    rate_limiter: RateLimiter,
    /// Audit trail.
    audit: Arc<dyn AuditLogger>,
    /// Time source for session expiry.
    clock: Arc<dyn Clock>,
    /// Login attempt thresholds.
    rate_limit_config: RateLimitConfig,
    /// Session lifetime.
    session_config: SessionConfig,
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        authentication: AuthenticationService,
        tokens: TokenService,
        session_store: Arc<dyn SessionStore>,
        rate_limiter: RateLimiter,
        audit: Arc<dyn AuditLogger>,
        clock: Arc<dyn Clock>,
        rate_limit_config: RateLimitConfig,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            authentication,
            tokens,
            session_store,
            rate_limiter,
            audit,
            clock,
            rate_limit_config,
            session_config,
        }
    }

    /// The limiter gating logins, for periodic cleanup.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Performs the complete login flow:
    ///
    /// 1. Sanitize credentials and check the per-identifier rate limit
    /// 2. Authenticate (recording a failed attempt on mismatch)
    /// 3. Reset the limiter and create the session
    /// 4. Mint tokens bound to the session and store them on it
    pub async fn login(
        &self,
        credentials: LoginCredentials,
        context: LoginContext,
    ) -> AppResult<LoginResult> {
        let credentials = self.authentication.sanitize(credentials);
        let identifier = credentials.military_id.clone();
        let key = Self::login_key(&identifier);
        let window = self.rate_limit_config.login_window();
        let max_attempts = self.rate_limit_config.login_max_attempts;

        let status = self.rate_limiter.check_limit(&key, max_attempts, window);
        if !status.allowed {
            warn!(identifier = %identifier, reset_time = %status.reset_time, "Login rate limited");
            self.audit
                .log_login_blocked(&identifier, None, "Too many failed login attempts");
            return Err(AppError::rate_limited(format!(
                "Too many login attempts. Try again after {}",
                status.reset_time.to_rfc3339()
            )));
        }

        let user = match self.authentication.authenticate_sanitized(&credentials).await {
            Ok(user) => user,
            Err(e) => {
                if e.is_authentication() {
                    self.record_failed_login(&key, &identifier, &context);
                }
                return Err(e);
            }
        };

        self.rate_limiter.reset(&key);

        let session = self
            .session_store
            .create(NewSession {
                user_id: user.id,
                token: String::new(),
                refresh_token: String::new(),
                is_active: true,
                expires_at: self.clock.now() + self.session_config.lifetime(),
                device_info: context.device_info.clone(),
            })
            .await?;

        let issued = self
            .issue_tokens(&user, &session, "")
            .await
            .and_then(|tokens| {
                tokens.ok_or_else(|| AppError::internal("Session closed before tokens were stored"))
            });

        let tokens = match issued {
            Ok(tokens) => tokens,
            Err(e) => {
                error!(
                    user_id = %user.id,
                    session_id = %session.id,
                    error = %e,
                    "Token issuance failed, rolling back session"
                );
                if let Err(rollback) = self.session_store.deactivate_session(session.id).await {
                    error!(session_id = %session.id, error = %rollback, "Session rollback failed");
                }
                return Err(e);
            }
        };

        let session = Session {
            token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            ..session
        };

        let session_label = session.id.to_string();
        self.audit.log_login(
            true,
            &user.id.to_string(),
            Some(session_label.as_str()),
            Some(json!({ "ip": context.client_ip.map(|ip| ip.to_string()) })),
        );
        info!(user_id = %user.id, session_id = %session.id, "Login successful");

        Ok(LoginResult {
            tokens,
            session,
            user,
        })
    }

    /// Exchanges a refresh token for a new pair, rotating both stored credentials.
    ///
    /// The refresh token must be the one currently stored on a live session.
    /// A validly signed but rotated-away token revokes that session, and so
    /// does losing a race to another refresh of the same token.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.tokens.verify_refresh_token(refresh_token)?;

        let session = self
            .session_store
            .find_by_refresh_token(refresh_token)
            .await?
            .filter(|s| s.id == claims.session_id && s.user_id == claims.user_id);

        let Some(session) = session else {
            return Err(self.reject_reused_refresh(&claims).await);
        };

        let user = self
            .authentication
            .resolve_principal(session.user_id)
            .await?
            .ok_or_else(|| AppError::authentication(STALE_SESSION_MESSAGE))?;

        let Some(tokens) = self.issue_tokens(&user, &session, refresh_token).await? else {
            return Err(self.reject_reused_refresh(&claims).await);
        };

        self.audit.log_token_refresh(&user.id.to_string());
        info!(user_id = %user.id, session_id = %session.id, "Tokens refreshed");

        Ok(tokens)
    }

    /// Verifies an access token against its live session and touches the session.
    pub async fn authorize(&self, access_token: &str) -> AppResult<Authorization> {
        let claims = match self.tokens.verify_access_token(access_token) {
            Ok(claims) => claims,
            Err(e) => {
                self.audit.log_access_denied("anonymous", "session", &e.message, None);
                return Err(e);
            }
        };

        let session = self
            .session_store
            .find_by_token(access_token)
            .await?
            .filter(|s| s.id == claims.session_id && s.user_id == claims.user_id);

        let Some(session) = session else {
            self.audit.log_access_denied(
                &claims.user_id.to_string(),
                "session",
                STALE_SESSION_MESSAGE,
                Some(json!({ "sessionId": claims.session_id.to_string() })),
            );
            return Err(AppError::authentication(STALE_SESSION_MESSAGE));
        };

        self.session_store.update_last_access(session.id).await?;

        Ok(Authorization {
            claims,
            session: Session {
                last_access_at: self.clock.now(),
                ..session
            },
        })
    }

    /// Soft-revokes one session.
    ///
    /// Returns `false` when the session was already gone.
    pub async fn end_session(&self, session_id: SessionId) -> AppResult<bool> {
        let Some(session) = self.session_store.find_by_session_id(session_id).await? else {
            return Ok(false);
        };

        self.session_store.deactivate_session(session.id).await?;
        self.audit.log_logout(&session.user_id.to_string());
        info!(user_id = %session.user_id, session_id = %session.id, "Session ended");

        Ok(true)
    }

    fn login_key(identifier: &str) -> String {
        format!("login:{identifier}")
    }

    /// Counts a failed login and flags the attempt that crosses the threshold.
    fn record_failed_login(&self, key: &str, identifier: &str, context: &LoginContext) {
        let window = self.rate_limit_config.login_window();
        self.rate_limiter.record_attempt(key, window);

        let ip = context.client_ip.map(|ip| ip.to_string());
        self.audit
            .log_login(false, identifier, None, Some(json!({ "ip": ip })));

        let status = self.rate_limiter.check_limit(
            key,
            self.rate_limit_config.login_max_attempts,
            window,
        );
        if !status.allowed {
            self.audit.log_suspicious_activity(
                identifier,
                "brute_force",
                json!({
                    "attempts": status.total_attempts,
                    "blockedUntil": status.reset_time.to_rfc3339(),
                    "ip": ip,
                }),
            );
        }
    }

    /// Revokes the session named by a refresh token that is no longer current.
    ///
    /// Always yields the error to return to the caller.
    async fn reject_reused_refresh(&self, claims: &RefreshTokenPayload) -> AppError {
        let stale = match self.session_store.find_by_session_id(claims.session_id).await {
            Ok(stale) => stale,
            Err(e) => return e,
        };

        if let Some(stale) = stale {
            warn!(
                user_id = %claims.user_id,
                session_id = %stale.id,
                "Rotated refresh token presented, revoking session"
            );
            self.audit.log_suspicious_activity(
                &claims.user_id.to_string(),
                "refresh_token_reuse",
                json!({ "sessionId": stale.id.to_string() }),
            );
            if let Err(e) = self.session_store.deactivate_session(stale.id).await {
                return e;
            }
        }

        AppError::authentication(STALE_SESSION_MESSAGE)
    }

    /// Mints a pair for `session` and swaps it in if the session still holds
    /// `current_refresh_token`.
    ///
    /// `None` means another caller rotated the session first.
    async fn issue_tokens(
        &self,
        user: &AuthenticatedUser,
        session: &Session,
        current_refresh_token: &str,
    ) -> AppResult<Option<TokenPair>> {
        let payload = AccessTokenPayload {
            user_id: user.id,
            session_id: session.id,
            role: user.role,
            military_id: user.military_id.clone(),
        };
        let tokens = self.tokens.generate_pair(&payload)?;

        let rotated = self
            .session_store
            .rotate_tokens(
                session.id,
                current_refresh_token,
                &tokens.access_token,
                &tokens.refresh_token,
            )
            .await?;

        Ok(rotated.then_some(tokens))
    }
}

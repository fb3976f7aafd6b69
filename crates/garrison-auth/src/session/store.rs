//! Session persistence contract.

use async_trait::async_trait;

use garrison_core::result::AppResult;
use garrison_core::types::{SessionId, UserId};
use garrison_entity::session::{NewSession, Session};

/// Persists sessions.
///
/// Every `find_*` method is an alive-only lookup: a session that is
/// inactive or whose `expires_at` has passed is reported as `None` even
/// while its row still exists. Only [`delete_expired_sessions`] removes
/// rows.
///
/// [`delete_expired_sessions`]: SessionStore::delete_expired_sessions
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Stores a new session, assigning its id and `created_at`/`last_access_at`.
    ///
    /// Device info longer than the maximum is truncated.
    async fn create(&self, session: NewSession) -> AppResult<Session>;

    /// Finds the alive session currently holding `token`.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>>;

    /// Finds the alive session currently holding `refresh_token`.
    async fn find_by_refresh_token(&self, refresh_token: &str) -> AppResult<Option<Session>>;

    /// Finds an alive session by id.
    async fn find_by_session_id(&self, session_id: SessionId) -> AppResult<Option<Session>>;

    /// Finds one alive session owned by `user_id`.
    ///
    /// Users may hold several sessions; which one is returned is
    /// implementation-defined.
    async fn find_active_by_user_id(&self, user_id: UserId) -> AppResult<Option<Session>>;

    /// Bumps `last_access_at`. Never moves `expires_at`.
    async fn update_last_access(&self, session_id: SessionId) -> AppResult<()>;

    /// Replaces the access token and bumps `last_access_at`.
    async fn update_token(&self, session_id: SessionId, token: &str) -> AppResult<()>;

    /// Replaces the refresh token and bumps `last_access_at`.
    async fn update_refresh_token(&self, session_id: SessionId, refresh_token: &str)
    -> AppResult<()>;

    /// Atomically swaps both tokens if the session is alive and still holds
    /// `expected_refresh_token`; also bumps `last_access_at`.
    ///
    /// Returns `false` without changing anything otherwise, so two callers
    /// racing on the same refresh token cannot both win.
    async fn rotate_tokens(
        &self,
        session_id: SessionId,
        expected_refresh_token: &str,
        token: &str,
        refresh_token: &str,
    ) -> AppResult<bool>;

    /// Soft-revokes one session.
    async fn deactivate_session(&self, session_id: SessionId) -> AppResult<()>;

    /// Soft-revokes every session owned by `user_id`; returns how many were active.
    async fn deactivate_all_user_sessions(&self, user_id: UserId) -> AppResult<u64>;

    /// Physically deletes sessions that are expired or inactive; returns the count.
    async fn delete_expired_sessions(&self) -> AppResult<u64>;
}

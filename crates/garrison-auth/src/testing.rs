//! Test doubles shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use garrison_core::result::AppResult;
use garrison_core::traits::PasswordHasher;
use garrison_core::types::{SessionId, UserId};
use garrison_entity::session::{NewSession, Session};

use crate::session::{MemorySessionStore, SessionStore};

/// Reversible "hasher" that counts comparisons.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlainHasher {
    compares: Arc<AtomicUsize>,
}

impl PlainHasher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn compare_calls(&self) -> usize {
        self.compares.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, plain: &str) -> AppResult<String> {
        Ok(format!("plain${plain}"))
    }

    async fn compare(&self, plain: &str, digest: &str) -> AppResult<bool> {
        self.compares.fetch_add(1, Ordering::SeqCst);
        Ok(digest.strip_prefix("plain$") == Some(plain))
    }
}

/// Session store that yields to the scheduler before every call, so
/// concurrent flows interleave between their reads and writes.
#[derive(Debug, Clone)]
pub(crate) struct YieldingStore {
    inner: Arc<MemorySessionStore>,
}

impl YieldingStore {
    pub(crate) fn new(inner: Arc<MemorySessionStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SessionStore for YieldingStore {
    async fn create(&self, session: NewSession) -> AppResult<Session> {
        tokio::task::yield_now().await;
        self.inner.create(session).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        tokio::task::yield_now().await;
        self.inner.find_by_token(token).await
    }

    async fn find_by_refresh_token(&self, refresh_token: &str) -> AppResult<Option<Session>> {
        tokio::task::yield_now().await;
        self.inner.find_by_refresh_token(refresh_token).await
    }

    async fn find_by_session_id(&self, session_id: SessionId) -> AppResult<Option<Session>> {
        tokio::task::yield_now().await;
        self.inner.find_by_session_id(session_id).await
    }

    async fn find_active_by_user_id(&self, user_id: UserId) -> AppResult<Option<Session>> {
        tokio::task::yield_now().await;
        self.inner.find_active_by_user_id(user_id).await
    }

    async fn update_last_access(&self, session_id: SessionId) -> AppResult<()> {
        tokio::task::yield_now().await;
        self.inner.update_last_access(session_id).await
    }

    async fn update_token(&self, session_id: SessionId, token: &str) -> AppResult<()> {
        tokio::task::yield_now().await;
        self.inner.update_token(session_id, token).await
    }

    async fn update_refresh_token(
        &self,
        session_id: SessionId,
        refresh_token: &str,
    ) -> AppResult<()> {
        tokio::task::yield_now().await;
        self.inner.update_refresh_token(session_id, refresh_token).await
    }

    async fn rotate_tokens(
        &self,
        session_id: SessionId,
        expected_refresh_token: &str,
        token: &str,
        refresh_token: &str,
    ) -> AppResult<bool> {
        tokio::task::yield_now().await;
        self.inner
            .rotate_tokens(session_id, expected_refresh_token, token, refresh_token)
            .await
    }

    async fn deactivate_session(&self, session_id: SessionId) -> AppResult<()> {
        tokio::task::yield_now().await;
        self.inner.deactivate_session(session_id).await
    }

    async fn deactivate_all_user_sessions(&self, user_id: UserId) -> AppResult<u64> {
        tokio::task::yield_now().await;
        self.inner.deactivate_all_user_sessions(user_id).await
    }

    async fn delete_expired_sessions(&self) -> AppResult<u64> {
        tokio::task::yield_now().await;
        self.inner.delete_expired_sessions().await
    }
}

//! In-memory session store for single-node deployments.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use garrison_core::Clock;
use garrison_core::result::AppResult;
use garrison_core::types::{SessionId, UserId};
use garrison_entity::session::{NewSession, Session, truncate_device_info};

use super::store::SessionStore;

/// Session table held in process memory.
///
/// Field mutations go through the map's per-entry write guard, so a
/// rotation and a touch on the same session never lose each other's update.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    /// Sessions by id.
    sessions: Arc<DashMap<SessionId, Session>>,
    /// Time source for timestamps and liveness.
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Number of rows held, alive or not.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Fetches a row regardless of liveness.
    pub fn get_raw(&self, session_id: SessionId) -> Option<Session> {
        self.sessions.get(&session_id).map(|entry| entry.value().clone())
    }

    fn find_alive(&self, predicate: impl Fn(&Session) -> bool) -> Option<Session> {
        let now = self.clock.now();
        self.sessions
            .iter()
            .filter(|entry| entry.is_alive_at(now) && predicate(entry.value()))
            .min_by_key(|entry| entry.created_at)
            .map(|entry| entry.value().clone())
    }

    fn mutate(&self, session_id: SessionId, apply: impl FnOnce(&mut Session)) {
        if let Some(mut session) = self.sessions.get_mut(&session_id) {
            apply(session.value_mut());
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, new: NewSession) -> AppResult<Session> {
        let now = self.clock.now();
        let session = Session {
            id: SessionId::new(),
            user_id: new.user_id,
            token: new.token,
            refresh_token: new.refresh_token,
            is_active: new.is_active,
            created_at: now,
            last_access_at: now,
            expires_at: new.expires_at,
            device_info: truncate_device_info(new.device_info),
        };
        self.sessions.insert(session.id, session.clone());
        debug!(session_id = %session.id, user_id = %session.user_id, "Session stored");
        Ok(session)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.find_alive(|s| s.token == token))
    }

    async fn find_by_refresh_token(&self, refresh_token: &str) -> AppResult<Option<Session>> {
        if refresh_token.is_empty() {
            return Ok(None);
        }
        Ok(self.find_alive(|s| s.refresh_token == refresh_token))
    }

    async fn find_by_session_id(&self, session_id: SessionId) -> AppResult<Option<Session>> {
        let now = self.clock.now();
        Ok(self
            .sessions
            .get(&session_id)
            .filter(|entry| entry.is_alive_at(now))
            .map(|entry| entry.value().clone()))
    }

    async fn find_active_by_user_id(&self, user_id: UserId) -> AppResult<Option<Session>> {
        Ok(self.find_alive(|s| s.user_id == user_id))
    }

    async fn update_last_access(&self, session_id: SessionId) -> AppResult<()> {
        let now = self.clock.now();
        self.mutate(session_id, |s| s.last_access_at = now);
        Ok(())
    }

    async fn update_token(&self, session_id: SessionId, token: &str) -> AppResult<()> {
        let now = self.clock.now();
        self.mutate(session_id, |s| {
            s.token = token.to_string();
            s.last_access_at = now;
        });
        Ok(())
    }

    async fn update_refresh_token(
        &self,
        session_id: SessionId,
        refresh_token: &str,
    ) -> AppResult<()> {
        let now = self.clock.now();
        self.mutate(session_id, |s| {
            s.refresh_token = refresh_token.to_string();
            s.last_access_at = now;
        });
        Ok(())
    }

    async fn rotate_tokens(
        &self,
        session_id: SessionId,
        expected_refresh_token: &str,
        token: &str,
        refresh_token: &str,
    ) -> AppResult<bool> {
        let now = self.clock.now();
        let Some(mut session) = self.sessions.get_mut(&session_id) else {
            return Ok(false);
        };
        if !session.is_alive_at(now) || session.refresh_token != expected_refresh_token {
            return Ok(false);
        }
        session.token = token.to_string();
        session.refresh_token = refresh_token.to_string();
        session.last_access_at = now;
        Ok(true)
    }

    async fn deactivate_session(&self, session_id: SessionId) -> AppResult<()> {
        self.mutate(session_id, |s| s.is_active = false);
        Ok(())
    }

    async fn deactivate_all_user_sessions(&self, user_id: UserId) -> AppResult<u64> {
        let mut revoked = 0u64;
        for mut entry in self.sessions.iter_mut() {
            if entry.user_id == user_id && entry.is_active {
                entry.is_active = false;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn delete_expired_sessions(&self) -> AppResult<u64> {
        let now = self.clock.now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_reapable_at(now));
        Ok(before.saturating_sub(self.sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use garrison_core::ManualClock;
    use garrison_entity::session::MAX_DEVICE_INFO_LENGTH;

    fn store() -> (MemorySessionStore, ManualClock) {
        let clock = ManualClock::starting_now();
        (MemorySessionStore::new(Arc::new(clock.clone())), clock)
    }

    fn new_session(clock: &ManualClock, user_id: UserId, token: &str) -> NewSession {
        NewSession {
            user_id,
            token: token.to_string(),
            refresh_token: format!("{token}-refresh"),
            is_active: true,
            expires_at: clock.now() + Duration::days(7),
            device_info: Some("Mozilla/5.0".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let (store, clock) = store();
        let user = UserId::new();
        let session = store.create(new_session(&clock, user, "t1")).await.unwrap();

        assert_eq!(session.created_at, clock.now());
        assert_eq!(session.last_access_at, clock.now());
        assert_eq!(session.expires_at, clock.now() + Duration::days(7));
        assert!(session.is_active);
        assert_eq!(session.user_id, user);
    }

    #[tokio::test]
    async fn test_device_info_truncated() {
        let (store, clock) = store();
        let mut new = new_session(&clock, UserId::new(), "t1");
        new.device_info = Some("x".repeat(250));
        let session = store.create(new).await.unwrap();
        assert_eq!(
            session.device_info.unwrap().len(),
            MAX_DEVICE_INFO_LENGTH
        );
    }

    #[tokio::test]
    async fn test_expired_session_unreachable_until_reaped() {
        let (store, clock) = store();
        let session = store
            .create(new_session(&clock, UserId::new(), "t1"))
            .await
            .unwrap();
        assert!(store.find_by_token("t1").await.unwrap().is_some());

        clock.advance(Duration::days(7) + Duration::seconds(1));

        assert!(store.find_by_token("t1").await.unwrap().is_none());
        assert!(store.find_by_refresh_token("t1-refresh").await.unwrap().is_none());
        assert!(store.find_by_session_id(session.id).await.unwrap().is_none());
        assert!(store.find_active_by_user_id(session.user_id).await.unwrap().is_none());
        assert_eq!(store.len(), 1);

        assert_eq!(store.delete_expired_sessions().await.unwrap(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_deactivate_session() {
        let (store, clock) = store();
        let session = store
            .create(new_session(&clock, UserId::new(), "t1"))
            .await
            .unwrap();
        store.deactivate_session(session.id).await.unwrap();

        assert!(store.find_by_session_id(session.id).await.unwrap().is_none());
        assert!(store.get_raw(session.id).is_some());
    }

    #[tokio::test]
    async fn test_deactivate_all_user_sessions() {
        let (store, clock) = store();
        let user = UserId::new();
        let other = UserId::new();
        let a = store.create(new_session(&clock, user, "a")).await.unwrap();
        let b = store.create(new_session(&clock, user, "b")).await.unwrap();
        let c = store.create(new_session(&clock, other, "c")).await.unwrap();

        assert_eq!(store.deactivate_all_user_sessions(user).await.unwrap(), 2);

        assert!(store.find_by_session_id(a.id).await.unwrap().is_none());
        assert!(store.find_by_session_id(b.id).await.unwrap().is_none());
        assert!(store.find_by_token("b").await.unwrap().is_none());
        assert!(store.find_active_by_user_id(user).await.unwrap().is_none());
        assert!(store.find_by_session_id(c.id).await.unwrap().is_some());

        // Nothing left to revoke.
        assert_eq!(store.deactivate_all_user_sessions(user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_touch_does_not_extend_expiry() {
        let (store, clock) = store();
        let session = store
            .create(new_session(&clock, UserId::new(), "t1"))
            .await
            .unwrap();
        clock.advance(Duration::hours(3));
        store.update_last_access(session.id).await.unwrap();

        let touched = store.find_by_session_id(session.id).await.unwrap().unwrap();
        assert_eq!(touched.last_access_at, clock.now());
        assert_eq!(touched.expires_at, session.expires_at);
    }

    #[tokio::test]
    async fn test_token_rotation() {
        let (store, clock) = store();
        let session = store
            .create(new_session(&clock, UserId::new(), "old"))
            .await
            .unwrap();
        clock.advance(Duration::minutes(20));

        store.update_token(session.id, "new").await.unwrap();
        store.update_refresh_token(session.id, "new-refresh").await.unwrap();

        assert!(store.find_by_token("old").await.unwrap().is_none());
        assert!(store.find_by_refresh_token("old-refresh").await.unwrap().is_none());
        let rotated = store.find_by_token("new").await.unwrap().unwrap();
        assert_eq!(rotated.id, session.id);
        assert_eq!(rotated.refresh_token, "new-refresh");
        assert_eq!(rotated.last_access_at, clock.now());
    }

    #[tokio::test]
    async fn test_reaper_removes_revoked_and_keeps_alive() {
        let (store, clock) = store();
        let keep = store.create(new_session(&clock, UserId::new(), "k")).await.unwrap();
        let revoked = store.create(new_session(&clock, UserId::new(), "r")).await.unwrap();
        store.deactivate_session(revoked.id).await.unwrap();

        assert_eq!(store.delete_expired_sessions().await.unwrap(), 1);
        assert!(store.get_raw(keep.id).is_some());
        assert!(store.get_raw(revoked.id).is_none());
    }

    #[tokio::test]
    async fn test_empty_token_never_matches() {
        let (store, clock) = store();
        let mut new = new_session(&clock, UserId::new(), "");
        new.refresh_token = String::new();
        store.create(new).await.unwrap();
        assert!(store.find_by_token("").await.unwrap().is_none());
        assert!(store.find_by_refresh_token("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rotate_tokens_is_compare_and_swap() {
        let (store, clock) = store();
        let session = store
            .create(new_session(&clock, UserId::new(), "a0"))
            .await
            .unwrap();
        clock.advance(Duration::minutes(1));

        assert!(!store.rotate_tokens(session.id, "stale", "a1", "r1").await.unwrap());
        assert!(store.find_by_token("a0").await.unwrap().is_some());

        assert!(store.rotate_tokens(session.id, "a0-refresh", "a1", "r1").await.unwrap());
        let rotated = store.find_by_session_id(session.id).await.unwrap().unwrap();
        assert_eq!(rotated.token, "a1");
        assert_eq!(rotated.refresh_token, "r1");
        assert_eq!(rotated.last_access_at, clock.now());

        // The old refresh token no longer matches.
        assert!(!store.rotate_tokens(session.id, "a0-refresh", "a2", "r2").await.unwrap());

        store.deactivate_session(session.id).await.unwrap();
        assert!(!store.rotate_tokens(session.id, "r1", "a3", "r3").await.unwrap());
        assert!(!store.rotate_tokens(SessionId::new(), "r1", "a3", "r3").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_active_by_user_prefers_earliest_alive() {
        let (store, clock) = store();
        let user = UserId::new();
        let first = store.create(new_session(&clock, user, "first")).await.unwrap();
        clock.advance(Duration::minutes(10));
        let second = store.create(new_session(&clock, user, "second")).await.unwrap();
        store.create(new_session(&clock, UserId::new(), "other")).await.unwrap();

        let found = store.find_active_by_user_id(user).await.unwrap().unwrap();
        assert_eq!(found.id, first.id);

        store.deactivate_session(first.id).await.unwrap();
        let found = store.find_active_by_user_id(user).await.unwrap().unwrap();
        assert_eq!(found.id, second.id);
    }
}

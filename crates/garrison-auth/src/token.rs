//! Typed token minting and verification.
//!
//! Fixes the payload shapes so callers cannot mint a token without its
//! session binding; signing itself is delegated to a [`TokenSigner`].

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use serde::de::DeserializeOwned;

use garrison_core::Clock;
use garrison_core::config::AuthConfig;
use garrison_core::error::AppError;
use garrison_core::result::AppResult;
use garrison_core::traits::{TokenKind, TokenSigner};
use garrison_entity::session::{AccessTokenPayload, RefreshTokenPayload, TokenPair};

/// Mints and verifies access and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenService {
    /// Underlying signing capability.
    signer: Arc<dyn TokenSigner>,
    /// Access token lifetime.
    access_ttl: Duration,
    /// Refresh token lifetime.
    refresh_ttl: Duration,
    /// Time source for the reported expiries.
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Creates a token service with lifetimes from configuration.
    pub fn new(
        signer: Arc<dyn TokenSigner>,
        config: &AuthConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            signer,
            access_ttl: Duration::minutes(config.access_token_ttl_minutes as i64),
            refresh_ttl: Duration::days(config.refresh_token_ttl_days as i64),
            clock,
        }
    }

    /// Signs an access token.
    pub fn generate_access_token(&self, payload: &AccessTokenPayload) -> AppResult<String> {
        self.sign(TokenKind::Access, payload, self.access_ttl)
    }

    /// Signs a refresh token.
    pub fn generate_refresh_token(&self, payload: &RefreshTokenPayload) -> AppResult<String> {
        self.sign(TokenKind::Refresh, payload, self.refresh_ttl)
    }

    /// Signs both tokens for one session.
    pub fn generate_pair(&self, payload: &AccessTokenPayload) -> AppResult<TokenPair> {
        let now = self.clock.now();
        let refresh = RefreshTokenPayload {
            user_id: payload.user_id,
            session_id: payload.session_id,
        };

        Ok(TokenPair {
            access_token: self.generate_access_token(payload)?,
            refresh_token: self.generate_refresh_token(&refresh)?,
            access_expires_at: now + self.access_ttl,
            refresh_expires_at: now + self.refresh_ttl,
        })
    }

    /// Verifies an access token and decodes its payload.
    pub fn verify_access_token(&self, token: &str) -> AppResult<AccessTokenPayload> {
        self.verify(TokenKind::Access, token)
    }

    /// Verifies a refresh token and decodes its payload.
    pub fn verify_refresh_token(&self, token: &str) -> AppResult<RefreshTokenPayload> {
        self.verify(TokenKind::Refresh, token)
    }

    fn sign<T: Serialize>(&self, kind: TokenKind, payload: &T, ttl: Duration) -> AppResult<String> {
        match serde_json::to_value(payload)? {
            serde_json::Value::Object(map) => self.signer.sign(kind, map, ttl),
            _ => Err(AppError::internal("Token payload must be a JSON object")),
        }
    }

    fn verify<T: DeserializeOwned>(&self, kind: TokenKind, token: &str) -> AppResult<T> {
        let map = self.signer.verify(kind, token)?;
        serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|_| AppError::authentication("Invalid token payload"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtSigner;
    use garrison_core::error::ErrorKind;
    use garrison_core::types::{SessionId, UserId};
    use garrison_entity::user::UserRole;
    use serde_json::json;

    use garrison_core::ManualClock;

    fn service_with(clock: ManualClock) -> TokenService {
        let config = AuthConfig::default();
        let clock: Arc<dyn Clock> = Arc::new(clock);
        let signer = Arc::new(JwtSigner::new(&config, clock.clone()).unwrap());
        TokenService::new(signer, &config, clock)
    }

    fn service() -> TokenService {
        service_with(ManualClock::starting_now())
    }

    fn access_payload() -> AccessTokenPayload {
        AccessTokenPayload {
            user_id: UserId::new(),
            session_id: SessionId::new(),
            role: UserRole::Manager,
            military_id: "20231234".to_string(),
        }
    }

    #[test]
    fn test_access_token_carries_payload() {
        let service = service();
        let payload = access_payload();
        let token = service.generate_access_token(&payload).unwrap();
        assert_eq!(service.verify_access_token(&token).unwrap(), payload);
    }

    #[test]
    fn test_pair_binds_same_session() {
        let service = service();
        let payload = access_payload();
        let pair = service.generate_pair(&payload).unwrap();

        let refresh = service.verify_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.session_id, payload.session_id);
        assert_eq!(refresh.user_id, payload.user_id);
        assert!(pair.refresh_expires_at > pair.access_expires_at);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let service = service();
        let pair = service.generate_pair(&access_payload()).unwrap();
        let err = service.verify_access_token(&pair.refresh_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_foreign_payload_shape_rejected() {
        let config = AuthConfig::default();
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::starting_now());
        let signer = Arc::new(JwtSigner::new(&config, clock.clone()).unwrap());
        let service = TokenService::new(signer.clone(), &config, clock);
        let odd = json!({"userId": "x"}).as_object().cloned().unwrap();
        let token = signer
            .sign(TokenKind::Access, odd, Duration::minutes(1))
            .unwrap();

        let err = service.verify_access_token(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Invalid token payload");
    }

    #[test]
    fn test_pair_expiries_follow_injected_clock() {
        let clock = ManualClock::starting_now();
        let service = service_with(clock.clone());
        clock.advance(Duration::days(3));

        let pair = service.generate_pair(&access_payload()).unwrap();
        assert_eq!(pair.access_expires_at, clock.now() + Duration::minutes(15));
        assert_eq!(pair.refresh_expires_at, clock.now() + Duration::days(7));

        clock.advance(Duration::minutes(16));
        let err = service.verify_access_token(&pair.access_token).unwrap_err();
        assert_eq!(err.message, "Token has expired");
        assert!(service.verify_refresh_token(&pair.refresh_token).is_ok());
    }
}

//! JWT signing and verification.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use garrison_core::Clock;
use garrison_core::config::AuthConfig;
use garrison_core::error::AppError;
use garrison_core::result::AppResult;
use garrison_core::traits::{TokenKind, TokenSigner};

use super::claims::Claims;

/// Clock skew tolerated when checking `exp`, in seconds.
const LEEWAY_SECONDS: i64 = 5;

/// Claim names owned by the envelope; a payload may not set them.
const RESERVED_CLAIMS: [&str; 4] = ["typ", "iat", "exp", "jti"];

/// Key material for one token kind.
#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Signs access and refresh tokens with separate HMAC secrets.
///
/// `iat` and `exp` are stamped and checked against the injected clock,
/// the same one sessions expire by.
#[derive(Clone)]
pub struct JwtSigner {
    /// Keys for access tokens.
    access: KeyPair,
    /// Keys for refresh tokens.
    refresh: KeyPair,
    /// Validation configuration.
    validation: Validation,
    /// Time source for `iat`/`exp`.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtSigner {
    /// Creates a signer from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        config.validate()?;

        // `exp` is checked in `verify` against the injected clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        Ok(Self {
            access: KeyPair::from_secret(&config.jwt_access_secret),
            refresh: KeyPair::from_secret(&config.jwt_refresh_secret),
            validation,
            clock,
        })
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}

impl TokenSigner for JwtSigner {
    fn sign(
        &self,
        kind: TokenKind,
        payload: serde_json::Map<String, serde_json::Value>,
        ttl: chrono::Duration,
    ) -> AppResult<String> {
        if let Some(reserved) = RESERVED_CLAIMS.iter().find(|name| payload.contains_key(**name)) {
            return Err(AppError::internal(format!(
                "Payload may not set reserved claim '{reserved}'"
            )));
        }

        let now = self.clock.now();
        let claims = Claims {
            typ: kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
            payload,
        };

        encode(&Header::default(), &claims, &self.keys(kind).encoding)
            .map_err(|e| AppError::internal(format!("Failed to encode {kind} token: {e}")))
    }

    fn verify(
        &self,
        kind: TokenKind,
        token: &str,
    ) -> AppResult<serde_json::Map<String, serde_json::Value>> {
        let token_data = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication("Invalid token"),
            })?;

        if token_data.claims.exp + LEEWAY_SECONDS < self.clock.now().timestamp() {
            return Err(AppError::authentication("Token has expired"));
        }

        if token_data.claims.typ != kind {
            return Err(AppError::authentication(format!(
                "Invalid token type: expected {kind} token"
            )));
        }

        Ok(token_data.claims.payload)
    }
}

//! # garrison-auth
//!
//! Authentication and session lifecycle for Garrison.
//!
//! ## Modules
//!
//! - `rate_limit`: sliding-window login attempt limiter with a fixed block
//! - `session`: session store contract, in-memory store, reaper, and the login/refresh flows
//! - `token` / `jwt`: typed token minting over an HS256 signer
//! - `password`: Argon2id hashing and new-password policy
//! - `authentication`: credential verification with a uniform failure
//! - `logout`: bulk session revocation
//! - `directory`: identity and credential repositories
//! - `input`: credential and id sanitization
//! - `audit`: audit trail sinks
//! - `maintenance`: periodic limiter and session sweeps

pub mod audit;
pub mod authentication;
pub mod directory;
pub mod input;
pub mod jwt;
pub mod logout;
pub mod maintenance;
pub mod password;
pub mod rate_limit;
pub mod session;
pub mod token;

#[cfg(test)]
mod testing;

pub use audit::{AuditEvent, MemoryAuditLogger, TracingAuditLogger};
pub use authentication::AuthenticationService;
pub use directory::{CredentialRepository, IdentityRepository, MemoryDirectory};
pub use input::{DefaultInputPolicy, InputPolicy};
pub use jwt::{Claims, JwtSigner};
pub use logout::LogoutService;
pub use maintenance::MaintenanceRunner;
pub use password::{Argon2PasswordHasher, PasswordValidator};
pub use rate_limit::{BLOCK_DURATION_MINUTES, RateLimitStatus, RateLimiter};
pub use session::{
    Authorization, LoginContext, LoginResult, MemorySessionStore, SessionCleanup, SessionManager,
    SessionStore,
};
pub use token::TokenService;

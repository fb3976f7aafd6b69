//! # garrison-entity
//!
//! Domain records used by the authentication subsystem: the personnel
//! identity, the login account holding the password hash, the principal
//! handed back after a successful login, sessions, and token payloads.

pub mod credentials;
pub mod personnel;
pub mod session;
pub mod user;

pub use credentials::LoginCredentials;
pub use personnel::Personnel;
pub use session::{AccessTokenPayload, NewSession, RefreshTokenPayload, Session, TokenPair};
pub use user::{AuthenticatedUser, UserAccount, UserRole};

//! External capability traits consumed by the authentication subsystem.
//!
//! None of these traits names a concrete cryptography or storage library;
//! implementations are injected at construction time.

pub mod audit;
pub mod password;
pub mod token;

pub use audit::AuditLogger;
pub use password::PasswordHasher;
pub use token::{TokenKind, TokenSigner};

//! Session persistence, reaping, and the login/refresh/authorize flows.

pub mod cleanup;
pub mod manager;
pub mod memory;
pub mod store;

pub use cleanup::SessionCleanup;
pub use manager::{Authorization, LoginContext, LoginResult, SessionManager};
pub use memory::MemorySessionStore;
pub use store::SessionStore;

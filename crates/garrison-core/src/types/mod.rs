//! Shared value types.

pub mod id;

pub use id::{PersonnelId, SessionId, UserId};

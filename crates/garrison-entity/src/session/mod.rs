//! Session entities and token payloads.

pub mod model;
pub mod token;

pub use model::{MAX_DEVICE_INFO_LENGTH, NewSession, Session, truncate_device_info};
pub use token::{AccessTokenPayload, RefreshTokenPayload, TokenPair};

//! # garrison-core
//!
//! Core crate for Garrison. Contains configuration schemas, typed
//! identifiers, the clock capability, the external capability traits
//! consumed by the authentication subsystem, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Garrison crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AppError, ErrorKind};
pub use result::AppResult;

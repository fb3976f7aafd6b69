//! Brute-force protection for login attempts.
//!
//! Single-node only: the attempt table lives in process memory. A
//! multi-node deployment needs a shared store behind the same contract.

pub mod limiter;

pub use limiter::{BLOCK_DURATION_MINUTES, RateLimitStatus, RateLimiter};

//! Login attempt limiting configuration.

use serde::{Deserialize, Serialize};

/// Login attempt limiting configuration.
///
/// The block duration applied once the threshold is reached is not
/// configurable; see `garrison_auth::rate_limit::BLOCK_DURATION_MINUTES`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Failed login attempts allowed inside the window.
    #[serde(default = "default_max_attempts")]
    pub login_max_attempts: u32,
    /// Sliding window length in seconds.
    #[serde(default = "default_window")]
    pub login_window_seconds: u64,
    /// Interval between attempt-table sweeps in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_max_attempts: default_max_attempts(),
            login_window_seconds: default_window(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

impl RateLimitConfig {
    /// The login window as a chrono duration.
    pub fn login_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.login_window_seconds as i64)
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_window() -> u64 {
    900
}

fn default_cleanup_interval() -> u64 {
    300
}

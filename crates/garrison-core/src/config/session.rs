//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hard session lifetime in days, fixed at login.
    #[serde(default = "default_lifetime")]
    pub lifetime_days: u64,
    /// Interval for the expired/revoked session reaper in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime_days: default_lifetime(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

impl SessionConfig {
    /// The session lifetime as a chrono duration.
    pub fn lifetime(&self) -> chrono::Duration {
        chrono::Duration::days(self.lifetime_days as i64)
    }
}

fn default_lifetime() -> u64 {
    7
}

fn default_cleanup_interval() -> u64 {
    15
}

//! Periodic sweeps of the rate limiter and the session table.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use garrison_core::config::{RateLimitConfig, SessionConfig};

use crate::rate_limit::RateLimiter;
use crate::session::SessionCleanup;

/// Runs [`RateLimiter::cleanup`] and the session reaper on fixed intervals.
#[derive(Debug, Clone)]
pub struct MaintenanceRunner {
    /// Limiter whose idle keys are swept.
    rate_limiter: RateLimiter,
    /// Session reaper.
    session_cleanup: SessionCleanup,
    /// Period between limiter sweeps.
    rate_limit_interval: Duration,
    /// Period between session sweeps.
    session_interval: Duration,
}

impl MaintenanceRunner {
    /// Creates a runner with intervals from configuration.
    pub fn new(
        rate_limiter: RateLimiter,
        session_cleanup: SessionCleanup,
        rate_limit_config: &RateLimitConfig,
        session_config: &SessionConfig,
    ) -> Self {
        Self {
            rate_limiter,
            session_cleanup,
            rate_limit_interval: Duration::from_secs(
                rate_limit_config.cleanup_interval_seconds.max(1),
            ),
            session_interval: Duration::from_secs(
                session_config.cleanup_interval_minutes.max(1) * 60,
            ),
        }
    }

    /// Sweeps until `cancel` turns `true` or its sender is dropped.
    ///
    /// Both sweeps run once immediately on start.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            rate_limit_interval_secs = self.rate_limit_interval.as_secs(),
            session_interval_secs = self.session_interval.as_secs(),
            "Maintenance runner started"
        );

        let mut limiter_tick = time::interval(self.rate_limit_interval);
        limiter_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut session_tick = time::interval(self.session_interval);
        session_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                _ = limiter_tick.tick() => {
                    let removed = self.rate_limiter.cleanup();
                    debug!(removed = removed, "Rate limiter sweep finished");
                }
                _ = session_tick.tick() => {
                    if let Err(e) = self.session_cleanup.run_cleanup().await {
                        error!(error = %e, "Session sweep failed");
                    }
                }
            }
        }

        info!("Maintenance runner stopped");
    }
}

//! Sliding-window attempt limiter with a fixed-length block.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, warn};

use garrison_core::Clock;

/// How long a key stays blocked once it reaches the threshold.
///
/// Deliberately independent of the window passed to
/// [`RateLimiter::check_limit`].
pub const BLOCK_DURATION_MINUTES: i64 = 15;

/// Keys with no attempt this recent (and no live block) are swept.
const IDLE_RETENTION_MINUTES: i64 = 60;

/// Attempt history for one key.
#[derive(Debug, Default)]
struct AttemptRecord {
    /// Attempt timestamps, oldest first.
    attempts: Vec<DateTime<Utc>>,
    /// Set when the threshold is reached; dominates window counting.
    blocked_until: Option<DateTime<Utc>>,
}

impl AttemptRecord {
    /// Drops attempts at or before `cutoff`.
    fn prune(&mut self, cutoff: DateTime<Utc>) {
        self.attempts.retain(|at| *at > cutoff);
    }

    /// The block expiry, if still in the future.
    fn active_block(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.blocked_until.filter(|until| *until > now)
    }

    fn count(&self) -> u32 {
        u32::try_from(self.attempts.len()).unwrap_or(u32::MAX)
    }
}

/// Outcome of [`RateLimiter::check_limit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    /// Whether the caller may proceed.
    pub allowed: bool,
    /// Attempts left before the key is blocked.
    pub remaining_attempts: u32,
    /// When the caller's situation next changes: block expiry if blocked,
    /// otherwise the end of the current window.
    pub reset_time: DateTime<Utc>,
    /// Attempts currently on record for the key.
    pub total_attempts: u32,
}

/// Per-key attempt tracker.
///
/// Recording and deciding are separate: [`record_attempt`] only appends,
/// [`check_limit`] evaluates the threshold and sets the block. Every
/// read-prune-write runs under the map's per-key entry lock, so
/// concurrent callers never lose or double-count an attempt.
///
/// [`record_attempt`]: RateLimiter::record_attempt
/// [`check_limit`]: RateLimiter::check_limit
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Attempt history keyed by caller-chosen key.
    records: Arc<DashMap<String, AttemptRecord>>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Creates an empty limiter.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Decides whether `key` may make another attempt.
    ///
    /// Sets a block of [`BLOCK_DURATION_MINUTES`] when the attempts inside
    /// `window` have reached `max_attempts`.
    pub fn check_limit(&self, key: &str, max_attempts: u32, window: Duration) -> RateLimitStatus {
        let now = self.clock.now();
        let mut record = self.records.entry(key.to_string()).or_default();

        if let Some(until) = record.active_block(now) {
            return RateLimitStatus {
                allowed: false,
                remaining_attempts: 0,
                reset_time: until,
                total_attempts: record.count(),
            };
        }

        record.blocked_until = None;
        record.prune(now - window);
        let count = record.count();

        if count >= max_attempts {
            let until = now + Duration::minutes(BLOCK_DURATION_MINUTES);
            record.blocked_until = Some(until);
            warn!(
                key = %key,
                attempts = count,
                blocked_until = %until,
                "Attempt threshold reached, key blocked"
            );
            return RateLimitStatus {
                allowed: false,
                remaining_attempts: 0,
                reset_time: until,
                total_attempts: count,
            };
        }

        RateLimitStatus {
            allowed: true,
            remaining_attempts: max_attempts - count,
            reset_time: now + window,
            total_attempts: count,
        }
    }

    /// Appends an attempt for `key` and prunes its history to `window`.
    pub fn record_attempt(&self, key: &str, window: Duration) {
        let now = self.clock.now();
        let mut record = self.records.entry(key.to_string()).or_default();
        record.attempts.push(now);
        record.prune(now - window);
        debug!(key = %key, attempts = record.count(), "Attempt recorded");
    }

    /// Forgets all history and any block for `key`.
    pub fn reset(&self, key: &str) {
        self.records.remove(key);
    }

    /// Whether `key` is inside an active block.
    pub fn is_blocked(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.records
            .get(key)
            .is_some_and(|record| record.active_block(now).is_some())
    }

    /// Drops keys idle for an hour with no active block.
    ///
    /// Meant to be called periodically; returns the number of keys removed.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let idle_cutoff = now - Duration::minutes(IDLE_RETENTION_MINUTES);
        let before = self.records.len();

        self.records.retain(|_, record| {
            record.active_block(now).is_some() || record.attempts.iter().any(|at| *at > idle_cutoff)
        });

        let removed = before.saturating_sub(self.records.len());
        if removed > 0 {
            debug!(removed = removed, "Swept idle attempt records");
        }
        removed
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.records.len()
    }
}

//! Expired and revoked session reaping.

use std::sync::Arc;

use tracing::{debug, error, info};

use garrison_core::error::AppError;

use super::store::SessionStore;

/// Physically deletes sessions that alive-only lookups already hide.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    /// Session store to sweep.
    session_store: Arc<dyn SessionStore>,
}

impl SessionCleanup {
    /// Creates a new session cleanup handler.
    pub fn new(session_store: Arc<dyn SessionStore>) -> Self {
        Self { session_store }
    }

    /// Runs one sweep, deleting every expired or inactive session.
    ///
    /// Returns the number of sessions removed.
    pub async fn run_cleanup(&self) -> Result<u64, AppError> {
        let removed = match self.session_store.delete_expired_sessions().await {
            Ok(removed) => removed,
            Err(e) => {
                error!(error = %e, "Session cleanup failed");
                return Err(e);
            }
        };

        if removed == 0 {
            debug!("No expired or revoked sessions to clean up");
        } else {
            info!(removed = removed, "Session cleanup completed");
        }

        Ok(removed)
    }
}

//! Audit trail sinks for login and session events.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{info, warn};

use garrison_core::traits::AuditLogger;

/// Emits audit events as structured `tracing` records on the `audit` target.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditLogger;

impl TracingAuditLogger {
    /// Creates a new audit logger.
    pub fn new() -> Self {
        Self
    }
}

impl AuditLogger for TracingAuditLogger {
    fn log_login(
        &self,
        success: bool,
        user_id: &str,
        session_id: Option<&str>,
        metadata: Option<Value>,
    ) {
        let metadata = metadata.unwrap_or(Value::Null);
        if success {
            info!(
                target: "audit",
                action = "login",
                success = true,
                user_id = %user_id,
                session_id = session_id.unwrap_or_default(),
                metadata = %metadata,
                "Login succeeded"
            );
        } else {
            warn!(
                target: "audit",
                action = "login",
                success = false,
                user_id = %user_id,
                session_id = session_id.unwrap_or_default(),
                metadata = %metadata,
                "Login failed"
            );
        }
    }

    fn log_login_blocked(&self, identifier: &str, session_id: Option<&str>, reason: &str) {
        warn!(
            target: "audit",
            action = "login_blocked",
            identifier = %identifier,
            session_id = session_id.unwrap_or_default(),
            reason = %reason,
            "Login blocked"
        );
    }

    fn log_logout(&self, user_id: &str) {
        info!(target: "audit", action = "logout", user_id = %user_id, "User logged out");
    }

    fn log_token_refresh(&self, user_id: &str) {
        info!(target: "audit", action = "token_refresh", user_id = %user_id, "Token refreshed");
    }

    fn log_access_denied(
        &self,
        user_id: &str,
        resource: &str,
        reason: &str,
        metadata: Option<Value>,
    ) {
        warn!(
            target: "audit",
            action = "access_denied",
            user_id = %user_id,
            resource = %resource,
            reason = %reason,
            metadata = %metadata.unwrap_or(serde_json::Value::Null),
            "Access denied"
        );
    }

    fn log_suspicious_activity(&self, identifier: &str, activity_type: &str, details: Value) {
        warn!(
            target: "audit",
            action = "suspicious_activity",
            identifier = %identifier,
            activity_type = %activity_type,
            details = %details,
            "Suspicious activity detected"
        );
    }
}

/// One recorded audit call.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditEvent {
    /// `log_login`.
    Login {
        success: bool,
        user_id: String,
        session_id: Option<String>,
        metadata: Option<Value>,
    },
    /// `log_login_blocked`.
    LoginBlocked {
        identifier: String,
        session_id: Option<String>,
        reason: String,
    },
    /// `log_logout`.
    Logout { user_id: String },
    /// `log_token_refresh`.
    TokenRefresh { user_id: String },
    /// `log_access_denied`.
    AccessDenied {
        user_id: String,
        resource: String,
        reason: String,
        metadata: Option<Value>,
    },
    /// `log_suspicious_activity`.
    SuspiciousActivity {
        identifier: String,
        activity_type: String,
        details: Value,
    },
}

/// Keeps audit events in memory so they can be inspected.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLogger {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditLogger {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn push(&self, event: AuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

impl AuditLogger for MemoryAuditLogger {
    fn log_login(
        &self,
        success: bool,
        user_id: &str,
        session_id: Option<&str>,
        metadata: Option<Value>,
    ) {
        self.push(AuditEvent::Login {
            success,
            user_id: user_id.to_string(),
            session_id: session_id.map(str::to_string),
            metadata,
        });
    }

    fn log_login_blocked(&self, identifier: &str, session_id: Option<&str>, reason: &str) {
        self.push(AuditEvent::LoginBlocked {
            identifier: identifier.to_string(),
            session_id: session_id.map(str::to_string),
            reason: reason.to_string(),
        });
    }

    fn log_logout(&self, user_id: &str) {
        self.push(AuditEvent::Logout {
            user_id: user_id.to_string(),
        });
    }

    fn log_token_refresh(&self, user_id: &str) {
        self.push(AuditEvent::TokenRefresh {
            user_id: user_id.to_string(),
        });
    }

    fn log_access_denied(
        &self,
        user_id: &str,
        resource: &str,
        reason: &str,
        metadata: Option<Value>,
    ) {
        self.push(AuditEvent::AccessDenied {
            user_id: user_id.to_string(),
            resource: resource.to_string(),
            reason: reason.to_string(),
            metadata,
        });
    }

    fn log_suspicious_activity(&self, identifier: &str, activity_type: &str, details: Value) {
        self.push(AuditEvent::SuspiciousActivity {
            identifier: identifier.to_string(),
            activity_type: activity_type.to_string(),
            details,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_logger_records_in_order() {
        let audit = MemoryAuditLogger::new();
        audit.log_login(false, "1234", None, Some(json!({ "ip": "10.0.0.1" })));
        audit.log_logout("u-1");

        let events = audit.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            AuditEvent::Login {
                success: false,
                user_id: "1234".into(),
                session_id: None,
                metadata: Some(json!({ "ip": "10.0.0.1" })),
            }
        );
        assert_eq!(events[1], AuditEvent::Logout { user_id: "u-1".into() });
    }

    #[test]
    fn test_tracing_logger_does_not_panic_without_subscriber() {
        let audit = TracingAuditLogger::new();
        audit.log_login(true, "u-1", Some("s-1"), None);
        audit.log_login_blocked("login:1234", None, "rate limited");
        audit.log_token_refresh("u-1");
        audit.log_access_denied("u-1", "session", "expired", None);
        audit.log_suspicious_activity("1234", "brute_force", json!({ "attempts": 5 }));
    }
}

//! Audit trail capability.

/// Records security-relevant events around the login and session flows.
///
/// Implementations carry no business logic and must never fail the flow
/// they observe. Secrets must never be passed in `metadata`.
pub trait AuditLogger: Send + Sync + std::fmt::Debug + 'static {
    /// A login attempt finished.
    fn log_login(
        &self,
        success: bool,
        user_id: &str,
        session_id: Option<&str>,
        metadata: Option<serde_json::Value>,
    );

    /// A login attempt was rejected before credentials were checked.
    fn log_login_blocked(&self, identifier: &str, session_id: Option<&str>, reason: &str);

    /// A user's sessions were revoked.
    fn log_logout(&self, user_id: &str);

    /// A refresh token was exchanged for a new pair.
    fn log_token_refresh(&self, user_id: &str);

    /// A request presenting a credential was refused.
    fn log_access_denied(
        &self,
        user_id: &str,
        resource: &str,
        reason: &str,
        metadata: Option<serde_json::Value>,
    );

    /// Something looked like an attack (threshold crossed, token reuse).
    fn log_suspicious_activity(
        &self,
        identifier: &str,
        activity_type: &str,
        details: serde_json::Value,
    );
}

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde_json::Value;

/// Append-only audit trail entry
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Acting user; `None` for anonymous public actions
    pub actor: Option<UserId>,
    pub action: &'static str,
    pub resource_type: &'static str,
    pub resource_id: String,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub const ONBOARDING_COMPLETE: &'static str = "worker_onboarding_complete";
    pub const FACE_VERIFICATION: &'static str = "face_verification";
    pub const POLICE_VERIFICATION: &'static str = "police_verification";
    pub const INCIDENT_LOGGED: &'static str = "incident_logged";
    pub const WORKER_SUSPENDED: &'static str = "worker_suspended";
    pub const COMPLAINT_FILED: &'static str = "complaint_filed";
    pub const QR_REGENERATED: &'static str = "qr_regenerated";
    pub const WORKER_BLACKLISTED: &'static str = "worker_blacklisted";
    pub const WORKER_STATUS_OVERRIDE: &'static str = "worker_status_override";

    pub fn new(
        actor: Option<UserId>,
        action: &'static str,
        resource_type: &'static str,
        resource_id: impl ToString,
        details: Value,
    ) -> Self {
        Self {
            actor,
            action,
            resource_type,
            resource_id: resource_id.to_string(),
            details,
            created_at: Utc::now(),
        }
    }
}

/// A stored audit entry as read back for administrators
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub id: i64,
    pub actor: Option<UserId>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

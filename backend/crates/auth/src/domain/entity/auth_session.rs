//! Auth Session Entity
//!
//! Server-side session referenced by the signed token in the cookie or
//! bearer header.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{AuthSessionId, UserId};
use platform::client::ClientFingerprint;

use crate::domain::value_object::user_role::UserRole;

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: AuthSessionId,
    pub user_id: UserId,
    /// Role at session creation
    pub user_role: UserRole,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// SHA-256 of the User-Agent the session was created with
    pub client_fingerprint_hash: Vec<u8>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn new(
        user_id: UserId,
        user_role: UserRole,
        fingerprint: &ClientFingerprint,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            session_id: AuthSessionId::new(),
            user_id,
            user_role,
            expires_at_ms: (now + ttl).timestamp_millis(),
            client_fingerprint_hash: fingerprint.hash_vec(),
            client_ip: fingerprint.ip_string(),
            user_agent: fingerprint.user_agent.clone(),
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }
}

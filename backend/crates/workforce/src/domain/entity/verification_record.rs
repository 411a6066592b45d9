use chrono::{DateTime, Duration, Utc};
use kernel::id::{OfficerId, VerificationId, WorkerId};

use crate::domain::value_object::status::{Decision, VerificationStatus};

/// Free-text details an officer attaches to a decision
#[derive(Debug, Clone, Default)]
pub struct DecisionDetails {
    pub remarks: Option<String>,
    pub rejection_reason: Option<String>,
    /// Reference in an external police system, stored as given
    pub external_ref: Option<String>,
    pub external_system: Option<String>,
    pub certificate_number: Option<String>,
    pub certificate_url: Option<String>,
}

/// One decision or face-check event by an officer on a worker
#[derive(Debug, Clone)]
pub struct VerificationRecord {
    pub verification_id: VerificationId,
    pub worker_id: WorkerId,
    pub officer_id: OfficerId,
    pub status: VerificationStatus,
    pub details: DecisionDetails,
    pub face_match_score: Option<f64>,
    pub face_match_performed: bool,
    pub liveness_check: bool,
    pub verification_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Open record that face checks attach to before a decision
    pub fn pending(worker_id: WorkerId, officer_id: OfficerId) -> Self {
        Self {
            verification_id: VerificationId::new(),
            worker_id,
            officer_id,
            status: VerificationStatus::Pending,
            details: DecisionDetails::default(),
            face_match_score: None,
            face_match_performed: false,
            liveness_check: false,
            verification_date: None,
            expiry_date: None,
            created_at: Utc::now(),
        }
    }

    /// Record of an approve or reject decision
    ///
    /// Approvals are dated now and expire after `validity_days`.
    pub fn decision(
        worker_id: WorkerId,
        officer_id: OfficerId,
        decision: Decision,
        details: DecisionDetails,
        validity_days: i64,
    ) -> Self {
        let now = Utc::now();
        let approved = decision == Decision::Verified;
        Self {
            status: decision.verification_status(),
            details,
            verification_date: approved.then_some(now),
            expiry_date: approved.then(|| now + Duration::days(validity_days)),
            created_at: now,
            ..Self::pending(worker_id, officer_id)
        }
    }

    pub fn record_face_check(&mut self, score: f64, liveness: bool) {
        self.face_match_score = Some(score);
        self.face_match_performed = true;
        self.liveness_check = liveness;
    }

    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == VerificationStatus::Verified && self.expiry_date.is_some_and(|e| e < now)
    }
}

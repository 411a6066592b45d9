use chrono::{DateTime, Utc};
use kernel::id::{UserId, WorkerId};
use serde_json::{Map, Value};

use crate::domain::value_object::{
    status::{VerificationStatus, WorkerStatus},
    worker_category::WorkerCategory,
    worker_identifier::WorkerIdentifier,
};

/// Last onboarding step; reaching it submits the worker for review
pub const FINAL_STEP: u8 = 6;

/// Contact details of the owning user account
#[derive(Debug, Clone, Default)]
pub struct WorkerOwner {
    pub full_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

/// AePS agent details, empty for delivery workers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AepsProfile {
    pub bank_affiliation: Option<String>,
    pub bc_affiliation: Option<String>,
    pub operator_id: Option<String>,
    pub service_region: Option<String>,
    pub device_info: Option<String>,
    pub transaction_role: Option<String>,
}

/// Identifier and QR code minted on approval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCredential {
    pub identifier: WorkerIdentifier,
    /// Stored PNG path, served under `/uploads`
    pub qr_reference: String,
    /// Text encoded in the QR code
    pub qr_payload: String,
    pub verification_endpoint: String,
}

/// Identifier as shown to the worker and to officers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayIdentifier {
    Official(WorkerIdentifier),
    PendingVerification,
    NotAssigned,
}

impl DisplayIdentifier {
    pub fn label(&self) -> &str {
        match self {
            DisplayIdentifier::Official(id) => id.as_str(),
            DisplayIdentifier::PendingVerification => "Pending Verification",
            DisplayIdentifier::NotAssigned => "Not Assigned",
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            DisplayIdentifier::Official(_) => "verified",
            DisplayIdentifier::PendingVerification => "pending",
            DisplayIdentifier::NotAssigned => "not_assigned",
        }
    }
}

/// Worker aggregate
///
/// Identifier and QR fields are only populated while
/// `verification_status` is `Verified`.
#[derive(Debug, Clone)]
pub struct Worker {
    pub worker_id: WorkerId,
    pub user_id: UserId,
    pub owner: WorkerOwner,
    pub category: Option<WorkerCategory>,
    pub address_current: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub selfie_ref: Option<String>,
    pub aadhaar_reference: Option<String>,
    pub aeps: AepsProfile,
    pub consent_given: bool,
    pub consent_at: Option<DateTime<Utc>>,
    pub declaration_signed: bool,
    pub onboarding_step: u8,
    /// One entry per submitted step, keyed `step1`..`step6`
    pub onboarding_data: Map<String, Value>,
    pub status: WorkerStatus,
    pub verification_status: VerificationStatus,
    pub worker_identifier: Option<WorkerIdentifier>,
    pub qr_reference: Option<String>,
    pub qr_payload: Option<String>,
    pub verification_endpoint: Option<String>,
    pub risk_score: i32,
    pub complaint_count: i32,
    /// Set together with `blacklisted_at` by an administrator
    pub blacklist_reason: Option<String>,
    pub blacklisted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Worker {
    /// New worker from onboarding step 1
    pub fn start(user_id: UserId, owner: WorkerOwner, category: WorkerCategory) -> Self {
        let now = Utc::now();
        Self {
            worker_id: WorkerId::new(),
            user_id,
            owner,
            category: Some(category),
            address_current: None,
            city: None,
            state: None,
            pincode: None,
            selfie_ref: None,
            aadhaar_reference: None,
            aeps: AepsProfile::default(),
            consent_given: false,
            consent_at: None,
            declaration_signed: false,
            onboarding_step: 0,
            onboarding_data: Map::new(),
            status: WorkerStatus::Inactive,
            verification_status: VerificationStatus::Pending,
            worker_identifier: None,
            qr_reference: None,
            qr_payload: None,
            verification_endpoint: None,
            risk_score: 0,
            complaint_count: 0,
            blacklist_reason: None,
            blacklisted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Onboarding finished and waiting for an officer
    pub fn is_submitted(&self) -> bool {
        self.onboarding_step >= FINAL_STEP && self.status == WorkerStatus::PendingVerification
    }

    pub fn is_blacklisted(&self) -> bool {
        self.blacklisted_at.is_some()
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }

    pub fn onboarding_complete(&self) -> bool {
        self.onboarding_step >= FINAL_STEP
    }

    /// The identifier, only while verified
    pub fn official_identifier(&self) -> Option<&WorkerIdentifier> {
        self.worker_identifier.as_ref().filter(|_| self.is_verified())
    }

    /// Visible to the public lookup
    pub fn is_publicly_verifiable(&self) -> bool {
        self.official_identifier().is_some()
    }

    pub fn display_identifier(&self) -> DisplayIdentifier {
        match self.official_identifier() {
            Some(id) => DisplayIdentifier::Official(id.clone()),
            None if self.is_submitted() => DisplayIdentifier::PendingVerification,
            None => DisplayIdentifier::NotAssigned,
        }
    }

    /// Identifier as officers see it: the official one or "Pending Verification"
    pub fn review_identifier(&self) -> String {
        self.official_identifier()
            .map(|id| id.to_string())
            .unwrap_or_else(|| DisplayIdentifier::PendingVerification.label().to_string())
    }

    /// Record a submitted step and its snapshot
    pub fn record_step(&mut self, step: u8, snapshot: Value) {
        self.onboarding_step = step;
        self.onboarding_data.insert(format!("step{step}"), snapshot);
        self.updated_at = Utc::now();
    }

    /// Required fields still missing before submission
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());

        let mut missing = Vec::new();
        if self.category.is_none() {
            missing.push("category (step 1)");
        }
        if blank(&self.address_current) {
            missing.push("address (step 2)");
        }
        if blank(&self.city) {
            missing.push("city (step 2)");
        }
        if blank(&self.state) {
            missing.push("state (step 2)");
        }
        if blank(&self.pincode) {
            missing.push("pincode (step 2)");
        }
        if blank(&self.selfie_ref) {
            missing.push("selfie (step 3)");
        }
        if blank(&self.aadhaar_reference) {
            missing.push("aadhaar (step 4)");
        }
        missing
    }

    /// Final step: record consent and queue for police review
    pub fn submit(&mut self, consent_given: bool, declaration_signed: bool) {
        let now = Utc::now();
        self.consent_given = consent_given;
        self.consent_at = Some(now);
        self.declaration_signed = declaration_signed;
        self.onboarding_step = FINAL_STEP;
        self.status = WorkerStatus::PendingVerification;
        self.verification_status = VerificationStatus::Pending;
        self.clear_credential();
        self.updated_at = now;
    }

    pub fn apply_credential(&mut self, credential: &IssuedCredential) {
        self.worker_identifier = Some(credential.identifier.clone());
        self.qr_reference = Some(credential.qr_reference.clone());
        self.qr_payload = Some(credential.qr_payload.clone());
        self.verification_endpoint = Some(credential.verification_endpoint.clone());
    }

    pub fn clear_credential(&mut self) {
        self.worker_identifier = None;
        self.qr_reference = None;
        self.qr_payload = None;
        self.verification_endpoint = None;
    }
}

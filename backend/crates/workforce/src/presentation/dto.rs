//! API DTOs (Data Transfer Objects)

use auth::presentation::dto::OfficerResponse;
use chrono::{DateTime, Utc};
use kernel::id::WorkerId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::{
    FaceCheckOutput, OfficerProfileOutput, PublicWorker, QueueEntry, VerificationStatusOutput,
};
use crate::domain::entity::{
    audit_entry::AuditRecord,
    complaint::Complaint,
    incident::{Incident, IncidentListing},
    verification_record::VerificationRecord,
    worker::{IssuedCredential, Worker},
};
use crate::domain::repository::{RecentDecision, ReviewStats};

/// URL under which a stored media reference is served
pub fn media_url(reference: &str) -> String {
    format!("/{}", reference.trim_start_matches('/'))
}

fn millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

// ============================================================================
// Onboarding
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step1Request {
    pub category: String,
    pub full_name: String,
    pub mobile: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step2Request {
    pub address_current: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step3Request {
    /// Base64, with or without a data URI prefix
    pub selfie_image: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step4Request {
    pub aadhaar_reference: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Step5Request {
    pub bank_affiliation: Option<String>,
    pub bc_affiliation: Option<String>,
    pub aeps_operator_id: Option<String>,
    pub service_region: Option<String>,
    pub aeps_device_info: Option<String>,
    pub transaction_role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Step6Request {
    pub consent_given: bool,
    pub declaration_signed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResponse {
    pub success: bool,
    pub worker_id: String,
    pub next_step: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    pub worker_id: String,
    pub status: String,
    pub verification_status: String,
    pub message: &'static str,
}

// ============================================================================
// Worker self-service
// ============================================================================

/// The worker's own view of their record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerView {
    pub id: String,
    /// Official identifier, "Pending Verification" or "Not Assigned"
    pub worker_identifier: String,
    pub identifier_status: &'static str,
    pub category: Option<&'static str>,
    pub full_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address_current: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub selfie_url: Option<String>,
    pub status: &'static str,
    pub verification_status: &'static str,
    pub onboarding_step: u8,
    pub qr_code_url: Option<String>,
    pub verification_endpoint: Option<String>,
    pub risk_score: i32,
    pub complaint_count: i32,
    pub created_at: i64,
}

impl From<&Worker> for WorkerView {
    fn from(worker: &Worker) -> Self {
        let display = worker.display_identifier();
        let verified = worker.official_identifier().is_some();
        Self {
            id: worker.worker_id.to_string(),
            worker_identifier: display.label().to_string(),
            identifier_status: display.status(),
            category: worker.category.map(|c| c.code()),
            full_name: worker.owner.full_name.clone(),
            email: worker.owner.email.clone(),
            mobile: worker.owner.mobile.clone(),
            address_current: worker.address_current.clone(),
            city: worker.city.clone(),
            state: worker.state.clone(),
            pincode: worker.pincode.clone(),
            selfie_url: worker.selfie_ref.as_deref().map(media_url),
            status: worker.status.code(),
            verification_status: worker.verification_status.code(),
            onboarding_step: worker.onboarding_step,
            qr_code_url: worker
                .qr_reference
                .as_deref()
                .filter(|_| verified)
                .map(media_url),
            verification_endpoint: worker.verification_endpoint.clone().filter(|_| verified),
            risk_score: worker.risk_score,
            complaint_count: worker.complaint_count,
            created_at: millis(worker.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfileResponse {
    pub has_profile: bool,
    pub worker: Option<WorkerView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatusResponse {
    pub has_profile: bool,
    pub status: Option<&'static str>,
    pub verification_status: Option<&'static str>,
    pub worker_identifier: Option<String>,
    pub qr_code_url: Option<String>,
    pub latest_decision: Option<RecordView>,
}

impl From<Option<VerificationStatusOutput>> for VerificationStatusResponse {
    fn from(output: Option<VerificationStatusOutput>) -> Self {
        match output {
            Some(VerificationStatusOutput {
                worker,
                latest_decision,
            }) => {
                let view = WorkerView::from(&worker);
                Self {
                    has_profile: true,
                    status: Some(view.status),
                    verification_status: Some(view.verification_status),
                    worker_identifier: Some(view.worker_identifier),
                    qr_code_url: view.qr_code_url,
                    latest_decision: latest_decision.as_ref().map(Into::into),
                }
            }
            None => Self {
                has_profile: false,
                status: None,
                verification_status: None,
                worker_identifier: None,
                qr_code_url: None,
                latest_decision: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatusResponse {
    pub has_profile: bool,
    pub onboarding_step: u8,
    pub completed: bool,
    pub submitted: bool,
    pub onboarding_data: Map<String, Value>,
}

impl From<Option<&Worker>> for OnboardingStatusResponse {
    fn from(worker: Option<&Worker>) -> Self {
        match worker {
            Some(worker) => Self {
                has_profile: true,
                onboarding_step: worker.onboarding_step,
                completed: worker.onboarding_complete(),
                submitted: worker.is_submitted(),
                onboarding_data: worker.onboarding_data.clone(),
            },
            None => Self {
                has_profile: false,
                onboarding_step: 0,
                completed: false,
                submitted: false,
                onboarding_data: Map::new(),
            },
        }
    }
}

// ============================================================================
// Police review
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: String,
    pub worker_identifier: String,
    pub full_name: String,
    pub mobile: Option<String>,
    pub category: Option<&'static str>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// approved, rejected or pending
    pub status: &'static str,
    pub verification_status: &'static str,
    pub risk_score: i32,
    pub submitted_at: i64,
}

impl From<&QueueEntry> for QueueItem {
    fn from(entry: &QueueEntry) -> Self {
        let worker = &entry.worker;
        Self {
            id: worker.worker_id.to_string(),
            worker_identifier: worker.review_identifier(),
            full_name: worker.owner.full_name.clone(),
            mobile: worker.owner.mobile.clone(),
            category: worker.category.map(|c| c.code()),
            city: worker.city.clone(),
            state: worker.state.clone(),
            status: entry.status.as_str(),
            verification_status: worker.verification_status.code(),
            risk_score: worker.risk_score,
            submitted_at: millis(worker.updated_at),
        }
    }
}

/// Search hit
impl From<&Worker> for QueueItem {
    fn from(worker: &Worker) -> Self {
        QueueItem::from(&QueueEntry {
            status: crate::application::QueueStatus::of(worker),
            worker: worker.clone(),
        })
    }
}

/// Everything on file for one worker, as shown to an officer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWorkerView {
    pub id: String,
    pub user_id: String,
    /// Official identifier or "Pending Verification"
    pub worker_identifier: String,
    pub category: Option<&'static str>,
    pub full_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address_current: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub selfie_url: Option<String>,
    pub aadhaar_reference: Option<String>,
    pub bank_affiliation: Option<String>,
    pub bc_affiliation: Option<String>,
    pub aeps_operator_id: Option<String>,
    pub service_region: Option<String>,
    pub aeps_device_info: Option<String>,
    pub transaction_role: Option<String>,
    pub consent_given: bool,
    pub declaration_signed: bool,
    pub onboarding_step: u8,
    pub onboarding_data: Map<String, Value>,
    pub status: &'static str,
    pub verification_status: &'static str,
    pub qr_code_url: Option<String>,
    pub verification_endpoint: Option<String>,
    pub risk_score: i32,
    pub complaint_count: i32,
    pub blacklist_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Worker> for ReviewWorkerView {
    fn from(worker: &Worker) -> Self {
        let verified = worker.official_identifier().is_some();
        Self {
            id: worker.worker_id.to_string(),
            user_id: worker.user_id.to_string(),
            worker_identifier: worker.review_identifier(),
            category: worker.category.map(|c| c.code()),
            full_name: worker.owner.full_name.clone(),
            email: worker.owner.email.clone(),
            mobile: worker.owner.mobile.clone(),
            address_current: worker.address_current.clone(),
            city: worker.city.clone(),
            state: worker.state.clone(),
            pincode: worker.pincode.clone(),
            selfie_url: worker.selfie_ref.as_deref().map(media_url),
            aadhaar_reference: worker.aadhaar_reference.clone(),
            bank_affiliation: worker.aeps.bank_affiliation.clone(),
            bc_affiliation: worker.aeps.bc_affiliation.clone(),
            aeps_operator_id: worker.aeps.operator_id.clone(),
            service_region: worker.aeps.service_region.clone(),
            aeps_device_info: worker.aeps.device_info.clone(),
            transaction_role: worker.aeps.transaction_role.clone(),
            consent_given: worker.consent_given,
            declaration_signed: worker.declaration_signed,
            onboarding_step: worker.onboarding_step,
            onboarding_data: worker.onboarding_data.clone(),
            status: worker.status.code(),
            verification_status: worker.verification_status.code(),
            qr_code_url: worker
                .qr_reference
                .as_deref()
                .filter(|_| verified)
                .map(media_url),
            verification_endpoint: worker.verification_endpoint.clone().filter(|_| verified),
            risk_score: worker.risk_score,
            complaint_count: worker.complaint_count,
            blacklist_reason: worker.blacklist_reason.clone(),
            created_at: millis(worker.created_at),
            updated_at: millis(worker.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub id: String,
    pub officer_id: String,
    pub status: &'static str,
    pub remarks: Option<String>,
    pub rejection_reason: Option<String>,
    pub external_verification_ref: Option<String>,
    pub external_system: Option<String>,
    pub certificate_number: Option<String>,
    pub certificate_url: Option<String>,
    pub face_match_score: Option<f64>,
    pub face_match_performed: bool,
    pub liveness_check: bool,
    pub verification_date: Option<i64>,
    pub expiry_date: Option<i64>,
    pub created_at: i64,
}

impl From<&VerificationRecord> for RecordView {
    fn from(record: &VerificationRecord) -> Self {
        Self {
            id: record.verification_id.to_string(),
            officer_id: record.officer_id.to_string(),
            status: record.status.code(),
            remarks: record.details.remarks.clone(),
            rejection_reason: record.details.rejection_reason.clone(),
            external_verification_ref: record.details.external_ref.clone(),
            external_system: record.details.external_system.clone(),
            certificate_number: record.details.certificate_number.clone(),
            certificate_url: record.details.certificate_url.clone(),
            face_match_score: record.face_match_score,
            face_match_performed: record.face_match_performed,
            liveness_check: record.liveness_check,
            verification_date: record.verification_date.map(millis),
            expiry_date: record.expiry_date.map(millis),
            created_at: millis(record.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintView {
    pub id: String,
    pub complaint_number: String,
    pub category: &'static str,
    pub status: &'static str,
    pub title: String,
    pub description: String,
    pub complainant_name: Option<String>,
    pub complainant_contact: Option<String>,
    pub created_at: i64,
}

impl From<&Complaint> for ComplaintView {
    fn from(complaint: &Complaint) -> Self {
        Self {
            id: complaint.complaint_id.to_string(),
            complaint_number: complaint.complaint_number.clone(),
            category: complaint.category.code(),
            status: complaint.status.code(),
            title: complaint.title.clone(),
            description: complaint.description.clone(),
            complainant_name: complaint.complainant_name.clone(),
            complainant_contact: complaint.complainant_contact.clone(),
            created_at: millis(complaint.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerDetailResponse {
    pub worker: ReviewWorkerView,
    pub verifications: Vec<RecordView>,
    pub complaints: Vec<ComplaintView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceCheckRequest {
    pub worker_id: WorkerId,
    pub live_face_image: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceCheckResponse {
    pub match_score: f64,
    pub is_match: bool,
    pub liveness_detected: bool,
    pub confidence: f64,
}

impl From<FaceCheckOutput> for FaceCheckResponse {
    fn from(output: FaceCheckOutput) -> Self {
        Self {
            match_score: output.match_score,
            is_match: output.is_match,
            liveness_detected: output.liveness_detected,
            confidence: output.confidence,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub worker_id: WorkerId,
    /// `verified` or `rejected`
    pub status: String,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub external_verification_ref: Option<String>,
    #[serde(default)]
    pub external_system: Option<String>,
    #[serde(default)]
    pub certificate_number: Option<String>,
    #[serde(default)]
    pub certificate_url: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub success: bool,
    pub verification_id: String,
    pub worker_status: &'static str,
    /// Issued identifier, on approval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResponse {
    pub worker_id: String,
    pub qr_code_url: String,
    pub qr_payload: String,
    pub verification_endpoint: String,
}

impl From<&IssuedCredential> for CredentialResponse {
    fn from(credential: &IssuedCredential) -> Self {
        Self {
            worker_id: credential.identifier.to_string(),
            qr_code_url: media_url(&credential.qr_reference),
            qr_payload: credential.qr_payload.clone(),
            verification_endpoint: credential.verification_endpoint.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub incidents: i64,
}

impl From<ReviewStats> for StatsResponse {
    fn from(stats: ReviewStats) -> Self {
        Self {
            pending: stats.pending,
            approved: stats.approved,
            rejected: stats.rejected,
            incidents: stats.incidents,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDecisionView {
    pub verification_id: String,
    pub worker_id: String,
    pub worker_name: Option<String>,
    pub worker_identifier: Option<String>,
    pub status: &'static str,
    pub created_at: i64,
}

impl From<&RecentDecision> for RecentDecisionView {
    fn from(decision: &RecentDecision) -> Self {
        Self {
            verification_id: decision.record.verification_id.to_string(),
            worker_id: decision.record.worker_id.to_string(),
            worker_name: decision.worker_name.clone(),
            worker_identifier: decision.worker_identifier.clone(),
            status: decision.record.status.code(),
            created_at: millis(decision.record.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerProfileResponse {
    pub officer_id: String,
    #[serde(flatten)]
    pub officer: OfficerResponse,
    pub total_verifications: i64,
    pub verified_count: i64,
    pub rejected_count: i64,
    pub recent_verifications: Vec<RecentDecisionView>,
}

impl From<&OfficerProfileOutput> for OfficerProfileResponse {
    fn from(output: &OfficerProfileOutput) -> Self {
        Self {
            officer_id: output.officer.officer_id.to_string(),
            officer: OfficerResponse::from(&output.officer),
            total_verifications: output.activity.total,
            verified_count: output.activity.verified,
            rejected_count: output.activity.rejected,
            recent_verifications: output.activity.recent.iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Incidents and suspension
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRequest {
    /// Internal id or official identifier
    pub worker_id: String,
    pub title: String,
    pub description: String,
    #[serde(default = "default_incident_type")]
    pub incident_type: String,
    #[serde(default = "default_severity")]
    pub severity: String,
    #[serde(default)]
    pub incident_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub action_taken: Option<String>,
}

fn default_incident_type() -> String {
    "other".to_string()
}

fn default_severity() -> String {
    "medium".to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentView {
    pub id: String,
    pub incident_number: String,
    pub worker_id: String,
    pub worker_name: Option<String>,
    pub worker_identifier: Option<String>,
    pub title: String,
    pub description: String,
    pub incident_type: String,
    pub severity: String,
    pub incident_date: i64,
    pub location: Option<String>,
    pub action_taken: Option<String>,
    pub created_at: i64,
}

impl IncidentView {
    fn new(incident: &Incident, worker_name: Option<String>, worker_identifier: Option<String>) -> Self {
        Self {
            id: incident.incident_id.to_string(),
            incident_number: incident.incident_number.clone(),
            worker_id: incident.worker_id.to_string(),
            worker_name,
            worker_identifier,
            title: incident.title.clone(),
            description: incident.description.clone(),
            incident_type: incident.incident_type.clone(),
            severity: incident.severity.as_str().to_string(),
            incident_date: millis(incident.incident_date),
            location: incident.location.clone(),
            action_taken: incident.action_taken.clone(),
            created_at: millis(incident.created_at),
        }
    }
}

impl From<&Incident> for IncidentView {
    fn from(incident: &Incident) -> Self {
        IncidentView::new(incident, None, None)
    }
}

impl From<&IncidentListing> for IncidentView {
    fn from(listing: &IncidentListing) -> Self {
        IncidentView::new(
            &listing.incident,
            listing.worker_name.clone(),
            listing.worker_identifier.clone(),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspendRequest {
    /// Official identifier; an internal id is accepted too
    pub worker_id: String,
    pub reason: String,
    #[serde(default)]
    pub temporary: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspendResponse {
    pub success: bool,
    pub worker_status: &'static str,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AuditLogQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_audit_limit")]
    pub limit: i64,
}

fn default_audit_limit() -> i64 {
    100
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogView {
    pub id: i64,
    pub user_id: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub details: Value,
    pub created_at: i64,
}

impl From<&AuditRecord> for AuditLogView {
    fn from(record: &AuditRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.actor.map(|id| id.to_string()),
            action: record.action.clone(),
            resource_type: record.resource_type.clone(),
            resource_id: record.resource_id.clone(),
            details: record.details.clone(),
            created_at: millis(record.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditLogResponse {
    pub logs: Vec<AuditLogView>,
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlacklistRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistResponse {
    pub success: bool,
    pub worker_status: &'static str,
    pub blacklisted_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOverrideRequest {
    /// Official identifier; an internal id is accepted too
    pub worker_id: String,
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

// ============================================================================
// Public
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LookupRequest {
    pub worker_id: Option<String>,
    pub mobile: Option<String>,
    pub qr_data: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicWorkerView {
    pub worker_id: String,
    pub full_name: String,
    pub photo_url: Option<String>,
    pub category: Option<&'static str>,
    pub verification_status: &'static str,
    pub police_verified: bool,
    pub police_station: Option<String>,
    pub last_verified_at: Option<i64>,
    pub risk_score: i32,
    pub is_active: bool,
}

impl From<PublicWorker> for PublicWorkerView {
    fn from(worker: PublicWorker) -> Self {
        Self {
            worker_id: worker.identifier.to_string(),
            full_name: worker.full_name,
            photo_url: worker.photo_ref.as_deref().map(media_url),
            category: worker.category.map(|c| c.code()),
            verification_status: worker.verification_status.code(),
            police_verified: worker.police_verified,
            police_station: worker.station_name,
            last_verified_at: worker.last_verified_at.map(millis),
            risk_score: worker.risk_score,
            is_active: worker.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    pub found: bool,
    pub worker: Option<PublicWorkerView>,
}

impl From<Option<PublicWorker>> for LookupResponse {
    fn from(worker: Option<PublicWorker>) -> Self {
        Self {
            found: worker.is_some(),
            worker: worker.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintRequest {
    /// Official identifier of the worker
    pub worker_id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub complainant_name: Option<String>,
    #[serde(default)]
    pub complainant_contact: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub success: bool,
    pub complaint_number: String,
    pub status: &'static str,
}

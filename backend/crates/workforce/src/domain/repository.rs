//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use auth::domain::entity::police_officer::PoliceOfficer;
use chrono::{DateTime, Utc};
use kernel::id::{OfficerId, UserId, WorkerId};

use crate::domain::entity::{
    audit_entry::{AuditEntry, AuditRecord},
    complaint::Complaint,
    incident::{Incident, IncidentListing},
    verification_record::VerificationRecord,
    worker::{IssuedCredential, Worker},
};
use crate::domain::value_object::{status::WorkerStatus, worker_identifier::WorkerIdentifier};
use crate::error::WorkforceResult;

/// Worker persistence
#[trait_variant::make(WorkerRepository: Send)]
pub trait LocalWorkerRepository {
    async fn find_worker(&self, worker_id: &WorkerId) -> WorkforceResult<Option<Worker>>;

    async fn find_worker_by_user(&self, user_id: &UserId) -> WorkforceResult<Option<Worker>>;

    async fn find_worker_by_identifier(
        &self,
        identifier: &WorkerIdentifier,
    ) -> WorkforceResult<Option<Worker>>;

    /// Worker owned by the account with this (normalised) mobile number
    async fn find_worker_by_mobile(&self, mobile: &str) -> WorkforceResult<Option<Worker>>;

    /// Insert or update the onboarding fields, the owner's name and mobile,
    /// and the audit entry when given, atomically.
    ///
    /// `loaded_at` is the `updated_at` the worker was read with (`None` for a
    /// new worker). The write fails with `StaleWorker` when the stored row has
    /// moved on since, so a decision taken in between is never overwritten.
    async fn save_onboarding(
        &self,
        worker: &Worker,
        loaded_at: Option<DateTime<Utc>>,
        audit: Option<&AuditEntry>,
    ) -> WorkforceResult<()>;

    /// Workers that finished onboarding and still await a decision, most
    /// recently updated first
    async fn review_queue(&self) -> WorkforceResult<Vec<Worker>>;

    /// Identifier, name or mobile substring match
    async fn search_workers(&self, query: &str, limit: i64) -> WorkforceResult<Vec<Worker>>;

    async fn set_worker_status(
        &self,
        worker_id: &WorkerId,
        status: WorkerStatus,
        audit: &AuditEntry,
    ) -> WorkforceResult<()>;

    async fn review_stats(&self) -> WorkforceResult<ReviewStats>;
}

/// Police officer profiles, owned by the auth context
#[trait_variant::make(OfficerDirectory: Send)]
pub trait LocalOfficerDirectory {
    async fn find_officer(&self, user_id: &UserId) -> WorkforceResult<Option<PoliceOfficer>>;

    async fn officer_activity(
        &self,
        officer_id: &OfficerId,
        recent: i64,
    ) -> WorkforceResult<OfficerActivity>;
}

/// Verification records and credential issuance
#[trait_variant::make(VerificationRepository: Send)]
pub trait LocalVerificationRepository {
    /// Next free sequence number for an identifier prefix
    async fn next_identifier_sequence(&self, prefix: &str) -> WorkforceResult<u32>;

    /// Persist a decision in one transaction: the record, the worker
    /// update and the audit entry
    ///
    /// `IdentifierAlreadyIssued` when the worker's identifier changed
    /// underneath; `SequenceTaken` when another worker holds the identifier.
    async fn commit_decision(&self, commit: &DecisionCommit) -> WorkforceResult<()>;

    /// Records for a worker, newest first
    async fn records_for_worker(
        &self,
        worker_id: &WorkerId,
    ) -> WorkforceResult<Vec<VerificationRecord>>;

    async fn find_pending_record(
        &self,
        worker_id: &WorkerId,
        officer_id: &OfficerId,
    ) -> WorkforceResult<Option<VerificationRecord>>;

    /// Insert or update a record carrying a face check, with its audit entry
    async fn save_face_check(
        &self,
        record: &VerificationRecord,
        audit: &AuditEntry,
    ) -> WorkforceResult<()>;

    /// Latest approval of a worker and the station that issued it
    async fn latest_approval(&self, worker_id: &WorkerId)
    -> WorkforceResult<Option<ApprovalSummary>>;

    /// Rewrite the QR fields of a verified worker holding `credential.identifier`
    ///
    /// Returns false when the worker no longer qualifies.
    async fn replace_credential(
        &self,
        worker_id: &WorkerId,
        credential: &IssuedCredential,
        audit: Option<&AuditEntry>,
    ) -> WorkforceResult<bool>;
}

#[trait_variant::make(ComplaintRepository: Send)]
pub trait LocalComplaintRepository {
    /// Insert the complaint, bump the worker's counters, write the audit entry
    async fn file_complaint(&self, complaint: &Complaint, audit: &AuditEntry)
    -> WorkforceResult<()>;

    async fn complaints_for_worker(&self, worker_id: &WorkerId) -> WorkforceResult<Vec<Complaint>>;
}

#[trait_variant::make(IncidentRepository: Send)]
pub trait LocalIncidentRepository {
    /// Insert the incident, raise the worker's risk score, write the audit entry
    async fn log_incident(&self, incident: &Incident, audit: &AuditEntry) -> WorkforceResult<()>;

    async fn recent_incidents(&self, limit: i64) -> WorkforceResult<Vec<IncidentListing>>;
}

#[trait_variant::make(LookupRateLimitRepository: Send)]
pub trait LocalLookupRateLimitRepository {
    /// Count one request in the window and return the new count
    async fn hit(&self, client_key: &[u8], window_start_ms: i64) -> WorkforceResult<u32>;

    /// Drop every client's counters for windows that started before
    /// `window_start_ms`
    async fn purge_windows_before(&self, window_start_ms: i64) -> WorkforceResult<u64>;
}

/// Bulk corrections run by the repair binary
#[trait_variant::make(RepairRepository: Send)]
pub trait LocalRepairRepository {
    /// Null identifier and QR fields on every worker that is not verified
    async fn clear_unverified_credentials(&self) -> WorkforceResult<u64>;

    /// Verified workers holding an identifier, optionally only those without a QR code
    async fn verified_with_identifier(&self, missing_qr_only: bool)
    -> WorkforceResult<Vec<Worker>>;

    /// Expire verified workers whose latest approval lapsed before `now`
    async fn expire_lapsed(&self, now: DateTime<Utc>) -> WorkforceResult<u64>;
}

/// Platform governance by administrators
#[trait_variant::make(AdminRepository: Send)]
pub trait LocalAdminRepository {
    /// Newest first, with the total number of stored entries
    async fn audit_log(&self, offset: i64, limit: i64) -> WorkforceResult<AuditPage>;

    /// Block the worker for good; the identifier stays so lookups show the block
    async fn blacklist_worker(
        &self,
        worker_id: &WorkerId,
        reason: &str,
        audit: &AuditEntry,
    ) -> WorkforceResult<()>;
}

/// Everything the workforce handlers need from storage
pub trait WorkforceStore:
    WorkerRepository
    + OfficerDirectory
    + VerificationRepository
    + ComplaintRepository
    + IncidentRepository
    + LookupRateLimitRepository
    + AdminRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> WorkforceStore for T where
    T: WorkerRepository
        + OfficerDirectory
        + VerificationRepository
        + ComplaintRepository
        + IncidentRepository
        + LookupRateLimitRepository
        + AdminRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}

// ============================================================================
// Transfer types
// ============================================================================

/// Worker-side effect of a decision
#[derive(Debug, Clone)]
pub enum DecisionOutcome {
    /// Approve and mint a fresh identifier; the worker must hold none
    Issue(IssuedCredential),
    /// Approve keeping the identifier the worker already holds
    Keep(IssuedCredential),
    /// Reject and clear every credential field
    Reject,
}

/// A decision ready to be committed
#[derive(Debug, Clone)]
pub struct DecisionCommit {
    pub record: VerificationRecord,
    pub outcome: DecisionOutcome,
    pub audit: AuditEntry,
}

#[derive(Debug, Clone, Default)]
pub struct AuditPage {
    pub entries: Vec<AuditRecord>,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewStats {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub incidents: i64,
}

#[derive(Debug, Clone)]
pub struct ApprovalSummary {
    pub verified_at: Option<DateTime<Utc>>,
    pub station_name: Option<String>,
}

/// A decision in an officer's history
#[derive(Debug, Clone)]
pub struct RecentDecision {
    pub record: VerificationRecord,
    pub worker_name: Option<String>,
    /// Official identifier, only for approvals of a currently verified worker
    pub worker_identifier: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OfficerActivity {
    pub total: i64,
    pub verified: i64,
    pub rejected: i64,
    pub recent: Vec<RecentDecision>,
}

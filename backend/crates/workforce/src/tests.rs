//! Use-case and router tests against an in-memory store

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use auth::domain::entity::{auth_session::AuthSession, police_officer::PoliceOfficer};
use auth::domain::repository::AuthSessionRepository;
use auth::{AuthConfig, AuthResult, UserRole};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Datelike, Duration, Utc};
use kernel::id::{AuthSessionId, OfficerId, UserId, WorkerId};
use platform::client::ClientFingerprint;
use platform::crypto::{sha256, sign_token};
use platform::rate_limit::RateLimitConfig;
use tower::ServiceExt;

use crate::application::{
    DecideUseCase, DecisionInput, FaceCheckInput, FaceCheckUseCase, FileComplaintInput,
    FileComplaintUseCase, IncidentUseCase, LogIncidentInput, LookupQuery, OnboardingUseCase,
    PublicLookupUseCase, RegenerateQrUseCase, RepairReport, RepairUseCase, ReviewUseCase,
    Step1Input, Step2Input, Step3Input, Step4Input, Step6Input, SuspendInput, SuspendUseCase,
    WorkforceConfig,
};
use crate::domain::entity::{
    audit_entry::{AuditEntry, AuditRecord},
    complaint::Complaint,
    incident::{Incident, IncidentListing, IncidentReport},
    verification_record::{DecisionDetails, VerificationRecord},
    worker::{AepsProfile, IssuedCredential, Worker},
};
use crate::domain::gateway::{FaceComparison, FaceMatcher, MediaStore};
use crate::domain::repository::{
    AdminRepository, ApprovalSummary, AuditPage, ComplaintRepository, DecisionCommit,
    DecisionOutcome, IncidentRepository, LookupRateLimitRepository, OfficerActivity,
    OfficerDirectory, RecentDecision, RepairRepository, ReviewStats, VerificationRepository,
    WorkerRepository,
};
use crate::domain::value_object::{
    severity::Severity,
    status::{VerificationStatus, WorkerStatus},
    worker_identifier::WorkerIdentifier,
};
use crate::error::{WorkforceError, WorkforceResult};

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct MemoryState {
    workers: HashMap<WorkerId, Worker>,
    officers: HashMap<UserId, PoliceOfficer>,
    records: Vec<VerificationRecord>,
    complaints: Vec<Complaint>,
    incidents: Vec<Incident>,
    lookup_hits: HashMap<(Vec<u8>, i64), u32>,
    sessions: HashMap<AuthSessionId, AuthSession>,
    /// Sequence reads that still return an already-taken number
    stale_sequence_reads: u32,
    audit_log: Vec<AuditEntry>,
}

#[derive(Clone, Default)]
pub(crate) struct MemoryWorkforceRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryWorkforceRepository {
    fn audit_actions(&self) -> Vec<&'static str> {
        let state = self.state.lock().unwrap();
        state.audit_log.iter().map(|entry| entry.action).collect()
    }

    fn worker(&self, worker_id: &WorkerId) -> Worker {
        self.state.lock().unwrap().workers[worker_id].clone()
    }

    fn update_worker(&self, worker_id: &WorkerId, change: impl FnOnce(&mut Worker)) {
        let mut state = self.state.lock().unwrap();
        change(state.workers.get_mut(worker_id).unwrap());
    }

    fn add_officer(&self, user_id: UserId) -> PoliceOfficer {
        let mut state = self.state.lock().unwrap();
        let sequence = state.officers.len() as i64 + 1;
        let officer = PoliceOfficer::provision(user_id, sequence);
        state.officers.insert(user_id, officer.clone());
        officer
    }

    fn make_sequence_reads_stale(&self, reads: u32) {
        self.state.lock().unwrap().stale_sequence_reads = reads;
    }

    fn issued_identifiers(&self) -> Vec<WorkerIdentifier> {
        let state = self.state.lock().unwrap();
        state
            .workers
            .values()
            .filter_map(|w| w.worker_identifier.clone())
            .collect()
    }

    fn station_of(state: &MemoryState, officer_id: &OfficerId) -> Option<String> {
        state
            .officers
            .values()
            .find(|o| o.officer_id == *officer_id)
            .map(|o| o.station_name.clone())
    }
}

impl WorkerRepository for MemoryWorkforceRepository {
    async fn find_worker(&self, worker_id: &WorkerId) -> WorkforceResult<Option<Worker>> {
        Ok(self.state.lock().unwrap().workers.get(worker_id).cloned())
    }

    async fn find_worker_by_user(&self, user_id: &UserId) -> WorkforceResult<Option<Worker>> {
        let state = self.state.lock().unwrap();
        Ok(state.workers.values().find(|w| w.user_id == *user_id).cloned())
    }

    async fn find_worker_by_identifier(
        &self,
        identifier: &WorkerIdentifier,
    ) -> WorkforceResult<Option<Worker>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .workers
            .values()
            .find(|w| w.worker_identifier.as_ref() == Some(identifier))
            .cloned())
    }

    async fn find_worker_by_mobile(&self, mobile: &str) -> WorkforceResult<Option<Worker>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .workers
            .values()
            .find(|w| w.owner.mobile.as_deref() == Some(mobile))
            .cloned())
    }

    async fn save_onboarding(
        &self,
        worker: &Worker,
        loaded_at: Option<DateTime<Utc>>,
        audit: Option<&AuditEntry>,
    ) -> WorkforceResult<()> {
        let mut state = self.state.lock().unwrap();
        let stored_at = state.workers.get(&worker.worker_id).map(|w| w.updated_at);
        let user_taken = state
            .workers
            .values()
            .any(|w| w.worker_id != worker.worker_id && w.user_id == worker.user_id);
        if stored_at != loaded_at || user_taken {
            return Err(WorkforceError::StaleWorker);
        }
        let mobile_taken = worker.owner.mobile.is_some()
            && state.workers.values().any(|w| {
                w.worker_id != worker.worker_id && w.owner.mobile == worker.owner.mobile
            });
        if mobile_taken {
            return Err(WorkforceError::MobileTaken);
        }
        state.workers.insert(worker.worker_id, worker.clone());
        if let Some(audit) = audit {
            state.audit_log.push(audit.clone());
        }
        Ok(())
    }

    async fn review_queue(&self) -> WorkforceResult<Vec<Worker>> {
        let state = self.state.lock().unwrap();
        let mut queue: Vec<Worker> = state
            .workers
            .values()
            .filter(|w| {
                w.onboarding_complete() && w.verification_status == VerificationStatus::Pending
            })
            .cloned()
            .collect();
        queue.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(queue)
    }

    async fn search_workers(&self, query: &str, limit: i64) -> WorkforceResult<Vec<Worker>> {
        let needle = query.to_lowercase();
        let state = self.state.lock().unwrap();
        Ok(state
            .workers
            .values()
            .filter(|w| {
                let identifier = w.worker_identifier.as_ref().map(|i| i.as_str().to_lowercase());
                identifier.is_some_and(|i| i.contains(&needle))
                    || w.owner.full_name.to_lowercase().contains(&needle)
                    || w.owner.mobile.as_deref().is_some_and(|m| m.contains(&needle))
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn set_worker_status(
        &self,
        worker_id: &WorkerId,
        status: WorkerStatus,
        audit: &AuditEntry,
    ) -> WorkforceResult<()> {
        let mut state = self.state.lock().unwrap();
        let worker = state
            .workers
            .get_mut(worker_id)
            .ok_or(WorkforceError::WorkerNotFound)?;
        worker.status = status;
        state.audit_log.push(audit.clone());
        Ok(())
    }

    async fn review_stats(&self) -> WorkforceResult<ReviewStats> {
        let state = self.state.lock().unwrap();
        let count = |status: VerificationStatus| {
            state
                .workers
                .values()
                .filter(|w| w.onboarding_complete() && w.verification_status == status)
                .count() as i64
        };
        Ok(ReviewStats {
            pending: count(VerificationStatus::Pending),
            approved: count(VerificationStatus::Verified),
            rejected: count(VerificationStatus::Rejected),
            incidents: state.incidents.len() as i64,
        })
    }
}

impl OfficerDirectory for MemoryWorkforceRepository {
    async fn find_officer(&self, user_id: &UserId) -> WorkforceResult<Option<PoliceOfficer>> {
        Ok(self.state.lock().unwrap().officers.get(user_id).cloned())
    }

    async fn officer_activity(
        &self,
        officer_id: &OfficerId,
        recent: i64,
    ) -> WorkforceResult<OfficerActivity> {
        let state = self.state.lock().unwrap();
        let decisions: Vec<&VerificationRecord> = state
            .records
            .iter()
            .rev()
            .filter(|r| r.officer_id == *officer_id && r.status != VerificationStatus::Pending)
            .collect();
        Ok(OfficerActivity {
            total: decisions.len() as i64,
            verified: decisions
                .iter()
                .filter(|r| r.status == VerificationStatus::Verified)
                .count() as i64,
            rejected: decisions
                .iter()
                .filter(|r| r.status == VerificationStatus::Rejected)
                .count() as i64,
            recent: decisions
                .iter()
                .take(recent as usize)
                .map(|r| {
                    let worker = state.workers.get(&r.worker_id);
                    RecentDecision {
                        record: (*r).clone(),
                        worker_name: worker.map(|w| w.owner.full_name.clone()),
                        worker_identifier: worker
                            .filter(|_| r.status == VerificationStatus::Verified)
                            .and_then(|w| w.official_identifier())
                            .map(|i| i.to_string()),
                    }
                })
                .collect(),
        })
    }
}

impl VerificationRepository for MemoryWorkforceRepository {
    async fn next_identifier_sequence(&self, prefix: &str) -> WorkforceResult<u32> {
        let mut state = self.state.lock().unwrap();
        let max = state
            .workers
            .values()
            .filter_map(|w| w.worker_identifier.as_ref())
            .filter(|i| i.as_str().starts_with(prefix))
            .filter_map(WorkerIdentifier::sequence)
            .max()
            .unwrap_or(0);
        if state.stale_sequence_reads > 0 && max > 0 {
            state.stale_sequence_reads -= 1;
            return Ok(max);
        }
        Ok(max + 1)
    }

    async fn commit_decision(&self, commit: &DecisionCommit) -> WorkforceResult<()> {
        let mut state = self.state.lock().unwrap();
        let worker_id = commit.record.worker_id;
        let current = state
            .workers
            .get(&worker_id)
            .ok_or(WorkforceError::WorkerNotFound)?
            .worker_identifier
            .clone();

        match &commit.outcome {
            DecisionOutcome::Issue(credential) => {
                if current.is_some() {
                    return Err(WorkforceError::IdentifierAlreadyIssued);
                }
                let taken = state.workers.values().any(|w| {
                    w.worker_id != worker_id
                        && w.worker_identifier.as_ref() == Some(&credential.identifier)
                });
                if taken {
                    return Err(WorkforceError::SequenceTaken);
                }
            }
            DecisionOutcome::Keep(credential) => {
                if current.as_ref() != Some(&credential.identifier) {
                    return Err(WorkforceError::IdentifierAlreadyIssued);
                }
            }
            DecisionOutcome::Reject => {}
        }

        let worker = state
            .workers
            .get_mut(&worker_id)
            .ok_or(WorkforceError::WorkerNotFound)?;
        match &commit.outcome {
            DecisionOutcome::Issue(credential) | DecisionOutcome::Keep(credential) => {
                worker.verification_status = VerificationStatus::Verified;
                worker.status = WorkerStatus::Active;
                worker.apply_credential(credential);
            }
            DecisionOutcome::Reject => {
                worker.verification_status = VerificationStatus::Rejected;
                worker.status = WorkerStatus::Blocked;
                worker.clear_credential();
            }
        }
        worker.updated_at = Utc::now();

        state.records.push(commit.record.clone());
        state.audit_log.push(commit.audit.clone());
        Ok(())
    }

    async fn records_for_worker(
        &self,
        worker_id: &WorkerId,
    ) -> WorkforceResult<Vec<VerificationRecord>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .rev()
            .filter(|r| r.worker_id == *worker_id)
            .cloned()
            .collect())
    }

    async fn find_pending_record(
        &self,
        worker_id: &WorkerId,
        officer_id: &OfficerId,
    ) -> WorkforceResult<Option<VerificationRecord>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .rev()
            .find(|r| {
                r.worker_id == *worker_id
                    && r.officer_id == *officer_id
                    && r.status == VerificationStatus::Pending
            })
            .cloned())
    }

    async fn save_face_check(
        &self,
        record: &VerificationRecord,
        audit: &AuditEntry,
    ) -> WorkforceResult<()> {
        let mut state = self.state.lock().unwrap();
        match state
            .records
            .iter()
            .position(|r| r.verification_id == record.verification_id)
        {
            Some(index) => state.records[index] = record.clone(),
            None => state.records.push(record.clone()),
        }
        state.audit_log.push(audit.clone());
        Ok(())
    }

    async fn latest_approval(
        &self,
        worker_id: &WorkerId,
    ) -> WorkforceResult<Option<ApprovalSummary>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .rev()
            .find(|r| r.worker_id == *worker_id && r.status == VerificationStatus::Verified)
            .map(|r| ApprovalSummary {
                verified_at: r.verification_date,
                station_name: Self::station_of(&state, &r.officer_id),
            }))
    }

    async fn replace_credential(
        &self,
        worker_id: &WorkerId,
        credential: &IssuedCredential,
        audit: Option<&AuditEntry>,
    ) -> WorkforceResult<bool> {
        let mut state = self.state.lock().unwrap();
        let Some(worker) = state.workers.get_mut(worker_id) else {
            return Ok(false);
        };
        if worker.official_identifier() != Some(&credential.identifier) {
            return Ok(false);
        }
        worker.apply_credential(credential);
        if let Some(audit) = audit {
            state.audit_log.push(audit.clone());
        }
        Ok(true)
    }
}

impl ComplaintRepository for MemoryWorkforceRepository {
    async fn file_complaint(
        &self,
        complaint: &Complaint,
        audit: &AuditEntry,
    ) -> WorkforceResult<()> {
        let mut state = self.state.lock().unwrap();
        let worker = state
            .workers
            .get_mut(&complaint.worker_id)
            .ok_or(WorkforceError::WorkerNotFound)?;
        worker.complaint_count += 1;
        worker.risk_score += Complaint::RISK_INCREMENT;
        state.complaints.push(complaint.clone());
        state.audit_log.push(audit.clone());
        Ok(())
    }

    async fn complaints_for_worker(&self, worker_id: &WorkerId) -> WorkforceResult<Vec<Complaint>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .complaints
            .iter()
            .rev()
            .filter(|c| c.worker_id == *worker_id)
            .cloned()
            .collect())
    }
}

impl IncidentRepository for MemoryWorkforceRepository {
    async fn log_incident(&self, incident: &Incident, audit: &AuditEntry) -> WorkforceResult<()> {
        let mut state = self.state.lock().unwrap();
        let worker = state
            .workers
            .get_mut(&incident.worker_id)
            .ok_or(WorkforceError::WorkerNotFound)?;
        worker.risk_score += incident.risk_increment();
        state.incidents.push(incident.clone());
        state.audit_log.push(audit.clone());
        Ok(())
    }

    async fn recent_incidents(&self, limit: i64) -> WorkforceResult<Vec<IncidentListing>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .incidents
            .iter()
            .rev()
            .take(limit as usize)
            .map(|incident| {
                let worker = state.workers.get(&incident.worker_id);
                IncidentListing {
                    incident: incident.clone(),
                    worker_name: worker.map(|w| w.owner.full_name.clone()),
                    worker_identifier: worker
                        .and_then(|w| w.official_identifier())
                        .map(|i| i.to_string()),
                }
            })
            .collect())
    }
}

impl LookupRateLimitRepository for MemoryWorkforceRepository {
    async fn hit(&self, client_key: &[u8], window_start_ms: i64) -> WorkforceResult<u32> {
        let mut state = self.state.lock().unwrap();
        let count = state
            .lookup_hits
            .entry((client_key.to_vec(), window_start_ms))
            .or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn purge_windows_before(&self, window_start_ms: i64) -> WorkforceResult<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.lookup_hits.len();
        state
            .lookup_hits
            .retain(|(_, start), _| *start >= window_start_ms);
        Ok((before - state.lookup_hits.len()) as u64)
    }
}

impl AdminRepository for MemoryWorkforceRepository {
    async fn audit_log(&self, offset: i64, limit: i64) -> WorkforceResult<AuditPage> {
        let state = self.state.lock().unwrap();
        let entries = state
            .audit_log
            .iter()
            .enumerate()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(index, entry)| AuditRecord {
                id: index as i64 + 1,
                actor: entry.actor,
                action: entry.action.to_string(),
                resource_type: entry.resource_type.to_string(),
                resource_id: entry.resource_id.clone(),
                details: entry.details.clone(),
                created_at: entry.created_at,
            })
            .collect();
        Ok(AuditPage {
            entries,
            total: state.audit_log.len() as i64,
        })
    }

    async fn blacklist_worker(
        &self,
        worker_id: &WorkerId,
        reason: &str,
        audit: &AuditEntry,
    ) -> WorkforceResult<()> {
        let mut state = self.state.lock().unwrap();
        let worker = state
            .workers
            .get_mut(worker_id)
            .ok_or(WorkforceError::WorkerNotFound)?;
        worker.status = WorkerStatus::Blocked;
        worker.blacklist_reason = Some(reason.to_string());
        worker.blacklisted_at.get_or_insert(audit.created_at);
        worker.updated_at = audit.created_at;
        state.audit_log.push(audit.clone());
        Ok(())
    }
}

impl RepairRepository for MemoryWorkforceRepository {
    async fn clear_unverified_credentials(&self) -> WorkforceResult<u64> {
        let mut state = self.state.lock().unwrap();
        let mut cleared = 0;
        for worker in state.workers.values_mut() {
            let holds_any = worker.worker_identifier.is_some()
                || worker.qr_reference.is_some()
                || worker.qr_payload.is_some()
                || worker.verification_endpoint.is_some();
            if !worker.is_verified() && holds_any {
                worker.clear_credential();
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    async fn verified_with_identifier(
        &self,
        missing_qr_only: bool,
    ) -> WorkforceResult<Vec<Worker>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .workers
            .values()
            .filter(|w| w.official_identifier().is_some())
            .filter(|w| !missing_qr_only || w.qr_reference.as_deref().is_none_or(str::is_empty))
            .cloned()
            .collect())
    }

    async fn expire_lapsed(&self, now: DateTime<Utc>) -> WorkforceResult<u64> {
        let mut state = self.state.lock().unwrap();
        let lapsed: Vec<WorkerId> = state
            .workers
            .values()
            .filter(|w| w.is_verified())
            .filter(|w| {
                state
                    .records
                    .iter()
                    .rev()
                    .find(|r| r.worker_id == w.worker_id && r.status == VerificationStatus::Verified)
                    .is_some_and(|r| r.is_lapsed(now))
            })
            .map(|w| w.worker_id)
            .collect();

        for worker_id in &lapsed {
            if let Some(worker) = state.workers.get_mut(worker_id) {
                worker.verification_status = VerificationStatus::Expired;
                worker.status = WorkerStatus::Inactive;
                worker.clear_credential();
            }
        }
        Ok(lapsed.len() as u64)
    }
}

impl AuthSessionRepository for MemoryWorkforceRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()> {
        self.state
            .lock()
            .unwrap()
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_session(
        &self,
        session_id: &AuthSessionId,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .sessions
            .get(session_id)
            .filter(|s| s.client_fingerprint_hash == fingerprint_hash)
            .cloned())
    }

    async fn touch_session(&self, _session: &AuthSession) -> AuthResult<()> {
        Ok(())
    }

    async fn delete_session(&self, session_id: &AuthSessionId) -> AuthResult<()> {
        self.state.lock().unwrap().sessions.remove(session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        Ok(0)
    }
}

/// Media kept in a map, keyed by reference
#[derive(Clone, Default)]
pub(crate) struct MemoryMediaStore {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    /// QR references in write order
    qr_writes: Arc<Mutex<Vec<String>>>,
}

impl MemoryMediaStore {
    fn get(&self, reference: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(reference).cloned()
    }

    fn qr_writes(&self) -> Vec<String> {
        self.qr_writes.lock().unwrap().clone()
    }
}

impl MediaStore for MemoryMediaStore {
    async fn save_selfie(&self, worker_id: &WorkerId, image: &[u8]) -> WorkforceResult<String> {
        let reference = format!("uploads/selfies/worker_{worker_id}.jpg");
        self.files
            .lock()
            .unwrap()
            .insert(reference.clone(), image.to_vec());
        Ok(reference)
    }

    fn qr_reference(&self, identifier: &WorkerIdentifier) -> String {
        format!("uploads/qrcodes/{identifier}.png")
    }

    async fn save_qr(&self, identifier: &WorkerIdentifier, png: &[u8]) -> WorkforceResult<String> {
        let reference = self.qr_reference(identifier);
        self.files
            .lock()
            .unwrap()
            .insert(reference.clone(), png.to_vec());
        self.qr_writes.lock().unwrap().push(reference.clone());
        Ok(reference)
    }

    async fn load(&self, reference: &str) -> WorkforceResult<Vec<u8>> {
        self.get(reference)
            .ok_or_else(|| WorkforceError::Storage(format!("missing {reference}")))
    }
}

/// Face matcher answering with a fixed comparison
#[derive(Clone, Copy)]
pub(crate) struct FixedFaceMatcher(FaceComparison);

impl FaceMatcher for FixedFaceMatcher {
    async fn compare(&self, _reference: &[u8], _live: &[u8]) -> WorkforceResult<FaceComparison> {
        Ok(self.0)
    }
}

// ============================================================================
// Helpers
// ============================================================================

const FRONTEND: &str = "https://jansuraksha.gov.in";
const USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 14) JanSuraksha/2.1";
/// base64 of "hello"
const IMAGE: &str = "aGVsbG8=";
const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

struct Fixture {
    repo: Arc<MemoryWorkforceRepository>,
    media: Arc<MemoryMediaStore>,
    config: Arc<WorkforceConfig>,
    officer_user: UserId,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(config())
    }

    fn with_config(config: WorkforceConfig) -> Self {
        let repo = Arc::new(MemoryWorkforceRepository::default());
        let officer_user = UserId::new();
        repo.add_officer(officer_user);
        Self {
            repo,
            media: Arc::new(MemoryMediaStore::default()),
            config: Arc::new(config),
            officer_user,
        }
    }

    fn onboarding(&self) -> OnboardingUseCase<MemoryWorkforceRepository, MemoryMediaStore> {
        OnboardingUseCase::new(self.repo.clone(), self.media.clone(), self.config.clone())
    }

    fn decide_use_case(&self) -> DecideUseCase<MemoryWorkforceRepository, MemoryMediaStore> {
        DecideUseCase::new(self.repo.clone(), self.media.clone(), self.config.clone())
    }

    fn lookup(&self) -> PublicLookupUseCase<MemoryWorkforceRepository> {
        PublicLookupUseCase::new(self.repo.clone(), self.config.clone())
    }

    fn repair(&self) -> RepairUseCase<MemoryWorkforceRepository, MemoryMediaStore> {
        RepairUseCase::new(self.repo.clone(), self.media.clone(), self.config.clone())
    }

    /// Run all six steps for a new delivery worker
    async fn submitted_worker(&self, mobile: &str) -> WorkerId {
        let user = UserId::new();
        let onboarding = self.onboarding();
        onboarding.step1(&user, step1("delivery", mobile)).await.unwrap();
        onboarding.step2(&user, step2()).await.unwrap();
        onboarding
            .step3(&user, Step3Input { selfie_image: IMAGE.to_string() })
            .await
            .unwrap();
        onboarding
            .step4(&user, Step4Input { aadhaar_reference: "XXXX-XXXX-4321".to_string() })
            .await
            .unwrap();
        onboarding.step5(&user, AepsProfile::default()).await.unwrap();
        onboarding.step6(&user, consent()).await.unwrap().worker_id
    }

    async fn decide(&self, worker_id: WorkerId, status: &str) -> WorkforceResult<crate::application::DecisionOutput> {
        self.decide_use_case()
            .execute(
                &self.officer_user,
                DecisionInput {
                    worker_id,
                    status: status.to_string(),
                    details: DecisionDetails {
                        remarks: Some("Documents checked at station".to_string()),
                        ..Default::default()
                    },
                },
            )
            .await
    }

    async fn approved_worker(&self, mobile: &str) -> (WorkerId, WorkerIdentifier) {
        let worker_id = self.submitted_worker(mobile).await;
        let output = self.decide(worker_id, "verified").await.unwrap();
        (worker_id, output.credential.unwrap().identifier)
    }
}

fn config() -> WorkforceConfig {
    WorkforceConfig {
        lookup_rate_limit: RateLimitConfig::new(3, 60),
        ..WorkforceConfig::default().with_frontend_base_url(FRONTEND)
    }
}

fn step1(category: &str, mobile: &str) -> Step1Input {
    Step1Input {
        category: category.to_string(),
        full_name: "Sita Devi".to_string(),
        mobile: mobile.to_string(),
    }
}

fn step2() -> Step2Input {
    Step2Input {
        address_current: "12 Station Road".to_string(),
        city: "Patna".to_string(),
        state: "Bihar".to_string(),
        pincode: "800001".to_string(),
    }
}

fn consent() -> Step6Input {
    Step6Input {
        consent_given: true,
        declaration_signed: true,
    }
}

fn expected_identifier(sequence: u32) -> String {
    format!("IND-WRK-DLV-{}-{sequence:06}", Utc::now().year())
}

// ============================================================================
// Onboarding
// ============================================================================

#[cfg(test)]
mod onboarding_tests {
    use super::*;

    #[tokio::test]
    async fn test_steps_must_follow_order() {
        let fx = Fixture::new();
        let user = UserId::new();
        let onboarding = fx.onboarding();

        let err = onboarding.step2(&user, step2()).await.unwrap_err();
        assert!(matches!(err, WorkforceError::StepOutOfOrder(1)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let out = onboarding.step1(&user, step1("aeps", "9876543210")).await.unwrap();
        assert_eq!(out.next_step, 2);

        let err = onboarding
            .step3(&user, Step3Input { selfie_image: IMAGE.to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::StepOutOfOrder(2)));
    }

    #[tokio::test]
    async fn test_full_flow_submits_for_review() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("+91 98765 43210").await;

        let worker = fx.repo.worker(&worker_id);
        assert_eq!(worker.status, WorkerStatus::PendingVerification);
        assert_eq!(worker.verification_status, VerificationStatus::Pending);
        assert_eq!(worker.owner.mobile.as_deref(), Some("9876543210"));
        assert!(worker.worker_identifier.is_none());
        assert_eq!(
            fx.media.get(worker.selfie_ref.as_deref().unwrap()),
            Some(b"hello".to_vec())
        );
        assert!(worker.onboarding_data.contains_key("step6"));
        assert_eq!(fx.repo.audit_actions(), vec![AuditEntry::ONBOARDING_COMPLETE]);
    }

    #[tokio::test]
    async fn test_submitted_application_is_frozen() {
        let fx = Fixture::new();
        let user = UserId::new();
        let onboarding = fx.onboarding();
        onboarding.step1(&user, step1("delivery", "9876543210")).await.unwrap();
        onboarding.step2(&user, step2()).await.unwrap();
        onboarding
            .step3(&user, Step3Input { selfie_image: IMAGE.to_string() })
            .await
            .unwrap();
        onboarding
            .step4(&user, Step4Input { aadhaar_reference: "4321".to_string() })
            .await
            .unwrap();
        onboarding.complete(&user, consent()).await.unwrap();

        let err = onboarding.step2(&user, step2()).await.unwrap_err();
        assert!(matches!(err, WorkforceError::AlreadySubmitted));
        let err = onboarding
            .step1(&user, step1("delivery", "9876543210"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::AlreadySubmitted));
    }

    #[tokio::test]
    async fn test_write_from_stale_read_keeps_issued_identifier() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;
        fx.decide(worker_id, "rejected").await.unwrap();

        // a rejected worker may edit again; read the row as a step would
        let stale = fx.repo.worker(&worker_id);
        let (loaded_at, mut edited) = (stale.updated_at, stale);

        let output = fx.decide(worker_id, "verified").await.unwrap();
        let identifier = output.credential.unwrap().identifier;

        edited.city = Some("Gaya".to_string());
        edited.record_step(2, serde_json::json!({ "city": "Gaya" }));
        let err = fx
            .repo
            .save_onboarding(&edited, Some(loaded_at), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::StaleWorker));

        let worker = fx.repo.worker(&worker_id);
        assert_eq!(worker.worker_identifier, Some(identifier));
        assert_eq!(worker.verification_status, VerificationStatus::Verified);
        assert_eq!(worker.city.as_deref(), Some("Patna"));
    }

    #[tokio::test]
    async fn test_rejected_worker_can_edit_and_resubmit() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;
        fx.decide(worker_id, "rejected").await.unwrap();
        let user = fx.repo.worker(&worker_id).user_id;

        let onboarding = fx.onboarding();
        onboarding.step2(&user, step2()).await.unwrap();
        let output = onboarding.complete(&user, consent()).await.unwrap();
        assert_eq!(output.verification_status, VerificationStatus::Pending);
        assert!(fx.repo.worker(&worker_id).worker_identifier.is_none());
    }

    #[tokio::test]
    async fn test_consent_and_required_fields() {
        let fx = Fixture::new();
        let user = UserId::new();
        let onboarding = fx.onboarding();
        onboarding.step1(&user, step1("delivery", "9876543210")).await.unwrap();
        onboarding.step2(&user, step2()).await.unwrap();

        let err = onboarding.complete(&user, consent()).await.unwrap_err();
        match err {
            WorkforceError::MissingFields(missing) => {
                assert_eq!(missing, vec!["selfie (step 3)", "aadhaar (step 4)"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        onboarding
            .step3(&user, Step3Input { selfie_image: IMAGE.to_string() })
            .await
            .unwrap();
        onboarding
            .step4(&user, Step4Input { aadhaar_reference: "4321".to_string() })
            .await
            .unwrap();
        let no_consent = Step6Input {
            consent_given: false,
            declaration_signed: true,
        };
        let err = onboarding.complete(&user, no_consent).await.unwrap_err();
        assert!(matches!(err, WorkforceError::ConsentRequired));
    }

    #[tokio::test]
    async fn test_step_input_validation() {
        let fx = Fixture::new();
        let user = UserId::new();
        let onboarding = fx.onboarding();

        let err = onboarding.step1(&user, step1("plumber", "9876543210")).await.unwrap_err();
        assert!(matches!(err, WorkforceError::InvalidInput(_)));
        let err = onboarding.step1(&user, step1("delivery", "12345")).await.unwrap_err();
        assert!(matches!(err, WorkforceError::InvalidInput(_)));

        onboarding.step1(&user, step1("delivery", "9876543210")).await.unwrap();
        let err = onboarding
            .step2(&user, Step2Input { pincode: "8000".to_string(), ..step2() })
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::InvalidInput(_)));

        onboarding.step2(&user, step2()).await.unwrap();
        let err = onboarding
            .step3(&user, Step3Input { selfie_image: "not base64!".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn test_mobile_belongs_to_one_worker() {
        let fx = Fixture::new();
        fx.onboarding()
            .step1(&UserId::new(), step1("delivery", "9876543210"))
            .await
            .unwrap();

        let err = fx
            .onboarding()
            .step1(&UserId::new(), step1("delivery", "09876543210"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::MobileTaken));
    }

    #[tokio::test]
    async fn test_aeps_fields_only_kept_for_agents() {
        let fx = Fixture::new();
        let profile = AepsProfile {
            bank_affiliation: Some("State Bank of India".to_string()),
            operator_id: Some("OP-778".to_string()),
            ..Default::default()
        };

        for (category, mobile, kept) in [("aeps", "9876543210", true), ("delivery", "9123456780", false)] {
            let user = UserId::new();
            let onboarding = fx.onboarding();
            let worker_id = onboarding.step1(&user, step1(category, mobile)).await.unwrap().worker_id;
            onboarding.step2(&user, step2()).await.unwrap();
            onboarding
                .step3(&user, Step3Input { selfie_image: IMAGE.to_string() })
                .await
                .unwrap();
            onboarding
                .step4(&user, Step4Input { aadhaar_reference: "4321".to_string() })
                .await
                .unwrap();
            onboarding.step5(&user, profile.clone()).await.unwrap();

            let worker = fx.repo.worker(&worker_id);
            assert_eq!(worker.aeps == profile, kept, "category {category}");
        }
    }
}

// ============================================================================
// Decisions and issuance
// ============================================================================

#[cfg(test)]
mod decision_tests {
    use super::*;

    #[tokio::test]
    async fn test_approval_issues_identifier_and_qr() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;

        let output = fx.decide(worker_id, "verified").await.unwrap();
        assert_eq!(output.worker_status, WorkerStatus::Active);

        let credential = output.credential.unwrap();
        assert_eq!(credential.identifier.as_str(), expected_identifier(1));
        assert_eq!(
            credential.qr_payload,
            format!("{FRONTEND}/verify?id={}", credential.identifier)
        );
        assert_eq!(
            credential.verification_endpoint,
            format!("{FRONTEND}/api/verify/worker/{}", credential.identifier)
        );
        let png = fx.media.get(&credential.qr_reference).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);

        let worker = fx.repo.worker(&worker_id);
        assert_eq!(worker.verification_status, VerificationStatus::Verified);
        assert_eq!(worker.official_identifier(), Some(&credential.identifier));
        assert!(fx.repo.audit_actions().contains(&AuditEntry::POLICE_VERIFICATION));
    }

    #[tokio::test]
    async fn test_sequence_counts_per_prefix() {
        let fx = Fixture::new();
        let (_, first) = fx.approved_worker("9876543210").await;
        let (_, second) = fx.approved_worker("9123456780").await;

        assert_eq!(first.as_str(), expected_identifier(1));
        assert_eq!(second.as_str(), expected_identifier(2));
    }

    #[tokio::test]
    async fn test_taken_sequence_is_retried() {
        let fx = Fixture::new();
        fx.approved_worker("9876543210").await;
        fx.repo.make_sequence_reads_stale(2);

        let (_, identifier) = fx.approved_worker("9123456780").await;
        assert_eq!(identifier.as_str(), expected_identifier(2));
    }

    #[tokio::test]
    async fn test_qr_image_written_only_for_owned_identifier() {
        let fx = Fixture::new();
        let (_, first) = fx.approved_worker("9876543210").await;
        fx.repo.make_sequence_reads_stale(1);

        // the first attempt picks the number already held by `first`
        let (_, second) = fx.approved_worker("9123456780").await;
        assert_eq!(second.as_str(), expected_identifier(2));
        assert_eq!(
            fx.media.qr_writes(),
            vec![
                format!("uploads/qrcodes/{first}.png"),
                format!("uploads/qrcodes/{second}.png"),
            ]
        );
    }

    #[tokio::test]
    async fn test_sequence_exhaustion_is_conflict() {
        let fx = Fixture::with_config(WorkforceConfig {
            max_issue_attempts: 2,
            ..config()
        });
        fx.approved_worker("9876543210").await;
        fx.repo.make_sequence_reads_stale(5);

        let worker_id = fx.submitted_worker("9123456780").await;
        let err = fx.decide(worker_id, "verified").await.unwrap_err();
        assert!(matches!(err, WorkforceError::SequenceExhausted(2)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(fx.repo.worker(&worker_id).worker_identifier.is_none());
        // only the first worker's image was ever written
        assert_eq!(fx.media.qr_writes().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_issuance_keeps_one_identifier() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;
        let officer = fx.repo.add_officer(UserId::new());
        let issuer = crate::application::CredentialIssuer::new(fx.media.clone(), fx.config.clone());

        // both decisions read the worker before either committed
        let mut commits = Vec::new();
        for sequence in [1, 2] {
            let identifier = WorkerIdentifier::issue(
                fx.repo.worker(&worker_id).category,
                Utc::now().year(),
                sequence,
            );
            commits.push(DecisionCommit {
                record: VerificationRecord::decision(
                    worker_id,
                    officer.officer_id,
                    crate::domain::value_object::status::Decision::Verified,
                    DecisionDetails::default(),
                    365,
                ),
                outcome: DecisionOutcome::Issue(issuer.prepare(&identifier).unwrap().credential),
                audit: AuditEntry::new(
                    None,
                    AuditEntry::POLICE_VERIFICATION,
                    "worker",
                    worker_id,
                    serde_json::Value::Null,
                ),
            });
        }

        fx.repo.commit_decision(&commits[0]).await.unwrap();
        let err = fx.repo.commit_decision(&commits[1]).await.unwrap_err();
        assert!(matches!(err, WorkforceError::IdentifierAlreadyIssued));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        assert_eq!(fx.repo.issued_identifiers().len(), 1);
        assert_eq!(
            fx.repo.worker(&worker_id).worker_identifier.unwrap().as_str(),
            expected_identifier(1)
        );
    }

    #[tokio::test]
    async fn test_reapproval_keeps_identifier() {
        let fx = Fixture::new();
        let (worker_id, identifier) = fx.approved_worker("9876543210").await;

        let output = fx.decide(worker_id, "verified").await.unwrap();
        assert_eq!(output.credential.unwrap().identifier, identifier);
        assert_eq!(fx.repo.issued_identifiers(), vec![identifier]);
    }

    #[tokio::test]
    async fn test_rejection_clears_credential() {
        let fx = Fixture::new();
        let (worker_id, _) = fx.approved_worker("9876543210").await;

        let output = fx.decide(worker_id, "rejected").await.unwrap();
        assert_eq!(output.worker_status, WorkerStatus::Blocked);
        assert!(output.credential.is_none());

        let worker = fx.repo.worker(&worker_id);
        assert_eq!(worker.verification_status, VerificationStatus::Rejected);
        assert!(worker.worker_identifier.is_none());
        assert!(worker.qr_reference.is_none());
        assert!(worker.qr_payload.is_none());
        assert!(worker.verification_endpoint.is_none());
    }

    #[tokio::test]
    async fn test_decision_preconditions() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;

        let err = fx.decide(worker_id, "pending").await.unwrap_err();
        assert!(matches!(err, WorkforceError::InvalidDecision(_)));

        let err = fx.decide(WorkerId::new(), "verified").await.unwrap_err();
        assert!(matches!(err, WorkforceError::WorkerNotFound));

        let err = fx
            .decide_use_case()
            .execute(
                &UserId::new(),
                DecisionInput {
                    worker_id,
                    status: "verified".to_string(),
                    details: DecisionDetails::default(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::OfficerProfileMissing));

        let user = UserId::new();
        let partial = fx
            .onboarding()
            .step1(&user, step1("delivery", "9123456780"))
            .await
            .unwrap()
            .worker_id;
        let err = fx.decide(partial, "verified").await.unwrap_err();
        assert!(matches!(err, WorkforceError::OnboardingIncomplete));
    }

    #[tokio::test]
    async fn test_regenerate_uses_current_base_url() {
        let fx = Fixture::new();
        let (worker_id, identifier) = fx.approved_worker("9876543210").await;
        let moved = Arc::new(config().with_frontend_base_url("https://verify.bihar.gov.in/"));

        let credential = RegenerateQrUseCase::new(fx.repo.clone(), fx.media.clone(), moved)
            .execute(&fx.officer_user, &worker_id)
            .await
            .unwrap();
        assert_eq!(
            credential.qr_payload,
            format!("https://verify.bihar.gov.in/verify?id={identifier}")
        );
        assert_eq!(
            fx.repo.worker(&worker_id).qr_payload.as_deref(),
            Some(credential.qr_payload.as_str())
        );
        assert!(fx.repo.audit_actions().contains(&AuditEntry::QR_REGENERATED));
    }

    #[tokio::test]
    async fn test_regenerate_requires_verified_worker() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;

        let err = RegenerateQrUseCase::new(fx.repo.clone(), fx.media.clone(), fx.config.clone())
            .execute(&fx.officer_user, &worker_id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::NotVerified));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}

// ============================================================================
// Face check
// ============================================================================

#[cfg(test)]
mod face_check_tests {
    use super::*;

    fn matcher(similarity: f64, liveness_confidence: f64) -> Option<Arc<FixedFaceMatcher>> {
        Some(Arc::new(FixedFaceMatcher(FaceComparison {
            similarity,
            liveness_confidence,
        })))
    }

    async fn check(
        fx: &Fixture,
        matcher: Option<Arc<FixedFaceMatcher>>,
        worker_id: WorkerId,
    ) -> WorkforceResult<crate::application::FaceCheckOutput> {
        FaceCheckUseCase::new(fx.repo.clone(), fx.media.clone(), matcher, fx.config.clone())
            .execute(
                &fx.officer_user,
                FaceCheckInput {
                    worker_id,
                    live_face_image: format!("data:image/jpeg;base64,{IMAGE}"),
                },
            )
            .await
    }

    #[tokio::test]
    async fn test_match_is_recorded_on_pending_record() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;

        let output = check(&fx, matcher(92.5, 99.0), worker_id).await.unwrap();
        assert!(output.is_match);
        assert!(output.liveness_detected);
        assert_eq!(output.match_score, 92.5);

        // a second check reuses the same open record
        check(&fx, matcher(60.0, 99.0), worker_id).await.unwrap();
        let records = fx.repo.records_for_worker(&worker_id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, VerificationStatus::Pending);
        assert_eq!(records[0].face_match_score, Some(60.0));
        assert!(records[0].face_match_performed);
    }

    #[tokio::test]
    async fn test_failed_liveness_never_matches() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;

        let output = check(&fx, matcher(97.0, 40.0), worker_id).await.unwrap();
        assert!(!output.is_match);
        assert!(!output.liveness_detected);
        assert_eq!(output.match_score, 0.0);
    }

    #[tokio::test]
    async fn test_face_check_errors() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;

        let err = check(&fx, None, worker_id).await.unwrap_err();
        assert!(matches!(err, WorkforceError::FaceServiceUnavailable));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = check(&fx, matcher(90.0, 99.0), WorkerId::new()).await.unwrap_err();
        assert!(matches!(err, WorkforceError::WorkerNotFound));

        fx.repo.update_worker(&worker_id, |w| w.selfie_ref = None);
        let err = check(&fx, matcher(90.0, 99.0), worker_id).await.unwrap_err();
        assert!(matches!(err, WorkforceError::SelfieMissing));
    }
}

// ============================================================================
// Public lookup and complaints
// ============================================================================

#[cfg(test)]
mod lookup_tests {
    use super::*;

    const CLIENT: &[u8] = b"client-a";

    async fn find(fx: &Fixture, client: &[u8], query: LookupQuery) -> Option<crate::application::PublicWorker> {
        fx.lookup().execute(client, query).await.unwrap()
    }

    #[tokio::test]
    async fn test_verified_worker_found_every_way() {
        let fx = Fixture::with_config(WorkforceConfig {
            lookup_rate_limit: RateLimitConfig::new(100, 60),
            ..config()
        });
        let (_, identifier) = fx.approved_worker("9876543210").await;

        for query in [
            LookupQuery::Identifier(identifier.to_string()),
            LookupQuery::Mobile("+91 98765 43210".to_string()),
            LookupQuery::QrData(format!("{FRONTEND}/verify?id={identifier}")),
        ] {
            let worker = find(&fx, CLIENT, query).await.unwrap();
            assert_eq!(worker.identifier, identifier);
            assert!(worker.police_verified);
            assert!(worker.is_active);
            assert_eq!(worker.station_name.as_deref(), Some("Central Police Station"));
            assert!(worker.last_verified_at.is_some());
        }
    }

    #[tokio::test]
    async fn test_unverified_worker_is_never_found() {
        let fx = Fixture::with_config(WorkforceConfig {
            lookup_rate_limit: RateLimitConfig::new(100, 60),
            ..config()
        });
        let worker_id = fx.submitted_worker("9876543210").await;
        // a stale identifier left on a pending worker must not leak
        let stale = WorkerIdentifier::parse(&expected_identifier(9)).unwrap();
        fx.repo
            .update_worker(&worker_id, |w| w.worker_identifier = Some(stale.clone()));

        assert!(find(&fx, CLIENT, LookupQuery::Identifier(stale.to_string())).await.is_none());
        assert!(find(&fx, CLIENT, LookupQuery::Mobile("9876543210".to_string())).await.is_none());
        assert!(find(&fx, CLIENT, LookupQuery::Mobile("garbage".to_string())).await.is_none());
        assert!(find(&fx, CLIENT, LookupQuery::Identifier("' OR 1=1 --".to_string())).await.is_none());
    }

    #[tokio::test]
    async fn test_rejected_worker_disappears() {
        let fx = Fixture::new();
        let (worker_id, identifier) = fx.approved_worker("9876543210").await;
        fx.decide(worker_id, "rejected").await.unwrap();

        assert!(find(&fx, CLIENT, LookupQuery::Identifier(identifier.to_string())).await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_is_rate_limited_per_client() {
        let fx = Fixture::new();
        let query = || LookupQuery::Identifier(expected_identifier(1));

        for _ in 0..3 {
            fx.lookup().execute(CLIENT, query()).await.unwrap();
        }
        let err = fx.lookup().execute(CLIENT, query()).await.unwrap_err();
        assert!(matches!(err, WorkforceError::RateLimited { retry_after_secs } if retry_after_secs <= 60));
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);

        // other clients keep their own window
        fx.lookup().execute(b"client-b", query()).await.unwrap();
    }

    #[tokio::test]
    async fn test_purge_drops_closed_windows_of_every_client() {
        let fx = Fixture::new();
        fx.repo.hit(b"gone-a", 0).await.unwrap();
        fx.repo.hit(b"gone-b", 60_000).await.unwrap();
        fx.lookup()
            .execute(CLIENT, LookupQuery::Identifier(expected_identifier(1)))
            .await
            .unwrap();

        assert_eq!(fx.lookup().purge_expired_windows().await.unwrap(), 2);
        let remaining: Vec<Vec<u8>> = fx
            .repo
            .state
            .lock()
            .unwrap()
            .lookup_hits
            .keys()
            .map(|(key, _)| key.clone())
            .collect();
        assert_eq!(remaining, vec![CLIENT.to_vec()]);
    }

    #[test]
    fn test_query_takes_first_present_field() {
        let query = LookupQuery::from_parts(Some("  ".into()), Some("9876543210".into()), None);
        assert!(matches!(query, Some(LookupQuery::Mobile(_))));
        assert!(LookupQuery::from_parts(None, None, Some(String::new())).is_none());
    }

    fn complaint(worker: &str) -> FileComplaintInput {
        FileComplaintInput {
            worker_identifier: worker.to_string(),
            category: "misbehavior".to_string(),
            title: "Rude at delivery".to_string(),
            description: "Shouted at my father".to_string(),
            complainant_name: Some("Amit".to_string()),
            complainant_contact: None,
        }
    }

    #[tokio::test]
    async fn test_complaint_raises_risk() {
        let fx = Fixture::new();
        let (worker_id, identifier) = fx.approved_worker("9876543210").await;

        let filed = FileComplaintUseCase::new(fx.repo.clone())
            .execute(complaint(identifier.as_str()))
            .await
            .unwrap();
        assert!(filed.complaint_number.starts_with("CMP-"));

        let worker = fx.repo.worker(&worker_id);
        assert_eq!(worker.complaint_count, 1);
        assert_eq!(worker.risk_score, 10);
        assert!(fx.repo.audit_actions().contains(&AuditEntry::COMPLAINT_FILED));
    }

    #[tokio::test]
    async fn test_complaint_needs_verified_worker() {
        let fx = Fixture::new();
        fx.submitted_worker("9876543210").await;
        let use_case = FileComplaintUseCase::new(fx.repo.clone());

        let err = use_case.execute(complaint(&expected_identifier(1))).await.unwrap_err();
        assert!(matches!(err, WorkforceError::WorkerNotFound));

        let mut unknown = complaint(&expected_identifier(1));
        unknown.category = "noise".to_string();
        let err = use_case.execute(unknown).await.unwrap_err();
        assert!(matches!(err, WorkforceError::InvalidInput(_)));
    }
}

// ============================================================================
// Review, incidents, suspension
// ============================================================================

#[cfg(test)]
mod review_tests {
    use super::*;
    use crate::application::QueueStatus;

    fn report(severity: &str) -> IncidentReport {
        IncidentReport {
            title: "Fake KYC attempt".to_string(),
            description: "Collected Aadhaar photocopies without consent".to_string(),
            incident_type: "fraud".to_string(),
            severity: Severity::parse(severity),
            incident_date: Utc::now() - Duration::days(1),
            location: Some("Kankarbagh".to_string()),
            action_taken: None,
        }
    }

    #[tokio::test]
    async fn test_queue_and_stats() {
        let fx = Fixture::new();
        fx.approved_worker("9876543210").await;
        let rejected = fx.submitted_worker("9123456780").await;
        fx.decide(rejected, "rejected").await.unwrap();
        let pending = fx.submitted_worker("9988776655").await;
        fx.onboarding()
            .step1(&UserId::new(), step1("delivery", "9090909090"))
            .await
            .unwrap();

        let review = ReviewUseCase::new(fx.repo.clone());
        let queue = review.queue().await.unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].worker.worker_id, pending);
        assert_eq!(queue[0].status, QueueStatus::Pending);

        let stats = review.stats().await.unwrap();
        assert_eq!((stats.pending, stats.approved, stats.rejected), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_search_and_detail() {
        let fx = Fixture::new();
        let (worker_id, identifier) = fx.approved_worker("9876543210").await;
        let review = ReviewUseCase::new(fx.repo.clone());

        assert!(review.search("   ").await.unwrap().is_empty());
        assert_eq!(review.search("sita").await.unwrap().len(), 1);
        assert_eq!(review.search("43210").await.unwrap().len(), 1);
        assert_eq!(review.search(identifier.as_str()).await.unwrap().len(), 1);

        let detail = review.detail(&worker_id).await.unwrap();
        assert_eq!(detail.records.len(), 1);
        assert_eq!(detail.records[0].status, VerificationStatus::Verified);

        let err = review.detail(&WorkerId::new()).await.unwrap_err();
        assert!(matches!(err, WorkforceError::WorkerNotFound));
    }

    #[tokio::test]
    async fn test_officer_profile_counts_decisions() {
        let fx = Fixture::new();
        let (_, identifier) = fx.approved_worker("9876543210").await;
        let other = fx.submitted_worker("9123456780").await;
        fx.decide(other, "rejected").await.unwrap();

        let review = ReviewUseCase::new(fx.repo.clone());
        let profile = review.officer_profile(&fx.officer_user).await.unwrap();
        assert_eq!(profile.activity.total, 2);
        assert_eq!(profile.activity.verified, 1);
        assert_eq!(profile.activity.rejected, 1);
        assert!(
            profile
                .activity
                .recent
                .iter()
                .any(|d| d.worker_identifier.as_deref() == Some(identifier.as_str()))
        );

        let err = review.officer_profile(&UserId::new()).await.unwrap_err();
        assert!(matches!(err, WorkforceError::OfficerProfileMissing));
    }

    #[tokio::test]
    async fn test_incident_weighs_by_severity() {
        let fx = Fixture::new();
        let (worker_id, identifier) = fx.approved_worker("9876543210").await;
        let incidents = IncidentUseCase::new(fx.repo.clone());

        incidents
            .log(
                &fx.officer_user,
                LogIncidentInput {
                    worker: identifier.to_string(),
                    report: report("high"),
                },
            )
            .await
            .unwrap();
        incidents
            .log(
                &fx.officer_user,
                LogIncidentInput {
                    worker: worker_id.to_string(),
                    report: report("low"),
                },
            )
            .await
            .unwrap();

        assert_eq!(fx.repo.worker(&worker_id).risk_score, 35);
        let recent = incidents.recent().await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].incident.severity, Severity::Low);
        assert!(recent[0].incident.incident_number.starts_with("INC-"));
        assert_eq!(recent[0].worker_identifier.as_deref(), Some(identifier.as_str()));

        let err = incidents
            .log(
                &fx.officer_user,
                LogIncidentInput {
                    worker: "IND-WRK-DLV-1999-000001".to_string(),
                    report: report("low"),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::WorkerNotFound));
    }

    #[tokio::test]
    async fn test_suspension_kinds() {
        let fx = Fixture::new();
        let (worker_id, identifier) = fx.approved_worker("9876543210").await;
        let suspend = SuspendUseCase::new(fx.repo.clone());

        let err = suspend
            .execute(
                &fx.officer_user,
                SuspendInput {
                    worker: identifier.to_string(),
                    reason: " ".to_string(),
                    temporary: true,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::InvalidInput(_)));

        let out = suspend
            .execute(
                &fx.officer_user,
                SuspendInput {
                    worker: identifier.to_string(),
                    reason: "Under investigation".to_string(),
                    temporary: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(out.worker_status, WorkerStatus::Suspended);

        let out = suspend
            .execute(
                &fx.officer_user,
                SuspendInput {
                    worker: identifier.to_string(),
                    reason: "Fraud confirmed".to_string(),
                    temporary: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(out.worker_status, WorkerStatus::Blocked);
        assert_eq!(fx.repo.worker(&worker_id).status, WorkerStatus::Blocked);
    }
}

// ============================================================================
// Admin
// ============================================================================

#[cfg(test)]
mod admin_tests {
    use super::*;
    use crate::application::{AdminUseCase, StatusOverrideInput};

    fn admin(fx: &Fixture) -> AdminUseCase<MemoryWorkforceRepository> {
        AdminUseCase::new(fx.repo.clone())
    }

    #[tokio::test]
    async fn test_blacklist_blocks_worker_and_keeps_identifier() {
        let fx = Fixture::new();
        let admin_user = UserId::new();
        let (worker_id, identifier) = fx.approved_worker("9876543210").await;

        let worker = admin(&fx)
            .blacklist(&admin_user, identifier.as_str(), "  Forged documents  ")
            .await
            .unwrap();
        assert_eq!(worker.status, WorkerStatus::Blocked);
        assert_eq!(worker.blacklist_reason.as_deref(), Some("Forged documents"));
        assert!(worker.is_blacklisted());
        assert_eq!(worker.worker_identifier.as_ref(), Some(&identifier));

        let public = fx
            .lookup()
            .execute(b"client-a", LookupQuery::Identifier(identifier.to_string()))
            .await
            .unwrap()
            .unwrap();
        assert!(!public.is_active);

        let entries = fx.repo.state.lock().unwrap().audit_log.clone();
        let last = entries.last().unwrap();
        assert_eq!(last.action, AuditEntry::WORKER_BLACKLISTED);
        assert_eq!(last.actor, Some(admin_user));
        assert_eq!(last.resource_id, worker_id.to_string());
    }

    #[tokio::test]
    async fn test_blacklist_requires_reason_and_known_worker() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;

        let err = admin(&fx)
            .blacklist(&UserId::new(), &worker_id.to_string(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::InvalidInput(_)));

        let err = admin(&fx)
            .blacklist(&UserId::new(), &WorkerId::new().to_string(), "Fraud")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::WorkerNotFound));
        assert!(!fx.repo.worker(&worker_id).is_blacklisted());
    }

    #[tokio::test]
    async fn test_blacklisted_worker_cannot_be_approved_or_edit() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;
        fx.decide(worker_id, "rejected").await.unwrap();
        admin(&fx)
            .blacklist(&UserId::new(), &worker_id.to_string(), "Repeated fraud")
            .await
            .unwrap();

        let err = fx.decide(worker_id, "verified").await.unwrap_err();
        assert!(matches!(err, WorkforceError::WorkerBlacklisted));

        let user = fx.repo.worker(&worker_id).user_id;
        let err = fx.onboarding().step2(&user, step2()).await.unwrap_err();
        assert!(matches!(err, WorkforceError::WorkerBlacklisted));

        let err = admin(&fx)
            .override_status(
                &UserId::new(),
                StatusOverrideInput {
                    worker: worker_id.to_string(),
                    status: "inactive".to_string(),
                    reason: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::WorkerBlacklisted));

        let worker = fx.repo.worker(&worker_id);
        assert_eq!(worker.status, WorkerStatus::Blocked);
        assert!(worker.worker_identifier.is_none());
    }

    #[tokio::test]
    async fn test_status_override_rules() {
        let fx = Fixture::new();
        let admin_user = UserId::new();
        let pending = fx.submitted_worker("9876543210").await;
        let (verified, identifier) = fx.approved_worker("9123456780").await;

        let override_to = |worker: String, status: &str| StatusOverrideInput {
            worker,
            status: status.to_string(),
            reason: Some("Manual review".to_string()),
        };

        let err = admin(&fx)
            .override_status(&admin_user, override_to(pending.to_string(), "active"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::NotVerified));

        let err = admin(&fx)
            .override_status(&admin_user, override_to(pending.to_string(), "archived"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::InvalidInput(_)));

        let status = admin(&fx)
            .override_status(&admin_user, override_to(identifier.to_string(), "suspended"))
            .await
            .unwrap();
        assert_eq!(status, WorkerStatus::Suspended);
        assert_eq!(fx.repo.worker(&verified).status, WorkerStatus::Suspended);

        let status = admin(&fx)
            .override_status(&admin_user, override_to(verified.to_string(), "active"))
            .await
            .unwrap();
        assert_eq!(status, WorkerStatus::Active);
        assert!(fx.repo.audit_actions().contains(&AuditEntry::WORKER_STATUS_OVERRIDE));
    }

    #[tokio::test]
    async fn test_audit_log_pages_newest_first() {
        let fx = Fixture::new();
        let admin_user = UserId::new();
        let (worker_id, _) = fx.approved_worker("9876543210").await;
        admin(&fx)
            .blacklist(&admin_user, &worker_id.to_string(), "Fraud")
            .await
            .unwrap();

        let page = admin(&fx).audit_log(0, 100).await.unwrap();
        assert_eq!(page.total, 3);
        let actions: Vec<&str> = page.entries.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                AuditEntry::WORKER_BLACKLISTED,
                AuditEntry::POLICE_VERIFICATION,
                AuditEntry::ONBOARDING_COMPLETE,
            ]
        );

        let page = admin(&fx).audit_log(1, 1).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].action, AuditEntry::POLICE_VERIFICATION);

        // out-of-range paging is clamped rather than rejected
        let page = admin(&fx).audit_log(-5, 0).await.unwrap();
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].action, AuditEntry::WORKER_BLACKLISTED);
    }
}

// ============================================================================
// Repair
// ============================================================================

#[cfg(test)]
mod repair_tests {
    use super::*;

    #[tokio::test]
    async fn test_clear_unverified_restores_invariant() {
        let fx = Fixture::new();
        let pending = fx.submitted_worker("9876543210").await;
        let stale = WorkerIdentifier::parse(&expected_identifier(5)).unwrap();
        fx.repo.update_worker(&pending, |w| {
            w.worker_identifier = Some(stale.clone());
            w.qr_reference = Some("uploads/qrcodes/stale.png".to_string());
        });
        let (verified, identifier) = fx.approved_worker("9123456780").await;

        let report = fx.repair().clear_unverified().await.unwrap();
        assert_eq!(report.cleared, 1);
        assert!(fx.repo.worker(&pending).worker_identifier.is_none());
        assert!(fx.repo.worker(&pending).qr_reference.is_none());
        assert_eq!(fx.repo.worker(&verified).worker_identifier, Some(identifier));

        // idempotent
        assert_eq!(fx.repair().clear_unverified().await.unwrap().cleared, 0);
    }

    #[tokio::test]
    async fn test_backfill_only_touches_missing_qr() {
        let fx = Fixture::new();
        let (missing, identifier) = fx.approved_worker("9876543210").await;
        fx.approved_worker("9123456780").await;
        fx.repo.update_worker(&missing, |w| {
            w.qr_reference = None;
            w.qr_payload = None;
            w.verification_endpoint = None;
        });

        let report = fx.repair().backfill_qr().await.unwrap();
        assert_eq!(report.backfilled, 1);

        let worker = fx.repo.worker(&missing);
        assert_eq!(
            worker.qr_payload.as_deref(),
            Some(format!("{FRONTEND}/verify?id={identifier}").as_str())
        );
        assert!(fx.media.get(worker.qr_reference.as_deref().unwrap()).is_some());
    }

    #[tokio::test]
    async fn test_regenerate_rewrites_every_verified_worker() {
        let fx = Fixture::new();
        fx.approved_worker("9876543210").await;
        fx.approved_worker("9123456780").await;
        fx.submitted_worker("9988776655").await;

        let report = fx.repair().regenerate_qr().await.unwrap();
        assert_eq!(report.regenerated, 2);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_expire_lapsed_approvals() {
        let fx = Fixture::new();
        let (lapsed, _) = fx.approved_worker("9876543210").await;
        let (current, _) = fx.approved_worker("9123456780").await;
        {
            let mut state = fx.repo.state.lock().unwrap();
            for record in state.records.iter_mut().filter(|r| r.worker_id == lapsed) {
                record.expiry_date = Some(Utc::now() - Duration::days(1));
            }
        }

        let report = fx.repair().all().await.unwrap();
        assert_eq!(
            report,
            RepairReport {
                expired: 1,
                ..Default::default()
            }
        );

        let worker = fx.repo.worker(&lapsed);
        assert_eq!(worker.verification_status, VerificationStatus::Expired);
        assert!(worker.worker_identifier.is_none());
        assert!(fx.repo.worker(&current).is_verified());
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(test)]
mod router_tests {
    use super::*;
    use crate::presentation::router::{RouteGuard, workforce_router_generic};

    const SECRET: [u8; 32] = [9u8; 32];

    fn app(fx: &Fixture) -> axum::Router {
        workforce_router_generic(
            (*fx.repo).clone(),
            (*fx.media).clone(),
            None::<FixedFaceMatcher>,
            RouteGuard {
                repo: (*fx.repo).clone(),
                config: AuthConfig {
                    session_secret: SECRET,
                    ..AuthConfig::development()
                },
            },
            (*fx.config).clone(),
        )
    }

    /// Bearer token for a fresh session of `user_id`
    async fn token(fx: &Fixture, user_id: UserId, role: UserRole) -> String {
        let fingerprint = ClientFingerprint::new(
            sha256(USER_AGENT.as_bytes()),
            None,
            Some(USER_AGENT.to_string()),
        );
        let session = AuthSession::new(user_id, role, &fingerprint, Duration::hours(24));
        fx.repo.create_session(&session).await.unwrap();
        sign_token(&SECRET, &session.session_id.to_string())
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::USER_AGENT, USER_AGENT)
            .header("x-forwarded-for", "203.0.113.7");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_worker_routes_require_worker_session() {
        let fx = Fixture::new();
        let app = app(&fx);

        let response = app
            .clone()
            .oneshot(request("GET", "/workers/me", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let police = token(&fx, fx.officer_user, UserRole::Police).await;
        let response = app
            .clone()
            .oneshot(request("GET", "/workers/me", Some(&police), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let worker = token(&fx, UserId::new(), UserRole::Worker).await;
        let response = app
            .oneshot(request("GET", "/police/stats", Some(&worker), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_onboarding_over_http() {
        let fx = Fixture::new();
        let app = app(&fx);
        let worker = token(&fx, UserId::new(), UserRole::Worker).await;

        let response = app
            .clone()
            .oneshot(request("GET", "/workers/me", Some(&worker), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["hasProfile"], false);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/workers/onboard/step2",
                Some(&worker),
                Some(serde_json::json!({
                    "addressCurrent": "12 Station Road",
                    "city": "Patna",
                    "state": "Bihar",
                    "pincode": "800001",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["detail"], "Complete step 1 first");

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/workers/onboard/step1",
                Some(&worker),
                Some(serde_json::json!({
                    "category": "delivery",
                    "fullName": "Sita Devi",
                    "mobile": "9876543210",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["nextStep"], 2);

        let response = app
            .oneshot(request("GET", "/workers/me", Some(&worker), None))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["worker"]["workerIdentifier"], "Not Assigned");
        assert_eq!(body["worker"]["category"], "delivery_worker");
    }

    #[tokio::test]
    async fn test_approval_then_public_lookup() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;
        let app = app(&fx);
        let police = token(&fx, fx.officer_user, UserRole::Police).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/verify/worker",
                None,
                Some(serde_json::json!({ "mobile": "9876543210" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["found"], false);
        assert!(body["worker"].is_null());

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/police/verify",
                Some(&police),
                Some(serde_json::json!({
                    "workerId": worker_id.to_string(),
                    "status": "verified",
                    "remarks": "All documents in order",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let identifier = expected_identifier(1);
        assert_eq!(body["workerId"], identifier.as_str());
        assert_eq!(body["workerStatus"], "active");
        assert_eq!(
            body["qrCodeUrl"],
            format!("/uploads/qrcodes/{identifier}.png").as_str()
        );

        let response = app
            .oneshot(request("GET", &format!("/verify/worker/{identifier}"), None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["found"], true);
        assert_eq!(body["worker"]["workerId"], identifier.as_str());
        assert_eq!(body["worker"]["policeVerified"], true);
        assert!(body["worker"].get("mobile").is_none());
    }

    #[tokio::test]
    async fn test_lookup_without_subject_is_bad_request() {
        let fx = Fixture::new();
        let response = app(&fx)
            .oneshot(request("POST", "/verify/worker", None, Some(serde_json::json!({}))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lookup_rate_limit_over_http() {
        let fx = Fixture::new();
        let app = app(&fx);
        let uri = format!("/verify/worker/{}", expected_identifier(1));

        for _ in 0..3 {
            let response = app.clone().oneshot(request("GET", &uri, None, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = app.oneshot(request("GET", &uri, None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
    }

    #[tokio::test]
    async fn test_face_check_without_service_is_unavailable() {
        let fx = Fixture::new();
        let worker_id = fx.submitted_worker("9876543210").await;
        let police = token(&fx, fx.officer_user, UserRole::Police).await;

        let response = app(&fx)
            .oneshot(request(
                "POST",
                "/police/verify-face",
                Some(&police),
                Some(serde_json::json!({
                    "workerId": worker_id.to_string(),
                    "liveFaceImage": IMAGE,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin_session() {
        let fx = Fixture::new();
        let app = app(&fx);
        let (worker_id, _) = fx.approved_worker("9876543210").await;
        let blacklist_uri = format!("/admin/blacklist/{worker_id}");
        let reason = serde_json::json!({ "reason": "Forged documents" });

        let police = token(&fx, fx.officer_user, UserRole::Police).await;
        let response = app
            .clone()
            .oneshot(request("GET", "/admin/audit-logs", Some(&police), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let response = app
            .clone()
            .oneshot(request("POST", &blacklist_uri, Some(&police), Some(reason.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(!fx.repo.worker(&worker_id).is_blacklisted());

        let admin = token(&fx, UserId::new(), UserRole::Admin).await;
        let response = app
            .clone()
            .oneshot(request("POST", &blacklist_uri, Some(&admin), Some(reason)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["workerStatus"], "blocked");
        assert!(body["blacklistedAt"].is_i64());

        let response = app
            .clone()
            .oneshot(request("GET", "/admin/audit-logs?limit=2", Some(&admin), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["logs"].as_array().unwrap().len(), 2);
        assert_eq!(body["logs"][0]["action"], "worker_blacklisted");
        assert_eq!(body["logs"][0]["resourceId"], worker_id.to_string());

        let response = app
            .oneshot(request(
                "POST",
                "/admin/workers/status",
                Some(&admin),
                Some(serde_json::json!({
                    "workerId": worker_id.to_string(),
                    "status": "active",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["detail"], "Worker is blacklisted");
    }
}

// ============================================================================
// PostgreSQL
// ============================================================================

#[cfg(all(test, feature = "postgres-tests"))]
mod postgres_tests {
    use super::*;
    use crate::domain::entity::worker::WorkerOwner;
    use crate::domain::value_object::{status::Decision, worker_category::WorkerCategory};
    use crate::infra::PgWorkforceRepository;
    use sqlx::PgPool;

    async fn insert_user(pool: &PgPool, mobile: &str) -> UserId {
        let user_id = UserId::new();
        sqlx::query(
            "INSERT INTO users (id, full_name, mobile, role, password_hash) \
             VALUES ($1, 'Sita Devi', $2, 'worker', 'unused')",
        )
        .bind(user_id.as_uuid())
        .bind(mobile)
        .execute(pool)
        .await
        .unwrap();
        user_id
    }

    async fn insert_officer(pool: &PgPool) -> OfficerId {
        let user_id = UserId::new();
        sqlx::query(
            "INSERT INTO users (id, full_name, email, role, password_hash) \
             VALUES ($1, 'Inspector Rai', 'rai@police.test', 'police', 'unused')",
        )
        .bind(user_id.as_uuid())
        .execute(pool)
        .await
        .unwrap();

        let officer_id = OfficerId::new();
        sqlx::query(
            "INSERT INTO police_officers \
             (id, user_id, badge_number, station_code, station_name, district, state, rank) \
             VALUES ($1, $2, 'OFF-2025-00001', 'PS001', 'Central Police Station', \
                     'District HQ', 'Bihar', 'Inspector')",
        )
        .bind(officer_id.as_uuid())
        .bind(user_id.as_uuid())
        .execute(pool)
        .await
        .unwrap();
        officer_id
    }

    /// Worker row that has finished onboarding, read back from the database
    async fn submitted_worker(repo: &PgWorkforceRepository, pool: &PgPool, mobile: &str) -> Worker {
        let user_id = insert_user(pool, mobile).await;
        let mut worker = Worker::start(
            user_id,
            WorkerOwner {
                full_name: "Sita Devi".to_string(),
                email: None,
                mobile: Some(mobile.to_string()),
            },
            WorkerCategory::DeliveryWorker,
        );
        repo.save_onboarding(&worker, None, None).await.unwrap();

        let loaded_at = repo.find_worker(&worker.worker_id).await.unwrap().unwrap().updated_at;
        worker.submit(true, true);
        repo.save_onboarding(&worker, Some(loaded_at), None).await.unwrap();
        repo.find_worker(&worker.worker_id).await.unwrap().unwrap()
    }

    fn issue(worker: &Worker, officer_id: OfficerId, sequence: u32) -> DecisionCommit {
        let identifier = WorkerIdentifier::issue(worker.category, Utc::now().year(), sequence);
        DecisionCommit {
            record: VerificationRecord::decision(
                worker.worker_id,
                officer_id,
                Decision::Verified,
                DecisionDetails::default(),
                365,
            ),
            outcome: DecisionOutcome::Issue(IssuedCredential {
                qr_reference: format!("uploads/qrcodes/{identifier}.png"),
                qr_payload: format!("{FRONTEND}/verify?id={identifier}"),
                verification_endpoint: format!("{FRONTEND}/api/verify/worker/{identifier}"),
                identifier,
            }),
            audit: AuditEntry::new(
                None,
                AuditEntry::POLICE_VERIFICATION,
                "worker",
                worker.worker_id,
                serde_json::Value::Null,
            ),
        }
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    async fn test_second_issue_for_same_worker_is_rejected(pool: PgPool) {
        let repo = PgWorkforceRepository::new(pool.clone());
        let officer_id = insert_officer(&pool).await;
        let worker = submitted_worker(&repo, &pool, "9876543210").await;

        repo.commit_decision(&issue(&worker, officer_id, 1)).await.unwrap();
        let err = repo
            .commit_decision(&issue(&worker, officer_id, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::IdentifierAlreadyIssued));

        let stored = repo.find_worker(&worker.worker_id).await.unwrap().unwrap();
        assert_eq!(
            stored.worker_identifier.map(|i| i.as_str().to_string()),
            Some(expected_identifier(1))
        );
        // the losing decision's record was rolled back with it
        assert_eq!(repo.records_for_worker(&worker.worker_id).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    async fn test_taken_sequence_maps_to_retryable_error(pool: PgPool) {
        let repo = PgWorkforceRepository::new(pool.clone());
        let officer_id = insert_officer(&pool).await;
        let first = submitted_worker(&repo, &pool, "9876543210").await;
        let second = submitted_worker(&repo, &pool, "9123456780").await;

        repo.commit_decision(&issue(&first, officer_id, 1)).await.unwrap();
        let prefix = WorkerIdentifier::prefix(second.category, Utc::now().year());
        assert_eq!(repo.next_identifier_sequence(&prefix).await.unwrap(), 2);

        let err = repo
            .commit_decision(&issue(&second, officer_id, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::SequenceTaken));
        let stored = repo.find_worker(&second.worker_id).await.unwrap().unwrap();
        assert!(stored.worker_identifier.is_none());
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    async fn test_stale_onboarding_write_is_refused(pool: PgPool) {
        let repo = PgWorkforceRepository::new(pool.clone());
        let officer_id = insert_officer(&pool).await;
        let stale = submitted_worker(&repo, &pool, "9876543210").await;

        repo.commit_decision(&issue(&stale, officer_id, 1)).await.unwrap();

        let mut edited = stale.clone();
        edited.city = Some("Gaya".to_string());
        let err = repo
            .save_onboarding(&edited, Some(stale.updated_at), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::StaleWorker));

        let stored = repo.find_worker(&stale.worker_id).await.unwrap().unwrap();
        assert!(stored.worker_identifier.is_some());
        assert_eq!(stored.verification_status, VerificationStatus::Verified);
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    async fn test_purge_sweeps_every_client(pool: PgPool) {
        let repo = PgWorkforceRepository::new(pool);
        repo.hit(b"gone-a", 0).await.unwrap();
        repo.hit(b"gone-b", 60_000).await.unwrap();
        repo.hit(b"current", 120_000).await.unwrap();

        assert_eq!(repo.purge_windows_before(120_000).await.unwrap(), 2);
        assert_eq!(repo.hit(b"current", 120_000).await.unwrap(), 2);
    }
}

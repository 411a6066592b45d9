//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use kernel::id::WorkerId;
use std::sync::Arc;

use auth::CurrentUser;
use platform::client::{ClientAddr, extract_anonymous_fingerprint};

use crate::application::{
    AdminUseCase, DecideUseCase, DecisionInput, FaceCheckInput, FaceCheckUseCase, FileComplaintInput,
    FileComplaintUseCase, IncidentUseCase, LogIncidentInput, LookupQuery, OnboardingUseCase,
    PublicLookupUseCase, RegenerateQrUseCase, ReviewUseCase, Step1Input, Step2Input, Step3Input,
    StatusOverrideInput, Step4Input, Step6Input, StepOutput, SubmissionOutput, SuspendInput,
    SuspendUseCase, WorkerProfileUseCase, WorkforceConfig,
};
use crate::domain::entity::{
    incident::IncidentReport, verification_record::DecisionDetails, worker::AepsProfile,
};
use crate::domain::gateway::{FaceMatcher, MediaStore};
use crate::domain::repository::WorkforceStore;
use crate::domain::value_object::severity::Severity;
use crate::error::{WorkforceError, WorkforceResult};
use crate::presentation::dto::{
    AuditLogQuery, AuditLogResponse, AuditLogView, BlacklistRequest, BlacklistResponse,
    ComplaintRequest, ComplaintResponse, CredentialResponse, DecisionRequest, DecisionResponse,
    FaceCheckRequest, FaceCheckResponse, IncidentRequest, IncidentView, LookupRequest,
    LookupResponse, OfficerProfileResponse, OnboardingStatusResponse, QueueItem, RecordView,
    ReviewWorkerView, SearchQuery, StatsResponse, Step1Request, Step2Request, Step3Request,
    StatusOverrideRequest, Step4Request, Step5Request, Step6Request, StepResponse,
    SubmissionResponse, SuspendRequest, SuspendResponse, VerificationStatusResponse, WorkerDetailResponse, WorkerProfileResponse,
    WorkerView, media_url,
};

/// Shared state for workforce handlers
pub struct WorkforceAppState<R, M, F>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub media: Arc<M>,
    /// `None` when no face-matching service is configured
    pub face: Option<Arc<F>>,
    pub config: Arc<WorkforceConfig>,
}

impl<R, M, F> Clone for WorkforceAppState<R, M, F>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            media: self.media.clone(),
            face: self.face.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, M, F> WorkforceAppState<R, M, F>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    fn onboarding(&self) -> OnboardingUseCase<R, M> {
        OnboardingUseCase::new(self.repo.clone(), self.media.clone(), self.config.clone())
    }
}

fn step_response(output: StepOutput) -> Json<StepResponse> {
    Json(StepResponse {
        success: true,
        worker_id: output.worker_id.to_string(),
        next_step: output.next_step,
        file_path: output.selfie_ref,
    })
}

fn submission_response(output: SubmissionOutput) -> Json<SubmissionResponse> {
    Json(SubmissionResponse {
        success: true,
        worker_id: output.worker_id.to_string(),
        status: output.status.code().to_string(),
        verification_status: output.verification_status.code().to_string(),
        message: "Application submitted for police verification",
    })
}

// ============================================================================
// Onboarding
// ============================================================================

/// POST /api/workers/onboard/step1
pub async fn onboard_step1<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<Step1Request>,
) -> WorkforceResult<Json<StepResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let output = state
        .onboarding()
        .step1(
            &user.user_id,
            Step1Input {
                category: req.category,
                full_name: req.full_name,
                mobile: req.mobile,
            },
        )
        .await?;
    Ok(step_response(output))
}

/// POST /api/workers/onboard/step2
pub async fn onboard_step2<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<Step2Request>,
) -> WorkforceResult<Json<StepResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let output = state
        .onboarding()
        .step2(
            &user.user_id,
            Step2Input {
                address_current: req.address_current,
                city: req.city,
                state: req.state,
                pincode: req.pincode,
            },
        )
        .await?;
    Ok(step_response(output))
}

/// POST /api/workers/onboard/step3
pub async fn onboard_step3<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<Step3Request>,
) -> WorkforceResult<Json<StepResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let output = state
        .onboarding()
        .step3(
            &user.user_id,
            Step3Input {
                selfie_image: req.selfie_image,
            },
        )
        .await?;
    Ok(step_response(output))
}

/// POST /api/workers/onboard/step4
pub async fn onboard_step4<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<Step4Request>,
) -> WorkforceResult<Json<StepResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let output = state
        .onboarding()
        .step4(
            &user.user_id,
            Step4Input {
                aadhaar_reference: req.aadhaar_reference,
            },
        )
        .await?;
    Ok(step_response(output))
}

/// POST /api/workers/onboard/step5
pub async fn onboard_step5<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<Step5Request>,
) -> WorkforceResult<Json<StepResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let output = state
        .onboarding()
        .step5(
            &user.user_id,
            AepsProfile {
                bank_affiliation: req.bank_affiliation,
                bc_affiliation: req.bc_affiliation,
                operator_id: req.aeps_operator_id,
                service_region: req.service_region,
                device_info: req.aeps_device_info,
                transaction_role: req.transaction_role,
            },
        )
        .await?;
    Ok(step_response(output))
}

/// POST /api/workers/onboard/step6
pub async fn onboard_step6<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<Step6Request>,
) -> WorkforceResult<Json<SubmissionResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let output = state
        .onboarding()
        .step6(
            &user.user_id,
            Step6Input {
                consent_given: req.consent_given,
                declaration_signed: req.declaration_signed,
            },
        )
        .await?;
    Ok(submission_response(output))
}

/// POST /api/workers/onboard/complete
pub async fn onboard_complete<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<Step6Request>,
) -> WorkforceResult<Json<SubmissionResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let output = state
        .onboarding()
        .complete(
            &user.user_id,
            Step6Input {
                consent_given: req.consent_given,
                declaration_signed: req.declaration_signed,
            },
        )
        .await?;
    Ok(submission_response(output))
}

// ============================================================================
// Worker self-service
// ============================================================================

/// GET /api/workers/me
pub async fn worker_me<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
) -> WorkforceResult<Json<WorkerProfileResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let worker = WorkerProfileUseCase::new(state.repo.clone())
        .profile(&user.user_id)
        .await?;

    Ok(Json(WorkerProfileResponse {
        has_profile: worker.is_some(),
        worker: worker.as_ref().map(WorkerView::from),
    }))
}

/// GET /api/workers/verification/status
pub async fn verification_status<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
) -> WorkforceResult<Json<VerificationStatusResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let output = WorkerProfileUseCase::new(state.repo.clone())
        .verification_status(&user.user_id)
        .await?;
    Ok(Json(output.into()))
}

/// GET /api/workers/onboarding/status
pub async fn onboarding_status<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
) -> WorkforceResult<Json<OnboardingStatusResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let worker = WorkerProfileUseCase::new(state.repo.clone())
        .profile(&user.user_id)
        .await?;
    Ok(Json(worker.as_ref().into()))
}

// ============================================================================
// Police review
// ============================================================================

/// GET /api/police/verification-queue
pub async fn verification_queue<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
) -> WorkforceResult<Json<Vec<QueueItem>>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let entries = ReviewUseCase::new(state.repo.clone()).queue().await?;
    Ok(Json(entries.iter().map(QueueItem::from).collect()))
}

/// GET /api/police/workers/by-id/{id}
pub async fn worker_detail<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    Path(worker_id): Path<WorkerId>,
) -> WorkforceResult<Json<WorkerDetailResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let output = ReviewUseCase::new(state.repo.clone())
        .detail(&worker_id)
        .await?;

    Ok(Json(WorkerDetailResponse {
        worker: ReviewWorkerView::from(&output.worker),
        verifications: output.records.iter().map(RecordView::from).collect(),
        complaints: output.complaints.iter().map(Into::into).collect(),
    }))
}

/// GET /api/police/workers/search?q=
pub async fn search_workers<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    Query(query): Query<SearchQuery>,
) -> WorkforceResult<Json<Vec<QueueItem>>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let workers = ReviewUseCase::new(state.repo.clone())
        .search(&query.q)
        .await?;
    Ok(Json(workers.iter().map(QueueItem::from).collect()))
}

/// POST /api/police/verify-face
pub async fn verify_face<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<FaceCheckRequest>,
) -> WorkforceResult<Json<FaceCheckResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let use_case = FaceCheckUseCase::new(
        state.repo.clone(),
        state.media.clone(),
        state.face.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(
            &user.user_id,
            FaceCheckInput {
                worker_id: req.worker_id,
                live_face_image: req.live_face_image,
            },
        )
        .await?;
    Ok(Json(output.into()))
}

/// POST /api/police/verify
pub async fn decide<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<DecisionRequest>,
) -> WorkforceResult<Json<DecisionResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let use_case = DecideUseCase::new(state.repo.clone(), state.media.clone(), state.config.clone());

    let output = use_case
        .execute(
            &user.user_id,
            DecisionInput {
                worker_id: req.worker_id,
                status: req.status,
                details: DecisionDetails {
                    remarks: req.remarks,
                    rejection_reason: req.rejection_reason,
                    external_ref: req.external_verification_ref,
                    external_system: req.external_system,
                    certificate_number: req.certificate_number,
                    certificate_url: req.certificate_url,
                },
            },
        )
        .await?;

    let credential = output.credential.as_ref();
    Ok(Json(DecisionResponse {
        success: true,
        verification_id: output.verification_id.to_string(),
        worker_status: output.worker_status.code(),
        worker_id: credential.map(|c| c.identifier.to_string()),
        qr_code_url: credential.map(|c| media_url(&c.qr_reference)),
        verification_endpoint: credential.map(|c| c.verification_endpoint.clone()),
    }))
}

/// POST /api/police/regenerate-qr/{id}
pub async fn regenerate_qr<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Path(worker_id): Path<WorkerId>,
) -> WorkforceResult<Json<CredentialResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let use_case =
        RegenerateQrUseCase::new(state.repo.clone(), state.media.clone(), state.config.clone());
    let credential = use_case.execute(&user.user_id, &worker_id).await?;
    Ok(Json(CredentialResponse::from(&credential)))
}

/// GET /api/police/stats
pub async fn stats<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
) -> WorkforceResult<Json<StatsResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let stats = ReviewUseCase::new(state.repo.clone()).stats().await?;
    Ok(Json(stats.into()))
}

/// GET /api/police/me
pub async fn officer_me<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
) -> WorkforceResult<Json<OfficerProfileResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let output = ReviewUseCase::new(state.repo.clone())
        .officer_profile(&user.user_id)
        .await?;
    Ok(Json(OfficerProfileResponse::from(&output)))
}

// ============================================================================
// Incidents and suspension
// ============================================================================

/// GET /api/police/incidents
pub async fn incidents<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
) -> WorkforceResult<Json<Vec<IncidentView>>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let listings = IncidentUseCase::new(state.repo.clone()).recent().await?;
    Ok(Json(listings.iter().map(IncidentView::from).collect()))
}

/// POST /api/police/incident
pub async fn log_incident<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<IncidentRequest>,
) -> WorkforceResult<(StatusCode, Json<IncidentView>)>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let incident = IncidentUseCase::new(state.repo.clone())
        .log(
            &user.user_id,
            LogIncidentInput {
                worker: req.worker_id,
                report: IncidentReport {
                    title: req.title,
                    description: req.description,
                    incident_type: req.incident_type,
                    severity: Severity::parse(&req.severity),
                    incident_date: req.incident_date.unwrap_or_else(Utc::now),
                    location: req.location,
                    action_taken: req.action_taken,
                },
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(IncidentView::from(&incident))))
}

/// POST /api/police/suspend
pub async fn suspend<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<SuspendRequest>,
) -> WorkforceResult<Json<SuspendResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let output = SuspendUseCase::new(state.repo.clone())
        .execute(
            &user.user_id,
            SuspendInput {
                worker: req.worker_id,
                reason: req.reason,
                temporary: req.temporary,
            },
        )
        .await?;

    Ok(Json(SuspendResponse {
        success: true,
        worker_status: output.worker_status.code(),
    }))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/audit-logs
pub async fn audit_logs<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    Query(query): Query<AuditLogQuery>,
) -> WorkforceResult<Json<AuditLogResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let page = AdminUseCase::new(state.repo.clone())
        .audit_log(query.skip, query.limit)
        .await?;

    Ok(Json(AuditLogResponse {
        logs: page.entries.iter().map(AuditLogView::from).collect(),
        total: page.total,
    }))
}

/// POST /api/admin/blacklist/{id}
pub async fn blacklist<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Path(worker): Path<String>,
    Json(req): Json<BlacklistRequest>,
) -> WorkforceResult<Json<BlacklistResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let worker = AdminUseCase::new(state.repo.clone())
        .blacklist(&user.user_id, &worker, &req.reason)
        .await?;

    Ok(Json(BlacklistResponse {
        success: true,
        worker_status: worker.status.code(),
        blacklisted_at: worker.blacklisted_at.map(|at| at.timestamp_millis()),
    }))
}

/// POST /api/admin/workers/status
pub async fn override_status<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    user: CurrentUser,
    Json(req): Json<StatusOverrideRequest>,
) -> WorkforceResult<Json<SuspendResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let status = AdminUseCase::new(state.repo.clone())
        .override_status(
            &user.user_id,
            StatusOverrideInput {
                worker: req.worker_id,
                status: req.status,
                reason: req.reason,
            },
        )
        .await?;

    Ok(Json(SuspendResponse {
        success: true,
        worker_status: status.code(),
    }))
}

// ============================================================================
// Public
// ============================================================================

async fn run_lookup<R>(
    repo: Arc<R>,
    config: Arc<WorkforceConfig>,
    client_ip: Option<std::net::IpAddr>,
    headers: &HeaderMap,
    query: Option<LookupQuery>,
) -> WorkforceResult<Json<LookupResponse>>
where
    R: WorkforceStore,
{
    let fingerprint = extract_anonymous_fingerprint(headers, client_ip);
    let use_case = PublicLookupUseCase::new(repo, config);

    let Some(query) = query else {
        use_case.throttle(&fingerprint.throttle_key()).await?;
        return Err(WorkforceError::InvalidInput(
            "Provide workerId, mobile or qrData".to_string(),
        ));
    };

    let worker = use_case.execute(&fingerprint.throttle_key(), query).await?;
    Ok(Json(worker.into()))
}

/// GET /api/verify/worker/{identifier}
pub async fn lookup_by_path<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
    Path(identifier): Path<String>,
) -> WorkforceResult<Json<LookupResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let query = LookupQuery::from_parts(Some(identifier), None, None);
    run_lookup(state.repo.clone(), state.config.clone(), client_ip, &headers, query).await
}

/// POST /api/verify/worker
pub async fn lookup<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
    Json(req): Json<LookupRequest>,
) -> WorkforceResult<Json<LookupResponse>>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let query = LookupQuery::from_parts(req.worker_id, req.mobile, req.qr_data);
    run_lookup(state.repo.clone(), state.config.clone(), client_ip, &headers, query).await
}

/// POST /api/verify/complaints
pub async fn file_complaint<R, M, F>(
    State(state): State<WorkforceAppState<R, M, F>>,
    Json(req): Json<ComplaintRequest>,
) -> WorkforceResult<(StatusCode, Json<ComplaintResponse>)>
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
{
    let complaint = FileComplaintUseCase::new(state.repo.clone())
        .execute(FileComplaintInput {
            worker_identifier: req.worker_id,
            category: req.category,
            title: req.title,
            description: req.description,
            complainant_name: req.complainant_name,
            complainant_contact: req.complainant_contact,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ComplaintResponse {
            success: true,
            complaint_number: complaint.complaint_number,
            status: complaint.status.code(),
        }),
    ))
}

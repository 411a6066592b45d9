//! Onboarding Use Case
//!
//! Sequential form steps 1-6. Each step persists its fields, advances the
//! step counter and keeps a snapshot; the last step submits the worker for
//! police review.

use std::sync::Arc;

use auth::Mobile;
use kernel::id::{UserId, WorkerId};
use serde_json::json;

use crate::application::config::WorkforceConfig;
use crate::domain::entity::audit_entry::AuditEntry;
use crate::domain::entity::worker::{AepsProfile, FINAL_STEP, Worker, WorkerOwner};
use crate::domain::gateway::MediaStore;
use crate::domain::repository::WorkerRepository;
use crate::domain::services::decode_image;
use crate::domain::value_object::status::{VerificationStatus, WorkerStatus};
use crate::domain::value_object::worker_category::WorkerCategory;
use crate::error::{WorkforceError, WorkforceResult};

const MAX_NAME_LENGTH: usize = 200;
const MAX_FIELD_LENGTH: usize = 500;

pub struct Step1Input {
    pub category: String,
    pub full_name: String,
    pub mobile: String,
}

pub struct Step2Input {
    pub address_current: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

pub struct Step3Input {
    /// Base64 image, optionally as a data URI
    pub selfie_image: String,
}

pub struct Step4Input {
    pub aadhaar_reference: String,
}

pub struct Step6Input {
    pub consent_given: bool,
    pub declaration_signed: bool,
}

/// Result of an intermediate step
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub worker_id: WorkerId,
    pub next_step: u8,
    pub selfie_ref: Option<String>,
}

/// Result of submitting for verification
#[derive(Debug, Clone)]
pub struct SubmissionOutput {
    pub worker_id: WorkerId,
    pub status: WorkerStatus,
    pub verification_status: VerificationStatus,
}

/// Onboarding use case
pub struct OnboardingUseCase<R, M>
where
    R: WorkerRepository,
    M: MediaStore,
{
    repo: Arc<R>,
    media: Arc<M>,
    config: Arc<WorkforceConfig>,
}

impl<R, M> OnboardingUseCase<R, M>
where
    R: WorkerRepository,
    M: MediaStore,
{
    pub fn new(repo: Arc<R>, media: Arc<M>, config: Arc<WorkforceConfig>) -> Self {
        Self {
            repo,
            media,
            config,
        }
    }

    /// Step 1: category, name and mobile. Creates the worker.
    pub async fn step1(&self, user_id: &UserId, input: Step1Input) -> WorkforceResult<StepOutput> {
        let category = WorkerCategory::parse(&input.category).ok_or_else(|| {
            WorkforceError::InvalidInput(format!("Unknown worker category '{}'", input.category))
        })?;
        let full_name = bounded("Full name", &input.full_name, MAX_NAME_LENGTH)?;
        let mobile = Mobile::new(&input.mobile)?;

        let existing = self.repo.find_worker_by_user(user_id).await?;
        let loaded_at = existing.as_ref().map(|w| w.updated_at);
        let mut worker = match existing {
            Some(mut worker) => {
                ensure_editable(&worker)?;
                worker.category = Some(category);
                worker.owner.full_name = full_name;
                worker.owner.mobile = Some(mobile.to_string());
                worker
            }
            None => Worker::start(
                *user_id,
                WorkerOwner {
                    full_name,
                    email: None,
                    mobile: Some(mobile.to_string()),
                },
                category,
            ),
        };

        worker.record_step(
            1,
            json!({
                "category": category.code(),
                "fullName": worker.owner.full_name,
                "mobile": mobile.as_str(),
            }),
        );
        self.repo.save_onboarding(&worker, loaded_at, None).await?;

        tracing::info!(
            worker_id = %worker.worker_id,
            category = %category,
            mobile = %mobile.masked(),
            "Onboarding step 1 saved"
        );

        Ok(step_output(&worker, None))
    }

    /// Step 2: current address
    pub async fn step2(&self, user_id: &UserId, input: Step2Input) -> WorkforceResult<StepOutput> {
        let mut worker = self.load_for_step(user_id, 2).await?;
        let loaded_at = Some(worker.updated_at);

        let address = bounded("Address", &input.address_current, MAX_FIELD_LENGTH)?;
        let city = bounded("City", &input.city, MAX_NAME_LENGTH)?;
        let state = bounded("State", &input.state, MAX_NAME_LENGTH)?;
        let pincode = input.pincode.trim().to_string();
        if pincode.len() != 6 || !pincode.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WorkforceError::InvalidInput(
                "Pincode must have 6 digits".to_string(),
            ));
        }

        let snapshot = json!({
            "addressCurrent": address,
            "city": city,
            "state": state,
            "pincode": pincode,
        });
        worker.address_current = Some(address);
        worker.city = Some(city);
        worker.state = Some(state);
        worker.pincode = Some(pincode);
        worker.record_step(2, snapshot);
        self.repo.save_onboarding(&worker, loaded_at, None).await?;

        tracing::info!(worker_id = %worker.worker_id, "Onboarding step 2 saved");
        Ok(step_output(&worker, None))
    }

    /// Step 3: selfie upload
    pub async fn step3(&self, user_id: &UserId, input: Step3Input) -> WorkforceResult<StepOutput> {
        let mut worker = self.load_for_step(user_id, 3).await?;
        let loaded_at = Some(worker.updated_at);

        let image = decode_image(&input.selfie_image, self.config.max_image_bytes)?;
        let reference = self.media.save_selfie(&worker.worker_id, &image).await?;

        worker.selfie_ref = Some(reference.clone());
        // the snapshot keeps the reference, never the image
        worker.record_step(3, json!({ "selfieSaved": true, "filePath": reference }));
        self.repo.save_onboarding(&worker, loaded_at, None).await?;

        tracing::info!(
            worker_id = %worker.worker_id,
            bytes = image.len(),
            selfie = %reference,
            "Onboarding step 3 saved"
        );
        Ok(step_output(&worker, Some(reference)))
    }

    /// Step 4: Aadhaar reference
    pub async fn step4(&self, user_id: &UserId, input: Step4Input) -> WorkforceResult<StepOutput> {
        let mut worker = self.load_for_step(user_id, 4).await?;
        let loaded_at = Some(worker.updated_at);

        let reference = bounded("Aadhaar reference", &input.aadhaar_reference, 64)?;
        worker.aadhaar_reference = Some(reference.clone());
        worker.record_step(4, json!({ "aadhaarReference": reference }));
        self.repo.save_onboarding(&worker, loaded_at, None).await?;

        tracing::info!(worker_id = %worker.worker_id, "Onboarding step 4 saved");
        Ok(step_output(&worker, None))
    }

    /// Step 5: AePS details, kept only for AePS agents
    pub async fn step5(&self, user_id: &UserId, input: AepsProfile) -> WorkforceResult<StepOutput> {
        let mut worker = self.load_for_step(user_id, 5).await?;
        let loaded_at = Some(worker.updated_at);

        let profile = AepsProfile {
            bank_affiliation: optional(input.bank_affiliation),
            bc_affiliation: optional(input.bc_affiliation),
            operator_id: optional(input.operator_id),
            service_region: optional(input.service_region),
            device_info: optional(input.device_info),
            transaction_role: optional(input.transaction_role),
        };
        let snapshot = json!({
            "bankAffiliation": profile.bank_affiliation,
            "bcAffiliation": profile.bc_affiliation,
            "aepsOperatorId": profile.operator_id,
            "serviceRegion": profile.service_region,
            "aepsDeviceInfo": profile.device_info,
            "transactionRole": profile.transaction_role,
        });

        if worker.category.is_some_and(|c| c.is_aeps()) {
            worker.aeps = profile;
        }
        worker.record_step(5, snapshot);
        self.repo.save_onboarding(&worker, loaded_at, None).await?;

        tracing::info!(worker_id = %worker.worker_id, "Onboarding step 5 saved");
        Ok(step_output(&worker, None))
    }

    /// Step 6: consent, then submit for verification
    pub async fn step6(
        &self,
        user_id: &UserId,
        input: Step6Input,
    ) -> WorkforceResult<SubmissionOutput> {
        let worker = self.load_for_step(user_id, FINAL_STEP).await?;
        self.submit(user_id, worker, input).await
    }

    /// Submit after checking every required field instead of the step order
    pub async fn complete(
        &self,
        user_id: &UserId,
        input: Step6Input,
    ) -> WorkforceResult<SubmissionOutput> {
        let worker = self
            .repo
            .find_worker_by_user(user_id)
            .await?
            .ok_or(WorkforceError::StepOutOfOrder(1))?;
        ensure_editable(&worker)?;

        let missing = worker.missing_required_fields();
        if !missing.is_empty() {
            return Err(WorkforceError::MissingFields(missing));
        }

        self.submit(user_id, worker, input).await
    }

    async fn submit(
        &self,
        user_id: &UserId,
        mut worker: Worker,
        input: Step6Input,
    ) -> WorkforceResult<SubmissionOutput> {
        if !input.consent_given {
            return Err(WorkforceError::ConsentRequired);
        }

        let loaded_at = Some(worker.updated_at);
        worker.submit(input.consent_given, input.declaration_signed);
        worker.record_step(
            FINAL_STEP,
            json!({
                "consentGiven": input.consent_given,
                "declarationSigned": input.declaration_signed,
            }),
        );

        let audit = AuditEntry::new(
            Some(*user_id),
            AuditEntry::ONBOARDING_COMPLETE,
            "worker",
            worker.worker_id,
            json!({ "category": worker.category.map(|c| c.code()) }),
        );
        self.repo
            .save_onboarding(&worker, loaded_at, Some(&audit))
            .await?;

        tracing::info!(
            worker_id = %worker.worker_id,
            "Onboarding submitted for police verification"
        );

        Ok(SubmissionOutput {
            worker_id: worker.worker_id,
            status: worker.status,
            verification_status: worker.verification_status,
        })
    }

    /// Worker eligible for step `step`
    async fn load_for_step(&self, user_id: &UserId, step: u8) -> WorkforceResult<Worker> {
        let previous = step - 1;
        let worker = self
            .repo
            .find_worker_by_user(user_id)
            .await?
            .ok_or(WorkforceError::StepOutOfOrder(previous))?;

        ensure_editable(&worker)?;
        if worker.onboarding_step < previous {
            return Err(WorkforceError::StepOutOfOrder(previous));
        }
        Ok(worker)
    }
}

/// Submitted, verified and blacklisted applications are frozen
fn ensure_editable(worker: &Worker) -> WorkforceResult<()> {
    if worker.is_blacklisted() {
        return Err(WorkforceError::WorkerBlacklisted);
    }
    if worker.is_submitted() {
        return Err(WorkforceError::AlreadySubmitted);
    }
    if worker.is_verified() {
        return Err(WorkforceError::AlreadyVerified);
    }
    Ok(())
}

fn step_output(worker: &Worker, selfie_ref: Option<String>) -> StepOutput {
    StepOutput {
        worker_id: worker.worker_id,
        next_step: worker.onboarding_step + 1,
        selfie_ref,
    }
}

fn bounded(field: &str, value: &str, max: usize) -> WorkforceResult<String> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(WorkforceError::InvalidInput(format!(
            "{field} must be 1 to {max} characters"
        )));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

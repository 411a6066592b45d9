//! Decision Use Case
//!
//! Records an officer's approve/reject decision and, on approval, issues
//! the worker identifier and QR code.
//!
//! ## Issuance
//! The sequence is the next number for the `IND-WRK-{CAT}-{YEAR}-` prefix.
//! Two workers approved at once can pick the same number; the loser trips
//! the unique constraint and the whole decision is retried with a fresh
//! number. Two decisions on the same worker race on the conditional
//! update instead, and the loser is reported as a conflict.
//!
//! A new identifier's QR image is rendered before the commit but only
//! written once the commit has made the identifier this worker's.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use kernel::id::{UserId, VerificationId, WorkerId};
use serde_json::json;

use crate::application::config::WorkforceConfig;
use crate::application::credential::{CredentialIssuer, PreparedCredential};
use crate::domain::entity::audit_entry::AuditEntry;
use crate::domain::entity::verification_record::{DecisionDetails, VerificationRecord};
use crate::domain::entity::worker::{IssuedCredential, Worker};
use crate::domain::gateway::MediaStore;
use crate::domain::repository::{
    DecisionCommit, DecisionOutcome, OfficerDirectory, VerificationRepository, WorkerRepository,
};
use crate::domain::value_object::status::{Decision, WorkerStatus};
use crate::domain::value_object::worker_identifier::WorkerIdentifier;
use crate::error::{WorkforceError, WorkforceResult};

pub struct DecisionInput {
    pub worker_id: WorkerId,
    /// `verified` or `rejected`
    pub status: String,
    pub details: DecisionDetails,
}

#[derive(Debug, Clone)]
pub struct DecisionOutput {
    pub verification_id: VerificationId,
    pub worker_status: WorkerStatus,
    /// Present on approval
    pub credential: Option<IssuedCredential>,
}

pub struct DecideUseCase<R, M>
where
    R: WorkerRepository + OfficerDirectory + VerificationRepository,
    M: MediaStore,
{
    repo: Arc<R>,
    issuer: CredentialIssuer<M>,
    config: Arc<WorkforceConfig>,
}

impl<R, M> DecideUseCase<R, M>
where
    R: WorkerRepository + OfficerDirectory + VerificationRepository,
    M: MediaStore,
{
    pub fn new(repo: Arc<R>, media: Arc<M>, config: Arc<WorkforceConfig>) -> Self {
        Self {
            repo,
            issuer: CredentialIssuer::new(media, config.clone()),
            config,
        }
    }

    pub async fn execute(
        &self,
        officer_user: &UserId,
        input: DecisionInput,
    ) -> WorkforceResult<DecisionOutput> {
        let decision = Decision::parse(&input.status)
            .ok_or_else(|| WorkforceError::InvalidDecision(input.status.clone()))?;
        let officer = self
            .repo
            .find_officer(officer_user)
            .await?
            .ok_or(WorkforceError::OfficerProfileMissing)?;
        let worker = self
            .repo
            .find_worker(&input.worker_id)
            .await?
            .ok_or(WorkforceError::WorkerNotFound)?;
        if !worker.onboarding_complete() {
            return Err(WorkforceError::OnboardingIncomplete);
        }
        if decision == Decision::Verified && worker.is_blacklisted() {
            return Err(WorkforceError::WorkerBlacklisted);
        }

        let attempts = self.config.max_issue_attempts.max(1);
        for attempt in 1..=attempts {
            let (outcome, unstored) = self.outcome(decision, &worker).await?;
            let record = VerificationRecord::decision(
                worker.worker_id,
                officer.officer_id,
                decision,
                input.details.clone(),
                self.config.approval_validity_days,
            );
            let audit = AuditEntry::new(
                Some(*officer_user),
                AuditEntry::POLICE_VERIFICATION,
                "worker",
                worker.worker_id,
                json!({
                    "status": decision.verification_status().code(),
                    "remarks": input.details.remarks,
                    "externalRef": input.details.external_ref,
                    "verificationId": record.verification_id.to_string(),
                    "workerIdentifier": credential_of(&outcome).map(|c| c.identifier.to_string()),
                }),
            );
            let commit = DecisionCommit {
                record,
                outcome,
                audit,
            };

            match self.repo.commit_decision(&commit).await {
                Ok(()) => {
                    if let Some(prepared) = &unstored {
                        self.store_qr(prepared).await;
                    }
                    let credential = credential_of(&commit.outcome).cloned();
                    tracing::info!(
                        worker_id = %worker.worker_id,
                        officer = %officer.badge_number,
                        decision = %decision.verification_status(),
                        identifier = credential.as_ref().map(|c| c.identifier.as_str()),
                        "Verification decision recorded"
                    );
                    return Ok(DecisionOutput {
                        verification_id: commit.record.verification_id,
                        worker_status: decision.worker_status(),
                        credential,
                    });
                }
                Err(WorkforceError::SequenceTaken) => {
                    tracing::warn!(
                        worker_id = %worker.worker_id,
                        attempt,
                        "Identifier sequence taken, retrying"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Err(WorkforceError::SequenceExhausted(attempts))
    }

    /// Worker-side effect, minting an identifier only when none is held.
    /// A minted identifier comes back with its QR image still unstored.
    async fn outcome(
        &self,
        decision: Decision,
        worker: &Worker,
    ) -> WorkforceResult<(DecisionOutcome, Option<PreparedCredential>)> {
        if decision == Decision::Rejected {
            return Ok((DecisionOutcome::Reject, None));
        }

        match &worker.worker_identifier {
            Some(identifier) => {
                let credential = self.issuer.complete(worker, identifier).await?;
                Ok((DecisionOutcome::Keep(credential), None))
            }
            None => {
                let year = Utc::now().year();
                let prefix = WorkerIdentifier::prefix(worker.category, year);
                let sequence = self.repo.next_identifier_sequence(&prefix).await?;
                let identifier = WorkerIdentifier::issue(worker.category, year, sequence);
                let prepared = self.issuer.prepare(&identifier)?;
                Ok((DecisionOutcome::Issue(prepared.credential.clone()), Some(prepared)))
            }
        }
    }

    /// Runs after the commit; a failed write is logged for `regenerate-qr`
    async fn store_qr(&self, prepared: &PreparedCredential) {
        if let Err(err) = self.issuer.store(prepared).await {
            tracing::error!(
                identifier = %prepared.credential.identifier,
                error = %err,
                "QR image not stored after approval, regenerate it"
            );
        }
    }
}

fn credential_of(outcome: &DecisionOutcome) -> Option<&IssuedCredential> {
    match outcome {
        DecisionOutcome::Issue(credential) | DecisionOutcome::Keep(credential) => Some(credential),
        DecisionOutcome::Reject => None,
    }
}

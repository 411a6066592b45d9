//! File Complaint Use Case
//!
//! Anonymous citizens complain about a verified worker by identifier.
//! Unverified workers are reported as not found, as in the public lookup.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entity::audit_entry::AuditEntry;
use crate::domain::entity::complaint::Complaint;
use crate::domain::repository::{ComplaintRepository, WorkerRepository};
use crate::domain::value_object::complaint::ComplaintCategory;
use crate::domain::value_object::worker_identifier::WorkerIdentifier;
use crate::error::{WorkforceError, WorkforceResult};

pub struct FileComplaintInput {
    pub worker_identifier: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub complainant_name: Option<String>,
    pub complainant_contact: Option<String>,
}

pub struct FileComplaintUseCase<R>
where
    R: WorkerRepository + ComplaintRepository,
{
    repo: Arc<R>,
}

impl<R> FileComplaintUseCase<R>
where
    R: WorkerRepository + ComplaintRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: FileComplaintInput) -> WorkforceResult<Complaint> {
        let category = ComplaintCategory::from_code(&input.category).ok_or_else(|| {
            WorkforceError::InvalidInput(format!("Unknown complaint category '{}'", input.category))
        })?;
        let title = input.title.trim();
        let description = input.description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(WorkforceError::InvalidInput(
                "Complaint title and description are required".to_string(),
            ));
        }

        let identifier =
            WorkerIdentifier::parse(&input.worker_identifier).ok_or(WorkforceError::WorkerNotFound)?;
        let worker = self
            .repo
            .find_worker_by_identifier(&identifier)
            .await?
            .filter(|w| w.is_publicly_verifiable())
            .ok_or(WorkforceError::WorkerNotFound)?;

        let complaint = Complaint::file(
            worker.worker_id,
            category,
            title.to_string(),
            description.to_string(),
            non_blank(input.complainant_name),
            non_blank(input.complainant_contact),
        );
        let audit = AuditEntry::new(
            None,
            AuditEntry::COMPLAINT_FILED,
            "complaint",
            complaint.complaint_id,
            json!({
                "complaintNumber": complaint.complaint_number,
                "workerIdentifier": identifier.as_str(),
                "category": category.code(),
            }),
        );
        self.repo.file_complaint(&complaint, &audit).await?;

        tracing::info!(
            complaint = %complaint.complaint_number,
            worker_id = %worker.worker_id,
            category = category.code(),
            "Complaint filed"
        );
        Ok(complaint)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! PostgreSQL Repository Implementations

use auth::domain::entity::police_officer::PoliceOfficer;
use chrono::{DateTime, Utc};
use kernel::error::conversions::unique_violation;
use kernel::id::{ComplaintId, IncidentId, OfficerId, UserId, VerificationId, WorkerId};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entity::{
    audit_entry::{AuditEntry, AuditRecord},
    complaint::Complaint,
    incident::{Incident, IncidentListing},
    verification_record::{DecisionDetails, VerificationRecord},
    worker::{AepsProfile, IssuedCredential, Worker, WorkerOwner},
};
use crate::domain::repository::{
    AdminRepository, ApprovalSummary, AuditPage, ComplaintRepository, DecisionCommit, DecisionOutcome, IncidentRepository,
    LookupRateLimitRepository, OfficerActivity, OfficerDirectory, RecentDecision,
    RepairRepository, ReviewStats, VerificationRepository, WorkerRepository,
};
use crate::domain::value_object::{
    complaint::{ComplaintCategory, ComplaintStatus},
    severity::Severity,
    status::{VerificationStatus, WorkerStatus},
    worker_category::WorkerCategory,
    worker_identifier::WorkerIdentifier,
};
use crate::error::{WorkforceError, WorkforceResult};

/// Unique constraint on `workers.worker_identifier`
const IDENTIFIER_CONSTRAINT: &str = "workers_worker_identifier_key";

/// PostgreSQL-backed workforce repository
#[derive(Clone)]
pub struct PgWorkforceRepository {
    pool: PgPool,
}

impl PgWorkforceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const WORKER_COLUMNS: &str = r#"
    w.id,
    w.user_id,
    u.full_name,
    u.email,
    u.mobile,
    w.category,
    w.address_current,
    w.city,
    w.state,
    w.pincode,
    w.selfie_ref,
    w.aadhaar_reference,
    w.bank_affiliation,
    w.bc_affiliation,
    w.aeps_operator_id,
    w.service_region,
    w.aeps_device_info,
    w.transaction_role,
    w.consent_given,
    w.consent_at,
    w.declaration_signed,
    w.onboarding_step,
    w.onboarding_data,
    w.status,
    w.verification_status,
    w.worker_identifier,
    w.qr_code_ref,
    w.qr_payload,
    w.verification_endpoint,
    w.risk_score,
    w.complaint_count,
    w.blacklist_reason,
    w.blacklisted_at,
    w.created_at,
    w.updated_at
"#;

const RECORD_COLUMNS: &str = r#"
    id,
    worker_id,
    officer_id,
    status,
    remarks,
    rejection_reason,
    external_verification_ref,
    external_system,
    certificate_number,
    certificate_url,
    face_match_score,
    face_match_performed,
    liveness_check,
    verification_date,
    expiry_date,
    created_at
"#;

fn select_workers(filter: &str) -> String {
    format!("SELECT {WORKER_COLUMNS} FROM workers w JOIN users u ON u.id = w.user_id {filter}")
}

async fn insert_audit(tx: &mut Transaction<'_, Postgres>, entry: &AuditEntry) -> WorkforceResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (user_id, action, resource_type, resource_id, details, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(entry.actor.as_ref().map(UserId::as_uuid))
    .bind(entry.action)
    .bind(entry.resource_type)
    .bind(&entry.resource_id)
    .bind(&entry.details)
    .bind(entry.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// `%` and `_` in user input match literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

// ============================================================================
// Worker Repository Implementation
// ============================================================================

impl WorkerRepository for PgWorkforceRepository {
    async fn find_worker(&self, worker_id: &WorkerId) -> WorkforceResult<Option<Worker>> {
        let row = sqlx::query_as::<_, WorkerRow>(&select_workers("WHERE w.id = $1"))
            .bind(worker_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(WorkerRow::into_worker).transpose()
    }

    async fn find_worker_by_user(&self, user_id: &UserId) -> WorkforceResult<Option<Worker>> {
        let row = sqlx::query_as::<_, WorkerRow>(&select_workers("WHERE w.user_id = $1"))
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(WorkerRow::into_worker).transpose()
    }

    async fn find_worker_by_identifier(
        &self,
        identifier: &WorkerIdentifier,
    ) -> WorkforceResult<Option<Worker>> {
        let row = sqlx::query_as::<_, WorkerRow>(&select_workers("WHERE w.worker_identifier = $1"))
            .bind(identifier.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(WorkerRow::into_worker).transpose()
    }

    async fn find_worker_by_mobile(&self, mobile: &str) -> WorkforceResult<Option<Worker>> {
        let row = sqlx::query_as::<_, WorkerRow>(&select_workers("WHERE u.mobile = $1"))
            .bind(mobile)
            .fetch_optional(&self.pool)
            .await?;

        row.map(WorkerRow::into_worker).transpose()
    }

    async fn save_onboarding(
        &self,
        worker: &Worker,
        loaded_at: Option<DateTime<Utc>>,
        audit: Option<&AuditEntry>,
    ) -> WorkforceResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE users SET
                full_name = $2,
                mobile = COALESCE($3, mobile),
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(worker.user_id.as_uuid())
        .bind(&worker.owner.full_name)
        .bind(worker.owner.mobile.as_deref())
        .bind(worker.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| match unique_violation(&err) {
            Some("users_mobile_key") => WorkforceError::MobileTaken,
            _ => WorkforceError::Database(err),
        })?;

        let written = sqlx::query(
            r#"
            INSERT INTO workers (
                id,
                user_id,
                category,
                address_current,
                city,
                state,
                pincode,
                selfie_ref,
                aadhaar_reference,
                bank_affiliation,
                bc_affiliation,
                aeps_operator_id,
                service_region,
                aeps_device_info,
                transaction_role,
                consent_given,
                consent_at,
                declaration_signed,
                onboarding_step,
                onboarding_data,
                status,
                verification_status,
                worker_identifier,
                qr_code_ref,
                qr_payload,
                verification_endpoint,
                risk_score,
                complaint_count,
                created_at,
                updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                $21, $22, $23, $24, $25, $26, $27, $28, $29, $30
            )
            ON CONFLICT (id) DO UPDATE SET
                category = EXCLUDED.category,
                address_current = EXCLUDED.address_current,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                pincode = EXCLUDED.pincode,
                selfie_ref = EXCLUDED.selfie_ref,
                aadhaar_reference = EXCLUDED.aadhaar_reference,
                bank_affiliation = EXCLUDED.bank_affiliation,
                bc_affiliation = EXCLUDED.bc_affiliation,
                aeps_operator_id = EXCLUDED.aeps_operator_id,
                service_region = EXCLUDED.service_region,
                aeps_device_info = EXCLUDED.aeps_device_info,
                transaction_role = EXCLUDED.transaction_role,
                consent_given = EXCLUDED.consent_given,
                consent_at = EXCLUDED.consent_at,
                declaration_signed = EXCLUDED.declaration_signed,
                onboarding_step = EXCLUDED.onboarding_step,
                onboarding_data = EXCLUDED.onboarding_data,
                status = EXCLUDED.status,
                verification_status = EXCLUDED.verification_status,
                worker_identifier = EXCLUDED.worker_identifier,
                qr_code_ref = EXCLUDED.qr_code_ref,
                qr_payload = EXCLUDED.qr_payload,
                verification_endpoint = EXCLUDED.verification_endpoint,
                updated_at = EXCLUDED.updated_at
            WHERE workers.updated_at = $31
            "#,
        )
        .bind(worker.worker_id.as_uuid())
        .bind(worker.user_id.as_uuid())
        .bind(worker.category.map(|c| c.code()))
        .bind(&worker.address_current)
        .bind(&worker.city)
        .bind(&worker.state)
        .bind(&worker.pincode)
        .bind(&worker.selfie_ref)
        .bind(&worker.aadhaar_reference)
        .bind(&worker.aeps.bank_affiliation)
        .bind(&worker.aeps.bc_affiliation)
        .bind(&worker.aeps.operator_id)
        .bind(&worker.aeps.service_region)
        .bind(&worker.aeps.device_info)
        .bind(&worker.aeps.transaction_role)
        .bind(worker.consent_given)
        .bind(worker.consent_at)
        .bind(worker.declaration_signed)
        .bind(worker.onboarding_step as i16)
        .bind(Json(&worker.onboarding_data))
        .bind(worker.status.code())
        .bind(worker.verification_status.code())
        .bind(worker.worker_identifier.as_ref().map(WorkerIdentifier::as_str))
        .bind(&worker.qr_reference)
        .bind(&worker.qr_payload)
        .bind(&worker.verification_endpoint)
        .bind(worker.risk_score)
        .bind(worker.complaint_count)
        .bind(worker.created_at)
        .bind(worker.updated_at)
        .bind(loaded_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| match unique_violation(&err) {
            Some("workers_user_id_key") => WorkforceError::StaleWorker,
            _ => WorkforceError::Database(err),
        })?
        .rows_affected();

        // dropping the transaction rolls back the owner update
        if written == 0 {
            return Err(WorkforceError::StaleWorker);
        }

        if let Some(audit) = audit {
            insert_audit(&mut tx, audit).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn review_queue(&self) -> WorkforceResult<Vec<Worker>> {
        let rows = sqlx::query_as::<_, WorkerRow>(&select_workers(
            "WHERE w.onboarding_step >= 6 AND w.verification_status = 'pending' \
             ORDER BY w.updated_at DESC",
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WorkerRow::into_worker).collect()
    }

    async fn search_workers(&self, query: &str, limit: i64) -> WorkforceResult<Vec<Worker>> {
        let rows = sqlx::query_as::<_, WorkerRow>(&select_workers(
            r#"
            WHERE w.worker_identifier ILIKE $1
               OR u.full_name ILIKE $1
               OR u.mobile ILIKE $1
            ORDER BY w.updated_at DESC
            LIMIT $2
            "#,
        ))
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WorkerRow::into_worker).collect()
    }

    async fn set_worker_status(
        &self,
        worker_id: &WorkerId,
        status: WorkerStatus,
        audit: &AuditEntry,
    ) -> WorkforceResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE workers SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(worker_id.as_uuid())
            .bind(status.code())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(WorkforceError::WorkerNotFound);
        }

        insert_audit(&mut tx, audit).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn review_stats(&self) -> WorkforceResult<ReviewStats> {
        let (pending, approved, rejected, incidents) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*) FILTER (
                        WHERE onboarding_step >= 6 AND verification_status = 'pending'
                    ),
                    COUNT(*) FILTER (WHERE verification_status = 'verified'),
                    COUNT(*) FILTER (WHERE verification_status = 'rejected'),
                    (SELECT COUNT(*) FROM incidents)
                FROM workers
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(ReviewStats {
            pending,
            approved,
            rejected,
            incidents,
        })
    }
}

// ============================================================================
// Officer Directory Implementation
// ============================================================================

impl OfficerDirectory for PgWorkforceRepository {
    async fn find_officer(&self, user_id: &UserId) -> WorkforceResult<Option<PoliceOfficer>> {
        let row = sqlx::query_as::<_, OfficerRow>(
            r#"
            SELECT
                id,
                user_id,
                badge_number,
                station_code,
                station_name,
                district,
                state,
                rank,
                created_at
            FROM police_officers
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OfficerRow::into_officer))
    }

    async fn officer_activity(
        &self,
        officer_id: &OfficerId,
        recent: i64,
    ) -> WorkforceResult<OfficerActivity> {
        let (total, verified, rejected) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status IN ('verified', 'rejected')),
                COUNT(*) FILTER (WHERE status = 'verified'),
                COUNT(*) FILTER (WHERE status = 'rejected')
            FROM verification_records
            WHERE officer_id = $1
            "#,
        )
        .bind(officer_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, RecentDecisionRow>(
            r#"
            SELECT
                r.id,
                r.worker_id,
                r.officer_id,
                r.status,
                r.remarks,
                r.rejection_reason,
                r.external_verification_ref,
                r.external_system,
                r.certificate_number,
                r.certificate_url,
                r.face_match_score,
                r.face_match_performed,
                r.liveness_check,
                r.verification_date,
                r.expiry_date,
                r.created_at,
                u.full_name AS worker_name,
                CASE
                    WHEN r.status = 'verified' AND w.verification_status = 'verified'
                    THEN w.worker_identifier
                END AS worker_identifier
            FROM verification_records r
            LEFT JOIN workers w ON w.id = r.worker_id
            LEFT JOIN users u ON u.id = w.user_id
            WHERE r.officer_id = $1 AND r.status IN ('verified', 'rejected')
            ORDER BY r.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(officer_id.as_uuid())
        .bind(recent)
        .fetch_all(&self.pool)
        .await?;

        Ok(OfficerActivity {
            total,
            verified,
            rejected,
            recent: rows
                .into_iter()
                .map(RecentDecisionRow::into_decision)
                .collect::<WorkforceResult<_>>()?,
        })
    }
}

// ============================================================================
// Verification Repository Implementation
// ============================================================================

impl VerificationRepository for PgWorkforceRepository {
    async fn next_identifier_sequence(&self, prefix: &str) -> WorkforceResult<u32> {
        let max = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(MAX(SUBSTRING(worker_identifier FROM char_length($1) + 1)::BIGINT), 0)
            FROM workers
            WHERE starts_with(worker_identifier, $1)
              AND SUBSTRING(worker_identifier FROM char_length($1) + 1) ~ '^[0-9]+$'
            "#,
        )
        .bind(prefix)
        .fetch_one(&self.pool)
        .await?;

        u32::try_from(max + 1)
            .map_err(|_| WorkforceError::Internal(format!("Sequence overflow for {prefix}")))
    }

    async fn commit_decision(&self, commit: &DecisionCommit) -> WorkforceResult<()> {
        let mut tx = self.pool.begin().await?;
        let record = &commit.record;
        let now = record.created_at;

        insert_record(&mut tx, record).await?;

        let updated = match &commit.outcome {
            DecisionOutcome::Issue(credential) => {
                sqlx::query(
                    r#"
                    UPDATE workers SET
                        status = 'active',
                        verification_status = 'verified',
                        worker_identifier = $2,
                        qr_code_ref = $3,
                        qr_payload = $4,
                        verification_endpoint = $5,
                        updated_at = $6
                    WHERE id = $1 AND worker_identifier IS NULL AND blacklisted_at IS NULL
                    "#,
                )
                .bind(record.worker_id.as_uuid())
                .bind(credential.identifier.as_str())
                .bind(&credential.qr_reference)
                .bind(&credential.qr_payload)
                .bind(&credential.verification_endpoint)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(map_identifier_conflict)?
                .rows_affected()
            }
            DecisionOutcome::Keep(credential) => {
                sqlx::query(
                    r#"
                    UPDATE workers SET
                        status = 'active',
                        verification_status = 'verified',
                        qr_code_ref = $3,
                        qr_payload = $4,
                        verification_endpoint = $5,
                        updated_at = $6
                    WHERE id = $1 AND worker_identifier = $2 AND blacklisted_at IS NULL
                    "#,
                )
                .bind(record.worker_id.as_uuid())
                .bind(credential.identifier.as_str())
                .bind(&credential.qr_reference)
                .bind(&credential.qr_payload)
                .bind(&credential.verification_endpoint)
                .bind(now)
                .execute(&mut *tx)
                .await?
                .rows_affected()
            }
            DecisionOutcome::Reject => {
                let rows = sqlx::query(
                    r#"
                    UPDATE workers SET
                        status = 'blocked',
                        verification_status = 'rejected',
                        worker_identifier = NULL,
                        qr_code_ref = NULL,
                        qr_payload = NULL,
                        verification_endpoint = NULL,
                        updated_at = $2
                    WHERE id = $1
                    "#,
                )
                .bind(record.worker_id.as_uuid())
                .bind(now)
                .execute(&mut *tx)
                .await?
                .rows_affected();
                if rows == 0 {
                    return Err(WorkforceError::WorkerNotFound);
                }
                rows
            }
        };

        // dropping the transaction rolls back the record insert
        if updated == 0 {
            let blacklisted: Option<bool> =
                sqlx::query_scalar("SELECT blacklisted_at IS NOT NULL FROM workers WHERE id = $1")
                    .bind(record.worker_id.as_uuid())
                    .fetch_optional(&mut *tx)
                    .await?;
            return Err(match blacklisted {
                Some(true) => WorkforceError::WorkerBlacklisted,
                _ => WorkforceError::IdentifierAlreadyIssued,
            });
        }

        insert_audit(&mut tx, &commit.audit).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn records_for_worker(
        &self,
        worker_id: &WorkerId,
    ) -> WorkforceResult<Vec<VerificationRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM verification_records WHERE worker_id = $1 ORDER BY created_at DESC"
        ))
        .bind(worker_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RecordRow::into_record).collect()
    }

    async fn find_pending_record(
        &self,
        worker_id: &WorkerId,
        officer_id: &OfficerId,
    ) -> WorkforceResult<Option<VerificationRecord>> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM verification_records
            WHERE worker_id = $1 AND officer_id = $2 AND status = 'pending'
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(worker_id.as_uuid())
        .bind(officer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(RecordRow::into_record).transpose()
    }

    async fn save_face_check(
        &self,
        record: &VerificationRecord,
        audit: &AuditEntry,
    ) -> WorkforceResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE verification_records SET
                face_match_score = $2,
                face_match_performed = $3,
                liveness_check = $4
            WHERE id = $1
            "#,
        )
        .bind(record.verification_id.as_uuid())
        .bind(record.face_match_score)
        .bind(record.face_match_performed)
        .bind(record.liveness_check)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            insert_record(&mut tx, record).await?;
        }

        insert_audit(&mut tx, audit).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn latest_approval(
        &self,
        worker_id: &WorkerId,
    ) -> WorkforceResult<Option<ApprovalSummary>> {
        let row = sqlx::query_as::<_, (Option<DateTime<Utc>>, Option<String>)>(
            r#"
            SELECT r.verification_date, p.station_name
            FROM verification_records r
            LEFT JOIN police_officers p ON p.id = r.officer_id
            WHERE r.worker_id = $1 AND r.status = 'verified'
            ORDER BY r.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(worker_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(verified_at, station_name)| ApprovalSummary {
            verified_at,
            station_name,
        }))
    }

    async fn replace_credential(
        &self,
        worker_id: &WorkerId,
        credential: &IssuedCredential,
        audit: Option<&AuditEntry>,
    ) -> WorkforceResult<bool> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE workers SET
                qr_code_ref = $3,
                qr_payload = $4,
                verification_endpoint = $5,
                updated_at = $6
            WHERE id = $1
              AND worker_identifier = $2
              AND verification_status = 'verified'
            "#,
        )
        .bind(worker_id.as_uuid())
        .bind(credential.identifier.as_str())
        .bind(&credential.qr_reference)
        .bind(&credential.qr_payload)
        .bind(&credential.verification_endpoint)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(false);
        }

        if let Some(audit) = audit {
            insert_audit(&mut tx, audit).await?;
        }
        tx.commit().await?;
        Ok(true)
    }
}

async fn insert_record(
    tx: &mut Transaction<'_, Postgres>,
    record: &VerificationRecord,
) -> WorkforceResult<()> {
    sqlx::query(
        r#"
        INSERT INTO verification_records (
            id,
            worker_id,
            officer_id,
            status,
            remarks,
            rejection_reason,
            external_verification_ref,
            external_system,
            certificate_number,
            certificate_url,
            face_match_score,
            face_match_performed,
            liveness_check,
            verification_date,
            expiry_date,
            created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        "#,
    )
    .bind(record.verification_id.as_uuid())
    .bind(record.worker_id.as_uuid())
    .bind(record.officer_id.as_uuid())
    .bind(record.status.code())
    .bind(&record.details.remarks)
    .bind(&record.details.rejection_reason)
    .bind(&record.details.external_ref)
    .bind(&record.details.external_system)
    .bind(&record.details.certificate_number)
    .bind(&record.details.certificate_url)
    .bind(record.face_match_score)
    .bind(record.face_match_performed)
    .bind(record.liveness_check)
    .bind(record.verification_date)
    .bind(record.expiry_date)
    .bind(record.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Another worker took the sequence number between read and write
fn map_identifier_conflict(err: sqlx::Error) -> WorkforceError {
    match unique_violation(&err) {
        Some(IDENTIFIER_CONSTRAINT) => WorkforceError::SequenceTaken,
        _ => WorkforceError::Database(err),
    }
}

// ============================================================================
// Complaint Repository Implementation
// ============================================================================

impl ComplaintRepository for PgWorkforceRepository {
    async fn file_complaint(
        &self,
        complaint: &Complaint,
        audit: &AuditEntry,
    ) -> WorkforceResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO complaints (
                id,
                complaint_number,
                worker_id,
                category,
                status,
                title,
                description,
                complainant_name,
                complainant_contact,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(complaint.complaint_id.as_uuid())
        .bind(&complaint.complaint_number)
        .bind(complaint.worker_id.as_uuid())
        .bind(complaint.category.code())
        .bind(complaint.status.code())
        .bind(&complaint.title)
        .bind(&complaint.description)
        .bind(&complaint.complainant_name)
        .bind(&complaint.complainant_contact)
        .bind(complaint.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE workers SET
                complaint_count = complaint_count + 1,
                risk_score = risk_score + $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(complaint.worker_id.as_uuid())
        .bind(Complaint::RISK_INCREMENT)
        .bind(complaint.created_at)
        .execute(&mut *tx)
        .await?;

        insert_audit(&mut tx, audit).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn complaints_for_worker(&self, worker_id: &WorkerId) -> WorkforceResult<Vec<Complaint>> {
        let rows = sqlx::query_as::<_, ComplaintRow>(
            r#"
            SELECT
                id,
                complaint_number,
                worker_id,
                category,
                status,
                title,
                description,
                complainant_name,
                complainant_contact,
                created_at
            FROM complaints
            WHERE worker_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(worker_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ComplaintRow::into_complaint).collect()
    }
}

// ============================================================================
// Incident Repository Implementation
// ============================================================================

impl IncidentRepository for PgWorkforceRepository {
    async fn log_incident(&self, incident: &Incident, audit: &AuditEntry) -> WorkforceResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO incidents (
                id,
                incident_number,
                worker_id,
                officer_id,
                title,
                description,
                incident_type,
                severity,
                incident_date,
                location,
                action_taken,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(incident.incident_id.as_uuid())
        .bind(&incident.incident_number)
        .bind(incident.worker_id.as_uuid())
        .bind(incident.officer_id.as_uuid())
        .bind(&incident.title)
        .bind(&incident.description)
        .bind(&incident.incident_type)
        .bind(incident.severity.as_str())
        .bind(incident.incident_date)
        .bind(&incident.location)
        .bind(&incident.action_taken)
        .bind(incident.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE workers SET risk_score = risk_score + $2, updated_at = $3 WHERE id = $1")
            .bind(incident.worker_id.as_uuid())
            .bind(incident.risk_increment())
            .bind(incident.created_at)
            .execute(&mut *tx)
            .await?;

        insert_audit(&mut tx, audit).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn recent_incidents(&self, limit: i64) -> WorkforceResult<Vec<IncidentListing>> {
        let rows = sqlx::query_as::<_, IncidentRow>(
            r#"
            SELECT
                i.id,
                i.incident_number,
                i.worker_id,
                i.officer_id,
                i.title,
                i.description,
                i.incident_type,
                i.severity,
                i.incident_date,
                i.location,
                i.action_taken,
                i.created_at,
                u.full_name AS worker_name,
                CASE
                    WHEN w.verification_status = 'verified' THEN w.worker_identifier
                END AS worker_identifier
            FROM incidents i
            LEFT JOIN workers w ON w.id = i.worker_id
            LEFT JOIN users u ON u.id = w.user_id
            ORDER BY i.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(IncidentRow::into_listing).collect())
    }
}

// ============================================================================
// Lookup Rate Limit Implementation
// ============================================================================

impl LookupRateLimitRepository for PgWorkforceRepository {
    async fn hit(&self, client_key: &[u8], window_start_ms: i64) -> WorkforceResult<u32> {
        sqlx::query("DELETE FROM lookup_rate_limits WHERE client_key = $1 AND window_start_ms < $2")
            .bind(client_key)
            .bind(window_start_ms)
            .execute(&self.pool)
            .await?;

        let count = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO lookup_rate_limits (client_key, window_start_ms, request_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (client_key, window_start_ms)
            DO UPDATE SET request_count = lookup_rate_limits.request_count + 1
            RETURNING request_count
            "#,
        )
        .bind(client_key)
        .bind(window_start_ms)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u32)
    }

    async fn purge_windows_before(&self, window_start_ms: i64) -> WorkforceResult<u64> {
        let result = sqlx::query("DELETE FROM lookup_rate_limits WHERE window_start_ms < $1")
            .bind(window_start_ms)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Admin Repository Implementation
// ============================================================================

impl AdminRepository for PgWorkforceRepository {
    async fn audit_log(&self, offset: i64, limit: i64) -> WorkforceResult<AuditPage> {
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT id, user_id, action, resource_type, resource_id, details, created_at
            FROM audit_logs
            ORDER BY created_at DESC, id DESC
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(&self.pool)
            .await?;

        Ok(AuditPage {
            entries: rows.into_iter().map(AuditRow::into_record).collect(),
            total,
        })
    }

    async fn blacklist_worker(
        &self,
        worker_id: &WorkerId,
        reason: &str,
        audit: &AuditEntry,
    ) -> WorkforceResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE workers SET
                status = 'blocked',
                blacklist_reason = $2,
                blacklisted_at = COALESCE(blacklisted_at, $3),
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(worker_id.as_uuid())
        .bind(reason)
        .bind(audit.created_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if updated == 0 {
            return Err(WorkforceError::WorkerNotFound);
        }

        insert_audit(&mut tx, audit).await?;
        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Repair Repository Implementation
// ============================================================================

impl RepairRepository for PgWorkforceRepository {
    async fn clear_unverified_credentials(&self) -> WorkforceResult<u64> {
        let cleared = sqlx::query(
            r#"
            UPDATE workers SET
                worker_identifier = NULL,
                qr_code_ref = NULL,
                qr_payload = NULL,
                verification_endpoint = NULL,
                updated_at = $1
            WHERE verification_status <> 'verified'
              AND (
                  worker_identifier IS NOT NULL
                  OR qr_code_ref IS NOT NULL
                  OR qr_payload IS NOT NULL
                  OR verification_endpoint IS NOT NULL
              )
            "#,
        )
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(cleared)
    }

    async fn verified_with_identifier(
        &self,
        missing_qr_only: bool,
    ) -> WorkforceResult<Vec<Worker>> {
        let rows = sqlx::query_as::<_, WorkerRow>(&select_workers(
            r#"
            WHERE w.verification_status = 'verified'
              AND w.worker_identifier IS NOT NULL
              AND ($1 = FALSE OR w.qr_code_ref IS NULL OR w.qr_code_ref = '')
            ORDER BY w.created_at
            "#,
        ))
        .bind(missing_qr_only)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WorkerRow::into_worker).collect()
    }

    async fn expire_lapsed(&self, now: DateTime<Utc>) -> WorkforceResult<u64> {
        let expired = sqlx::query(
            r#"
            UPDATE workers w SET
                verification_status = 'expired',
                status = 'inactive',
                worker_identifier = NULL,
                qr_code_ref = NULL,
                qr_payload = NULL,
                verification_endpoint = NULL,
                updated_at = $1
            WHERE w.verification_status = 'verified'
              AND (
                  SELECT r.expiry_date
                  FROM verification_records r
                  WHERE r.worker_id = w.id AND r.status = 'verified'
                  ORDER BY r.created_at DESC
                  LIMIT 1
              ) < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(expired)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct WorkerRow {
    id: Uuid,
    user_id: Uuid,
    full_name: String,
    email: Option<String>,
    mobile: Option<String>,
    category: Option<String>,
    address_current: Option<String>,
    city: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
    selfie_ref: Option<String>,
    aadhaar_reference: Option<String>,
    bank_affiliation: Option<String>,
    bc_affiliation: Option<String>,
    aeps_operator_id: Option<String>,
    service_region: Option<String>,
    aeps_device_info: Option<String>,
    transaction_role: Option<String>,
    consent_given: bool,
    consent_at: Option<DateTime<Utc>>,
    declaration_signed: bool,
    onboarding_step: i16,
    onboarding_data: Value,
    status: String,
    verification_status: String,
    worker_identifier: Option<String>,
    qr_code_ref: Option<String>,
    qr_payload: Option<String>,
    verification_endpoint: Option<String>,
    risk_score: i32,
    complaint_count: i32,
    blacklist_reason: Option<String>,
    blacklisted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorkerRow {
    fn into_worker(self) -> WorkforceResult<Worker> {
        let status = WorkerStatus::from_code(&self.status).ok_or_else(|| {
            WorkforceError::Internal(format!("Unknown worker status: {}", self.status))
        })?;
        let verification_status = parse_verification_status(&self.verification_status)?;
        let onboarding_data = match self.onboarding_data {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Ok(Worker {
            worker_id: WorkerId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            owner: WorkerOwner {
                full_name: self.full_name,
                email: self.email,
                mobile: self.mobile,
            },
            category: self.category.as_deref().and_then(WorkerCategory::parse),
            address_current: self.address_current,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            selfie_ref: self.selfie_ref,
            aadhaar_reference: self.aadhaar_reference,
            aeps: AepsProfile {
                bank_affiliation: self.bank_affiliation,
                bc_affiliation: self.bc_affiliation,
                operator_id: self.aeps_operator_id,
                service_region: self.service_region,
                device_info: self.aeps_device_info,
                transaction_role: self.transaction_role,
            },
            consent_given: self.consent_given,
            consent_at: self.consent_at,
            declaration_signed: self.declaration_signed,
            onboarding_step: self.onboarding_step.clamp(0, u8::MAX as i16) as u8,
            onboarding_data,
            status,
            verification_status,
            worker_identifier: self.worker_identifier.map(WorkerIdentifier::from_db),
            qr_reference: self.qr_code_ref,
            qr_payload: self.qr_payload,
            verification_endpoint: self.verification_endpoint,
            risk_score: self.risk_score,
            complaint_count: self.complaint_count,
            blacklist_reason: self.blacklist_reason,
            blacklisted_at: self.blacklisted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OfficerRow {
    id: Uuid,
    user_id: Uuid,
    badge_number: String,
    station_code: String,
    station_name: String,
    district: String,
    state: String,
    rank: String,
    created_at: DateTime<Utc>,
}

impl OfficerRow {
    fn into_officer(self) -> PoliceOfficer {
        PoliceOfficer {
            officer_id: OfficerId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            badge_number: self.badge_number,
            station_code: self.station_code,
            station_name: self.station_name,
            district: self.district,
            state: self.state,
            rank: self.rank,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: Uuid,
    worker_id: Uuid,
    officer_id: Uuid,
    status: String,
    remarks: Option<String>,
    rejection_reason: Option<String>,
    external_verification_ref: Option<String>,
    external_system: Option<String>,
    certificate_number: Option<String>,
    certificate_url: Option<String>,
    face_match_score: Option<f64>,
    face_match_performed: bool,
    liveness_check: bool,
    verification_date: Option<DateTime<Utc>>,
    expiry_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl RecordRow {
    fn into_record(self) -> WorkforceResult<VerificationRecord> {
        Ok(VerificationRecord {
            verification_id: VerificationId::from_uuid(self.id),
            worker_id: WorkerId::from_uuid(self.worker_id),
            officer_id: OfficerId::from_uuid(self.officer_id),
            status: parse_verification_status(&self.status)?,
            details: DecisionDetails {
                remarks: self.remarks,
                rejection_reason: self.rejection_reason,
                external_ref: self.external_verification_ref,
                external_system: self.external_system,
                certificate_number: self.certificate_number,
                certificate_url: self.certificate_url,
            },
            face_match_score: self.face_match_score,
            face_match_performed: self.face_match_performed,
            liveness_check: self.liveness_check,
            verification_date: self.verification_date,
            expiry_date: self.expiry_date,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RecentDecisionRow {
    #[sqlx(flatten)]
    record: RecordRow,
    worker_name: Option<String>,
    worker_identifier: Option<String>,
}

impl RecentDecisionRow {
    fn into_decision(self) -> WorkforceResult<RecentDecision> {
        Ok(RecentDecision {
            record: self.record.into_record()?,
            worker_name: self.worker_name,
            worker_identifier: self.worker_identifier,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: i64,
    user_id: Option<Uuid>,
    action: String,
    resource_type: String,
    resource_id: String,
    details: Value,
    created_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_record(self) -> AuditRecord {
        AuditRecord {
            id: self.id,
            actor: self.user_id.map(UserId::from_uuid),
            action: self.action,
            resource_type: self.resource_type,
            resource_id: self.resource_id,
            details: self.details,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ComplaintRow {
    id: Uuid,
    complaint_number: String,
    worker_id: Uuid,
    category: String,
    status: String,
    title: String,
    description: String,
    complainant_name: Option<String>,
    complainant_contact: Option<String>,
    created_at: DateTime<Utc>,
}

impl ComplaintRow {
    fn into_complaint(self) -> WorkforceResult<Complaint> {
        Ok(Complaint {
            complaint_id: ComplaintId::from_uuid(self.id),
            complaint_number: self.complaint_number,
            worker_id: WorkerId::from_uuid(self.worker_id),
            category: ComplaintCategory::from_code(&self.category).unwrap_or(ComplaintCategory::Other),
            status: ComplaintStatus::from_code(&self.status).ok_or_else(|| {
                WorkforceError::Internal(format!("Unknown complaint status: {}", self.status))
            })?,
            title: self.title,
            description: self.description,
            complainant_name: self.complainant_name,
            complainant_contact: self.complainant_contact,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct IncidentRow {
    id: Uuid,
    incident_number: String,
    worker_id: Uuid,
    officer_id: Uuid,
    title: String,
    description: String,
    incident_type: String,
    severity: String,
    incident_date: DateTime<Utc>,
    location: Option<String>,
    action_taken: Option<String>,
    created_at: DateTime<Utc>,
    worker_name: Option<String>,
    worker_identifier: Option<String>,
}

impl IncidentRow {
    fn into_listing(self) -> IncidentListing {
        IncidentListing {
            incident: Incident {
                incident_id: IncidentId::from_uuid(self.id),
                incident_number: self.incident_number,
                worker_id: WorkerId::from_uuid(self.worker_id),
                officer_id: OfficerId::from_uuid(self.officer_id),
                title: self.title,
                description: self.description,
                incident_type: self.incident_type,
                severity: Severity::parse(&self.severity),
                incident_date: self.incident_date,
                location: self.location,
                action_taken: self.action_taken,
                created_at: self.created_at,
            },
            worker_name: self.worker_name,
            worker_identifier: self.worker_identifier,
        }
    }
}

fn parse_verification_status(code: &str) -> WorkforceResult<VerificationStatus> {
    VerificationStatus::from_code(code)
        .ok_or_else(|| WorkforceError::Internal(format!("Unknown verification status: {code}")))
}

//! Application Layer
//!
//! Use cases and application services.

pub mod admin;
pub mod complaints;
pub mod config;
pub mod credential;
pub mod decide;
pub mod face_check;
pub mod incidents;
pub mod onboarding;
pub mod public_lookup;
pub mod regenerate_qr;
pub mod repair;
pub mod review;
pub mod suspend;
pub mod worker_profile;

// Re-exports
pub use admin::{AdminUseCase, StatusOverrideInput};
pub use complaints::{FileComplaintInput, FileComplaintUseCase};
pub use config::WorkforceConfig;
pub use credential::{CredentialIssuer, PreparedCredential};
pub use decide::{DecideUseCase, DecisionInput, DecisionOutput};
pub use face_check::{FaceCheckInput, FaceCheckOutput, FaceCheckUseCase};
pub use incidents::{IncidentUseCase, LogIncidentInput};
pub use onboarding::{
    OnboardingUseCase, Step1Input, Step2Input, Step3Input, Step4Input, Step6Input, StepOutput,
    SubmissionOutput,
};
pub use public_lookup::{LookupQuery, PublicLookupUseCase, PublicWorker};
pub use regenerate_qr::RegenerateQrUseCase;
pub use repair::{RepairReport, RepairUseCase};
pub use review::{
    OfficerProfileOutput, QueueEntry, QueueStatus, ReviewUseCase, WorkerDetailOutput,
};
pub use suspend::{SuspendInput, SuspendOutput, SuspendUseCase};
pub use worker_profile::{VerificationStatusOutput, WorkerProfileUseCase};

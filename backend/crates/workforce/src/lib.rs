//! Workforce Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Workers, verification records, complaints, incidents, repository traits
//! - `application/` - Onboarding, review, issuance, public lookup and repair use cases
//! - `infra/` - PostgreSQL repository, filesystem media store, face-matching client
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Six-step worker onboarding ending in submission for police review
//! - Police queue, face check, approve/reject decisions, incidents and suspension
//! - Identifier issuance `IND-WRK-{CAT}-{YEAR}-{SEQ:06}` with a QR code
//! - Rate-limited public lookup by identifier, mobile or scanned QR
//! - Citizen complaints against verified workers
//! - Repair passes for credentials left in an inconsistent state
//!
//! ## Issuance Model
//! - An identifier and QR code exist only while a worker is verified
//! - Approval claims the identifier with a conditional update, so a racing
//!   decision gets 409 instead of a second identifier
//! - Sequence collisions across workers retry with the next number

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::WorkforceConfig;
pub use application::{PublicLookupUseCase, RepairReport, RepairUseCase};
pub use domain::repository::WorkforceStore;
pub use error::{WorkforceError, WorkforceResult};
pub use infra::{FsMediaStore, HttpFaceMatcher, PgWorkforceRepository};
pub use presentation::router::{RouteGuard, workforce_router, workforce_router_generic};

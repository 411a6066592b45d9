//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Worker, VerificationRecord, Complaint, Incident, AuditEntry)
//! - Domain value objects (WorkerCategory, statuses, WorkerIdentifier, Severity)
//! - Domain services (QR payload, verification endpoint, image decoding)
//! - Repository and gateway traits (interfaces)

pub mod entity;
pub mod gateway;
pub mod repository;
pub mod services;
pub mod value_object;

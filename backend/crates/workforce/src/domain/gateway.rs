//! Outbound collaborators: file storage and the face-matching service

use kernel::id::WorkerId;

use crate::domain::value_object::worker_identifier::WorkerIdentifier;
use crate::error::WorkforceResult;

/// Stores uploaded selfies and rendered QR codes
///
/// References returned here are what the database keeps and what
/// `/uploads` serves.
#[trait_variant::make(MediaStore: Send)]
pub trait LocalMediaStore {
    async fn save_selfie(&self, worker_id: &WorkerId, image: &[u8]) -> WorkforceResult<String>;

    /// Reference `save_qr` returns for this identifier
    fn qr_reference(&self, identifier: &WorkerIdentifier) -> String;

    /// Overwrites any earlier image for the same identifier
    async fn save_qr(&self, identifier: &WorkerIdentifier, png: &[u8]) -> WorkforceResult<String>;

    async fn load(&self, reference: &str) -> WorkforceResult<Vec<u8>>;
}

/// Raw result of comparing two faces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceComparison {
    /// Similarity of the best match, 0-100; 0 when no face matched
    pub similarity: f64,
    /// Detection confidence for the live image, 0-100
    pub liveness_confidence: f64,
}

/// External face-matching API
#[trait_variant::make(FaceMatcher: Send)]
pub trait LocalFaceMatcher {
    async fn compare(&self, reference: &[u8], live: &[u8]) -> WorkforceResult<FaceComparison>;
}

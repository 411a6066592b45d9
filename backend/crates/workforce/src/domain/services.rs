//! Domain Services
//!
//! Pure rules for credentials, scanned codes and uploaded images.

use base64::Engine;
use base64::engine::general_purpose;

use crate::domain::value_object::worker_identifier::WorkerIdentifier;

/// Text encoded in a worker's QR code
pub fn qr_payload(frontend_base: &str, identifier: &WorkerIdentifier) -> String {
    format!("{frontend_base}/verify?id={identifier}")
}

/// Public lookup URL for a worker
pub fn verification_endpoint(frontend_base: &str, identifier: &WorkerIdentifier) -> String {
    format!("{frontend_base}/api/verify/worker/{identifier}")
}

/// Identifier from a scanned QR code
///
/// Takes the `id` query parameter of the scanned URL; a bare identifier is
/// accepted as well.
pub fn identifier_from_qr(qr_data: &str) -> Option<WorkerIdentifier> {
    let qr_data = qr_data.trim();
    let query = match qr_data.split_once('?') {
        Some((_, query)) => query,
        None => return WorkerIdentifier::parse(qr_data),
    };
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("id="))
        .and_then(WorkerIdentifier::parse)
}

/// Decoding failure for an uploaded image
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageDecodeError {
    #[error("Image data is empty")]
    Empty,
    #[error("Image is not valid base64")]
    InvalidBase64,
    #[error("Image exceeds {0} bytes")]
    TooLarge(usize),
}

/// Decode a base64 image, with or without a `data:` URI prefix
pub fn decode_image(encoded: &str, max_bytes: usize) -> Result<Vec<u8>, ImageDecodeError> {
    let encoded = encoded.trim();
    let data = match encoded.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, d)| d).unwrap_or_default(),
        None => encoded,
    };
    if data.is_empty() {
        return Err(ImageDecodeError::Empty);
    }
    // base64 length is a third larger than the bytes it carries
    if data.len() / 4 * 3 > max_bytes + 3 {
        return Err(ImageDecodeError::TooLarge(max_bytes));
    }

    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = general_purpose::STANDARD
        .decode(compact)
        .map_err(|_| ImageDecodeError::InvalidBase64)?;

    if bytes.is_empty() {
        return Err(ImageDecodeError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(ImageDecodeError::TooLarge(max_bytes));
    }
    Ok(bytes)
}

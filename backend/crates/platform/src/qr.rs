//! QR code rendering

/// Error when a payload cannot be encoded as a QR code
#[derive(Debug, Clone, thiserror::Error)]
#[error("QR encoding failed: {0}")]
pub struct QrError(pub String);

/// Render `payload` as a PNG image (medium error correction, black on white)
pub fn render_png(payload: &str) -> Result<Vec<u8>, QrError> {
    if payload.is_empty() {
        return Err(QrError("empty payload".to_string()));
    }
    qrcodegen_image::draw_png(payload).map_err(QrError)
}

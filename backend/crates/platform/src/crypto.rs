//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// 32 random bytes, used for signing secrets
pub fn random_secret() -> [u8; 32] {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode bytes as standard base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode standard base64
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Decode a 32-byte secret from standard base64
pub fn secret_from_base64(s: &str) -> Option<[u8; 32]> {
    from_base64(s.trim()).ok()?.try_into().ok()
}

/// Sign `payload` as `{payload}.{base64url(hmac)}`
pub fn sign_token(secret: &[u8; 32], payload: &str) -> String {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!(
        "{}.{}",
        payload,
        general_purpose::URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Verify a token produced by [`sign_token`] and return its payload
pub fn verify_token<'a>(secret: &[u8; 32], token: &'a str) -> Option<&'a str> {
    let (payload, signature_b64) = token.rsplit_once('.')?;
    let signature = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .ok()?;

    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).ok()?;

    Some(payload)
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

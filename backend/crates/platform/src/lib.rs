//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations used by the domain crates:
//! - Cryptographic helpers (SHA-256, HMAC-signed tokens, Base64)
//! - Password hashing (Argon2id, NIST SP 800-63B policy)
//! - Client fingerprinting from request headers
//! - Cookie and bearer token extraction
//! - Fixed-window rate limit arithmetic
//! - QR code rendering to PNG

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod qr;
pub mod rate_limit;

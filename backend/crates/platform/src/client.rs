//! Client identification from HTTP headers
//!
//! Sessions are bound to a hash of the User-Agent; anonymous endpoints
//! are throttled per client IP.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, header, request::Parts};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use crate::crypto::sha256;

/// Client fingerprint derived from request headers
#[derive(Debug, Clone)]
pub struct ClientFingerprint {
    /// SHA-256 of the User-Agent header
    pub hash: [u8; 32],
    /// Client IP (X-Forwarded-For or peer address)
    pub ip: Option<IpAddr>,
    /// Raw User-Agent, kept for session listings and audit
    pub user_agent: Option<String>,
}

impl ClientFingerprint {
    pub fn new(hash: [u8; 32], ip: Option<IpAddr>, user_agent: Option<String>) -> Self {
        Self {
            hash,
            ip,
            user_agent,
        }
    }

    pub fn hash_vec(&self) -> Vec<u8> {
        self.hash.to_vec()
    }

    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }

    /// Key for per-client throttling: the IP when known, otherwise the UA hash
    pub fn throttle_key(&self) -> Vec<u8> {
        match self.ip {
            Some(ip) => sha256(ip.to_string().as_bytes()).to_vec(),
            None => self.hash_vec(),
        }
    }
}

/// Error when extracting a client fingerprint
#[derive(Debug, Clone, thiserror::Error)]
pub enum FingerprintError {
    #[error("Missing required header: {0}")]
    MissingHeader(String),
}

/// Fingerprint for authenticated traffic. A User-Agent is required.
pub fn extract_fingerprint(
    headers: &HeaderMap,
    client_ip: Option<IpAddr>,
) -> Result<ClientFingerprint, FingerprintError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| FingerprintError::MissingHeader("User-Agent".to_string()))?;

    Ok(ClientFingerprint::new(
        sha256(user_agent.as_bytes()),
        client_ip,
        Some(user_agent.to_string()),
    ))
}

/// Fingerprint for anonymous traffic. A missing User-Agent hashes as empty.
pub fn extract_anonymous_fingerprint(
    headers: &HeaderMap,
    client_ip: Option<IpAddr>,
) -> ClientFingerprint {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let hash = sha256(user_agent.as_deref().unwrap_or_default().as_bytes());
    ClientFingerprint::new(hash, client_ip, user_agent)
}

/// Client IP: first X-Forwarded-For entry, then the peer address
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}

/// Resolved client IP as an extractor
///
/// Works with or without `into_make_service_with_connect_info`; without it
/// only `X-Forwarded-For` is consulted.
#[derive(Debug, Clone, Copy)]
pub struct ClientAddr(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        Ok(ClientAddr(extract_client_ip(&parts.headers, direct)))
    }
}

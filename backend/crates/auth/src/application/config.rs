//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// HMAC key for session tokens (32 bytes)
    pub session_secret: [u8; 32],
    /// Session lifetime
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "js_session".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Config with a random session secret
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    /// Random secret and an insecure cookie, for local HTTP
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn session_ttl_ms(&self) -> i64 {
        self.session_ttl.as_millis() as i64
    }

    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.session_ttl_ms())
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
        }
    }
}

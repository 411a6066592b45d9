//! Fixed-window rate limiting
//!
//! Counters live in whatever store the caller uses (Postgres for the public
//! lookup); this module only owns the window arithmetic and the decision.

use std::time::Duration;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    /// Start of the window containing `now_ms`
    pub fn window_start_ms(&self, now_ms: i64) -> i64 {
        let window = self.window_ms().max(1);
        now_ms - now_ms.rem_euclid(window)
    }

    /// Decide on a request given the counter value after incrementing it
    pub fn decide(&self, count_after_increment: u32, window_start_ms: i64) -> RateLimitResult {
        RateLimitResult {
            allowed: count_after_increment <= self.max_requests,
            remaining: self.max_requests.saturating_sub(count_after_increment),
            reset_at_ms: window_start_ms + self.window_ms(),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Seconds until the window resets, for `Retry-After`
    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        let ms = (self.reset_at_ms - now_ms).max(0) as u64;
        ms.div_ceil(1000)
    }
}

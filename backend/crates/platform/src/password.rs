//! Account passwords
//!
//! Policy checks on sign-up and Argon2id hashing for every role (workers,
//! police officers, administrators). The optional pepper is the session
//! secret, so rotating that secret invalidates stored hashes.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains invalid characters (control characters)
    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    /// Password matches common patterns (sequential, repeated)
    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Password as typed by the user. Zeroized on drop, redacted in Debug, not Clone.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate a password chosen at sign-up
    ///
    /// NFKC-normalized, 8 to 128 code points, no control characters and no
    /// trivially guessable pattern.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();
        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Length is counted in code points
        match normalized.chars().count() {
            n if n < MIN_PASSWORD_LENGTH => {
                return Err(PasswordPolicyError::TooShort {
                    min: MIN_PASSWORD_LENGTH,
                    actual: n,
                });
            }
            n if n > MAX_PASSWORD_LENGTH => {
                return Err(PasswordPolicyError::TooLong {
                    max: MAX_PASSWORD_LENGTH,
                    actual: n,
                });
            }
            _ => {}
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_common_pattern(&normalized) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(Self(normalized))
    }

    /// Wrap a password presented at login
    ///
    /// Only normalizes. Accounts created under an older policy can still log in.
    pub fn for_login(raw: String) -> Self {
        Self(raw.nfkc().collect())
    }

    #[cfg(test)]
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    /// Password bytes with the pepper appended
    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash with Argon2id (default parameters) and a fresh salt
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);
        let hash = Argon2::default()
            .hash_password(&self.peppered(pepper), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password
// ============================================================================

/// Argon2id hash in PHC string format, as stored in `users.password_hash`
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Parse a stored PHC string
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Constant-time check of `password`; the pepper must match the one used to hash
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(&password.peppered(pepper), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Repeated characters, digit runs, keyboard walks and well-known passwords
fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    if KEYBOARD_WALKS.iter().any(|walk| lower.contains(walk)) {
        return true;
    }

    COMMON_PASSWORDS.contains(&lower.as_str())
}

const KEYBOARD_WALKS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx", "1qaz2wsx"];

const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "password123", "12345678", "123456789", "1234567890",
    "abcdefgh", "letmein", "welcome", "admin123", "iloveyou", "sunshine", "princess",
    "football", "monkey", "shadow", "master", "dragon", "baseball", "trustno1",
    "jansuraksha", "jansuraksha1", "bharat123", "india123",
];

/// Four or more digits counting up or down, e.g. "12345678" or "9876"
fn is_sequential_numbers(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 4 {
        return false;
    }

    let ascending = digits.windows(2).all(|w| w[1] == (w[0] + 1) % 10);
    let descending = digits.windows(2).all(|w| w[0] == (w[1] + 1) % 10);
    ascending || descending
}
// ============================================================================
// Tests
// ============================================================================

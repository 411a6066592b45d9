//! Shared Kernel
//!
//! Vocabulary that every domain crate agrees on:
//! - the unified error type and its HTTP classification
//! - typed UUID identifiers for the persisted entities
//!
//! Anything that only one bounded context cares about belongs in that
//! context's crate, not here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;

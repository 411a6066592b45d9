//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod face_client;
pub mod media_fs;
pub mod postgres;

pub use face_client::HttpFaceMatcher;
pub use media_fs::FsMediaStore;
pub use postgres::PgWorkforceRepository;

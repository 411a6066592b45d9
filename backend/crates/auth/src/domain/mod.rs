//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{auth_session::AuthSession, police_officer::PoliceOfficer, user::User};
pub use repository::{AuthSessionRepository, AuthStore, OfficerRepository, UserRepository};

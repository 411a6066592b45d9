pub mod auth_session;
pub mod police_officer;
pub mod user;

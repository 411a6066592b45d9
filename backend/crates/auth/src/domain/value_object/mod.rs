//! Value Object Module

pub mod email;
pub mod mobile;
pub mod user_role;

//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::WorkforceAppState;
pub use router::{RouteGuard, workforce_router, workforce_router_generic};

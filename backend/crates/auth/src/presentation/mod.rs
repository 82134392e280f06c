//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, router, and middleware.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    AuthGate, SessionTracking, require_bearer, security_monitor, track_session_activity,
};
pub use router::{auth_router, auth_router_from_state, auth_router_generic};

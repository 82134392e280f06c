//! Auth (Account Security) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations, hasher, token issuer
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Account registration with email + password
//! - Failed-login counting with a timed lockout, and admin unlock
//! - Stateless bearer tokens with role claims
//! - Session fingerprint tracking with idle-session sweeps
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - 5 consecutive failures lock the account for 30 minutes
//! - Locked accounts are rejected before any password comparison
//! - Session fingerprint drift is logged, not enforced

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{SessionActivityTracker, SweepReport};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::security_monitor;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

//! Domain Layer
//!
//! Contains entities, value objects, repository traits and service traits.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::{account::Account, session_fingerprint::SessionFingerprint};
pub use repository::{AccountRepository, SessionRepository};
pub use service::{PasswordHasher, TokenIssuer};

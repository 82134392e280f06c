//! Domain Services
//!
//! Capabilities the use cases depend on but do not implement. Both are
//! synchronous and CPU-bound; the application layer decides where they run.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    identity::Identity,
    password::{CredentialHash, RawPassword},
};
use crate::error::AuthResult;

/// One-way salted password hashing
pub trait PasswordHasher: Send + Sync + 'static {
    fn hash(&self, password: &RawPassword) -> AuthResult<CredentialHash>;

    /// `Ok(false)` on mismatch; `Err` only when the comparison could not run
    fn verify(&self, password: &RawPassword, hash: &CredentialHash) -> AuthResult<bool>;
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Bearer credential signing
pub trait TokenIssuer: Send + Sync + 'static {
    fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> AuthResult<IssuedToken>;

    /// `AuthError::InvalidCredential` for bad signatures, expiry or claims
    fn verify(&self, token: &str) -> AuthResult<Identity>;
}

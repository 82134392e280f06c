//! Request Authorization
//!
//! Pure bearer-token check plus role gating. Never touches storage.

use crate::domain::service::TokenIssuer;
use crate::domain::value_object::identity::Identity;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Any valid token
    Authenticated,
    /// Valid token whose role claim is admin
    Admin,
}

/// Extract the token from an `Authorization` header value
///
/// Only the exact `Bearer ` scheme is accepted.
pub fn bearer_token(authorization: Option<&str>) -> AuthResult<&str> {
    let token = authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthError::MissingCredential)?;

    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    Ok(token)
}

/// Verify the bearer credential and enforce the access level
pub fn authorize(
    tokens: &dyn TokenIssuer,
    authorization: Option<&str>,
    level: AccessLevel,
) -> AuthResult<Identity> {
    let token = bearer_token(authorization)?;
    let identity = tokens.verify(token)?;

    if level == AccessLevel::Admin && !identity.is_admin() {
        tracing::warn!(
            account_id = %identity.account_id,
            role = %identity.role,
            "Admin route requested without admin role"
        );
        return Err(AuthError::Forbidden);
    }

    Ok(identity)
}

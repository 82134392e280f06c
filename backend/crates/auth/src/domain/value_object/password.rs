//! Password Value Objects
//!
//! Delegates policy and zeroization to `platform::password`.
//!
//! - [`RawPassword`]: what the user typed, zeroized on drop
//! - [`CredentialHash`]: opaque output of the configured password hasher

use platform::password::{ClearTextPassword, PasswordPolicyError};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Raw password from user input
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Password for a new credential: enforces the complexity policy
    pub fn for_registration(raw: String) -> AuthResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| AuthError::WeakPassword(policy_message(&e)))
    }

    /// Password submitted for comparison against a stored hash
    pub fn for_verification(raw: String) -> Self {
        Self(ClearTextPassword::unvalidated(raw))
    }

    pub fn as_clear_text(&self) -> &ClearTextPassword {
        &self.0
    }

    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

fn policy_message(err: &PasswordPolicyError) -> String {
    match err {
        PasswordPolicyError::TooShort { .. }
        | PasswordPolicyError::MissingUppercase
        | PasswordPolicyError::MissingLowercase
        | PasswordPolicyError::MissingDigit
        | PasswordPolicyError::MissingSymbol => format!(
            "{err}. Passwords need at least 8 characters, including an uppercase letter, \
             a lowercase letter, a number and one of !@#$%^&*"
        ),
        other => other.to_string(),
    }
}

/// Stored password hash
///
/// Never serialized into responses; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    pub fn from_db(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash([HASH])")
    }
}

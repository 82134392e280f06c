//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of clear text on drop
//! - Storefront complexity policy: at least 8 characters with an uppercase
//!   letter, a lowercase letter, a digit and one of `!@#$%^&*`

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Symbols accepted as the "special character" class
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password must contain an uppercase letter")]
    MissingUppercase,

    #[error("Password must contain a lowercase letter")]
    MissingLowercase,

    #[error("Password must contain a digit")]
    MissingDigit,

    #[error("Password must contain one of !@#$%^&*")]
    MissingSymbol,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and `Debug` output is redacted.
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("Str0ng!Pass".to_string()).unwrap();
/// let hashed = password.hash(None).unwrap();
/// assert!(hashed.verify(&password, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password, enforcing the complexity policy
    ///
    /// Unicode is normalized using NFKC before validation.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::unvalidated(raw);
        validate_policy(&password.0)?;
        Ok(password)
    }

    /// Wrap a submitted password for verification only
    ///
    /// Login attempts must reach the hash comparison even for passwords that
    /// would fail today's policy.
    pub fn unvalidated(mut raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret appended before hashing
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let mut password_bytes = peppered(self, pepper);

        let salt = SaltString::generate(OsRng);

        // m=19456 (19 MiB), t=2, p=1
        let argon2 = Argon2::default();

        let result = argon2
            .hash_password(&password_bytes, &salt)
            .map(|hash| HashedPassword {
                hash: hash.to_string(),
            })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));

        password_bytes.zeroize();
        result
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash (constant-time inside argon2)
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        let mut password_bytes = peppered(password, pepper);
        let matched = Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok();
        password_bytes.zeroize();
        matched
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn peppered(password: &ClearTextPassword, pepper: Option<&[u8]>) -> Vec<u8> {
    let mut bytes = password.as_bytes().to_vec();
    if let Some(p) = pepper {
        bytes.extend_from_slice(p);
    }
    bytes
}

fn validate_policy(normalized: &str) -> Result<(), PasswordPolicyError> {
    if normalized.trim().is_empty() {
        return Err(PasswordPolicyError::EmptyOrWhitespace);
    }

    // Count code points, not bytes
    let char_count = normalized.chars().count();
    if char_count < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual: char_count,
        });
    }
    if char_count > MAX_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_LENGTH,
            actual: char_count,
        });
    }

    if normalized
        .chars()
        .any(|ch| ch.is_control() && ch != ' ' && ch != '\t')
    {
        return Err(PasswordPolicyError::InvalidCharacter);
    }

    if !normalized.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !normalized.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordPolicyError::MissingLowercase);
    }
    if !normalized.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingDigit);
    }
    if !normalized.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err(PasswordPolicyError::MissingSymbol);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(raw: &str) -> Result<ClearTextPassword, PasswordPolicyError> {
        ClearTextPassword::new(raw.to_string())
    }

    #[test]
    fn test_accepts_compliant_password() {
        assert!(policy("Str0ng!Pass").is_ok());
        assert!(policy("Aa1*aaaa").is_ok());
    }

    #[test]
    fn test_rejects_each_missing_class() {
        assert!(matches!(
            policy("Sh0rt!"),
            Err(PasswordPolicyError::TooShort { min: 8, actual: 6 })
        ));
        assert_eq!(
            policy("str0ng!pass").unwrap_err(),
            PasswordPolicyError::MissingUppercase
        );
        assert_eq!(
            policy("STR0NG!PASS").unwrap_err(),
            PasswordPolicyError::MissingLowercase
        );
        assert_eq!(
            policy("Strong!Pass").unwrap_err(),
            PasswordPolicyError::MissingDigit
        );
        assert_eq!(
            policy("Str0ngPass").unwrap_err(),
            PasswordPolicyError::MissingSymbol
        );
    }

    #[test]
    fn test_symbol_outside_allowed_set_does_not_count() {
        assert_eq!(
            policy("Str0ng-Pass").unwrap_err(),
            PasswordPolicyError::MissingSymbol
        );
    }

    #[test]
    fn test_rejects_whitespace_and_control() {
        assert_eq!(
            policy("          ").unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
        assert_eq!(
            policy("Str0ng!\u{0007}Pass").unwrap_err(),
            PasswordPolicyError::InvalidCharacter
        );
    }

    #[test]
    fn test_rejects_too_long() {
        let raw = format!("Aa1!{}", "a".repeat(MAX_PASSWORD_LENGTH));
        assert!(matches!(
            policy(&raw),
            Err(PasswordPolicyError::TooLong { .. })
        ));
    }

    #[test]
    fn test_unvalidated_skips_policy() {
        let pw = ClearTextPassword::unvalidated("weak".to_string());
        assert_eq!(pw.expose_secret(), "weak");
    }

    #[test]
    fn test_hash_and_verify_with_pepper() {
        let pw = policy("Str0ng!Pass").unwrap();
        let hashed = pw.hash(Some(b"pepper")).unwrap();

        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(hashed.verify(&pw, Some(b"pepper")));
        assert!(!hashed.verify(&pw, None));
        assert!(!hashed.verify(
            &ClearTextPassword::unvalidated("Wr0ng!Pass".to_string()),
            Some(b"pepper")
        ));
    }

    #[test]
    fn test_from_phc_string_rejects_garbage() {
        assert!(HashedPassword::from_phc_string("not-a-hash").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let pw = policy("Str0ng!Pass").unwrap();
        assert!(!format!("{:?}", pw).contains("Str0ng"));
    }
}

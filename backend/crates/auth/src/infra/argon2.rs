//! Argon2id password hasher backed by `platform::password`

use platform::password::HashedPassword;

use crate::domain::service::PasswordHasher;
use crate::domain::value_object::password::{CredentialHash, RawPassword};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    pepper: Option<Vec<u8>>,
}

impl Argon2PasswordHasher {
    pub fn new(pepper: Option<Vec<u8>>) -> Self {
        Self { pepper }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &RawPassword) -> AuthResult<CredentialHash> {
        password
            .as_clear_text()
            .hash(self.pepper.as_deref())
            .map(|hashed| CredentialHash::from_db(hashed.as_phc_string()))
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    fn verify(&self, password: &RawPassword, hash: &CredentialHash) -> AuthResult<bool> {
        let stored = HashedPassword::from_phc_string(hash.as_str())
            .map_err(|e| AuthError::Internal(format!("Stored credential is unreadable: {e}")))?;

        Ok(stored.verify(password.as_clear_text(), self.pepper.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = Argon2PasswordHasher::new(Some(b"pepper".to_vec()));
        let password = RawPassword::for_registration("Str0ng!Pass".into()).unwrap();

        let hash = hasher.hash(&password).unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify(&password, &hash).unwrap());

        let wrong = RawPassword::for_verification("Wr0ng!Pass".into());
        assert!(!hasher.verify(&wrong, &hash).unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_internal_error() {
        let hasher = Argon2PasswordHasher::default();
        let password = RawPassword::for_verification("x".into());

        let result = hasher.verify(&password, &CredentialHash::from_db("plaintext"));
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}

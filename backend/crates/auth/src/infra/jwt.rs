//! JWT token issuer backed by `platform::token`
//!
//! Payload: `{sub: account uuid, role: "standard" | "admin", iat, exp}`.

use chrono::{DateTime, Utc};
use platform::token::{Claims, TokenError, TokenSigner};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::service::{IssuedToken, TokenIssuer};
use crate::domain::value_object::{account_role::AccountRole, identity::Identity};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RoleClaim {
    role: String,
}

#[derive(Clone, Debug)]
pub struct JwtTokenIssuer {
    signer: TokenSigner,
}

impl JwtTokenIssuer {
    pub fn new(signer: TokenSigner) -> Self {
        Self { signer }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(TokenSigner::new(&config.token_secret, config.token_ttl))
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> AuthResult<IssuedToken> {
        let signed = self
            .signer
            .sign(
                identity.account_id.to_string(),
                RoleClaim {
                    role: identity.role.code().to_string(),
                },
                now,
            )
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(IssuedToken {
            token: signed.token,
            expires_at: signed.expires_at,
        })
    }

    fn verify(&self, token: &str) -> AuthResult<Identity> {
        let claims: Claims<RoleClaim> = self.signer.verify(token).map_err(|e| {
            match &e {
                TokenError::Expired => tracing::debug!("Bearer token expired"),
                _ => tracing::debug!(error = %e, "Bearer token rejected"),
            }
            AuthError::InvalidCredential
        })?;

        let account_id = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidCredential)?;
        let role = AccountRole::from_code(&claims.extra.role).ok_or(AuthError::InvalidCredential)?;

        Ok(Identity::new(account_id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use kernel::id::AccountId;

    fn issuer() -> JwtTokenIssuer {
        JwtTokenIssuer::from_config(&AuthConfig::with_random_secrets())
    }

    #[test]
    fn test_issue_then_verify_recovers_identity() {
        let issuer = issuer();
        for role in [AccountRole::Standard, AccountRole::Admin] {
            let identity = Identity::new(AccountId::new(), role);
            let issued = issuer.issue(&identity, Utc::now()).unwrap();

            assert_eq!(issuer.verify(&issued.token).unwrap(), identity);
        }
    }

    #[test]
    fn test_expiry_is_explicit() {
        let now = Utc::now();
        let issued = issuer()
            .issue(&Identity::new(AccountId::new(), AccountRole::Standard), now)
            .unwrap();
        assert_eq!(issued.expires_at.timestamp(), (now + Duration::hours(1)).timestamp());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let issued = issuer()
            .issue(&Identity::new(AccountId::new(), AccountRole::Admin), Utc::now())
            .unwrap();

        assert!(matches!(
            issuer().verify(&issued.token),
            Err(AuthError::InvalidCredential)
        ));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let signer = TokenSigner::new(b"unit-test-secret-unit-test-secret", Duration::hours(1));
        let token = signer
            .sign(
                AccountId::new().to_string(),
                RoleClaim {
                    role: "root".into(),
                },
                Utc::now(),
            )
            .unwrap()
            .token;

        assert!(matches!(
            JwtTokenIssuer::new(signer).verify(&token),
            Err(AuthError::InvalidCredential)
        ));
    }
}

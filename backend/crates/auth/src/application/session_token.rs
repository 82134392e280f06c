//! Signed session-id cookie values
//!
//! Format: `{session uuid}.{base64url(HMAC-SHA256(uuid))}`. Anything that does
//! not verify is treated as "no session".

use kernel::id::SessionId;
use platform::crypto::{from_base64_url, hmac_sha256, to_base64_url, verify_hmac_sha256};

pub fn sign_session_id(session_id: &SessionId, secret: &[u8; 32]) -> String {
    let id = session_id.to_string();
    let signature = hmac_sha256(secret, id.as_bytes());
    format!("{}.{}", id, to_base64_url(&signature))
}

pub fn verify_session_token(token: &str, secret: &[u8; 32]) -> Option<SessionId> {
    let (id, signature_b64) = token.split_once('.')?;
    let signature = from_base64_url(signature_b64).ok()?;

    if !verify_hmac_sha256(secret, id.as_bytes(), &signature) {
        return None;
    }

    id.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_id_verifies() {
        let secret = [9u8; 32];
        let id = SessionId::new();
        let token = sign_session_id(&id, &secret);

        assert_eq!(verify_session_token(&token, &secret), Some(id));
    }

    #[test]
    fn test_forged_tokens_rejected() {
        let secret = [9u8; 32];
        let id = SessionId::new();
        let token = sign_session_id(&id, &secret);

        assert_eq!(verify_session_token(&token, &[1u8; 32]), None);
        assert_eq!(verify_session_token(&id.to_string(), &secret), None);

        let other = SessionId::new();
        let (_, sig) = token.split_once('.').unwrap();
        assert_eq!(
            verify_session_token(&format!("{other}.{sig}"), &secret),
            None
        );
        assert_eq!(verify_session_token("garbage.!!!", &secret), None);
    }
}

//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a random 32-byte key
pub fn random_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    key
}

/// Decode standard base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Encode bytes as URL-safe base64 without padding (cookie-safe)
pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn from_base64_url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Verify an HMAC-SHA256 tag in constant time
pub fn verify_hmac_sha256(key: &[u8], data: &[u8], tag: &[u8]) -> bool {
    match HmacSha256::new_from_slice(key) {
        Ok(mut mac) => {
            mac.update(data);
            mac.verify_slice(tag).is_ok()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_known_answer() {
        // RFC 4231 test case 2
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        let expected =
            hex::decode("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
                .unwrap();
        assert_eq!(mac.to_vec(), expected);
    }

    #[test]
    fn test_verify_hmac() {
        let key = [42u8; 32];
        let tag = hmac_sha256(&key, b"session-id");
        assert!(verify_hmac_sha256(&key, b"session-id", &tag));
        assert!(!verify_hmac_sha256(&key, b"session-id-2", &tag));
        assert!(!verify_hmac_sha256(&[7u8; 32], b"session-id", &tag));
        assert!(!verify_hmac_sha256(&key, b"session-id", &tag[..16]));
    }

    #[test]
    fn test_random_key() {
        let a = random_key();
        let b = random_key();
        assert_ne!(a, b);
        assert_eq!(random_bytes(16).len(), 16);
    }

    #[test]
    fn test_base64_url_is_cookie_safe() {
        let encoded = to_base64_url(&[0xfb, 0xff, 0xfe]);
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('='));
        assert_eq!(from_base64_url(&encoded).unwrap(), vec![0xfb, 0xff, 0xfe]);
    }

    #[test]
    fn test_from_base64_uses_standard_alphabet() {
        assert_eq!(from_base64("+/8=").unwrap(), vec![0xfb, 0xff]);
        assert!(from_base64("-_8").is_err());
    }
}

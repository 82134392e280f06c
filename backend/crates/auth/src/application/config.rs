//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::domain::entity::account::LockoutPolicy;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;
use platform::cookie::CookieConfig;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Failed-login threshold and lock duration (5 / 30 minutes)
    pub lockout: LockoutPolicy,
    /// HS256 secret for bearer tokens
    pub token_secret: Vec<u8>,
    /// Bearer token lifetime
    pub token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Advisory password lifetime
    pub password_validity: Duration,
    /// Session cookie name
    pub session_cookie_name: String,
    /// HMAC key for session cookie values (32 bytes)
    pub session_secret: [u8; 32],
    /// Sessions idle for longer than this are swept
    pub session_idle_timeout: Duration,
    /// Chance that a tracked request triggers an idle sweep
    pub sweep_probability: f64,
    /// Take the client IP from `X-Forwarded-For` instead of the socket peer.
    /// Only safe behind a reverse proxy that overwrites the header.
    pub trust_forwarded_for: bool,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Upper bound on a single storage call
    pub storage_timeout: StdDuration,
    /// Upper bound on a single hash or verify
    pub hashing_timeout: StdDuration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            lockout: LockoutPolicy::default(),
            token_secret: Vec::new(),
            token_ttl: Duration::hours(1),
            password_pepper: None,
            password_validity: Duration::days(30),
            session_cookie_name: "sid".to_string(),
            session_secret: [0u8; 32],
            session_idle_timeout: Duration::hours(24),
            sweep_probability: 0.01,
            trust_forwarded_for: false,
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            storage_timeout: StdDuration::from_secs(5),
            hashing_timeout: StdDuration::from_secs(5),
        }
    }
}

impl AuthConfig {
    /// Create config with random token and session secrets
    pub fn with_random_secrets() -> Self {
        Self {
            token_secret: platform::crypto::random_bytes(32),
            session_secret: platform::crypto::random_key(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Cookie settings for the session id
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_idle_timeout.num_seconds()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_lockout_rules() {
        let config = AuthConfig::default();
        assert_eq!(config.lockout.max_attempts, 5);
        assert_eq!(config.lockout.lock_duration, Duration::minutes(30));
        assert_eq!(config.session_idle_timeout, Duration::hours(24));
        assert_eq!(config.sweep_probability, 0.01);
        assert!(!config.trust_forwarded_for);
    }

    #[test]
    fn test_development_has_secrets_and_insecure_cookie() {
        let config = AuthConfig::development();
        assert_eq!(config.token_secret.len(), 32);
        assert_ne!(config.session_secret, [0u8; 32]);

        let cookie = config.session_cookie().build_set_cookie("v");
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=86400"));
    }
}

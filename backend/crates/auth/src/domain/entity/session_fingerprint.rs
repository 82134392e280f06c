//! Session Fingerprint Entity
//!
//! Server-side record for a browser session. The first request binds the
//! user-agent and IP; later requests are compared against them. A mismatch
//! is reported, never enforced.

use chrono::{DateTime, Duration, Utc};
use kernel::id::SessionId;
use platform::client::RequestFingerprint;
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFingerprint {
    pub session_id: SessionId,
    pub bound_user_agent: Option<String>,
    pub bound_ip: Option<IpAddr>,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of one idle-session sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Sessions stored when the sweep ran
    pub scanned: usize,
    pub destroyed: usize,
}

/// Difference between the bound fingerprint and the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintDrift {
    pub original_user_agent: Option<String>,
    pub current_user_agent: Option<String>,
    pub original_ip: Option<IpAddr>,
    pub current_ip: Option<IpAddr>,
}

impl FingerprintDrift {
    pub fn user_agent_changed(&self) -> bool {
        self.original_user_agent != self.current_user_agent
    }

    pub fn ip_changed(&self) -> bool {
        self.original_ip != self.current_ip
    }
}

impl SessionFingerprint {
    /// Bind a new session to the request that created it
    pub fn bind(session_id: SessionId, origin: &RequestFingerprint, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            bound_user_agent: origin.user_agent.clone(),
            bound_ip: origin.ip,
            last_active: now,
            created_at: now,
        }
    }

    pub fn drift(&self, current: &RequestFingerprint) -> Option<FingerprintDrift> {
        let drift = FingerprintDrift {
            original_user_agent: self.bound_user_agent.clone(),
            current_user_agent: current.user_agent.clone(),
            original_ip: self.bound_ip,
            current_ip: current.ip,
        };

        (drift.user_agent_changed() || drift.ip_changed()).then_some(drift)
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active = now;
    }

    /// Strictly longer than `idle_timeout` since the last request
    pub fn is_idle(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now - self.last_active > idle_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(ua: &str, ip: &str) -> RequestFingerprint {
        RequestFingerprint::new(Some(ua.to_string()), Some(ip.parse().unwrap()))
    }

    #[test]
    fn test_same_fingerprint_has_no_drift() {
        let s = SessionFingerprint::bind(SessionId::new(), &origin("UA/1", "10.0.0.1"), Utc::now());
        assert_eq!(s.drift(&origin("UA/1", "10.0.0.1")), None);
    }

    #[test]
    fn test_drift_reports_both_sides() {
        let s = SessionFingerprint::bind(SessionId::new(), &origin("UA/1", "10.0.0.1"), Utc::now());

        let drift = s.drift(&origin("UA/2", "10.0.0.1")).unwrap();
        assert!(drift.user_agent_changed());
        assert!(!drift.ip_changed());
        assert_eq!(drift.original_user_agent.as_deref(), Some("UA/1"));
        assert_eq!(drift.current_user_agent.as_deref(), Some("UA/2"));

        let drift = s.drift(&origin("UA/1", "10.0.0.2")).unwrap();
        assert!(drift.ip_changed());
    }

    #[test]
    fn test_idle_boundary() {
        let now = Utc::now();
        let mut s = SessionFingerprint::bind(SessionId::new(), &RequestFingerprint::default(), now);
        let day = Duration::hours(24);

        assert!(!s.is_idle(now + day, day));
        assert!(s.is_idle(now + day + Duration::seconds(1), day));

        s.touch(now + day);
        assert!(!s.is_idle(now + day + Duration::seconds(1), day));
    }
}

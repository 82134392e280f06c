//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// What a request says about the client it came from
///
/// Sessions bind to this on first sight; later requests are compared
/// against the bound values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFingerprint {
    pub user_agent: Option<String>,
    pub ip: Option<IpAddr>,
}

impl RequestFingerprint {
    pub fn new(user_agent: Option<String>, ip: Option<IpAddr>) -> Self {
        Self { user_agent, ip }
    }

    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}

/// Extract the client fingerprint from request headers
///
/// A missing User-Agent is recorded as `None`, not rejected.
pub fn extract_fingerprint(headers: &HeaderMap, client_ip: Option<IpAddr>) -> RequestFingerprint {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    RequestFingerprint::new(user_agent, client_ip)
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For first, then falls back to the direct connection IP.
/// The header is client-controlled unless a reverse proxy overwrites it, so
/// only call this behind such a proxy.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_fingerprint() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 Test Browser"),
        );
        let ip: IpAddr = "10.1.2.3".parse().unwrap();

        let fp = extract_fingerprint(&headers, Some(ip));
        assert_eq!(fp.user_agent.as_deref(), Some("Mozilla/5.0 Test Browser"));
        assert_eq!(fp.ip_string().as_deref(), Some("10.1.2.3"));
    }

    #[test]
    fn test_extract_fingerprint_missing_ua() {
        let fp = extract_fingerprint(&HeaderMap::new(), None);
        assert_eq!(fp, RequestFingerprint::default());
    }

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_falls_back_on_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("unknown"));
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        assert_eq!(extract_client_ip(&headers, Some(direct)), Some(direct));
    }
}

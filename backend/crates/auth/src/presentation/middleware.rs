//! Auth Middleware
//!
//! - `require_bearer`: token check plus role gate for protected routes
//! - `track_session_activity`: session cookie and fingerprint tracking
//! - `security_monitor`: request logging with anomaly warnings

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{Uri, header};
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::SessionId;
use platform::client::{extract_client_ip, extract_fingerprint};
use platform::cookie::extract_cookie;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::config::AuthConfig;
use crate::application::session_token::{sign_session_id, verify_session_token};
use crate::application::{AccessLevel, SessionActivityTracker, authorize};
use crate::domain::repository::SessionRepository;
use crate::domain::service::TokenIssuer;
use crate::error::AuthError;

const SLOW_REQUEST: Duration = Duration::from_secs(1);

// ============================================================================
// Bearer Gate
// ============================================================================

/// Middleware state for a bearer-protected route group
#[derive(Clone)]
pub struct AuthGate {
    pub tokens: Arc<dyn TokenIssuer>,
    pub level: AccessLevel,
}

impl AuthGate {
    pub fn authenticated(tokens: Arc<dyn TokenIssuer>) -> Self {
        Self {
            tokens,
            level: AccessLevel::Authenticated,
        }
    }

    pub fn admin(tokens: Arc<dyn TokenIssuer>) -> Self {
        Self {
            tokens,
            level: AccessLevel::Admin,
        }
    }
}

/// Middleware that requires a valid bearer token at the gate's access level
///
/// On success the verified `Identity` is stored in the request extensions.
pub async fn require_bearer(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let identity = authorize(gate.tokens.as_ref(), authorization, gate.level)?;
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

// ============================================================================
// Session Activity
// ============================================================================

/// Middleware state for session tracking
#[derive(Clone)]
pub struct SessionTracking<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub tracker: SessionActivityTracker<S>,
    pub config: Arc<AuthConfig>,
}

/// Middleware that observes the request's session
///
/// A missing or forged `sid` cookie starts a new session and the signed id is
/// returned in `Set-Cookie`. Tracking failures are logged and never fail the
/// request.
pub async fn track_session_activity<S>(
    State(state): State<SessionTracking<S>>,
    req: Request,
    next: Next,
) -> Response
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let headers = req.headers();
    let ip = if state.config.trust_forwarded_for {
        extract_client_ip(headers, peer_ip(&req))
    } else {
        peer_ip(&req)
    };
    let fingerprint = extract_fingerprint(headers, ip);

    let existing = extract_cookie(headers, &state.config.session_cookie_name)
        .and_then(|token| verify_session_token(&token, &state.config.session_secret));

    let (session_id, is_new) = match existing {
        Some(id) => (id, false),
        None => (SessionId::new(), true),
    };

    if let Err(e) = state.tracker.observe(session_id, &fingerprint).await {
        tracing::warn!(session_id = %session_id, error = %e, "Session tracking failed");
    }

    let mut response = next.run(req).await;

    if is_new {
        let token = sign_session_id(&session_id, &state.config.session_secret);
        if let Some(cookie) = state.config.session_cookie().header_value(&token) {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
    }

    response
}

// ============================================================================
// Security Monitor
// ============================================================================

/// Middleware that logs every request and warns on anomalies
pub async fn security_monitor(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let fingerprint = extract_fingerprint(req.headers(), peer_ip(&req));
    let ip = fingerprint.ip_string().unwrap_or_default();
    let user_agent = fingerprint.user_agent.unwrap_or_default();

    tracing::info!(%method, %path, %ip, %user_agent, "Request received");

    if is_path_traversal(req.uri()) {
        tracing::warn!(%method, %path, %ip, "Path traversal attempt");
    }

    let started = Instant::now();
    let response = next.run(req).await;
    let elapsed = started.elapsed();
    let status = response.status();

    if elapsed > SLOW_REQUEST {
        tracing::warn!(
            %method,
            %path,
            elapsed_ms = elapsed.as_millis() as u64,
            "Slow response"
        );
    }
    if status.as_u16() >= 400 {
        tracing::warn!(%method, %path, %ip, status = status.as_u16(), "Error response");
    }

    response
}

/// Socket peer address, present when served with `ConnectInfo<SocketAddr>`
fn peer_ip(req: &Request) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
}

fn is_path_traversal(uri: &Uri) -> bool {
    let raw = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or_default();
    let lowered = raw.to_ascii_lowercase();

    raw.contains("../")
        || raw.contains("..\\")
        || lowered.contains("..%2f")
        || lowered.contains("..%5c")
}

//! Session Activity Tracker
//!
//! Runs once per request that carries a session. Binds the fingerprint on
//! first sight, logs drift on later requests (detection only), refreshes
//! `last_active`, and occasionally sweeps idle sessions in the background.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use kernel::id::SessionId;
use platform::client::RequestFingerprint;
use rand::Rng;

use crate::application::bounded;
use crate::application::config::AuthConfig;
pub use crate::domain::entity::session_fingerprint::SweepReport;
use crate::domain::entity::session_fingerprint::{FingerprintDrift, SessionFingerprint};
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// What one observation found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub session_id: SessionId,
    /// The fingerprint was bound by this request
    pub first_seen: bool,
    pub drift: Option<FingerprintDrift>,
    /// A background idle sweep was started
    pub sweep_triggered: bool,
}

pub struct SessionActivityTracker<S>
where
    S: SessionRepository,
{
    repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> Clone for SessionActivityTracker<S>
where
    S: SessionRepository,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S> SessionActivityTracker<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn observe(
        &self,
        session_id: SessionId,
        origin: &RequestFingerprint,
    ) -> AuthResult<Observation> {
        let now = Utc::now();
        let timeout = self.config.storage_timeout;

        let existing = bounded::storage(timeout, self.repo.find(&session_id)).await?;

        let (session, first_seen, drift) = match existing {
            None => (SessionFingerprint::bind(session_id, origin, now), true, None),
            Some(mut session) => {
                let drift = session.drift(origin);
                if let Some(d) = &drift {
                    tracing::warn!(
                        session_id = %session_id,
                        original_user_agent = ?d.original_user_agent,
                        current_user_agent = ?d.current_user_agent,
                        original_ip = ?d.original_ip,
                        current_ip = ?d.current_ip,
                        "Suspicious session activity detected"
                    );
                }
                session.touch(now);
                (session, false, drift)
            }
        };

        bounded::storage(timeout, self.repo.save(&session)).await?;

        let sweep_triggered = self.should_sweep();
        if sweep_triggered {
            self.spawn_sweep(now);
        }

        Ok(Observation {
            session_id,
            first_seen,
            drift,
            sweep_triggered,
        })
    }

    /// Destroy every session idle for longer than the configured timeout
    pub async fn sweep_idle(&self, now: DateTime<Utc>) -> AuthResult<SweepReport> {
        sweep(
            self.repo.as_ref(),
            self.config.session_idle_timeout,
            self.config.storage_timeout,
            now,
        )
        .await
    }

    fn should_sweep(&self) -> bool {
        let p = self.config.sweep_probability;
        if p.is_nan() || p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        rand::rng().random_bool(p)
    }

    fn spawn_sweep(&self, now: DateTime<Utc>) {
        let repo = self.repo.clone();
        let idle = self.config.session_idle_timeout;
        let timeout = self.config.storage_timeout;

        tokio::spawn(async move {
            if let Err(e) = sweep(repo.as_ref(), idle, timeout, now).await {
                tracing::warn!(error = %e, "Idle session sweep failed");
            }
        });
    }
}

async fn sweep<S>(
    repo: &S,
    idle: Duration,
    timeout: StdDuration,
    now: DateTime<Utc>,
) -> AuthResult<SweepReport>
where
    S: SessionRepository,
{
    let report = bounded::storage(timeout, repo.destroy_idle(now, idle)).await?;

    tracing::info!(
        scanned = report.scanned,
        destroyed = report.destroyed,
        "Idle session sweep completed"
    );

    Ok(report)
}

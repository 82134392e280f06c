//! Auth Router
//!
//! Mounted under `/api/user`. `/register` and `/login` are public, `/me` and
//! `/change-password` need a bearer token, `/unlock` needs an admin token.
//! Every route passes through session tracking.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::SessionActivityTracker;
use crate::application::config::AuthConfig;
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::infra::argon2::Argon2PasswordHasher;
use crate::infra::jwt::JwtTokenIssuer;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{
    AuthGate, SessionTracking, require_bearer, track_session_activity,
};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let config = Arc::new(config);
    let state = AuthAppState {
        repo: Arc::new(repo),
        hasher: Arc::new(Argon2PasswordHasher::new(config.password_pepper.clone())),
        tokens: Arc::new(JwtTokenIssuer::from_config(&config)),
        config,
    };

    auth_router_from_state(state)
}

/// Create the Auth router from fully assembled state
pub fn auth_router_from_state<R>(state: AuthAppState<R>) -> Router
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let tracking = SessionTracking {
        tracker: SessionActivityTracker::new(state.repo.clone(), state.config.clone()),
        config: state.config.clone(),
    };

    let authenticated = Router::new()
        .route("/me", get(handlers::me::<R>))
        .route("/change-password", post(handlers::change_password::<R>))
        .route_layer(middleware::from_fn_with_state(
            AuthGate::authenticated(state.tokens.clone()),
            require_bearer,
        ));

    let admin = Router::new()
        .route("/unlock", post(handlers::unlock::<R>))
        .route_layer(middleware::from_fn_with_state(
            AuthGate::admin(state.tokens.clone()),
            require_bearer,
        ));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .merge(authenticated)
        .merge(admin)
        .layer(middleware::from_fn_with_state(
            tracking,
            track_session_activity::<R>,
        ))
        .with_state(state)
}

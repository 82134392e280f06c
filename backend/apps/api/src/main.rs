//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod settings;

use auth::{PgAuthRepository, SessionActivityTracker, auth_router, security_monitor};
use axum::{
    Json, Router, http,
    http::{Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Settings;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    // Database connection: an unreachable database aborts startup
    let pool = match PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .acquire_timeout(settings.db_connect_timeout)
        .connect(&settings.database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Database unavailable, aborting startup");
            return Err(e.into());
        }
    };

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let repo = PgAuthRepository::new(pool.clone());

    // Startup cleanup: sweep idle sessions
    // Errors here should not prevent server startup
    let tracker = SessionActivityTracker::new(
        Arc::new(repo.clone()),
        Arc::new(settings.auth.clone()),
    );
    if let Err(e) = tracker.sweep_idle(Utc::now()).await {
        tracing::warn!(
            error = %e,
            "Idle session cleanup failed, continuing anyway"
        );
    }

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = settings
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/user", auth_router(repo, settings.auth))
        .layer(middleware::from_fn(security_monitor))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CatchPanicLayer::custom(handle_panic));

    // Start server
    tracing::info!("Listening on {}", settings.bind_addr);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Log the panic and answer with the generic internal-error body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(panic = detail, "Request handler panicked");

    let error = AppError::internal("Internal server error");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(error.to_body())).into_response()
}

//! Runtime settings loaded from the environment

use anyhow::{Context, bail};
use auth::AuthConfig;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_connect_timeout: Duration,
    pub auth: AuthConfig,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_addr = parse_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 5000)))?;

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url,
            bind_addr,
            frontend_origins,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5)?,
            db_connect_timeout: Duration::from_secs(parse_or("DB_CONNECT_TIMEOUT_SECS", 10)?),
            auth: auth_config()?,
        })
    }
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    // Debug builds fall back to random secrets; release builds require them
    let mut config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig::default()
    };

    match env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => config.token_secret = secret.into_bytes(),
        _ if cfg!(debug_assertions) => {
            tracing::warn!("JWT_SECRET not set, using a random secret");
        }
        _ => bail!("JWT_SECRET must be set in production"),
    }

    match env::var("SESSION_SECRET") {
        Ok(secret_b64) => {
            let bytes = platform::crypto::from_base64(secret_b64.trim())
                .context("SESSION_SECRET must be base64")?;
            config.session_secret = bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes"))?;
        }
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("SESSION_SECRET not set, using a random secret");
        }
        Err(_) => bail!("SESSION_SECRET must be set in production"),
    }

    if let Ok(pepper) = env::var("PASSWORD_PEPPER") {
        if !pepper.is_empty() {
            config.password_pepper = Some(pepper.into_bytes());
        }
    }

    config.token_ttl = chrono::Duration::seconds(parse_or("TOKEN_TTL_SECS", 3600)?);
    config.storage_timeout = Duration::from_millis(parse_or("STORAGE_TIMEOUT_MS", 5000)?);
    config.sweep_probability = parse_or("SESSION_SWEEP_PROBABILITY", 0.01)?;
    if !(0.0..=1.0).contains(&config.sweep_probability) {
        bail!("SESSION_SWEEP_PROBABILITY must be within 0.0..=1.0");
    }
    config.cookie_secure = parse_or("COOKIE_SECURE", config.cookie_secure)?;
    config.trust_forwarded_for = parse_or("TRUST_FORWARDED_FOR", false)?;

    Ok(config)
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

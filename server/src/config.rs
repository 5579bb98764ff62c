//! Runtime configuration for the TeamCore server.
//!
//! Everything is read once at start-up and handed to constructors as plain
//! values; no component reads the environment on its own.

use anyhow::{anyhow, Context, Result};
use std::{env, fmt, time::Duration};
use url::Url;

use crate::ingest::schema::SchemaVersion;

/// Squad endpoint of the first team, used when `FUPA_API_URL` is unset.
pub const DEFAULT_FUPA_API_URL: &str =
    "https://api.fupa.net/v1/teams/tus-ellmendingen-m1-2025-26/squad";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Socket address the HTTP server binds to.
    pub server_addr: String,
    /// Postgres URL; `None` selects the in-memory player store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub squad: SquadSettings,
    pub auth: AuthSettings,
}

/// Where and how to pull the squad from.
#[derive(Debug, Clone)]
pub struct SquadSettings {
    pub api_url: Url,
    pub schema: SchemaVersion,
    /// Request deadline enforced by the HTTP client.
    pub timeout: Duration,
}

/// Bearer-token verification parameters.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    /// Expected `aud` claim; not checked when `None`.
    pub audience: Option<String>,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("audience", &self.audience)
            .finish()
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment, a map in tests…).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_addr = get("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".into());
        let database_url = get("DATABASE_URL");

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS must be a positive integer, got `{v}`"))?,
            None => 5,
        };

        let raw_url = get("FUPA_API_URL").unwrap_or_else(|| DEFAULT_FUPA_API_URL.into());
        let api_url = Url::parse(&raw_url)
            .with_context(|| format!("FUPA_API_URL is not a valid URL: `{raw_url}`"))?;

        let schema = get("SQUAD_SCHEMA_VERSION")
            .ok_or_else(|| anyhow!("SQUAD_SCHEMA_VERSION must be set (v1 or v2)"))?
            .parse::<SchemaVersion>()
            .context("SQUAD_SCHEMA_VERSION")?;

        let timeout_secs = match get("FUPA_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("FUPA_TIMEOUT_SECS must be a number of seconds, got `{v}`"))?,
            None => 30,
        };

        let jwt_secret = get("JWT_SECRET").ok_or_else(|| anyhow!("JWT_SECRET must be set"))?;
        let audience = get("JWT_AUDIENCE");

        Ok(Settings {
            server_addr,
            database_url,
            db_max_connections,
            squad: SquadSettings {
                api_url,
                schema,
                timeout: Duration::from_secs(timeout_secs),
            },
            auth: AuthSettings {
                jwt_secret,
                audience,
            },
        })
    }
}

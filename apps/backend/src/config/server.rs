//! Process configuration read from the environment at startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST_GRACE_SECS: u64 = 120;
const DEFAULT_FINISHED_ROOM_TTL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long a disconnected host has to come back before the room is torn down.
    pub host_grace: Duration,
    /// How long a finished game stays readable before the room is deleted.
    pub finished_room_ttl: Duration,
    /// Explicit CORS origins; `None` falls back to localhost development origins.
    pub cors_origins: Option<Vec<String>>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("AVALON_HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_var(&lookup, "AVALON_PORT", DEFAULT_PORT)?;
        let grace = parse_var(&lookup, "AVALON_HOST_GRACE_SECS", DEFAULT_HOST_GRACE_SECS)?;
        let ttl = parse_var(
            &lookup,
            "AVALON_FINISHED_ROOM_TTL_SECS",
            DEFAULT_FINISHED_ROOM_TTL_SECS,
        )?;

        let cors_origins = lookup("CORS_ALLOWED_ORIGINS").and_then(|raw| {
            let origins: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            (!origins.is_empty()).then_some(origins)
        });

        Ok(Self {
            host,
            port,
            host_grace: Duration::from_secs(grace),
            finished_room_ttl: Duration::from_secs(ttl),
            cors_origins,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            host_grace: Duration::from_secs(DEFAULT_HOST_GRACE_SECS),
            finished_room_ttl: Duration::from_secs(DEFAULT_FINISHED_ROOM_TTL_SECS),
            cors_origins: None,
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            AppError::config(format!(
                "Environment variable '{name}' has invalid value '{raw}': {e}"
            ))
        }),
    }
}

//! Load settings from the process environment (and `.env` when present).

use crate::config::{validate, Settings, StoreBackend};
use crate::error::ConfigError;
use std::collections::HashMap;
use std::str::FromStr;

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_SCHEMA: &str = "GENEALOGY_SCHEMA";
pub const ENV_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
pub const ENV_BODY_LIMIT: &str = "BODY_LIMIT_BYTES";
pub const ENV_BACKEND: &str = "STORE_BACKEND";

/// Read `.env` if present, then build and validate settings from the environment.
pub fn load_from_env() -> Result<Settings, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(ConfigError::Load(e.to_string()));
        }
    }
    let vars: HashMap<String, String> = std::env::vars().collect();
    load_from_map(&vars)
}

/// Build and validate settings from key/value pairs; missing keys keep their defaults.
pub fn load_from_map(vars: &HashMap<String, String>) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();
    if let Some(url) = non_empty(vars, ENV_DATABASE_URL) {
        settings.database_url = url.to_string();
    }
    if let Some(addr) = non_empty(vars, ENV_BIND_ADDR) {
        settings.bind_addr = addr.to_string();
    }
    if let Some(schema) = non_empty(vars, ENV_SCHEMA) {
        settings.schema = schema.to_string();
    }
    if let Some(n) = non_empty(vars, ENV_MAX_CONNECTIONS) {
        settings.max_connections = parse(ENV_MAX_CONNECTIONS, n)?;
    }
    if let Some(n) = non_empty(vars, ENV_BODY_LIMIT) {
        settings.body_limit_bytes = parse(ENV_BODY_LIMIT, n)?;
    }
    if let Some(b) = non_empty(vars, ENV_BACKEND) {
        settings.backend = StoreBackend::from_str(b).map_err(|reason| ConfigError::Invalid {
            key: ENV_BACKEND,
            reason,
        })?;
    }
    validate(&settings)?;
    Ok(settings)
}

fn non_empty<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

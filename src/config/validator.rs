//! Settings validation.

use crate::config::Settings;
use crate::error::ConfigError;
use regex::Regex;
use std::net::SocketAddr;

/// Schema names are interpolated into DDL, so only plain lowercase identifiers are accepted.
const SCHEMA_PATTERN: &str = r"^[a-z_][a-z0-9_]{0,62}$";

pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let re = Regex::new(SCHEMA_PATTERN).map_err(|e| ConfigError::Load(e.to_string()))?;
    if !re.is_match(&settings.schema) {
        return Err(ConfigError::Invalid {
            key: "schema",
            reason: format!("'{}' is not a valid identifier", settings.schema),
        });
    }
    if settings.max_connections == 0 {
        return Err(ConfigError::Invalid {
            key: "max_connections",
            reason: "must be at least 1".into(),
        });
    }
    if settings.body_limit_bytes == 0 {
        return Err(ConfigError::Invalid {
            key: "body_limit_bytes",
            reason: "must be at least 1".into(),
        });
    }
    settings
        .bind_addr
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::Invalid {
            key: "bind_addr",
            reason: e.to_string(),
        })?;
    if !settings.database_url.starts_with("postgres://") && !settings.database_url.starts_with("postgresql://") {
        return Err(ConfigError::Invalid {
            key: "database_url",
            reason: "expected a postgres:// url".into(),
        });
    }
    Ok(())
}

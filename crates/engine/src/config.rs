//! Engine configuration from environment variables.

use std::net::SocketAddr;

const DEFAULT_DATABASE_URL: &str = "sqlite:lifesys.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_HOURS: i64 = 168;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub session_ttl: chrono::Duration,
    /// `*`, a comma-separated origin list, or unset for no CORS layer
    pub cors_allowed_origins: Option<String>,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match var("SERVER_PORT").or_else(|| var("PORT")) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "SERVER_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let ttl_hours = match var("SESSION_TTL_HOURS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SESSION_TTL_HOURS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_SESSION_TTL_HOURS,
        };

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            host: var("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            session_ttl: chrono::Duration::hours(ttl_hours),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS"),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            name: "SERVER_HOST",
            value: raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<EngineConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 3000);
        assert_eq!(config.session_ttl, chrono::Duration::hours(168));
        assert!(config.cors_allowed_origins.is_none());
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn port_falls_back_to_port_variable() {
        assert_eq!(config(&[("PORT", "8080")]).unwrap().port, 8080);
        assert_eq!(
            config(&[("PORT", "8080"), ("SERVER_PORT", "9090")]).unwrap().port,
            9090
        );
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(config(&[("SERVER_PORT", "http")]).is_err());
        assert!(config(&[("SESSION_TTL_HOURS", "0")]).is_err());
        assert!(config(&[("SERVER_HOST", "not a host")])
            .unwrap()
            .socket_addr()
            .is_err());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config(&[("CORS_ALLOWED_ORIGINS", "  "), ("DATABASE_URL", "")]).unwrap();
        assert!(config.cors_allowed_origins.is_none());
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }
}

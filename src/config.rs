use std::env;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// `None` leaves the service running but unable to reach storage.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub run_migrations: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_connections: 5,
            run_migrations: true,
        }
    }
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let bind_addr = match lookup("BIND_ADDR") {
            Some(value) => value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    name: "BIND_ADDR",
                    value,
                    reason: e.to_string(),
                }
            })?,
            None => defaults.bind_addr,
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(value) => match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        name: "DB_MAX_CONNECTIONS",
                        value,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "DB_MAX_CONNECTIONS",
                        value,
                        reason: e.to_string(),
                    });
                }
            },
            None => defaults.max_connections,
        };

        let run_migrations = lookup("RUN_MIGRATIONS")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(defaults.run_migrations);

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            run_migrations,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.max_connections, 5);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_blank_database_url_is_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  ")])).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_reads_all_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://enrollments.db"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("DB_MAX_CONNECTIONS", "10"),
            ("RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("sqlite://enrollments.db"));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_connections, 10);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("BIND_ADDR", "nowhere")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "many")])).is_err());
    }
}

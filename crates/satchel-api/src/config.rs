//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;

use crate::error::AppError;

/// Minutes in one in-game day, the default ground-item lifetime.
const DEFAULT_GROUND_TTL_MINUTES: i64 = 1440;

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// YAML item catalog.
    pub catalog_path: PathBuf,
    /// YAML class starting gear, if any.
    pub starting_gear_path: Option<PathBuf>,
    /// How long dropped items stay on the ground.
    pub ground_ttl: Duration,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };
        let catalog_path = lookup("SATCHEL_CATALOG_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| {
                AppError::Config("SATCHEL_CATALOG_PATH environment variable must be set".to_owned())
            })?;
        let starting_gear_path = lookup("SATCHEL_STARTING_GEAR_PATH").map(PathBuf::from);
        let ttl_minutes = match lookup("SATCHEL_GROUND_TTL_MINUTES") {
            Some(value) => value
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "SATCHEL_GROUND_TTL_MINUTES must be a positive integer, got '{value}'"
                    ))
                })?,
            None => DEFAULT_GROUND_TTL_MINUTES,
        };

        Ok(Self {
            host,
            port,
            catalog_path,
            starting_gear_path,
            ground_ttl: Duration::minutes(ttl_minutes),
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a valid address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_catalog_is_set() {
        // Arrange
        let env = lookup(&[("SATCHEL_CATALOG_PATH", "content/items.yaml")]);

        // Act
        let config = AppConfig::from_lookup(env).unwrap();

        // Assert
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.catalog_path, PathBuf::from("content/items.yaml"));
        assert_eq!(config.starting_gear_path, None);
        assert_eq!(config.ground_ttl, Duration::days(1));
        assert_eq!(config.bind_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_missing_catalog_path_is_config_error() {
        // Act
        let result = AppConfig::from_lookup(lookup(&[]));

        // Assert
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        // Arrange
        let env = lookup(&[("SATCHEL_CATALOG_PATH", "items.yaml"), ("PORT", "eighty")]);

        // Act
        let result = AppConfig::from_lookup(env);

        // Assert
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("PORT")));
    }

    #[test]
    fn test_non_positive_ground_ttl_is_config_error() {
        // Arrange
        let env = lookup(&[
            ("SATCHEL_CATALOG_PATH", "items.yaml"),
            ("SATCHEL_GROUND_TTL_MINUTES", "0"),
        ]);

        // Act
        let result = AppConfig::from_lookup(env);

        // Assert
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_overrides_are_read() {
        // Arrange
        let env = lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SATCHEL_CATALOG_PATH", "items.yaml"),
            ("SATCHEL_STARTING_GEAR_PATH", "gear.yaml"),
            ("SATCHEL_GROUND_TTL_MINUTES", "30"),
        ]);

        // Act
        let config = AppConfig::from_lookup(env).unwrap();

        // Assert
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.starting_gear_path, Some(PathBuf::from("gear.yaml")));
        assert_eq!(config.ground_ttl, Duration::minutes(30));
    }
}

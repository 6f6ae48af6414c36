/// Application configuration, loaded from JSON with environment overrides
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::scheduler::DEFAULT_SLOT_MINUTES;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub solver: SolverConfig,
    pub auth: AuthConfig,
    pub scheduler: SchedulerConfig,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "timetable.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Consecutive outages before generation is suspended.
    pub failure_threshold: u32,
    pub cooldown_secs: u64,
}

impl SolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8000/generate-schedule".to_string(),
            timeout_secs: 60,
            connect_timeout_secs: 10,
            failure_threshold: 5,
            cooldown_secs: 30,
        }
    }
}

/// An admin account created at startup when missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub session_ttl_secs: u64,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl AuthConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 24 * 60 * 60,
            bootstrap_admin: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub slot_duration_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            slot_duration_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_tracing(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// # Arguments
    /// * `path` - Optional JSON config file. Missing fields take defaults; a
    ///   missing file is an error.
    ///
    /// Environment variables prefixed with `TIMETABLE_` override file values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => AppConfig::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup("TIMETABLE_ADDRESS") {
            self.server.address = address;
        }
        if let Some(port) = lookup("TIMETABLE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::invalid("TIMETABLE_PORT", format!("not a port: {}", port)))?;
        }
        if let Some(path) = lookup("TIMETABLE_DATABASE") {
            self.database.path = path;
        }
        if let Some(url) = lookup("TIMETABLE_SOLVER_URL") {
            self.solver.url = url;
        }
        if let Some(secs) = lookup("TIMETABLE_SOLVER_TIMEOUT_SECS") {
            self.solver.timeout_secs = secs.parse().map_err(|_| {
                ConfigError::invalid("TIMETABLE_SOLVER_TIMEOUT_SECS", format!("not a number: {}", secs))
            })?;
        }
        if let Some(level) = lookup("TIMETABLE_LOG_LEVEL") {
            self.log_level = level
                .parse()
                .map_err(|e: String| ConfigError::invalid("TIMETABLE_LOG_LEVEL", e))?;
        }
        Ok(())
    }

    /// Rejects values the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.solver.url)
            .map_err(|e| ConfigError::invalid("solver.url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                "solver.url",
                format!("unsupported scheme: {}", url.scheme()),
            ));
        }
        if self.solver.timeout_secs == 0 {
            return Err(ConfigError::invalid("solver.timeout_secs", "must be positive"));
        }
        if self.solver.failure_threshold == 0 {
            return Err(ConfigError::invalid("solver.failure_threshold", "must be positive"));
        }
        if self.scheduler.slot_duration_minutes == 0 {
            return Err(ConfigError::invalid(
                "scheduler.slot_duration_minutes",
                "must be positive",
            ));
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::invalid("database.path", "must not be empty"));
        }
        Ok(())
    }

    /// `address:port` to bind the HTTP server to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert_eq!(config.scheduler.slot_duration_minutes, 50);
        assert_eq!(config.solver.timeout(), Duration::from_secs(60));
        assert_eq!(config.solver.failure_threshold, 5);
        assert_eq!(config.solver.cooldown(), Duration::from_secs(30));
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "server": { "port": 8080 },
                "auth": {
                    "bootstrap_admin": {
                        "username": "admin",
                        "email": "admin@example.edu",
                        "password": "change-me"
                    }
                },
                "log_level": "debug"
            }"#,
        )
        .unwrap();

        assert_eq!(config.server.address, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.session_ttl_secs, 86400);
        assert_eq!(config.auth.bootstrap_admin.unwrap().username, "admin");
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TIMETABLE_PORT", "9000"),
            ("TIMETABLE_DATABASE", ":memory:"),
            ("TIMETABLE_SOLVER_URL", "http://solver:8000/generate-schedule"),
            ("TIMETABLE_LOG_LEVEL", "WARN"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.solver.url, "http://solver:8000/generate-schedule");
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(|key| (key == "TIMETABLE_PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.solver.url = "ftp://solver/generate".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scheduler.slot_duration_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/timetable.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

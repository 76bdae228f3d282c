use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection target. Required; startup fails without it.
    pub url: Option<String>,
    pub max_connections: u32,
    /// Queue operations issued while the connection is still being established
    /// instead of rejecting them.
    pub buffer_commands: bool,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not defined")]
    Missing(&'static str),

    #[error("{0} is not a valid connection string")]
    InvalidUrl(&'static str),

    #[error("{0} is out of range")]
    InvalidValue(&'static str),
}

/// Longest session lifetime accepted from configuration.
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365;

/// Scheme accepted in place of a real server for local demos.
pub const MEMORY_DATABASE_URL: &str = "memory://";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        override_from_env(&mut self.server.port, "PORT");
        override_from_env(&mut self.server.port, "VIDSHARE_PORT");

        if let Ok(v) = env::var("DATABASE_URL") {
            let v = v.trim();
            self.database.url = (!v.is_empty()).then(|| v.to_string());
        }
        override_from_env(&mut self.database.max_connections, "DATABASE_MAX_CONNECTIONS");
        override_from_env(&mut self.database.buffer_commands, "DATABASE_BUFFER_COMMANDS");
        override_from_env(&mut self.database.connection_timeout, "DATABASE_CONNECTION_TIMEOUT");

        override_from_env(&mut self.api.enable_request_logging, "API_ENABLE_REQUEST_LOGGING");
        override_from_env(&mut self.api.max_request_size_bytes, "API_MAX_REQUEST_SIZE_BYTES");

        override_from_env(&mut self.security.enable_cors, "SECURITY_ENABLE_CORS");
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        override_from_env(&mut self.security.jwt_expiry_hours, "JWT_EXPIRY_HOURS");

        self
    }

    /// Startup check. The process must not serve requests without a connection target.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let target = self.database_url()?;
        if target == MEMORY_DATABASE_URL {
            if self.environment != Environment::Development {
                return Err(ConfigError::InvalidUrl("DATABASE_URL"));
            }
        } else if url::Url::parse(target).is_err() {
            return Err(ConfigError::InvalidUrl("DATABASE_URL"));
        }
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if !(1..=MAX_JWT_EXPIRY_HOURS).contains(&self.security.jwt_expiry_hours) {
            return Err(ConfigError::InvalidValue("JWT_EXPIRY_HOURS"));
        }
        Ok(())
    }

    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database
            .url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }

    pub fn uses_memory_store(&self) -> bool {
        self.environment == Environment::Development
            && self.database.url.as_deref() == Some(MEMORY_DATABASE_URL)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                buffer_commands: true,
                connection_timeout: 30,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string()],
                jwt_secret: "vidshare-development-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
        }
    }

    /// Production settings with request logging and a longer connect timeout.
    fn staging() -> Self {
        let mut config = Self::production();
        config.environment = Environment::Staging;
        config.database.connection_timeout = 10;
        config.api.enable_request_logging = true;
        config.api.max_request_size_bytes = 5 * 1024 * 1024; // 5MB
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                buffer_commands: true,
                connection_timeout: 5,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
        }
    }
}

impl DatabaseConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }
}

/// Replaces `target` when `key` is set and parses; otherwise keeps the default.
fn override_from_env<T: FromStr>(target: &mut T, key: &str) {
    match env::var(key).map(|v| v.trim().parse::<T>()) {
        Ok(Ok(value)) => *target = value,
        Ok(Err(_)) => tracing::warn!("Ignoring unparseable {}", key),
        Err(_) => {}
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_keeps_default_on_bad_value() {
        let mut port: u16 = 3000;
        env::set_var("VIDSHARE_TEST_OVERRIDE_PORT", "not-a-port");
        override_from_env(&mut port, "VIDSHARE_TEST_OVERRIDE_PORT");
        assert_eq!(port, 3000);

        env::set_var("VIDSHARE_TEST_OVERRIDE_PORT", " 8080 ");
        override_from_env(&mut port, "VIDSHARE_TEST_OVERRIDE_PORT");
        assert_eq!(port, 8080);
        env::remove_var("VIDSHARE_TEST_OVERRIDE_PORT");
    }

    #[test]
    fn rejects_out_of_range_session_lifetime() {
        let mut config = AppConfig::development();
        config.database.url = Some(MEMORY_DATABASE_URL.to_string());

        for hours in [0, MAX_JWT_EXPIRY_HOURS + 1, u64::MAX] {
            config.security.jwt_expiry_hours = hours;
            assert_eq!(config.validate(), Err(ConfigError::InvalidValue("JWT_EXPIRY_HOURS")));
        }

        config.security.jwt_expiry_hours = MAX_JWT_EXPIRY_HOURS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn staging_inherits_production_limits() {
        let staging = AppConfig::staging();
        assert_eq!(staging.environment, Environment::Staging);
        assert_eq!(staging.database.max_connections, 10);
        assert!(staging.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.database.max_connections, 10);
        assert!(config.database.buffer_commands);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_default_production_config_requires_secret() {
        let mut config = AppConfig::production();
        config.database.url = Some("postgres://localhost/vidshare".to_string());
        assert_eq!(config.validate(), Err(ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn missing_database_url_fails_validation() {
        let config = AppConfig::development();
        assert_eq!(config.validate(), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn rejects_unparseable_database_url() {
        let mut config = AppConfig::development();
        config.database.url = Some("not a url".to_string());
        assert_eq!(config.validate(), Err(ConfigError::InvalidUrl("DATABASE_URL")));
    }

    #[test]
    fn memory_store_only_in_development() {
        let mut config = AppConfig::development();
        config.database.url = Some(MEMORY_DATABASE_URL.to_string());
        assert!(config.validate().is_ok());
        assert!(config.uses_memory_store());

        let mut config = AppConfig::production();
        config.database.url = Some(MEMORY_DATABASE_URL.to_string());
        config.security.jwt_secret = "secret".to_string();
        assert!(!config.uses_memory_store());
        assert_eq!(config.validate(), Err(ConfigError::InvalidUrl("DATABASE_URL")));
    }
}

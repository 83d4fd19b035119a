use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Longest accepted token lifetime, ten years.
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365 * 10;

/// Secret used when `JWT_SECRET` is not set. Refused in production.
pub const DEVELOPMENT_JWT_SECRET: &str = "sat-development-secret-do-not-deploy";

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
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
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
    pub jwt_issuer: String,
    pub jwt_expiry_hours: u64,
    /// Reject requests carrying a bad token instead of treating them as anonymous.
    pub reject_invalid_tokens: bool,
    /// Public access rules, `"[METHOD ]/path"`; a trailing `/**` matches a subtree.
    pub public_paths: Vec<String>,
    pub logout_redirect: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT secret must not be empty")]
    EmptySecret,

    #[error("JWT_SECRET must be set explicitly in production")]
    DevelopmentSecretInProduction,

    #[error("JWT expiry must be at least one hour")]
    ZeroExpiry,

    #[error("JWT expiry of {0} hours exceeds the {MAX_JWT_EXPIRY_HOURS} hour limit")]
    ExpiryTooLarge(u64),
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("SAT_API_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SAT_API_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|url| !url.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_REJECT_INVALID_TOKENS") {
            self.security.reject_invalid_tokens = v.parse().unwrap_or(self.security.reject_invalid_tokens);
        }
        if let Ok(v) = env::var("SECURITY_PUBLIC_PATHS") {
            self.security.public_paths = split_list(&v);
        }
        if let Ok(v) = env::var("SECURITY_LOGOUT_REDIRECT") {
            self.security.logout_redirect = Some(v).filter(|url| !url.trim().is_empty());
        }

        self
    }

    /// Checks invariants that `from_env` cannot enforce on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.environment == Environment::Production
            && self.security.jwt_secret == DEVELOPMENT_JWT_SECRET
        {
            return Err(ConfigError::DevelopmentSecretInProduction);
        }
        if self.security.jwt_expiry_hours == 0 {
            return Err(ConfigError::ZeroExpiry);
        }
        if self.security.jwt_expiry_hours > MAX_JWT_EXPIRY_HOURS {
            return Err(ConfigError::ExpiryTooLarge(self.security.jwt_expiry_hours));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn default_public_paths() -> Vec<String> {
        vec![
            "GET /".to_string(),
            "GET /health".to_string(),
            "POST /api/users".to_string(),
        ]
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 30,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["*".to_string()],
                jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
                jwt_issuer: "sat-api".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                reject_invalid_tokens: false,
                public_paths: Self::default_public_paths(),
                logout_redirect: None,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 10,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 512 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.sat.example.com".to_string()],
                jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
                jwt_issuer: "sat-api".to_string(),
                jwt_expiry_hours: 24,
                reject_invalid_tokens: false,
                public_paths: Self::default_public_paths(),
                logout_redirect: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 5,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://sat.example.com".to_string()],
                // Must come from JWT_SECRET; validate() refuses the fallback
                jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
                jwt_issuer: "sat-api".to_string(),
                jwt_expiry_hours: 8,
                reject_invalid_tokens: false,
                public_paths: Self::default_public_paths(),
                logout_redirect: None,
            },
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.database.url.is_none());
        assert_eq!(config.security.jwt_expiry_hours, 24 * 7);
        assert!(!config.security.reject_invalid_tokens);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_refuses_fallback_secret() {
        let mut config = AppConfig::production();
        assert_eq!(
            config.validate(),
            Err(ConfigError::DevelopmentSecretInProduction)
        );

        config.security.jwt_secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = AppConfig::development();
        config.security.jwt_secret.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptySecret));
    }

    #[test]
    fn test_expiry_bounds() {
        let mut config = AppConfig::development();
        config.security.jwt_expiry_hours = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroExpiry));

        config.security.jwt_expiry_hours = MAX_JWT_EXPIRY_HOURS;
        assert!(config.validate().is_ok());

        for hours in [MAX_JWT_EXPIRY_HOURS + 1, 100_000_000_000, u64::MAX] {
            config.security.jwt_expiry_hours = hours;
            assert_eq!(config.validate(), Err(ConfigError::ExpiryTooLarge(hours)));
        }
    }

    #[test]
    fn test_default_public_paths() {
        let config = AppConfig::staging();
        assert_eq!(
            config.security.public_paths,
            vec!["GET /", "GET /health", "POST /api/users"]
        );
    }

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list(" GET /, ,POST /api/users "),
            vec!["GET /".to_string(), "POST /api/users".to_string()]
        );
    }
}

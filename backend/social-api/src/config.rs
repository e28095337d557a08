/// Configuration management for the social API
///
/// Loads configuration from environment variables (a local `.env` file is read
/// first by `main`).
use anyhow::{Context, Result};
use serde::Serialize;

/// Main application configuration
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseConfig {
    /// Database URL, may carry credentials
    #[serde(skip_serializing)]
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
    /// Min connections in pool
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,
    /// Apply bundled migrations at startup
    pub run_migrations: bool,
}

/// Access-token verification settings for the auth provider
#[derive(Debug, Clone, Serialize)]
pub struct AuthConfig {
    /// HS256 secret the auth provider signs access tokens with
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    /// Expected `aud` claim
    pub jwt_audience: String,
    /// Cookie carrying the access token for browser clients
    pub session_cookie: String,
}

// Default values
fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT").unwrap_or(8080),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL environment variable not set")?,
            max_connections: env_parse("DB_MAX_CONNECTIONS")
                .unwrap_or_else(default_max_connections),
            min_connections: env_parse("DB_MIN_CONNECTIONS")
                .unwrap_or_else(default_min_connections),
            acquire_timeout_secs: env_parse("DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(default_acquire_timeout_secs),
            run_migrations: env_flag("RUN_MIGRATIONS", true),
        };

        let auth = AuthConfig {
            jwt_secret: std::env::var("AUTH_JWT_SECRET")
                .context("AUTH_JWT_SECRET environment variable not set")?,
            jwt_audience: std::env::var("AUTH_JWT_AUDIENCE")
                .unwrap_or_else(|_| "authenticated".to_string()),
            session_cookie: std::env::var("AUTH_SESSION_COOKIE")
                .unwrap_or_else(|_| "sb-access-token".to_string()),
        };

        Ok(Config {
            app,
            database,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "APP_ENV",
        "APP_HOST",
        "PORT",
        "LOG_FORMAT",
        "DATABASE_URL",
        "DB_MAX_CONNECTIONS",
        "DB_MIN_CONNECTIONS",
        "DB_ACQUIRE_TIMEOUT_SECS",
        "RUN_MIGRATIONS",
        "AUTH_JWT_SECRET",
        "AUTH_JWT_AUDIENCE",
        "AUTH_SESSION_COOKIE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_default_values() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("AUTH_JWT_SECRET", "secret");

        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.port, 8080);
        assert!(!config.app.json_logs);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.min_connections, 2);
        assert_eq!(config.database.acquire_timeout_secs, 10);
        assert!(config.database.run_migrations);
        assert_eq!(config.auth.jwt_audience, "authenticated");
        assert_eq!(config.auth.session_cookie, "sb-access-token");
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("AUTH_JWT_SECRET", "secret");
        std::env::set_var("PORT", "9000");
        std::env::set_var("LOG_FORMAT", "JSON");
        std::env::set_var("RUN_MIGRATIONS", "false");
        std::env::set_var("AUTH_SESSION_COOKIE", "session");

        let config = Config::from_env().unwrap();

        assert_eq!(config.app.port, 9000);
        assert!(config.app.json_logs);
        assert!(!config.database.run_migrations);
        assert_eq!(config.auth.session_cookie, "session");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_serialized_config_omits_secret() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("AUTH_JWT_SECRET", "super-secret-value");

        let config = Config::from_env().unwrap();
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains("sb-access-token"));
        assert!(!json.contains("super-secret-value"));
        assert!(!json.contains("postgres://test"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_secret_is_an_error() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://test");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("AUTH_JWT_SECRET"));
        clear_env();
    }
}

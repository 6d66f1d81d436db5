//! Application configuration loaded from environment variables.

use std::env;

use scribe_infra::JwtConfig;
use scribe_infra::database::DatabaseConfig;

/// How the session cookie is set.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "scribe_session".to_string(),
            secure: false,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            secure: env::var("SESSION_COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.secure),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the blog on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
            session: SessionConfig::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

//! Application configuration loaded from environment variables.

use std::env;

use anyhow::Context;
use quill_infra::auth::JwtConfig;
use quill_infra::database::DatabaseConfig;

/// Application configuration.
///
/// `DATABASE_URL` and `JWT_SECRET` are required; their absence aborts
/// startup rather than surfacing later as request failures.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        };

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            expiration_days: env::var("JWT_EXPIRATION_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            jwt,
            cors_allowed_origins: Self::parse_cors_origins(),
        })
    }

    /// Parse `CORS_ALLOWED_ORIGINS` as a comma-separated list, defaulting to
    /// the local frontend dev servers.
    fn parse_cors_origins() -> Vec<String> {
        match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

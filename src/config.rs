//! Server configuration from environment variables.

use std::env;
use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "dev-secret-change-me";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path = env::var("TODO_DB_PATH").unwrap_or_else(|_| "todos.db".to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using insecure development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let token_ttl_minutes = env::var("TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(20);

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        Self {
            db_path,
            jwt_secret,
            token_ttl_minutes,
            bind_addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        // Only checks fields not driven by ambient env in CI
        let config = Config::from_env();
        assert!(config.token_ttl_minutes > 0);
        assert!(!config.bind_addr.is_empty());
    }
}

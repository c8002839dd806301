//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JUDGE_TIMEOUT_SECONDS,
    DEFAULT_MATCH_TIME_LIMIT_SECONDS, DEFAULT_PVP_QUESTION_SLUGS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub judge: JudgeConfig,
    pub matchmaking: MatchmakingConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// JWT verification configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

/// External judge configuration
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Base URL of the judge. Unset disables grading, not the server.
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

/// Matchmaking and match defaults
#[derive(Debug, Clone)]
pub struct MatchmakingConfig {
    /// Question slugs eligible for timed 1v1 play
    pub pvp_question_slugs: Vec<String>,
    pub default_time_limit_seconds: i32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            judge: JudgeConfig::from_env()?,
            matchmaking: MatchmakingConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
        })
    }
}

impl JudgeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: non_empty_var("JUDGE_URL").map(|url| url.trim_end_matches('/').to_string()),
            api_key: non_empty_var("JUDGE_API_KEY"),
            timeout_seconds: env::var("JUDGE_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| DEFAULT_JUDGE_TIMEOUT_SECONDS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JUDGE_TIMEOUT_SECONDS".to_string()))?,
        })
    }
}

impl MatchmakingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let pvp_question_slugs = match non_empty_var("PVP_QUESTION_SLUGS") {
            Some(raw) => parse_slug_list(&raw),
            None => DEFAULT_PVP_QUESTION_SLUGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        Ok(Self {
            pvp_question_slugs,
            default_time_limit_seconds: env::var("DEFAULT_MATCH_TIME_LIMIT_SECONDS")
                .unwrap_or_else(|_| DEFAULT_MATCH_TIME_LIMIT_SECONDS.to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("DEFAULT_MATCH_TIME_LIMIT_SECONDS".to_string())
                })?,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Split a comma separated slug list, dropping blanks and duplicates
fn parse_slug_list(raw: &str) -> Vec<String> {
    let mut slugs: Vec<String> = Vec::new();
    for slug in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !slugs.iter().any(|s| s == slug) {
            slugs.push(slug.to_string());
        }
    }
    slugs
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "info".to_string(),
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_parse_slug_list() {
        let slugs = parse_slug_list(" two-sum, ,fizz-buzz,two-sum ,");
        assert_eq!(slugs, vec!["two-sum".to_string(), "fizz-buzz".to_string()]);
        assert!(parse_slug_list(" , ").is_empty());
    }
}

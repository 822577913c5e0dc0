pub mod database;
pub mod rate_limit;
pub mod server;

pub use database::DatabaseConfig;
pub use rate_limit::{RateLimitConfig, RateLimitRule};
pub use server::{LogFormat, ServerConfig};

use std::env;

const DEFAULT_APP_NAME: &str = "Crowd Ideas API";

/// Process-wide settings, built once in `main` and handed down explicitly.
///
/// Nothing caches this value globally. Tests build their own with
/// [`AppConfig::for_database`] and tweak fields as needed.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string()),
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
        })
    }

    /// Defaults for everything except the database, with rate limiting off.
    pub fn for_database(url: impl Into<String>) -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig::new(url),
            rate_limit: RateLimitConfig::disabled(),
        }
    }
}

pub(crate) fn parse_bool_env(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .and_then(|value| parse_bool(&value))
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_env_or<T: std::str::FromStr>(var_name: &str, default: T) -> T {
    env::var(var_name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

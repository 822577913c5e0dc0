use super::{parse_bool_env, parse_env_or};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite://crowd_ideas.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(300),
            sqlx_logging: false,
        }
    }

    pub fn from_env() -> Self {
        let url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let mut cfg = Self::new(url);
        cfg.max_connections = parse_env_or("DB_MAX_CONNECTIONS", cfg.max_connections);
        cfg.min_connections = parse_env_or("DB_MIN_CONNECTIONS", cfg.min_connections);
        cfg.sqlx_logging = parse_bool_env("DB_SQL_LOGGING", cfg.sqlx_logging);
        cfg
    }

    /// In-memory SQLite lives and dies with its connection, so the pool must
    /// hold exactly one.
    pub fn is_in_memory(&self) -> bool {
        self.url.starts_with("sqlite") && self.url.contains(":memory:")
    }

    pub async fn connect(&self) -> Result<DatabaseConnection, DbErr> {
        let (max, min) = if self.is_in_memory() {
            (1, 1)
        } else {
            (self.max_connections, self.min_connections.min(self.max_connections))
        };

        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(max)
            .min_connections(min)
            .connect_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .sqlx_logging(self.sqlx_logging);

        Database::connect(opt).await
    }
}

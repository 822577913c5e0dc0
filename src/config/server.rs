use std::env;
use std::str::FromStr;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `["*"]` means any origin.
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut cfg = Self::default();

        if let Ok(host) = env::var("HOST") {
            cfg.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            cfg.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got '{port}'"))?;
        }
        if let Ok(raw) = env::var("CORS_ORIGINS") {
            cfg.cors_origins = parse_origins(&raw);
        }
        cfg.log_format = log_format_from_env();

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Read on its own so logging can be set up before the rest of the config.
pub fn log_format_from_env() -> LogFormat {
    env::var("LOG_FORMAT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_split() {
        let origins = parse_origins(" http://a.test , http://b.test,,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn wildcard_origin() {
        let cfg = ServerConfig {
            cors_origins: parse_origins("*"),
            ..Default::default()
        };
        assert!(cfg.allows_any_origin());
        assert!(!ServerConfig::default().allows_any_origin());
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}

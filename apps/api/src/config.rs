use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Scan history goes to Redis when set, otherwise stays in process.
    pub redis_url: Option<String>,
    /// Most recent scan summaries retained.
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            redis_url: None,
            history_limit: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        let defaults = Config::default();

        Ok(Config {
            port: optional_env("PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(defaults.port),
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            redis_url: optional_env("REDIS_URL"),
            history_limit: optional_env("HISTORY_LIMIT")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("HISTORY_LIMIT must be a non-negative integer")?
                .unwrap_or(defaults.history_limit),
        })
    }
}

/// Unset and blank are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

use anyhow::{ensure, Context, Result};

/// Largest block pool accepted per request unless overridden.
pub const DEFAULT_MAX_POOL_SIZE: usize = 500;

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on blocks per ranking call. Ranking is O(n²) in pool size.
    pub max_pool_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_pool_size = match std::env::var("NARRATIVE_MAX_POOL_SIZE") {
            Ok(raw) => raw
                .parse::<usize>()
                .context("NARRATIVE_MAX_POOL_SIZE must be a positive integer")?,
            Err(_) => DEFAULT_MAX_POOL_SIZE,
        };
        ensure!(max_pool_size > 0, "NARRATIVE_MAX_POOL_SIZE must be greater than 0");

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_pool_size,
        })
    }
}

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Where photos are materialised for the duration of one render.
    pub scratch_dir: PathBuf,
    /// Request body cap; photos travel base64-encoded inside the JSON.
    pub max_body_bytes: usize,
}

pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            scratch_dir: std::env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            max_body_bytes: match std::env::var("MAX_BODY_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("MAX_BODY_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_BODY_BYTES,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            scratch_dir: std::env::temp_dir(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

use std::path::PathBuf;

use crate::error::{AppError, Result};

pub const SNAPSHOT_URL: &str = "https://canli-worker.onrender.com/canli.db";

/// HTTP timeout for the snapshot download (seconds).
pub const FETCH_TIMEOUT_SECS: u64 = 15;

/// How long a loaded snapshot is served without re-fetching (seconds).
pub const CACHE_TTL_SECS: u64 = 10;

/// Upper bound on the recent-history window.
pub const HISTORY_LIMIT: usize = 10_000;

/// File name of the snapshot slot inside the scratch directory.
/// Downloads land in a unique temp file first and are renamed over this.
pub const SNAPSHOT_FILE_NAME: &str = "canli.db";

/// Top-N cutoff for the score-frequency stat.
pub const TOP_SCORES_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub snapshot_url: String,
    pub log_level: String,
    /// Directory holding the downloaded snapshot (SCRATCH_DIR).
    pub scratch_dir: PathBuf,
    pub api_port: u16,
    pub fetch_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    /// Max rows in the recent-history window (HISTORY_LIMIT).
    pub history_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            snapshot_url: std::env::var("SNAPSHOT_URL")
                .unwrap_or_else(|_| SNAPSHOT_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            scratch_dir: std::env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| {
                    AppError::Config("API_PORT must be a valid port number".to_string())
                })?,
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| FETCH_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(FETCH_TIMEOUT_SECS),
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| CACHE_TTL_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(CACHE_TTL_SECS),
            history_limit: std::env::var("HISTORY_LIMIT")
                .unwrap_or_else(|_| HISTORY_LIMIT.to_string())
                .parse::<usize>()
                .unwrap_or(HISTORY_LIMIT),
        })
    }
}

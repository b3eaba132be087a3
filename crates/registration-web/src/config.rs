//! Configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use std::{env, num::ParseIntError};

use thiserror::Error;

/// Server configuration.
///
/// | Variable | Description | Default |
/// |----------|-------------|---------|
/// | `REGISTRATION_ADDR` | Address the HTTP server binds to | `127.0.0.1:8790` |
/// | `SQLITE_PATH` | SQLite database URL | `sqlite:registry.db?mode=rwc` |
/// | `RECEIPTS_DIR` | Directory where payment proofs are stored | `receipts` |
/// | `OCR_SIDECAR_URL` | Base URL of the Tesseract sidecar | unset (OCR disabled) |
/// | `OCR_LANGUAGE` | Language hint passed to the OCR engine | `spa` |
/// | `OCR_TIMEOUT_SECS` | Budget for recognizing one receipt | `20` |
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Directory where uploaded payment proofs are stored.
    pub receipts_dir: PathBuf,
    /// Base URL of the OCR sidecar, if one is deployed.
    pub ocr_url: Option<String>,
    /// Language hint passed to the OCR engine.
    pub ocr_language: String,
    /// How long a single receipt recognition may take.
    pub ocr_timeout: Duration,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("REGISTRATION_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:registry.db?mode=rwc".to_string());

        let receipts_dir = env::var("RECEIPTS_DIR")
            .unwrap_or_else(|_| "receipts".to_string())
            .into();

        let ocr_url = env::var("OCR_SIDECAR_URL").ok().filter(|url| !url.is_empty());

        let ocr_language = env::var("OCR_LANGUAGE").unwrap_or_else(|_| "spa".to_string());

        let ocr_timeout_secs: u64 = env::var("OCR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".to_string())
            .parse()
            .map_err(ConfigError::InvalidOcrTimeout)?;

        Ok(Self {
            addr,
            database_url,
            receipts_dir,
            ocr_url,
            ocr_language,
            ocr_timeout: Duration::from_secs(ocr_timeout_secs),
        })
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("REGISTRATION_ADDR is not a valid socket address")]
    InvalidAddr,

    #[error("OCR_TIMEOUT_SECS is not a valid number of seconds: {0}")]
    InvalidOcrTimeout(#[source] ParseIntError),
}

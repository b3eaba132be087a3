//! Error types for the Tesseract sidecar client.

use thiserror::Error;

/// Errors that can occur when talking to the sidecar.
#[derive(Debug, Error)]
pub enum SidecarError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The sidecar answered with a non-success status.
    #[error("sidecar returned {code}: {message}")]
    Status { code: u16, message: String },
}

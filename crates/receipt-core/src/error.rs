//! Error types for receipt recognition.

use thiserror::Error;

use crate::image::ImageError;

/// Errors that can occur while recognizing a receipt image.
///
/// Recognition failures are expected during normal operation (blurry photos,
/// a sidecar that is down) and callers are expected to degrade rather than
/// abort: a registration without an extracted amount is still a registration.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The upload is not usable as a recognition input.
    #[error("unusable image: {0}")]
    Image(#[from] ImageError),

    /// The engine could not be reached at all.
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// The engine accepted the image but could not read it.
    #[error("recognition failed: {0}")]
    Recognition(String),
}

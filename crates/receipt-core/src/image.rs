//! Uploaded receipt images and the constraints they must satisfy.

use thiserror::Error;

/// Maximum accepted payment proof size: 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Reasons an upload is rejected before any recognition is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// The declared MIME type is not `image/*`.
    #[error("payment proof must be an image, got {0}")]
    NotAnImage(String),

    /// The file exceeds [`MAX_IMAGE_BYTES`].
    #[error("payment proof is too large ({actual} bytes, max {max})")]
    TooLarge { actual: usize, max: usize },

    /// The file has no content.
    #[error("payment proof file is empty")]
    Empty,
}

/// An uploaded payment proof image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name, when the client supplied one.
    pub filename: Option<String>,
    /// MIME type declared by the client.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        filename: Option<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename,
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Check the upload against the receipt constraints: any `image/*` MIME
    /// type, non-empty, at most [`MAX_IMAGE_BYTES`] bytes.
    pub fn check(&self) -> Result<(), ImageError> {
        if !self.content_type.starts_with("image/") {
            return Err(ImageError::NotAnImage(self.content_type.clone()));
        }
        if self.bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge {
                actual: self.bytes.len(),
                max: MAX_IMAGE_BYTES,
            });
        }
        Ok(())
    }
}

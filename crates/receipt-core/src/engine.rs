//! The OcrEngine trait definition.

use async_trait::async_trait;

use crate::error::OcrError;
use crate::image::ImageUpload;

/// A trait for reading the text out of payment receipt images.
///
/// Implementations can range from canned mock engines for tests to a real
/// Tesseract sidecar client. This trait is object-safe and can be used with
/// `Arc<dyn OcrEngine>`.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in an uploaded image.
    ///
    /// # Arguments
    ///
    /// * `image` - The uploaded receipt to read.
    /// * `language` - Language hint in Tesseract notation (e.g. `"spa"`).
    ///   Engines that cannot honor it may ignore it.
    ///
    /// # Returns
    ///
    /// The recognized text, or an error if recognition failed. Recognized
    /// text may be empty for a blank image; that is not an error.
    async fn recognize(&self, image: &ImageUpload, language: &str) -> Result<String, OcrError>;

    /// Get a human-readable name for this engine, used in logs.
    fn name(&self) -> &str;

    /// Check if the engine is ready to accept work.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}

//! Mock OCR engines for tests and local development.
//!
//! - [`FixedOcr`] - Returns canned text for every image
//! - [`FailingOcr`] - Always fails recognition
//! - [`DelayedOcr`] - Wraps another engine with artificial latency

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::engine::OcrEngine;
use crate::error::OcrError;
use crate::image::ImageUpload;

/// An engine that returns the same text for every image.
///
/// Useful for exercising the registration flow without a real sidecar.
#[derive(Debug, Clone, Default)]
pub struct FixedOcr {
    text: String,
}

impl FixedOcr {
    /// Create an engine that recognizes every image as `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl OcrEngine for FixedOcr {
    async fn recognize(&self, image: &ImageUpload, _language: &str) -> Result<String, OcrError> {
        image.check()?;
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "FixedOcr"
    }
}

/// An engine that fails every recognition attempt.
///
/// Useful for testing that failures degrade the flow instead of aborting it.
#[derive(Debug, Clone)]
pub struct FailingOcr {
    message: String,
}

impl FailingOcr {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingOcr {
    fn default() -> Self {
        Self::new("mock recognition failure")
    }
}

#[async_trait]
impl OcrEngine for FailingOcr {
    async fn recognize(&self, _image: &ImageUpload, _language: &str) -> Result<String, OcrError> {
        Err(OcrError::Recognition(self.message.clone()))
    }

    fn name(&self) -> &str {
        "FailingOcr"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}

/// An engine that wraps another engine and adds artificial delay.
///
/// Useful for testing timeout handling and scan cancellation.
pub struct DelayedOcr<E: OcrEngine> {
    inner: E,
    delay: Duration,
}

impl<E: OcrEngine> DelayedOcr<E> {
    pub fn new(inner: E, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create an engine with a delay in milliseconds.
    pub fn with_millis(inner: E, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<E: OcrEngine> OcrEngine for DelayedOcr<E> {
    async fn recognize(&self, image: &ImageUpload, language: &str) -> Result<String, OcrError> {
        sleep(self.delay).await;
        self.inner.recognize(image, language).await
    }

    fn name(&self) -> &str {
        "DelayedOcr"
    }

    async fn is_ready(&self) -> bool {
        self.inner.is_ready().await
    }
}

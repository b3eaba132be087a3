//! The sidecar-backed OcrEngine.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use receipt_core::{ImageUpload, OcrEngine, OcrError};

use crate::config::SidecarConfig;
use crate::error::SidecarError;

/// Recognition response from the sidecar.
#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    text: String,
}

/// Client for the Tesseract sidecar, usable wherever an [`OcrEngine`] is
/// expected.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    http: Client,
    config: SidecarConfig,
}

impl TesseractOcr {
    /// Create a client for the given sidecar.
    pub fn new(config: SidecarConfig) -> Result<Self, SidecarError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(SidecarError::Http)?;
        Ok(Self { http, config })
    }

    /// Perform a health check against the sidecar.
    pub async fn health_check(&self) -> Result<bool, SidecarError> {
        let url = self.config.health_url();
        debug!("Health check: {}", url);

        let resp = self.http.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    async fn recognize_raw(
        &self,
        image: &ImageUpload,
        language: &str,
    ) -> Result<String, SidecarError> {
        let file_name = image
            .filename
            .clone()
            .unwrap_or_else(|| "receipt".to_string());
        let part = Part::bytes(image.bytes.clone())
            .file_name(file_name)
            .mime_str(&image.content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("language", language.to_string());

        let resp = self
            .http
            .post(self.config.recognize_url())
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SidecarError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let body: RecognizeResponse = resp.json().await?;
        Ok(body.text)
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &ImageUpload, language: &str) -> Result<String, OcrError> {
        image.check()?;
        self.recognize_raw(image, language).await.map_err(|err| {
            match &err {
                SidecarError::Http(http) if http.is_connect() || http.is_timeout() => {
                    OcrError::Unavailable(err.to_string())
                }
                _ => OcrError::Recognition(err.to_string()),
            }
        })
    }

    fn name(&self) -> &str {
        "TesseractOcr"
    }

    async fn is_ready(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }
}

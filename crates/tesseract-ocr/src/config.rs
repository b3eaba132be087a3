//! Configuration types for the Tesseract sidecar.

/// Configuration for connecting to the Tesseract sidecar.
#[derive(Debug, Clone)]
pub struct SidecarConfig {
    /// Base URL of the sidecar HTTP server (e.g., "http://localhost:8884").
    pub base_url: String,
}

impl SidecarConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Get the recognition endpoint URL.
    pub fn recognize_url(&self) -> String {
        format!("{}/api/v1/recognize", self.base_url)
    }

    /// Get the health check endpoint URL.
    pub fn health_url(&self) -> String {
        format!("{}/api/v1/health", self.base_url)
    }
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self::new("http://localhost:8884")
    }
}

//! OcrEngine implementation backed by a Tesseract HTTP sidecar.
//!
//! The registration service does not link Tesseract in-process; it talks to
//! a small HTTP sidecar that wraps the `tesseract` binary. This crate is
//! the client side of that contract:
//!
//! - `POST {base}/api/v1/recognize` with a multipart body (`file`, `language`)
//!   returns `{"text": "..."}`
//! - `GET {base}/api/v1/health` reports readiness
//!
//! A sidecar that is down degrades recognition, it never blocks
//! registration; callers get [`receipt_core::OcrError::Unavailable`] and
//! carry on without an extracted amount.

mod config;
mod engine;
mod error;

pub use config::SidecarConfig;
pub use engine::TesseractOcr;
pub use error::SidecarError;

// Re-export receipt-core types for convenience
pub use receipt_core::{async_trait, ImageUpload, OcrEngine, OcrError};

//! Core trait and types for payment receipt recognition.
//!
//! This crate provides the shared interface between the registration form
//! and the OCR engines that read payment receipts. It defines:
//!
//! - [`OcrEngine`] - The trait that all recognition engines implement
//! - [`ImageUpload`] - An uploaded receipt image and its constraints
//! - [`Amount`] / [`extract_amount`] - Money amounts and extraction from
//!   recognized text
//! - [`ReceiptScanner`] - Background scanning with supersede-on-reselect
//!   semantics
//! - [`OcrError`] - Error types for recognition operations
//!
//! # Example
//!
//! ```rust
//! use receipt_core::{extract_amount, Amount};
//!
//! let text = "Pago realizado\nMonto: Bs. 150.00";
//! assert_eq!(extract_amount(text), Some(Amount::from_centavos(15000)));
//! ```

mod amount;
mod engine;
mod error;
mod image;
pub mod mock;
mod scanner;

pub use amount::{extract_amount, Amount};
pub use engine::OcrEngine;
pub use error::OcrError;
pub use image::{ImageError, ImageUpload, MAX_IMAGE_BYTES};
pub use scanner::{ReceiptScanner, ScanResult, DEFAULT_SCAN_TIMEOUT};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use event_registry::Database;
use receipt_core::OcrEngine;

use crate::receipts::ReceiptStore;

/// State shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registry database.
    pub db: Database,
    /// Storage for uploaded payment proofs.
    pub receipts: ReceiptStore,
    /// OCR engine for receipts, if one is configured.
    pub ocr: Option<Arc<dyn OcrEngine>>,
    /// Language hint passed to the OCR engine.
    pub ocr_language: String,
    /// Budget for recognizing one receipt.
    pub ocr_timeout: Duration,
}

impl AppState {
    pub fn new(
        db: Database,
        receipts: ReceiptStore,
        ocr: Option<Arc<dyn OcrEngine>>,
        ocr_language: String,
        ocr_timeout: Duration,
    ) -> Self {
        Self {
            db,
            receipts,
            ocr,
            ocr_language,
            ocr_timeout,
        }
    }
}

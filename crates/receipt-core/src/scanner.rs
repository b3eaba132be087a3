//! Background receipt scanning with supersede-on-reselect semantics.
//!
//! A form holds one [`ReceiptScanner`]. Every time the user picks a proof
//! file the caller invokes [`ReceiptScanner::start`], which aborts whatever
//! scan is still in flight and kicks off a new one tagged with a fresh
//! generation number. Results from superseded scans are never observed, so
//! a slow scan of an old file can never overwrite the fields of a newer one.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::amount::{extract_amount, Amount};
use crate::engine::OcrEngine;
use crate::image::ImageUpload;

/// Default time budget for a single scan.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(20);

/// Outcome of one scan, tagged with the generation of the file selection
/// that produced it.
///
/// `text` is `None` when recognition failed or timed out. That is a
/// degraded outcome, not an error: the form goes on without prefilled
/// values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub generation: u64,
    pub text: Option<String>,
    pub amount: Option<Amount>,
}

/// Runs receipt scans in the background, one at a time.
///
/// Must be used from within a Tokio runtime; scans run as spawned tasks.
pub struct ReceiptScanner {
    engine: Arc<dyn OcrEngine>,
    language: String,
    budget: Duration,
    generation: u64,
    inflight: Option<JoinHandle<ScanResult>>,
}

impl ReceiptScanner {
    /// Create a scanner with the default time budget.
    pub fn new(engine: Arc<dyn OcrEngine>, language: impl Into<String>) -> Self {
        Self::with_timeout(engine, language, DEFAULT_SCAN_TIMEOUT)
    }

    /// Create a scanner with a custom per-scan time budget.
    pub fn with_timeout(
        engine: Arc<dyn OcrEngine>,
        language: impl Into<String>,
        budget: Duration,
    ) -> Self {
        Self {
            engine,
            language: language.into(),
            budget,
            generation: 0,
            inflight: None,
        }
    }

    /// Generation of the most recently started scan.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a scan has been started and not yet collected or cancelled.
    pub fn is_scanning(&self) -> bool {
        self.inflight.is_some()
    }

    /// Start scanning a newly selected file.
    ///
    /// Any scan still in flight is aborted first; its result will never be
    /// observed. Returns the generation tag of the new scan.
    pub fn start(&mut self, image: ImageUpload) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let engine = Arc::clone(&self.engine);
        let language = self.language.clone();
        let budget = self.budget;
        self.inflight = Some(tokio::spawn(async move {
            scan(engine, image, &language, budget, generation).await
        }));
        generation
    }

    /// Abort the in-flight scan, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
            debug!(generation = self.generation, "aborted in-flight receipt scan");
        }
    }

    /// Wait for the in-flight scan to complete.
    ///
    /// Returns `None` when no scan is pending or the scan was aborted.
    pub async fn finish(&mut self) -> Option<ScanResult> {
        let handle = self.inflight.take()?;
        match handle.await {
            Ok(result) => Some(result),
            Err(join_err) if join_err.is_cancelled() => None,
            Err(join_err) => {
                warn!(error = %join_err, "receipt scan task panicked");
                None
            }
        }
    }
}

async fn scan(
    engine: Arc<dyn OcrEngine>,
    image: ImageUpload,
    language: &str,
    budget: Duration,
    generation: u64,
) -> ScanResult {
    let text = match timeout(budget, engine.recognize(&image, language)).await {
        Ok(Ok(text)) => Some(text),
        Ok(Err(err)) => {
            warn!(
                engine = engine.name(),
                error = %err,
                "receipt recognition failed; continuing without an amount"
            );
            None
        }
        Err(_) => {
            warn!(
                engine = engine.name(),
                budget_secs = budget.as_secs(),
                "receipt recognition timed out; continuing without an amount"
            );
            None
        }
    };
    let amount = text.as_deref().and_then(extract_amount);
    ScanResult {
        generation,
        text,
        amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{DelayedOcr, FailingOcr, FixedOcr};

    fn receipt() -> ImageUpload {
        ImageUpload::new(Some("receipt.jpg".to_string()), "image/jpeg", vec![0u8; 64])
    }

    #[tokio::test]
    async fn test_scan_produces_text_and_amount() {
        let engine = Arc::new(FixedOcr::new("Pago realizado\nMonto: Bs. 150.00"));
        let mut scanner = ReceiptScanner::new(engine, "spa");

        let generation = scanner.start(receipt());
        let result = scanner.finish().await.unwrap();

        assert_eq!(result.generation, generation);
        assert_eq!(result.text.as_deref(), Some("Pago realizado\nMonto: Bs. 150.00"));
        assert_eq!(result.amount, Some(Amount::from_centavos(15000)));
        assert!(!scanner.is_scanning());
    }

    #[tokio::test]
    async fn test_failed_recognition_degrades_to_empty_result() {
        let engine = Arc::new(FailingOcr::default());
        let mut scanner = ReceiptScanner::new(engine, "spa");

        scanner.start(receipt());
        let result = scanner.finish().await.unwrap();

        assert_eq!(result.text, None);
        assert_eq!(result.amount, None);
    }

    #[tokio::test]
    async fn test_slow_recognition_times_out() {
        let engine = Arc::new(DelayedOcr::with_millis(FixedOcr::new("Bs 75"), 500));
        let mut scanner =
            ReceiptScanner::with_timeout(engine, "spa", Duration::from_millis(50));

        scanner.start(receipt());
        let result = scanner.finish().await.unwrap();

        assert_eq!(result.text, None);
        assert_eq!(result.amount, None);
    }

    #[tokio::test]
    async fn test_reselecting_a_file_supersedes_the_previous_scan() {
        let engine = Arc::new(DelayedOcr::with_millis(FixedOcr::new("Bs 75"), 100));
        let mut scanner = ReceiptScanner::new(engine, "spa");

        let first = scanner.start(receipt());
        let second = scanner.start(receipt());
        assert_eq!(second, first + 1);

        // Only the second scan's result is observable.
        let result = scanner.finish().await.unwrap();
        assert_eq!(result.generation, second);
        assert_eq!(result.amount, Some(Amount::from_centavos(7500)));
        assert_eq!(scanner.finish().await, None);
    }

    #[tokio::test]
    async fn test_cancelled_scan_yields_nothing() {
        let engine = Arc::new(DelayedOcr::with_millis(FixedOcr::new("Bs 75"), 200));
        let mut scanner = ReceiptScanner::new(engine, "spa");

        scanner.start(receipt());
        assert!(scanner.is_scanning());
        scanner.cancel();
        assert!(!scanner.is_scanning());
        assert_eq!(scanner.finish().await, None);
    }

    #[tokio::test]
    async fn test_finish_without_start() {
        let engine = Arc::new(FixedOcr::new(""));
        let mut scanner = ReceiptScanner::new(engine, "spa");
        assert_eq!(scanner.finish().await, None);
    }
}

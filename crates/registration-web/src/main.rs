//! Registration web server binary.

use std::sync::Arc;

use event_registry::Database;
use receipt_core::OcrEngine;
use tesseract_ocr::{SidecarConfig, TesseractOcr};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use registration_web::routes;
use registration_web::{AppState, Config, ReceiptStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    info!(url = %config.database_url, "database ready");

    let receipts = ReceiptStore::open(&config.receipts_dir).await?;
    info!(dir = %receipts.dir().display(), "receipt store ready");

    let ocr: Option<Arc<dyn OcrEngine>> = match &config.ocr_url {
        Some(url) => {
            let engine = TesseractOcr::new(SidecarConfig::new(url))?;
            if !engine.is_ready().await {
                warn!(url = %url, "OCR sidecar is not responding; receipts will be stored unscanned");
            }
            Some(Arc::new(engine))
        }
        None => {
            info!("no OCR sidecar configured; receipts will be stored unscanned");
            None
        }
    };

    let state = AppState::new(
        db,
        receipts,
        ocr,
        config.ocr_language.clone(),
        config.ocr_timeout,
    );

    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        // The form is served from a separate frontend origin.
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!(addr = %config.addr, "registration server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

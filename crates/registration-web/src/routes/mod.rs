//! API routes.

pub mod events;
pub mod health;
pub mod receipt;
pub mod register;
pub mod suggest;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all API routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/events", get(events::list_events))
        .route("/api/events/:id", get(events::get_event))
        .route("/api/events/:id/registrations", post(register::submit))
        .route("/api/registrations/:id/receipt", get(receipt::download))
        .route("/api/attendees/suggest", get(suggest::suggest))
        // The default 2 MB body limit is below the allowed proof size.
        .layer(DefaultBodyLimit::max(register::MAX_UPLOAD_BODY_BYTES))
}

//! Health check route.

use axum::response::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

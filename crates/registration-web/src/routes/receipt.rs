//! Payment proof download route.

use std::io;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use event_registry::{registration, DatabaseError};

use crate::error::{ApiError, Result};
use crate::receipts::ReceiptStore;
use crate::state::AppState;

/// Serve the payment proof attached to a registration.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let reg = registration::get_registration(state.db.pool(), &id)
        .await
        .map_err(|err| match err {
            DatabaseError::NotFound { .. } => ApiError::NotFound("registration"),
            other => ApiError::Database(other),
        })?;

    let Some(reference) = reg.payment_proof else {
        return Err(ApiError::NotFound("payment proof"));
    };

    let bytes = state.receipts.read(&reference).await.map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            ApiError::NotFound("payment proof")
        } else {
            ApiError::Storage(err)
        }
    })?;

    let content_type = ReceiptStore::content_type_for(&reference);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

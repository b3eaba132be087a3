//! API error handling.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use event_registry::reconciler::ReconcileError;
use event_registry::DatabaseError;
use registration_form::{Field, FieldError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<(Field, FieldError)>),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Invalid(errors) => ApiError::Validation(errors),
            ReconcileError::EventNotFound(_) => ApiError::NotFound("event"),
            ReconcileError::Database(db) => ApiError::Database(db),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("malformed form submission: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => {
                let mut fields = serde_json::Map::new();
                for (field, err) in &errors {
                    fields.insert(field.as_str().to_string(), json!(err.to_string()));
                }
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({ "error": "validation failed", "fields": fields }),
                )
            }
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{what} not found") }),
            ),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Database(DatabaseError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{entity} {id} not found") }),
            ),
            ApiError::Database(DatabaseError::AlreadyExists { entity, id }) => (
                StatusCode::CONFLICT,
                json!({ "error": format!("{entity} {id} already exists") }),
            ),
            ApiError::Database(err) => {
                error!(error = %err, "database error while handling request");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": "database unavailable, please retry" }),
                )
            }
            ApiError::Storage(err) => {
                error!(error = %err, "receipt storage error while handling request");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": "storage unavailable, please retry" }),
                )
            }
            ApiError::Internal(message) => {
                error!(error = %message, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Convenient result alias for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

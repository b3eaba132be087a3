//! Public HTTP API for department event registration.
//!
//! Exposes the event catalog, the registration submission endpoint with
//! payment proof upload, receipt download, and attendee autocomplete.
//!
//! - [`config::Config`] - environment configuration
//! - [`state::AppState`] - shared handler state
//! - [`routes::router`] - the full route table
//! - [`receipts::ReceiptStore`] - payment proof storage

pub mod config;
pub mod error;
pub mod receipts;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use receipts::ReceiptStore;
pub use state::AppState;

//! Event listing routes.

use axum::extract::{Path, State};
use axum::response::Json;
use event_registry::models::{Event, Modality};
use event_registry::{event, DatabaseError};
use receipt_core::Amount;
use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Event as exposed over the API.
#[derive(Debug, Serialize)]
pub struct EventBody {
    pub id: String,
    pub title: String,
    pub scheduled_at: String,
    pub modality: Modality,
    pub venue: Option<String>,
    pub is_paid: bool,
    pub cost: Option<Amount>,
    pub payment_qr: Option<String>,
    pub created_at: String,
}

impl From<Event> for EventBody {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            scheduled_at: event.scheduled_at,
            modality: event.modality,
            venue: event.venue,
            is_paid: event.is_paid,
            cost: event.cost_centavos.map(Amount::from_centavos),
            payment_qr: event.payment_qr,
            created_at: event.created_at,
        }
    }
}

/// List all events, soonest first.
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventBody>>> {
    let events = event::list_events(state.db.pool()).await?;
    Ok(Json(events.into_iter().map(EventBody::from).collect()))
}

/// Fetch one event by id.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventBody>> {
    let event = event::get_event(state.db.pool(), &id)
        .await
        .map_err(|err| match err {
            DatabaseError::NotFound { .. } => ApiError::NotFound("event"),
            other => ApiError::Database(other),
        })?;
    Ok(Json(event.into()))
}

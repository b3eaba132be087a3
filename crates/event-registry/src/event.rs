//! Event CRUD operations.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Event, NewEvent};

/// Create a new event.
pub async fn create_event(pool: &SqlitePool, new: &NewEvent) -> Result<Event> {
    let id = Uuid::new_v4().to_string();
    let event = sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (id, title, scheduled_at, modality, venue, is_paid, cost_centavos, payment_qr)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, title, scheduled_at, modality, venue, is_paid, cost_centavos, payment_qr, created_at
        "#,
    )
    .bind(&id)
    .bind(&new.title)
    .bind(&new.scheduled_at)
    .bind(new.modality)
    .bind(&new.venue)
    .bind(new.is_paid)
    .bind(new.cost_centavos)
    .bind(&new.payment_qr)
    .fetch_one(pool)
    .await?;

    Ok(event)
}

/// Get an event by ID.
pub async fn get_event(pool: &SqlitePool, id: &str) -> Result<Event> {
    sqlx::query_as::<_, Event>(
        r#"
        SELECT id, title, scheduled_at, modality, venue, is_paid, cost_centavos, payment_qr, created_at
        FROM events
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Event",
        id: id.to_string(),
    })
}

/// List all events, soonest first.
pub async fn list_events(pool: &SqlitePool) -> Result<Vec<Event>> {
    let events = sqlx::query_as::<_, Event>(
        r#"
        SELECT id, title, scheduled_at, modality, venue, is_paid, cost_centavos, payment_qr, created_at
        FROM events
        ORDER BY scheduled_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(events)
}

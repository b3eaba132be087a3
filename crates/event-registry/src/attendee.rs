//! Attendee lookups and creation.
//!
//! Attendees are people, not registrations: one row per CI, shared by every
//! event the person registers for.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::Attendee;

/// Create a new attendee.
///
/// The CI is unique across the system; creating a second attendee with the
/// same CI reports [`DatabaseError::AlreadyExists`].
pub async fn create_attendee(pool: &SqlitePool, full_name: &str, ci: &str) -> Result<Attendee> {
    let id = Uuid::new_v4().to_string();
    sqlx::query_as::<_, Attendee>(
        r#"
        INSERT INTO attendees (id, full_name, ci)
        VALUES (?, ?, ?)
        RETURNING id, full_name, ci, created_at
        "#,
    )
    .bind(&id)
    .bind(full_name)
    .bind(ci)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Attendee",
                    id: ci.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// Get an attendee by ID.
pub async fn get_attendee(pool: &SqlitePool, id: &str) -> Result<Attendee> {
    sqlx::query_as::<_, Attendee>(
        r#"
        SELECT id, full_name, ci, created_at
        FROM attendees
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Attendee",
        id: id.to_string(),
    })
}

/// Get an attendee by CI. Absence is a normal outcome here, not an error;
/// the reconciler probes before creating.
pub async fn get_attendee_by_ci(pool: &SqlitePool, ci: &str) -> Result<Option<Attendee>> {
    let attendee = sqlx::query_as::<_, Attendee>(
        r#"
        SELECT id, full_name, ci, created_at
        FROM attendees
        WHERE ci = ?
        "#,
    )
    .bind(ci)
    .fetch_optional(pool)
    .await?;

    Ok(attendee)
}

/// List all attendees.
pub async fn list_attendees(pool: &SqlitePool) -> Result<Vec<Attendee>> {
    let attendees = sqlx::query_as::<_, Attendee>(
        r#"
        SELECT id, full_name, ci, created_at
        FROM attendees
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(attendees)
}

//! Registration CRUD operations.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{NewRegistration, Registration, RegistrationFlags};

const REGISTRATION_COLUMNS: &str = "id, attendee_id, event_id, email, phone, payment_proof, \
     ocr_text, ocr_amount_centavos, enabled, certificate_delivered, checked_in, checked_out, \
     created_at";

/// Insert a new registration.
///
/// At most one registration may exist per (attendee, event) pair. A second
/// insert for the same pair reports [`DatabaseError::AlreadyExists`]; that
/// conflict is the signal the reconciler turns into an "already registered"
/// outcome.
pub async fn create_registration(
    pool: &SqlitePool,
    new: &NewRegistration,
) -> Result<Registration> {
    let id = Uuid::new_v4().to_string();
    let sql = format!(
        r#"
        INSERT INTO registrations
            (id, attendee_id, event_id, email, phone, payment_proof, ocr_text,
             ocr_amount_centavos, enabled)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {REGISTRATION_COLUMNS}
        "#,
    );
    sqlx::query_as::<_, Registration>(&sql)
        .bind(&id)
        .bind(&new.attendee_id)
        .bind(&new.event_id)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.payment_proof)
        .bind(&new.ocr_text)
        .bind(new.ocr_amount_centavos)
        .bind(new.enabled)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return DatabaseError::AlreadyExists {
                        entity: "Registration",
                        id: format!("{}:{}", new.attendee_id, new.event_id),
                    };
                }
            }
            DatabaseError::Sqlx(e)
        })
}

/// Get a registration by ID.
pub async fn get_registration(pool: &SqlitePool, id: &str) -> Result<Registration> {
    let sql = format!(
        r#"
        SELECT {REGISTRATION_COLUMNS}
        FROM registrations
        WHERE id = ?
        "#,
    );
    sqlx::query_as::<_, Registration>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Registration",
            id: id.to_string(),
        })
}

/// Get the registration of one attendee for one event, if any.
pub async fn get_registration_for_attendee(
    pool: &SqlitePool,
    attendee_id: &str,
    event_id: &str,
) -> Result<Option<Registration>> {
    let sql = format!(
        r#"
        SELECT {REGISTRATION_COLUMNS}
        FROM registrations
        WHERE attendee_id = ? AND event_id = ?
        "#,
    );
    let registration = sqlx::query_as::<_, Registration>(&sql)
        .bind(attendee_id)
        .bind(event_id)
        .fetch_optional(pool)
        .await?;

    Ok(registration)
}

/// List the registrations for an event, oldest first.
pub async fn list_registrations_for_event(
    pool: &SqlitePool,
    event_id: &str,
) -> Result<Vec<Registration>> {
    let sql = format!(
        r#"
        SELECT {REGISTRATION_COLUMNS}
        FROM registrations
        WHERE event_id = ?
        ORDER BY created_at, id
        "#,
    );
    let registrations = sqlx::query_as::<_, Registration>(&sql)
        .bind(event_id)
        .fetch_all(pool)
        .await?;

    Ok(registrations)
}

/// Count the registrations for an event.
pub async fn count_registrations_for_event(pool: &SqlitePool, event_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM registrations WHERE event_id = ?
        "#,
    )
    .bind(event_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Update the status flags of a registration.
pub async fn update_registration_flags(
    pool: &SqlitePool,
    id: &str,
    flags: &RegistrationFlags,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE registrations
        SET enabled = ?, certificate_delivered = ?, checked_in = ?, checked_out = ?
        WHERE id = ?
        "#,
    )
    .bind(flags.enabled)
    .bind(flags.certificate_delivered)
    .bind(flags.checked_in)
    .bind(flags.checked_out)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Registration",
            id: id.to_string(),
        });
    }

    Ok(())
}

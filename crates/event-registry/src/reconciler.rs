//! Submission reconciliation.
//!
//! All public registration traffic funnels through [`reconcile`]. The rule
//! it guarantees: at most one registration per (CI, event), no matter how
//! many times or how concurrently a person submits. The guarantee does not
//! come from checking first; it comes from the UNIQUE constraints in the
//! schema, with the resulting conflict treated as the signal that the person
//! is already registered.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use receipt_core::Amount;
use registration_form::{validate_submission, Field, FieldError};

use crate::error::DatabaseError;
use crate::models::{Attendee, NewRegistration, Registration};
use crate::{attendee, event, registration};

/// One public form submission for one event, as received by the server.
///
/// Values are raw client input; [`reconcile`] re-validates everything. The
/// `payment_proof` is the stored reference of an already saved upload, and
/// the OCR fields are whatever the receipt scan produced, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub event_id: String,
    pub full_name: String,
    pub ci: String,
    pub email: String,
    pub phone: Option<String>,
    pub payment_proof: Option<String>,
    pub ocr_text: Option<String>,
    pub ocr_amount: Option<Amount>,
}

/// What became of a submission.
///
/// Both variants are successes: a repeat submission is answered with the
/// original registration, not an error, so the caller can tell the person
/// "you are already registered" instead of failing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new registration was stored.
    Created(Registration),
    /// This CI already had a registration for the event; nothing changed.
    AlreadyRegistered(Registration),
}

impl Outcome {
    /// The stored registration, whichever way the submission resolved.
    pub fn registration(&self) -> &Registration {
        match self {
            Outcome::Created(registration) | Outcome::AlreadyRegistered(registration) => {
                registration
            }
        }
    }
}

/// Errors for submission reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The submission failed server-side field validation.
    #[error("submission failed validation")]
    Invalid(Vec<(Field, FieldError)>),

    /// The referenced event does not exist.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// The storage layer failed. No partial registration is left behind
    /// and the submission is safe to retry; an attendee row created before
    /// the failure is simply found again on the retry.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Reconcile one submission against the registry.
///
/// The flow is: validate, find or create the attendee by CI, then insert
/// the registration and let the UNIQUE constraint decide whether this
/// person was first. A duplicate resolves to
/// [`Outcome::AlreadyRegistered`] carrying the original row unchanged;
/// later contact details do not overwrite what was registered first.
pub async fn reconcile(pool: &SqlitePool, submission: &Submission) -> Result<Outcome, ReconcileError> {
    let event = match event::get_event(pool, &submission.event_id).await {
        Ok(event) => event,
        Err(DatabaseError::NotFound { .. }) => {
            return Err(ReconcileError::EventNotFound(submission.event_id.clone()))
        }
        Err(err) => return Err(err.into()),
    };

    let full_name = submission.full_name.trim();
    let ci = submission.ci.trim();
    let email = submission.email.trim();
    let phone = submission.phone.as_deref().map(str::trim).unwrap_or("");

    // The public form filters as the user types, but the server cannot
    // trust it: anything out of shape here is rejected, not repaired.
    let errors = validate_submission(
        full_name,
        ci,
        email,
        phone,
        submission.payment_proof.is_some(),
        event.is_paid,
    );
    if !errors.is_empty() {
        return Err(ReconcileError::Invalid(errors));
    }

    let attendee = find_or_create_attendee(pool, full_name, ci).await?;

    let new = NewRegistration {
        attendee_id: attendee.id.clone(),
        event_id: event.id.clone(),
        email: email.to_string(),
        phone: (!phone.is_empty()).then(|| phone.to_string()),
        payment_proof: submission.payment_proof.clone(),
        ocr_text: submission.ocr_text.clone(),
        ocr_amount_centavos: submission.ocr_amount.map(Amount::centavos),
        // Paid registrations wait for staff to verify the receipt.
        enabled: !event.is_paid,
    };
    match registration::create_registration(pool, &new).await {
        Ok(created) => {
            info!(
                registration = %created.id,
                event = %event.id,
                ci = %attendee.ci,
                "registration created"
            );
            Ok(Outcome::Created(created))
        }
        Err(DatabaseError::AlreadyExists { .. }) => {
            let existing =
                registration::get_registration_for_attendee(pool, &attendee.id, &event.id)
                    .await?
                    .ok_or_else(|| DatabaseError::NotFound {
                        entity: "Registration",
                        id: format!("{}:{}", attendee.id, event.id),
                    })?;
            debug!(
                registration = %existing.id,
                event = %event.id,
                ci = %attendee.ci,
                "attendee already registered for this event"
            );
            Ok(Outcome::AlreadyRegistered(existing))
        }
        Err(err) => Err(err.into()),
    }
}

/// Find the attendee with this CI or create them.
///
/// Two submissions can race past the probe and both try to insert; the
/// loser hits the UNIQUE constraint on ci and falls back to reading the
/// winner's row.
async fn find_or_create_attendee(
    pool: &SqlitePool,
    full_name: &str,
    ci: &str,
) -> Result<Attendee, DatabaseError> {
    if let Some(existing) = attendee::get_attendee_by_ci(pool, ci).await? {
        return Ok(existing);
    }
    match attendee::create_attendee(pool, full_name, ci).await {
        Ok(created) => Ok(created),
        Err(DatabaseError::AlreadyExists { .. }) => attendee::get_attendee_by_ci(pool, ci)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "Attendee",
                id: ci.to_string(),
            }),
        Err(err) => Err(err),
    }
}

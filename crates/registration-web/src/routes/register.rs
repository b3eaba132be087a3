//! Registration submission route.
//!
//! Accepts the public form as `multipart/form-data`: the text fields, the
//! optional payment proof image, and optionally the OCR text and amount the
//! client already extracted while the person was filling the form. Anything
//! the client did not provide is recovered server-side where possible.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use event_registry::models::Registration;
use event_registry::reconciler::{self, Outcome, Submission};
use event_registry::{event, DatabaseError};
use receipt_core::{extract_amount, Amount, ImageUpload};
use registration_form::{validate_payment_proof, validate_submission, Field};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Request body limit: the payment proof plus headroom for the text fields.
pub const MAX_UPLOAD_BODY_BYTES: usize = receipt_core::MAX_IMAGE_BYTES + 64 * 1024;

/// How a submission resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTag {
    Created,
    AlreadyRegistered,
}

/// Registration as exposed over the API.
#[derive(Debug, Serialize)]
pub struct RegistrationBody {
    pub id: String,
    pub attendee_id: String,
    pub event_id: String,
    pub email: String,
    pub phone: Option<String>,
    pub payment_proof: Option<String>,
    pub ocr_amount: Option<Amount>,
    pub created_at: String,
}

impl From<Registration> for RegistrationBody {
    fn from(reg: Registration) -> Self {
        Self {
            id: reg.id,
            attendee_id: reg.attendee_id,
            event_id: reg.event_id,
            email: reg.email,
            phone: reg.phone,
            payment_proof: reg.payment_proof,
            ocr_amount: reg.ocr_amount_centavos.map(Amount::from_centavos),
            created_at: reg.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub outcome: OutcomeTag,
    pub message: String,
    pub registration: RegistrationBody,
}

/// Form fields as parsed from the multipart body.
#[derive(Debug, Default)]
struct SubmissionForm {
    full_name: String,
    national_id: String,
    email: String,
    phone: Option<String>,
    payment_proof: Option<ImageUpload>,
    ocr_text: Option<String>,
    ocr_amount: Option<String>,
}

/// Handle one registration submission.
pub async fn submit(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let event = event::get_event(state.db.pool(), &event_id)
        .await
        .map_err(|err| match err {
            DatabaseError::NotFound { .. } => ApiError::NotFound("event"),
            other => ApiError::Database(other),
        })?;

    let form = parse_submission(multipart).await?;

    let mut errors = validate_submission(
        form.full_name.trim(),
        form.national_id.trim(),
        form.email.trim(),
        form.phone.as_deref().map(str::trim).unwrap_or(""),
        form.payment_proof.is_some(),
        event.is_paid,
    );
    if let Some(image) = &form.payment_proof {
        if let Err(err) = validate_payment_proof(Some(image), event.is_paid) {
            errors.push((Field::PaymentProof, err));
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let (ocr_text, ocr_amount) = resolve_ocr(&state, &form, event.is_paid).await;

    // Persist the upload only after validation passed; rejected submissions
    // must leave nothing on disk.
    let proof_reference = match &form.payment_proof {
        Some(image) => Some(state.receipts.save(image).await?),
        None => None,
    };

    let submission = Submission {
        event_id: event.id.clone(),
        full_name: form.full_name,
        ci: form.national_id,
        email: form.email,
        phone: form.phone,
        payment_proof: proof_reference.clone(),
        ocr_text,
        ocr_amount,
    };

    match reconciler::reconcile(state.db.pool(), &submission).await {
        Ok(Outcome::Created(registration)) => Ok((
            StatusCode::CREATED,
            Json(RegistrationResponse {
                outcome: OutcomeTag::Created,
                message: "Registro exitoso. ¡Nos vemos en el evento!".to_string(),
                registration: registration.into(),
            }),
        )
            .into_response()),
        Ok(Outcome::AlreadyRegistered(registration)) => {
            // The original registration keeps its own proof; this copy is
            // unreferenced.
            discard_upload(&state, proof_reference.as_deref()).await;
            Ok((
                StatusCode::OK,
                Json(RegistrationResponse {
                    outcome: OutcomeTag::AlreadyRegistered,
                    message: "Ya estabas inscrito en este evento; tu registro original se mantiene."
                        .to_string(),
                    registration: registration.into(),
                }),
            )
                .into_response())
        }
        Err(err) => {
            discard_upload(&state, proof_reference.as_deref()).await;
            Err(err.into())
        }
    }
}

/// Read the multipart body into a [`SubmissionForm`].
async fn parse_submission(mut multipart: Multipart) -> Result<SubmissionForm> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "full_name" => form.full_name = field.text().await?,
            "national_id" => form.national_id = field.text().await?,
            "email" => form.email = field.text().await?,
            "phone" => {
                let value = field.text().await?;
                if !value.trim().is_empty() {
                    form.phone = Some(value);
                }
            }
            "ocr_text" => form.ocr_text = Some(field.text().await?),
            "ocr_amount" => form.ocr_amount = Some(field.text().await?),
            "payment_proof" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen.
                if !bytes.is_empty() {
                    form.payment_proof =
                        Some(ImageUpload::new(filename, content_type, bytes.to_vec()));
                }
            }
            _ => {
                // Drain unknown parts so the stream keeps advancing.
                let _ = field.bytes().await;
            }
        }
    }

    Ok(form)
}

/// Settle the OCR text and amount for a submission.
///
/// The client's extraction wins when present. When the client sent nothing
/// and the event is paid, the configured engine gets one bounded attempt;
/// recognition failures degrade to registering without an amount.
async fn resolve_ocr(
    state: &AppState,
    form: &SubmissionForm,
    paid_event: bool,
) -> (Option<String>, Option<Amount>) {
    let mut text = form.ocr_text.clone();
    let mut amount = form.ocr_amount.as_deref().and_then(|raw| {
        let parsed = Amount::parse(raw);
        if parsed.is_none() {
            debug!(raw, "ignoring unparseable client-extracted amount");
        }
        parsed
    });

    if paid_event && text.is_none() {
        if let (Some(engine), Some(image)) = (&state.ocr, &form.payment_proof) {
            match timeout(state.ocr_timeout, engine.recognize(image, &state.ocr_language)).await {
                Ok(Ok(recognized)) => text = Some(recognized),
                Ok(Err(err)) => warn!(
                    engine = engine.name(),
                    error = %err,
                    "receipt recognition failed; registering without an extracted amount"
                ),
                Err(_) => warn!(
                    engine = engine.name(),
                    "receipt recognition timed out; registering without an extracted amount"
                ),
            }
        }
    }

    if amount.is_none() {
        amount = text.as_deref().and_then(extract_amount);
    }

    (text, amount)
}

async fn discard_upload(state: &AppState, reference: Option<&str>) {
    if let Some(reference) = reference {
        if let Err(err) = state.receipts.remove(reference).await {
            warn!(reference, error = %err, "failed to remove unused receipt upload");
        }
    }
}

//! Registry models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// How an event is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Modality {
    InPerson,
    Virtual,
}

/// A department event open for registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: String,
    pub title: String,
    /// Scheduled start, ISO 8601.
    pub scheduled_at: String,
    pub modality: Modality,
    /// Venue address for in-person events, meeting link for virtual ones.
    pub venue: Option<String>,
    /// Whether attending costs money. Decides if a payment proof is
    /// required at registration.
    pub is_paid: bool,
    /// Attendance cost in centavos; only meaningful when `is_paid`.
    pub cost_centavos: Option<i64>,
    /// Stored reference of the payment QR image shown on the form.
    pub payment_qr: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Fields needed to create an event. The registry assigns the id and the
/// creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub scheduled_at: String,
    pub modality: Modality,
    pub venue: Option<String>,
    pub is_paid: bool,
    pub cost_centavos: Option<i64>,
    pub payment_qr: Option<String>,
}

/// A person known to the registry, identified by their CI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Attendee {
    pub id: String,
    /// Full name as registered.
    pub full_name: String,
    /// National identity document number. Unique across the system.
    pub ci: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// One attendee's registration for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: String,
    pub attendee_id: String,
    pub event_id: String,
    pub email: String,
    pub phone: Option<String>,
    /// Stored reference of the uploaded payment proof image.
    pub payment_proof: Option<String>,
    /// Text recognized from the proof, when OCR succeeded.
    pub ocr_text: Option<String>,
    /// Amount extracted from the recognized text, in centavos.
    pub ocr_amount_centavos: Option<i64>,
    /// Whether the registration has been confirmed by staff.
    pub enabled: bool,
    pub certificate_delivered: bool,
    pub checked_in: bool,
    pub checked_out: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// Data stored when a registration is first created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub attendee_id: String,
    pub event_id: String,
    pub email: String,
    pub phone: Option<String>,
    pub payment_proof: Option<String>,
    pub ocr_text: Option<String>,
    pub ocr_amount_centavos: Option<i64>,
    pub enabled: bool,
}

/// The per-registration status flags staff can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrationFlags {
    pub enabled: bool,
    pub certificate_delivered: bool,
    pub checked_in: bool,
    pub checked_out: bool,
}

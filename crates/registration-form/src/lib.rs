//! Field filtering, validation and form state for public event registration.
//!
//! The public form applies two layers of defense:
//!
//! - **Filtering** ([`filter_text_field`]) runs on every edit and silently
//!   drops characters a field does not accept, so most invalid input never
//!   becomes part of the value.
//! - **Validation** ([`validate_text_field`], [`validate_payment_proof`])
//!   runs on the accepted value and at submit time, and reports a specific
//!   [`FieldError`] for anything filtering cannot express, such as a missing
//!   required value or a malformed email.
//!
//! [`FormState`] ties both together for one form bound to one event and
//! decides when the form may be submitted.
//!
//! # Example
//!
//! ```rust
//! use registration_form::{filter_full_name, validate_full_name};
//!
//! // Digits never make it into a name.
//! assert_eq!(filter_full_name("Ana34 María"), "Ana María");
//! assert!(validate_full_name("Ana María").is_ok());
//! ```

mod fields;
mod state;

pub use fields::{
    filter_full_name, filter_national_id, filter_phone, filter_text_field, validate_email,
    validate_full_name, validate_national_id, validate_payment_proof, validate_phone,
    validate_submission, validate_text_field, Field, FieldError, MAX_EMAIL_CHARS,
    MAX_FULL_NAME_CHARS, MAX_NATIONAL_ID_CHARS, PHONE_DIGITS,
};
pub use state::{FieldState, FormState};

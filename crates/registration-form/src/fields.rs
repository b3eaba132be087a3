//! Per-field filtering and submit-time validation rules.

use std::fmt;

use receipt_core::{ImageError, ImageUpload};
use thiserror::Error;

/// Maximum accepted length of a full name, in characters.
pub const MAX_FULL_NAME_CHARS: usize = 40;

/// Maximum accepted length of a CI (national identity document number).
pub const MAX_NATIONAL_ID_CHARS: usize = 10;

/// Exact number of digits of a local phone number.
pub const PHONE_DIGITS: usize = 8;

/// Maximum accepted length of an email address.
pub const MAX_EMAIL_CHARS: usize = 254;

/// Accented characters allowed in names besides ASCII letters.
const NAME_ACCENTED: &str = "áéíóúüñÁÉÍÓÚÜÑ";

/// The fields of the registration form, used as validation dispatch keys
/// and as error identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    NationalId,
    Email,
    Phone,
    PaymentProof,
}

impl Field {
    /// Every form field, in display order.
    pub const ALL: [Field; 5] = [
        Field::FullName,
        Field::NationalId,
        Field::Email,
        Field::Phone,
        Field::PaymentProof,
    ];

    /// Wire name of the field, matching the multipart form part names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::NationalId => "national_id",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::PaymentProof => "payment_proof",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(Field),

    #[error("{field} is too long ({actual} characters, max {max})")]
    TooLong {
        field: Field,
        max: usize,
        actual: usize,
    },

    #[error("{0} contains characters that are not allowed")]
    InvalidCharacters(Field),

    #[error("{0} must not contain repeated spaces")]
    RepeatedSpaces(Field),

    #[error("email is not valid: {0}")]
    InvalidEmail(&'static str),

    #[error("phone must be exactly 8 digits (got {actual})")]
    PhoneLength { actual: usize },

    #[error("payment proof: {0}")]
    Proof(#[from] ImageError),
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || NAME_ACCENTED.contains(c)
}

/// Filter one edit of the full name: keep letters and single spaces, drop
/// everything else, cap the length. Disallowed characters are dropped
/// silently rather than reported.
pub fn filter_full_name(raw: &str) -> String {
    let mut out = String::new();
    let mut kept = 0usize;
    let mut last_was_space = true;
    for c in raw.chars() {
        if kept == MAX_FULL_NAME_CHARS {
            break;
        }
        if c == ' ' {
            if last_was_space {
                continue;
            }
            out.push(' ');
        } else if is_name_char(c) {
            out.push(c);
        } else {
            continue;
        }
        last_was_space = c == ' ';
        kept += 1;
    }
    out
}

/// Filter one edit of the CI: digits only, capped length.
pub fn filter_national_id(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(MAX_NATIONAL_ID_CHARS)
        .collect()
}

/// Filter one edit of the phone number: digits only, capped length.
pub fn filter_phone(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect()
}

/// Apply the field's edit-time filter to a raw value.
///
/// Email has no edit-time filter; a partially typed address is shapeless
/// until submit, so it is validated as a whole instead.
pub fn filter_text_field(field: Field, raw: &str) -> String {
    match field {
        Field::FullName => filter_full_name(raw),
        Field::NationalId => filter_national_id(raw),
        Field::Phone => filter_phone(raw),
        Field::Email | Field::PaymentProof => raw.to_string(),
    }
}

/// Validate a full name: required, letters and single spaces only, at most
/// [`MAX_FULL_NAME_CHARS`] characters.
pub fn validate_full_name(value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Required(Field::FullName));
    }
    let chars = value.chars().count();
    if chars > MAX_FULL_NAME_CHARS {
        return Err(FieldError::TooLong {
            field: Field::FullName,
            max: MAX_FULL_NAME_CHARS,
            actual: chars,
        });
    }
    let mut last_was_space = false;
    for c in value.chars() {
        if c == ' ' {
            if last_was_space {
                return Err(FieldError::RepeatedSpaces(Field::FullName));
            }
        } else if !is_name_char(c) {
            return Err(FieldError::InvalidCharacters(Field::FullName));
        }
        last_was_space = c == ' ';
    }
    Ok(())
}

/// Validate a CI: required, digits only, at most
/// [`MAX_NATIONAL_ID_CHARS`] digits.
pub fn validate_national_id(value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Required(Field::NationalId));
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::InvalidCharacters(Field::NationalId));
    }
    if value.len() > MAX_NATIONAL_ID_CHARS {
        return Err(FieldError::TooLong {
            field: Field::NationalId,
            max: MAX_NATIONAL_ID_CHARS,
            actual: value.len(),
        });
    }
    Ok(())
}

/// Validate an email address (basic `local@domain.tld` format check).
pub fn validate_email(value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Required(Field::Email));
    }
    let chars = value.chars().count();
    if chars > MAX_EMAIL_CHARS {
        return Err(FieldError::TooLong {
            field: Field::Email,
            max: MAX_EMAIL_CHARS,
            actual: chars,
        });
    }

    let parts: Vec<&str> = value.split('@').collect();
    if parts.len() != 2 {
        return Err(FieldError::InvalidEmail("must contain exactly one @ symbol"));
    }
    let (local, domain) = (parts[0], parts[1]);
    if local.is_empty() {
        return Err(FieldError::InvalidEmail("missing local part (before @)"));
    }
    if domain.is_empty() {
        return Err(FieldError::InvalidEmail("missing domain (after @)"));
    }
    if !domain.contains('.') {
        return Err(FieldError::InvalidEmail("domain must contain at least one dot"));
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(FieldError::InvalidEmail("domain cannot start or end with a dot"));
    }
    if domain.contains("..") {
        return Err(FieldError::InvalidEmail("domain cannot contain consecutive dots"));
    }
    Ok(())
}

/// Validate a phone number: optional, but when present it must be exactly
/// [`PHONE_DIGITS`] digits. An empty value counts as absent.
pub fn validate_phone(value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::InvalidCharacters(Field::Phone));
    }
    if value.len() != PHONE_DIGITS {
        return Err(FieldError::PhoneLength {
            actual: value.len(),
        });
    }
    Ok(())
}

/// Validate the payment proof against the event's payment requirement.
///
/// A proof is required exactly when the event is paid. An attached proof is
/// checked against the image constraints even for a free event.
pub fn validate_payment_proof(
    proof: Option<&ImageUpload>,
    paid_event: bool,
) -> Result<(), FieldError> {
    match proof {
        Some(image) => image.check().map_err(FieldError::Proof),
        None if paid_event => Err(FieldError::Required(Field::PaymentProof)),
        None => Ok(()),
    }
}

/// Validate one text field by identity.
///
/// The payment proof is not a text field; use [`validate_payment_proof`]
/// for it. Calling this with [`Field::PaymentProof`] is a no-op.
pub fn validate_text_field(field: Field, value: &str) -> Result<(), FieldError> {
    match field {
        Field::FullName => validate_full_name(value),
        Field::NationalId => validate_national_id(value),
        Field::Email => validate_email(value),
        Field::Phone => validate_phone(value),
        Field::PaymentProof => Ok(()),
    }
}

/// Run every submit-time rule against a submission's raw values.
///
/// Returns all failures at once so a client can mark every offending field;
/// an empty vector means the submission is acceptable. `phone` may be empty
/// to mean absent. The content of an attached proof is checked separately
/// with [`validate_payment_proof`]; here only its presence matters.
pub fn validate_submission(
    full_name: &str,
    national_id: &str,
    email: &str,
    phone: &str,
    has_payment_proof: bool,
    paid_event: bool,
) -> Vec<(Field, FieldError)> {
    let mut errors = Vec::new();
    if let Err(err) = validate_full_name(full_name) {
        errors.push((Field::FullName, err));
    }
    if let Err(err) = validate_national_id(national_id) {
        errors.push((Field::NationalId, err));
    }
    if let Err(err) = validate_email(email) {
        errors.push((Field::Email, err));
    }
    if let Err(err) = validate_phone(phone) {
        errors.push((Field::Phone, err));
    }
    if paid_event && !has_payment_proof {
        errors.push((
            Field::PaymentProof,
            FieldError::Required(Field::PaymentProof),
        ));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_drops_digits_and_symbols_from_names() {
        assert_eq!(filter_full_name("Ana34 María"), "Ana María");
        assert_eq!(filter_full_name("Juan_Pérez!"), "JuanPérez");
        assert_eq!(filter_full_name("12345"), "");
    }

    #[test]
    fn filter_collapses_space_runs() {
        assert_eq!(filter_full_name("Ana   María"), "Ana María");
        assert_eq!(filter_full_name("   Ana"), "Ana");
    }

    #[test]
    fn filter_caps_name_length() {
        let long = "a".repeat(80);
        assert_eq!(filter_full_name(&long).chars().count(), MAX_FULL_NAME_CHARS);
    }

    #[test]
    fn filter_keeps_accented_letters() {
        assert_eq!(filter_full_name("José Ñandú"), "José Ñandú");
    }

    #[test]
    fn filter_strips_non_digits_from_ci() {
        assert_eq!(filter_national_id("12a34-56"), "123456");
        assert_eq!(filter_national_id("123456789012"), "1234567890");
    }

    #[test]
    fn name_boundaries() {
        assert!(validate_full_name(&"a".repeat(40)).is_ok());
        assert!(matches!(
            validate_full_name(&"a".repeat(41)),
            Err(FieldError::TooLong { .. })
        ));
        assert_eq!(
            validate_full_name(""),
            Err(FieldError::Required(Field::FullName))
        );
        assert_eq!(
            validate_full_name("Ana3"),
            Err(FieldError::InvalidCharacters(Field::FullName))
        );
        assert_eq!(
            validate_full_name("Ana  María"),
            Err(FieldError::RepeatedSpaces(Field::FullName))
        );
        assert!(validate_full_name("Ana María Ñuflo").is_ok());
    }

    #[test]
    fn ci_boundaries() {
        assert!(validate_national_id("1234567890").is_ok());
        assert!(matches!(
            validate_national_id("12345678901"),
            Err(FieldError::TooLong { .. })
        ));
        assert_eq!(
            validate_national_id("123a567"),
            Err(FieldError::InvalidCharacters(Field::NationalId))
        );
        assert_eq!(
            validate_national_id("  "),
            Err(FieldError::Required(Field::NationalId))
        );
    }

    #[test]
    fn phone_is_optional_but_exact() {
        assert!(validate_phone("").is_ok());
        assert!(validate_phone("71234567").is_ok());
        assert_eq!(
            validate_phone("7123456"),
            Err(FieldError::PhoneLength { actual: 7 })
        );
        assert_eq!(
            validate_phone("712345678"),
            Err(FieldError::PhoneLength { actual: 9 })
        );
        assert_eq!(
            validate_phone("71-23-45"),
            Err(FieldError::InvalidCharacters(Field::Phone))
        );
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("a.b@sub.example.co").is_ok());
        assert!(matches!(
            validate_email("anaexample.com"),
            Err(FieldError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("ana@@example.com"),
            Err(FieldError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("@example.com"),
            Err(FieldError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("ana@"),
            Err(FieldError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("ana@example"),
            Err(FieldError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("ana@example..com"),
            Err(FieldError::InvalidEmail(_))
        ));
        assert_eq!(validate_email(""), Err(FieldError::Required(Field::Email)));
    }

    #[test]
    fn proof_required_only_for_paid_events() {
        assert_eq!(
            validate_payment_proof(None, true),
            Err(FieldError::Required(Field::PaymentProof))
        );
        assert!(validate_payment_proof(None, false).is_ok());

        let proof = ImageUpload::new(None, "image/png", vec![0u8; 16]);
        assert!(validate_payment_proof(Some(&proof), true).is_ok());
        assert!(validate_payment_proof(Some(&proof), false).is_ok());

        let pdf = ImageUpload::new(None, "application/pdf", vec![0u8; 16]);
        assert!(matches!(
            validate_payment_proof(Some(&pdf), true),
            Err(FieldError::Proof(_))
        ));
    }

    #[test]
    fn submission_reports_every_failure_at_once() {
        let errors = validate_submission("", "123a", "nope", "123", false, true);
        let fields: Vec<Field> = errors.iter().map(|(field, _)| *field).collect();
        assert_eq!(
            fields,
            vec![
                Field::FullName,
                Field::NationalId,
                Field::Email,
                Field::Phone,
                Field::PaymentProof
            ]
        );
    }

    #[test]
    fn submission_accepts_a_complete_valid_entry() {
        let errors = validate_submission(
            "Ana María Rojas",
            "1234567",
            "ana@example.com",
            "71234567",
            true,
            true,
        );
        assert!(errors.is_empty());
    }
}

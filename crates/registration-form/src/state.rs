//! Form state for one registration, bound to one event.

use std::collections::HashMap;

use receipt_core::{Amount, ImageUpload, ScanResult};

use crate::fields::{
    filter_text_field, validate_payment_proof, validate_text_field, Field, FieldError,
};

const UNTOUCHED: FieldState = FieldState::Untouched;

/// Validation status of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldState {
    /// The user has not edited the field yet.
    #[default]
    Untouched,
    Valid,
    Invalid(FieldError),
}

impl FieldState {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldState::Valid)
    }

    pub fn error(&self) -> Option<&FieldError> {
        match self {
            FieldState::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

/// State of one registration form.
///
/// Tracks the accepted value and validation state of every field, the
/// attached payment proof, and the OCR values recognized from it. The form
/// knows whether its event is paid, which decides whether a proof is
/// required.
#[derive(Debug, Clone)]
pub struct FormState {
    paid_event: bool,
    full_name: String,
    national_id: String,
    email: String,
    phone: String,
    proof: Option<ImageUpload>,
    states: HashMap<Field, FieldState>,
    ocr_text: Option<String>,
    ocr_amount: Option<Amount>,
    expected_scan: Option<u64>,
}

impl FormState {
    pub fn new(paid_event: bool) -> Self {
        Self {
            paid_event,
            full_name: String::new(),
            national_id: String::new(),
            email: String::new(),
            phone: String::new(),
            proof: None,
            states: Field::ALL
                .into_iter()
                .map(|field| (field, FieldState::Untouched))
                .collect(),
            ocr_text: None,
            ocr_amount: None,
            expected_scan: None,
        }
    }

    pub fn paid_event(&self) -> bool {
        self.paid_event
    }

    /// Current accepted value of a text field. Empty for the payment proof.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::NationalId => &self.national_id,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::PaymentProof => "",
        }
    }

    pub fn field_state(&self, field: Field) -> &FieldState {
        self.states.get(&field).unwrap_or(&UNTOUCHED)
    }

    pub fn proof(&self) -> Option<&ImageUpload> {
        self.proof.as_ref()
    }

    pub fn ocr_text(&self) -> Option<&str> {
        self.ocr_text.as_deref()
    }

    pub fn ocr_amount(&self) -> Option<Amount> {
        self.ocr_amount
    }

    /// Apply one edit to a text field.
    ///
    /// The raw input is filtered first, so disallowed characters are
    /// dropped without an error, then the accepted value is validated and
    /// the field state updated. Returns the accepted value. Editing the
    /// payment proof goes through [`FormState::attach_proof`] instead; for
    /// that field this is a no-op.
    pub fn input(&mut self, field: Field, raw: &str) -> &str {
        let accepted = filter_text_field(field, raw);
        let state = match validate_text_field(field, &accepted) {
            Ok(()) => FieldState::Valid,
            Err(err) => FieldState::Invalid(err),
        };
        match field {
            Field::FullName => self.full_name = accepted,
            Field::NationalId => self.national_id = accepted,
            Field::Email => self.email = accepted,
            Field::Phone => self.phone = accepted,
            Field::PaymentProof => return "",
        }
        self.states.insert(field, state);
        self.value(field)
    }

    /// Attach a payment proof file.
    ///
    /// Any OCR values recognized from a previously attached file are
    /// cleared; they belong to that file, not this one. The caller is
    /// expected to start a new scan and register its generation with
    /// [`FormState::expect_scan`].
    pub fn attach_proof(&mut self, image: ImageUpload) {
        let state = match validate_payment_proof(Some(&image), self.paid_event) {
            Ok(()) => FieldState::Valid,
            Err(err) => FieldState::Invalid(err),
        };
        self.proof = Some(image);
        self.states.insert(Field::PaymentProof, state);
        self.clear_scan();
    }

    /// Remove the attached payment proof and any values derived from it.
    pub fn clear_proof(&mut self) {
        self.proof = None;
        let state = match validate_payment_proof(None, self.paid_event) {
            Ok(()) => FieldState::Untouched,
            Err(err) => FieldState::Invalid(err),
        };
        self.states.insert(Field::PaymentProof, state);
        self.clear_scan();
    }

    /// Register the generation of the scan started for the current proof.
    pub fn expect_scan(&mut self, generation: u64) {
        self.expected_scan = Some(generation);
    }

    /// Apply a finished scan to the form.
    ///
    /// Returns `false` and changes nothing when the result belongs to a
    /// superseded scan, i.e. its generation is not the one registered with
    /// [`FormState::expect_scan`].
    pub fn apply_scan(&mut self, result: &ScanResult) -> bool {
        if self.expected_scan != Some(result.generation) {
            return false;
        }
        self.ocr_text = result.text.clone();
        self.ocr_amount = result.amount;
        true
    }

    /// Whether the form may be submitted right now.
    ///
    /// Every required field must be valid, no optional field may be in
    /// error, and a paid event requires a valid payment proof.
    pub fn can_submit(&self) -> bool {
        let required = [Field::FullName, Field::NationalId, Field::Email];
        if !required.iter().all(|field| self.field_state(*field).is_valid()) {
            return false;
        }
        if matches!(self.field_state(Field::Phone), FieldState::Invalid(_)) {
            return false;
        }
        match self.field_state(Field::PaymentProof) {
            FieldState::Valid => true,
            FieldState::Invalid(_) => false,
            FieldState::Untouched => !self.paid_event,
        }
    }

    /// Run the full submit-time validation pass, marking every field.
    ///
    /// Untouched required fields become invalid here, so a never-edited
    /// form reports every missing value at once.
    pub fn finalize(&mut self) -> Result<(), Vec<(Field, FieldError)>> {
        let mut errors = Vec::new();
        for field in [Field::FullName, Field::NationalId, Field::Email, Field::Phone] {
            let result = validate_text_field(field, self.value(field));
            self.mark(field, result, &mut errors);
        }
        let proof = validate_payment_proof(self.proof.as_ref(), self.paid_event);
        self.mark(Field::PaymentProof, proof, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn clear_scan(&mut self) {
        self.ocr_text = None;
        self.ocr_amount = None;
        self.expected_scan = None;
    }

    fn mark(
        &mut self,
        field: Field,
        result: Result<(), FieldError>,
        errors: &mut Vec<(Field, FieldError)>,
    ) {
        match result {
            Ok(()) => {
                self.states.insert(field, FieldState::Valid);
            }
            Err(err) => {
                self.states.insert(field, FieldState::Invalid(err.clone()));
                errors.push((field, err));
            }
        }
    }
}

//! Whole-form validation.

use serde_json::{Map, Value};

use super::rules::FieldValidator;
use crate::envelope::{FieldErrors, ResponseEnvelope};

/// Message of the `Error` envelope produced by a failed payload check
pub const INVALID_FIELDS_MESSAGE: &str = "Please correct the highlighted fields.";

/// Message of the `Success` envelope produced by a passing payload check
pub const VALID_FIELDS_MESSAGE: &str = "All fields are valid.";

/// Ordered field -> validator map for one form
#[derive(Debug, Clone, Default)]
pub struct PayloadSchema {
    fields: Vec<(String, FieldValidator)>,
}

impl PayloadSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field
    pub fn field(mut self, name: impl Into<String>, validator: FieldValidator) -> Self {
        self.fields.push((name.into(), validator));
        self
    }

    /// Declared field names
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Validate every declared field.
    ///
    /// A missing field is validated as an empty string. Undeclared
    /// fields are ignored.
    pub fn validate(&self, payload: &Map<String, Value>) -> Result<(), FieldErrors> {
        let empty = Value::String(String::new());
        let mut errors = FieldErrors::new();

        for (name, validator) in &self.fields {
            let value = payload.get(name).unwrap_or(&empty);
            let violations = validator.violations(value);
            if !violations.is_empty() {
                errors.insert(name.clone(), violations);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validation result as an envelope
    pub fn check(&self, payload: &Map<String, Value>) -> ResponseEnvelope<()> {
        match self.validate(payload) {
            Ok(()) => ResponseEnvelope::success(VALID_FIELDS_MESSAGE, ()),
            Err(errors) => ResponseEnvelope::error(INVALID_FIELDS_MESSAGE, errors),
        }
    }
}

//! Envelope type and its three constructors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User-facing message carried by every `Failure` envelope
pub const GENERIC_FAILURE_MESSAGE: &str = "Oops! Something went wrong. Try again later.";

/// Synthetic field key holding the diagnostic text of a `Failure`
pub const SYSTEM_FIELD: &str = "system";

/// Field name -> messages for that field, in deterministic key order
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Build a single-field error map
pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.into(), vec![message.into()]);
    errors
}

/// Outcome tag of an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Operation completed
    Success,
    /// User-correctable: invalid field values or a uniqueness conflict
    Error,
    /// Unexpected, system-level
    Failure,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "Success",
            Status::Error => "Error",
            Status::Failure => "Failure",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Success / Error / Failure result of a domain operation.
///
/// Fields are private so the status/errors invariants can only be
/// established through [`ResponseEnvelope::success`],
/// [`ResponseEnvelope::error`] and [`ResponseEnvelope::failure`].
/// Deserialization re-checks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "WireEnvelope<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct ResponseEnvelope<T> {
    status: Status,
    message: String,
    data: Option<T>,
    errors: FieldErrors,
}

impl<T> ResponseEnvelope<T> {
    /// Completed operation carrying `data`
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data: Some(data),
            errors: FieldErrors::new(),
        }
    }

    /// User-correctable rejection.
    ///
    /// An empty `errors` map is a caller bug; it degrades to a `Failure`
    /// so the `Error => errors non-empty` invariant holds for every value.
    pub fn error(message: impl Into<String>, errors: FieldErrors) -> Self {
        if errors.values().all(|messages| messages.is_empty()) {
            return Self::failure("error envelope built without field errors");
        }

        let errors = errors
            .into_iter()
            .filter(|(_, messages)| !messages.is_empty())
            .collect();

        Self {
            status: Status::Error,
            message: message.into(),
            data: None,
            errors,
        }
    }

    /// System-level failure. The cause is only exposed under `system`.
    pub fn failure(cause: impl fmt::Display) -> Self {
        Self {
            status: Status::Failure,
            message: GENERIC_FAILURE_MESSAGE.to_string(),
            data: None,
            errors: field_error(SYSTEM_FIELD, cause.to_string()),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Messages reported for one field
    pub fn field_errors(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    pub fn is_failure(&self) -> bool {
        self.status == Status::Failure
    }

    /// Transform the payload, keeping status, message and errors
    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> ResponseEnvelope<U> {
        ResponseEnvelope {
            status: self.status,
            message: self.message,
            data: self.data.map(f),
            errors: self.errors,
        }
    }
}

impl<T: Serialize> ResponseEnvelope<T> {
    /// Erase the payload type so any envelope can be projected onto a form.
    ///
    /// A payload that cannot be represented as JSON turns the envelope
    /// into a `Failure`.
    pub fn into_value(self) -> ResponseEnvelope<Value> {
        let data = match self.data.map(serde_json::to_value).transpose() {
            Ok(data) => data,
            Err(e) => return ResponseEnvelope::failure(format!("unserializable payload: {}", e)),
        };

        ResponseEnvelope {
            status: self.status,
            message: self.message,
            data,
            errors: self.errors,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            ResponseEnvelope::<()>::failure(format!("unserializable payload: {}", e)).to_json()
        })
    }
}

/// Unchecked wire form used during deserialization
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct WireEnvelope<T> {
    status: Status,
    #[serde(default)]
    message: String,
    data: Option<T>,
    #[serde(default)]
    errors: FieldErrors,
}

impl<T> TryFrom<WireEnvelope<T>> for ResponseEnvelope<T> {
    type Error = String;

    fn try_from(wire: WireEnvelope<T>) -> Result<Self, Self::Error> {
        let has_errors = wire.errors.values().any(|messages| !messages.is_empty());

        match wire.status {
            Status::Success if has_errors => {
                Err("Success envelope must not carry field errors".to_string())
            }
            Status::Error if !has_errors => {
                Err("Error envelope must carry at least one field error".to_string())
            }
            Status::Failure if wire.errors.keys().any(|key| key != SYSTEM_FIELD) => {
                Err(format!("Failure envelope may only carry the '{}' key", SYSTEM_FIELD))
            }
            _ => Ok(Self {
                status: wire.status,
                message: wire.message,
                data: wire.data,
                errors: wire.errors,
            }),
        }
    }
}

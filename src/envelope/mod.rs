//! # Response Envelope
//!
//! The tagged result returned by every validating operation.
//!
//! Wire shape (stable across operations):
//!
//! ```text
//! {
//!   "status": "Success" | "Error" | "Failure",
//!   "message": "<string>",
//!   "data": <T | null>,
//!   "errors": { "<fieldName>": ["<message>", ...] }
//! }
//! ```
//!
//! ## Invariants
//! - `Success` carries no field errors
//! - `Error` carries at least one field-keyed message
//! - `Failure` carries a generic message and only the `system` diagnostic key

mod response;

pub use response::{
    field_error, FieldErrors, ResponseEnvelope, Status, GENERIC_FAILURE_MESSAGE, SYSTEM_FIELD,
};

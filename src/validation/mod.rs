//! Field validation
//!
//! Field-level rules produce human-readable messages, never errors:
//! a failed check is data that ends up in an `Error` envelope.
//!
//! - [`FieldValidator`]: ordered checks for one field
//! - [`PayloadSchema`]: ordered field -> validator map for a whole form
//! - [`PasswordPolicy`]: configurable password requirements

mod password;
mod payload;
mod rules;

pub use password::PasswordPolicy;
pub use payload::{PayloadSchema, INVALID_FIELDS_MESSAGE, VALID_FIELDS_MESSAGE};
pub use rules::{FieldValidator, Rule};

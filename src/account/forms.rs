//! Payload schemas for the account workflows.

use crate::validation::{FieldValidator, PasswordPolicy, PayloadSchema, Rule};

/// Handle, name, email, password, optional phone
pub fn registration_schema(policy: &PasswordPolicy) -> PayloadSchema {
    PayloadSchema::new()
        .field(
            "handle",
            FieldValidator::new()
                .rule(Rule::Required, "Handle is required")
                .rule(
                    Rule::Handle,
                    "Handle must be 3-32 letters, digits, '_', '.' or '-'",
                ),
        )
        .field(
            "name",
            FieldValidator::new()
                .rule(Rule::Required, "Name is required")
                .rule(Rule::MaxLength(100), "Name must be at most 100 characters"),
        )
        .field(
            "email",
            FieldValidator::new()
                .rule(Rule::Required, "Email is required")
                .rule(Rule::Email, "Enter a valid email address"),
        )
        .field(
            "phone",
            FieldValidator::new()
                .rule(Rule::Phone, "Enter a valid phone number")
                .optional(),
        )
        .field(
            "password",
            FieldValidator::new()
                .rule(Rule::Required, "Password is required")
                .rule(Rule::Password(policy.clone()), "Enter a valid password"),
        )
}

/// Handle and password, presence only
pub fn login_schema() -> PayloadSchema {
    PayloadSchema::new()
        .field(
            "handle",
            FieldValidator::new().rule(Rule::Required, "Handle is required"),
        )
        .field(
            "password",
            FieldValidator::new().rule(Rule::Required, "Password is required"),
        )
}

/// Name, email and a bounded message
pub fn feedback_schema(max_length: usize) -> PayloadSchema {
    PayloadSchema::new()
        .field(
            "name",
            FieldValidator::new().rule(Rule::Required, "Name is required"),
        )
        .field(
            "email",
            FieldValidator::new().rule(Rule::Email, "Enter a valid email address"),
        )
        .field(
            "message",
            FieldValidator::new()
                .rule(Rule::Required, "Message is required")
                .rule(
                    Rule::MaxLength(max_length),
                    format!("Message must be at most {} characters", max_length),
                ),
        )
}

//! # Attribute Schema Registry
//!
//! Dispatch table from attribute name to its update rule, built once at
//! startup. Unknown names are rejected at lookup.

use std::collections::HashMap;

use super::model::Attribute;
use crate::envelope::{field_error, ResponseEnvelope};
use crate::validation::{FieldValidator, PasswordPolicy, Rule};

/// Name of the identity field
pub const IDENTITY_FIELD: &str = "id";

/// Update rule for one user-editable attribute
#[derive(Debug, Clone)]
pub struct AttributeRule {
    /// Column written
    pub attribute: Attribute,
    /// User-facing name, e.g. "Handle"
    pub label: String,
    /// Field validator run on the submitted value
    pub validator: FieldValidator,
    /// Whether another account may hold the same value
    pub unique: bool,
    /// Verification flag cleared when this attribute changes
    pub resets: Option<Attribute>,
}

impl AttributeRule {
    pub fn new(attribute: Attribute, label: impl Into<String>, validator: FieldValidator) -> Self {
        Self {
            attribute,
            label: label.into(),
            validator,
            unique: false,
            resets: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn resets(mut self, flag: Attribute) -> Self {
        self.resets = Some(flag);
        self
    }

    /// Conflict message, e.g. "Handle already taken"
    pub fn taken_message(&self) -> String {
        format!("{} already taken", self.label)
    }
}

/// Result of looking up an attribute name
#[derive(Debug, Clone, Copy)]
pub enum AttributeEntry<'a> {
    /// The identity field; never updatable
    Identity,
    /// A validated, user-editable attribute
    Field(&'a AttributeRule),
    /// A system-set verification flag; bypasses field validation
    VerificationFlag(Attribute),
}

/// Attribute name -> rule
#[derive(Debug, Clone, Default)]
pub struct AttributeSchemaRegistry {
    rules: HashMap<String, AttributeRule>,
    flags: HashMap<String, Attribute>,
}

impl AttributeSchemaRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user-editable attribute under its column name
    pub fn register(mut self, rule: AttributeRule) -> Self {
        self.rules.insert(rule.attribute.as_str().to_string(), rule);
        self
    }

    /// Register a verification flag under its column name
    pub fn register_flag(mut self, flag: Attribute) -> Self {
        self.flags.insert(flag.as_str().to_string(), flag);
        self
    }

    /// Registry for account attributes
    pub fn accounts(policy: &PasswordPolicy) -> Self {
        Self::new()
            .register(
                AttributeRule::new(
                    Attribute::Handle,
                    "Handle",
                    FieldValidator::new().rule(
                        Rule::Handle,
                        "Handle must be 3-32 letters, digits, '_', '.' or '-'",
                    ),
                )
                .unique(),
            )
            .register(AttributeRule::new(
                Attribute::Name,
                "Name",
                FieldValidator::new()
                    .rule(Rule::Required, "Name is required")
                    .rule(Rule::MaxLength(100), "Name must be at most 100 characters"),
            ))
            .register(
                AttributeRule::new(
                    Attribute::Email,
                    "Email",
                    FieldValidator::new().rule(Rule::Email, "Enter a valid email address"),
                )
                .unique()
                .resets(Attribute::EmailVerified),
            )
            .register(
                AttributeRule::new(
                    Attribute::Phone,
                    "Phone",
                    FieldValidator::new()
                        .rule(Rule::Phone, "Enter a valid phone number")
                        .optional(),
                )
                .unique()
                .resets(Attribute::PhoneVerified),
            )
            .register(AttributeRule::new(
                Attribute::Password,
                "Password",
                FieldValidator::new().rule(Rule::Password(policy.clone()), "Enter a valid password"),
            ))
            .register_flag(Attribute::EmailVerified)
            .register_flag(Attribute::PhoneVerified)
    }

    /// Look up an attribute by name
    pub fn lookup(&self, name: &str) -> Option<AttributeEntry<'_>> {
        if name == IDENTITY_FIELD {
            return Some(AttributeEntry::Identity);
        }
        if let Some(rule) = self.rules.get(name) {
            return Some(AttributeEntry::Field(rule));
        }
        self.flags
            .get(name)
            .map(|flag| AttributeEntry::VerificationFlag(*flag))
    }

    /// Rule registered under `name`
    pub fn rule(&self, name: &str) -> Option<&AttributeRule> {
        self.rules.get(name)
    }

    /// `Error` envelope for a uniqueness conflict on `attribute`
    pub fn conflict<T>(&self, attribute: Attribute) -> ResponseEnvelope<T> {
        let message = match self.rule(attribute.as_str()) {
            Some(rule) => rule.taken_message(),
            None => format!("{} already taken", attribute),
        };
        ResponseEnvelope::error(message.clone(), field_error(attribute.as_str(), message))
    }
}

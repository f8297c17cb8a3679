//! # Attribute Validator
//!
//! Validates and commits a single named account attribute.
//!
//! ## Steps
//! 1. Identity field -> `Failure`
//! 2. Unknown name -> `Failure`
//! 3. Field validator -> `Error { name: [message] }` (flags skip this)
//! 4. Uniqueness against other accounts -> `Error "<Label> already taken"`
//! 5. Single write: the attribute plus any dependent flag reset
//! 6. Store errors -> `Failure`, write-time unique violations -> `Error`
//!
//! Steps 4 and 5 are separate round trips to the store, so a concurrent
//! writer can slip in between. The repository's own unique constraint
//! catches that case, and it still surfaces as an `Error` envelope.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::crypto::CredentialHasher;
use super::errors::StoreError;
use super::model::{AccountRepository, Attribute, AttributeChange};
use super::registry::{AttributeEntry, AttributeRule, AttributeSchemaRegistry};
use crate::envelope::{field_error, ResponseEnvelope, Status};
use crate::observability::{Event, Logger, MetricsRegistry};
use crate::validation::INVALID_FIELDS_MESSAGE;

/// Per-attribute validation and persistence
pub struct AttributeValidator<R: AccountRepository, H: CredentialHasher> {
    repo: Arc<R>,
    hasher: Arc<H>,
    registry: AttributeSchemaRegistry,
    metrics: Arc<MetricsRegistry>,
}

impl<R: AccountRepository, H: CredentialHasher> AttributeValidator<R, H> {
    pub fn new(repo: Arc<R>, hasher: Arc<H>, registry: AttributeSchemaRegistry) -> Self {
        Self::with_metrics(repo, hasher, registry, Arc::new(MetricsRegistry::new()))
    }

    pub fn with_metrics(
        repo: Arc<R>,
        hasher: Arc<H>,
        registry: AttributeSchemaRegistry,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            repo,
            hasher,
            registry,
            metrics,
        }
    }

    pub fn registry(&self) -> &AttributeSchemaRegistry {
        &self.registry
    }

    /// Validate and persist `name = value` on account `id`.
    ///
    /// Never fails: every outcome is an envelope.
    pub fn update_attribute(&self, id: Uuid, name: &str, value: Value) -> ResponseEnvelope<()> {
        let account = id.to_string();
        Logger::event(
            Event::AttributeUpdateBegin,
            &[("account", account.as_str()), ("attribute", name)],
        );

        let envelope = match self.try_update(id, name, &value) {
            Ok(message) => ResponseEnvelope::success(message, ()),
            Err(envelope) => envelope,
        };

        self.metrics.record(envelope.status());
        match envelope.status() {
            Status::Success => Logger::event(
                Event::AttributeUpdated,
                &[("account", account.as_str()), ("attribute", name)],
            ),
            Status::Error => Logger::event(
                Event::AttributeRejected,
                &[("account", account.as_str()), ("attribute", name)],
            ),
            Status::Failure => {
                let cause = envelope
                    .errors()
                    .values()
                    .flatten()
                    .next()
                    .cloned()
                    .unwrap_or_default();
                Logger::event(
                    Event::AttributeFailed,
                    &[("account", account.as_str()), ("attribute", name), ("cause", cause.as_str())],
                );
            }
        }

        envelope
    }

    /// `Ok(success message)` or the rejecting envelope
    fn try_update(&self, id: Uuid, name: &str, value: &Value) -> Result<String, ResponseEnvelope<()>> {
        let entry = self
            .registry
            .lookup(name)
            .ok_or_else(|| ResponseEnvelope::failure(format!("Unknown attribute '{}'", name)))?;

        let (label, changes) = match entry {
            AttributeEntry::Identity => {
                return Err(ResponseEnvelope::failure(format!(
                    "Identity field '{}' cannot be changed",
                    name
                )));
            }
            AttributeEntry::VerificationFlag(flag) => {
                let change =
                    AttributeChange::from_value(flag, value).map_err(ResponseEnvelope::failure)?;
                ("Verification status".to_string(), vec![change])
            }
            AttributeEntry::Field(rule) => {
                if let Err(message) = rule.validator.validate(value) {
                    return Err(ResponseEnvelope::error(
                        INVALID_FIELDS_MESSAGE,
                        field_error(name, message),
                    ));
                }

                let change = self.change_for(rule, value)?;

                if rule.unique {
                    self.ensure_available(id, rule, &change)?;
                }

                let mut changes = vec![change];
                if let Some(flag) = rule.resets {
                    changes.push(
                        AttributeChange::from_value(flag, &Value::Bool(false))
                            .map_err(ResponseEnvelope::failure)?,
                    );
                }
                (rule.label.clone(), changes)
            }
        };

        self.repo.update(id, &changes).map_err(|e| match e {
            StoreError::UniqueViolation { attribute } => self.registry.conflict(attribute),
            other => ResponseEnvelope::failure(other),
        })?;

        Ok(format!("{} updated", label))
    }

    /// Typed write for a validated value; passwords are hashed here
    fn change_for(
        &self,
        rule: &AttributeRule,
        value: &Value,
    ) -> Result<AttributeChange, ResponseEnvelope<()>> {
        if rule.attribute == Attribute::Password {
            let plaintext = value.as_str().ok_or_else(|| {
                ResponseEnvelope::failure(StoreError::TypeMismatch {
                    attribute: Attribute::Password,
                    expected: "a string",
                })
            })?;
            let digest = self
                .hasher
                .hash(plaintext)
                .map_err(ResponseEnvelope::failure)?;
            return Ok(AttributeChange::PasswordHash(digest));
        }

        AttributeChange::from_value(rule.attribute, value).map_err(ResponseEnvelope::failure)
    }

    /// Reject if another account already holds the value
    fn ensure_available(
        &self,
        id: Uuid,
        rule: &AttributeRule,
        change: &AttributeChange,
    ) -> Result<(), ResponseEnvelope<()>> {
        // Clearing an optional column cannot conflict.
        let Some(text) = change.text() else {
            return Ok(());
        };

        match self.repo.find_matching(rule.attribute, text, Some(id)) {
            Ok(None) => Ok(()),
            Ok(Some(_)) => Err(self.registry.conflict(rule.attribute)),
            Err(e) => Err(ResponseEnvelope::failure(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, Argon2Hasher, InMemoryAccountRepository};
    use crate::validation::PasswordPolicy;
    use serde_json::json;

    struct Fixture {
        repo: Arc<InMemoryAccountRepository>,
        validator: AttributeValidator<InMemoryAccountRepository, Argon2Hasher>,
        alice: Uuid,
        bob: Uuid,
    }

    fn fixture() -> Fixture {
        let mut alice = Account::new("alice", "Alice", "alice@example.com", None, "x");
        alice.email_verified = true;
        let bob = Account::new("bob", "Bob", "bob@example.com", None, "y");
        let (alice_id, bob_id) = (alice.id, bob.id);

        let repo = Arc::new(InMemoryAccountRepository::with_accounts(vec![alice, bob]));
        let validator = AttributeValidator::new(
            repo.clone(),
            Arc::new(Argon2Hasher::with_cost(1024, 1, 1).unwrap()),
            AttributeSchemaRegistry::accounts(&PasswordPolicy::default()),
        );

        Fixture {
            repo,
            validator,
            alice: alice_id,
            bob: bob_id,
        }
    }

    #[test]
    fn test_unknown_attribute_is_failure() {
        let f = fixture();
        let env = f.validator.update_attribute(f.alice, "shoe_size", json!(42));
        assert!(env.is_failure());
    }

    #[test]
    fn test_invalid_value_is_error_on_field() {
        let f = fixture();
        let env = f.validator.update_attribute(f.alice, "email", json!("not-an-email"));
        assert!(env.is_error());
        assert_eq!(env.field_errors("email").unwrap(), ["Enter a valid email address"]);
        assert_eq!(env.errors().len(), 1);
    }

    #[test]
    fn test_password_is_hashed() {
        let f = fixture();
        let env = f.validator.update_attribute(f.alice, "password", json!("correct horse"));
        assert!(env.is_success());

        let stored = f.repo.find_by_id(f.alice).unwrap().unwrap();
        assert!(stored.password_hash.starts_with("$argon2id$"));
        assert!(Argon2Hasher::new()
            .compare("correct horse", &stored.password_hash)
            .unwrap());
    }

    #[test]
    fn test_short_password_rejected() {
        let f = fixture();
        let env = f.validator.update_attribute(f.alice, "password", json!("short"));
        assert_eq!(
            env.field_errors("password").unwrap(),
            ["Password must be at least 8 characters"]
        );
    }

    #[test]
    fn test_flag_requires_boolean() {
        let f = fixture();
        assert!(f
            .validator
            .update_attribute(f.bob, "email_verified", json!(true))
            .is_success());
        assert!(f.repo.find_by_id(f.bob).unwrap().unwrap().email_verified);

        assert!(f
            .validator
            .update_attribute(f.bob, "email_verified", json!("yes"))
            .is_failure());
    }

    #[test]
    fn test_missing_account_is_failure() {
        let f = fixture();
        let env = f.validator.update_attribute(Uuid::new_v4(), "name", json!("Ghost"));
        assert!(env.is_failure());
        assert_eq!(env.field_errors("system").unwrap(), ["Account not found"]);
    }

    #[test]
    fn test_clearing_phone_skips_uniqueness_and_resets_flag() {
        let f = fixture();
        f.validator.update_attribute(f.bob, "phone", json!("555-0100"));
        f.validator.update_attribute(f.bob, "phone_verified", json!(true));

        let env = f.validator.update_attribute(f.bob, "phone", json!(""));
        assert!(env.is_success());
        let stored = f.repo.find_by_id(f.bob).unwrap().unwrap();
        assert_eq!(stored.phone, None);
        assert!(!stored.phone_verified);
    }
}

//! # Account Service
//!
//! Registration, login, feedback submission and attribute updates.
//! Every operation returns an envelope; no error crosses this boundary.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::attributes::AttributeValidator;
use super::crypto::CredentialHasher;
use super::errors::StoreError;
use super::feedback::{Feedback, FeedbackInbox, FeedbackReceipt, InMemoryFeedbackInbox};
use super::forms::{feedback_schema, login_schema, registration_schema};
use super::model::{Account, AccountRepository, AccountView, Attribute};
use super::registry::AttributeSchemaRegistry;
use crate::envelope::{field_error, FieldErrors, ResponseEnvelope, Status};
use crate::observability::{Event, Logger, MetricsRegistry, MetricsSnapshot};
use crate::validation::{PasswordPolicy, PayloadSchema, INVALID_FIELDS_MESSAGE};

/// Message shown for any credential mismatch
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid handle or password";

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Password requirements for registration and password updates
    #[serde(default)]
    pub password_policy: PasswordPolicy,

    /// Longest accepted feedback message, in characters
    #[serde(default = "default_feedback_max_length")]
    pub feedback_max_length: usize,
}

fn default_feedback_max_length() -> usize {
    2000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            password_policy: PasswordPolicy::default(),
            feedback_max_length: default_feedback_max_length(),
        }
    }
}

/// Account workflows over injected store, hasher and feedback inbox
pub struct AccountService<R: AccountRepository, H: CredentialHasher> {
    repo: Arc<R>,
    hasher: Arc<H>,
    attributes: AttributeValidator<R, H>,
    registration: PayloadSchema,
    login: PayloadSchema,
    feedback: PayloadSchema,
    inbox: Arc<dyn FeedbackInbox>,
    metrics: Arc<MetricsRegistry>,
    /// Compared against on unknown handles so both rejections cost a verify
    decoy_digest: Option<String>,
}

impl<R: AccountRepository, H: CredentialHasher> AccountService<R, H> {
    pub fn new(repo: Arc<R>, hasher: Arc<H>, config: ServiceConfig) -> Self {
        Self::with_inbox(repo, hasher, config, Arc::new(InMemoryFeedbackInbox::new()))
    }

    pub fn with_inbox(
        repo: Arc<R>,
        hasher: Arc<H>,
        config: ServiceConfig,
        inbox: Arc<dyn FeedbackInbox>,
    ) -> Self {
        let metrics = Arc::new(MetricsRegistry::new());
        let attributes = AttributeValidator::with_metrics(
            repo.clone(),
            hasher.clone(),
            AttributeSchemaRegistry::accounts(&config.password_policy),
            metrics.clone(),
        );

        let decoy_digest = hasher.hash(&Uuid::new_v4().to_string()).ok();

        Self {
            repo,
            hasher,
            attributes,
            registration: registration_schema(&config.password_policy),
            login: login_schema(),
            feedback: feedback_schema(config.feedback_max_length),
            inbox,
            metrics,
            decoy_digest,
        }
    }

    /// Envelope counts since start
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Validate and persist a single account attribute
    pub fn update_attribute(&self, id: Uuid, name: &str, value: Value) -> ResponseEnvelope<()> {
        self.attributes.update_attribute(id, name, value)
    }

    /// Create an account
    pub fn register(&self, payload: &Map<String, Value>) -> ResponseEnvelope<AccountView> {
        let envelope = self.try_register(payload);
        self.finish(
            "register",
            envelope,
            Event::AccountRegistered,
            Event::RegistrationRejected,
        )
    }

    fn try_register(&self, payload: &Map<String, Value>) -> ResponseEnvelope<AccountView> {
        if let Err(errors) = self.registration.validate(payload) {
            return ResponseEnvelope::error(INVALID_FIELDS_MESSAGE, errors);
        }

        let handle = text(payload, "handle");
        let email = text(payload, "email");
        let phone = Some(text(payload, "phone")).filter(|p| !p.is_empty());

        let mut conflicts = FieldErrors::new();
        let candidates = [
            (Attribute::Handle, Some(handle.as_str())),
            (Attribute::Email, Some(email.as_str())),
            (Attribute::Phone, phone.as_deref()),
        ];
        for (attribute, value) in candidates {
            let Some(value) = value else { continue };
            match self.repo.find_matching(attribute, value, None) {
                Ok(None) => {}
                Ok(Some(_)) => {
                    let conflict: ResponseEnvelope<()> =
                        self.attributes.registry().conflict(attribute);
                    conflicts.extend(conflict.errors().clone());
                }
                Err(e) => return ResponseEnvelope::failure(e),
            }
        }
        if !conflicts.is_empty() {
            return ResponseEnvelope::error(INVALID_FIELDS_MESSAGE, conflicts);
        }

        // Passwords are taken verbatim, never trimmed.
        let password = payload.get("password").and_then(Value::as_str).unwrap_or_default();
        let digest = match self.hasher.hash(password) {
            Ok(digest) => digest,
            Err(e) => return ResponseEnvelope::failure(e),
        };

        let account = Account::new(handle, text(payload, "name"), email, phone, digest);
        match self.repo.create(&account) {
            Ok(()) => ResponseEnvelope::success("Account created", AccountView::from(&account)),
            Err(StoreError::UniqueViolation { attribute }) => {
                self.attributes.registry().conflict(attribute)
            }
            Err(e) => ResponseEnvelope::failure(e),
        }
    }

    /// Check credentials
    pub fn login(&self, payload: &Map<String, Value>) -> ResponseEnvelope<AccountView> {
        let envelope = self.try_login(payload);
        self.finish("login", envelope, Event::LoginSucceeded, Event::LoginRejected)
    }

    fn try_login(&self, payload: &Map<String, Value>) -> ResponseEnvelope<AccountView> {
        if let Err(errors) = self.login.validate(payload) {
            return ResponseEnvelope::error(INVALID_FIELDS_MESSAGE, errors);
        }

        let rejected = || {
            ResponseEnvelope::error(
                INVALID_CREDENTIALS_MESSAGE,
                field_error("password", INVALID_CREDENTIALS_MESSAGE),
            )
        };

        let handle = text(payload, "handle");
        let password = payload.get("password").and_then(Value::as_str).unwrap_or_default();
        let account = match self.repo.find_matching(Attribute::Handle, &handle, None) {
            Ok(Some(account)) => account,
            Ok(None) => {
                if let Some(decoy) = &self.decoy_digest {
                    let _ = self.hasher.compare(password, decoy);
                }
                return rejected();
            }
            Err(e) => return ResponseEnvelope::failure(e),
        };

        match self.hasher.compare(password, &account.password_hash) {
            Ok(true) => ResponseEnvelope::success("Welcome back", AccountView::from(&account)),
            Ok(false) => rejected(),
            Err(e) => ResponseEnvelope::failure(e),
        }
    }

    /// Accept a feedback message
    pub fn submit_feedback(&self, payload: &Map<String, Value>) -> ResponseEnvelope<FeedbackReceipt> {
        let envelope = self.try_submit_feedback(payload);
        self.finish(
            "submit_feedback",
            envelope,
            Event::FeedbackAccepted,
            Event::FeedbackRejected,
        )
    }

    fn try_submit_feedback(&self, payload: &Map<String, Value>) -> ResponseEnvelope<FeedbackReceipt> {
        if let Err(errors) = self.feedback.validate(payload) {
            return ResponseEnvelope::error(INVALID_FIELDS_MESSAGE, errors);
        }

        let feedback = Feedback::new(
            text(payload, "name"),
            text(payload, "email"),
            text(payload, "message"),
        );
        match self.inbox.submit(&feedback) {
            Ok(()) => ResponseEnvelope::success(
                "Thanks for your feedback!",
                FeedbackReceipt::from(&feedback),
            ),
            Err(e) => ResponseEnvelope::failure(e),
        }
    }

    /// Count and log an outcome. Logs name offending fields, never values.
    fn finish<T>(
        &self,
        operation: &str,
        envelope: ResponseEnvelope<T>,
        accepted: Event,
        rejected: Event,
    ) -> ResponseEnvelope<T> {
        self.metrics.record(envelope.status());

        let fields = envelope
            .errors()
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");

        match envelope.status() {
            Status::Success => Logger::event(accepted, &[("operation", operation)]),
            Status::Error => Logger::event(
                rejected,
                &[("operation", operation), ("fields", fields.as_str())],
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
                    Event::OperationFailed,
                    &[("operation", operation), ("cause", cause.as_str())],
                );
            }
        }

        envelope
    }
}

/// Trimmed string field, empty when absent or not a string
fn text(payload: &Map<String, Value>, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
